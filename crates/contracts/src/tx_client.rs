//! Transaction client for Comet markets and their rewards contracts.

use alloy::primitives::{Address, B256, U256};

use crate::comet::IComet;
use crate::erc20::IERC20;
use crate::error::Result;
use crate::prepared_call::PreparedCall;
use crate::provider::{connect_with_signer, CometProvider};
use crate::reader::CometReader;
use crate::rewards::ICometRewards;

/// An EIP-712 signature authorizing a manager, as consumed by `allowBySig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowSignature {
    pub nonce: U256,
    pub expiry: U256,
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

/// Client for executing transactions against Comet markets.
///
/// Every write method returns a [`PreparedCall`] that can be inspected or
/// sent. View functions come from [`CometReader`].
pub struct CometTransactionClient {
    provider: CometProvider,
    signer_address: Address,
}

impl CometTransactionClient {
    /// Create a new transaction client.
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self> {
        let (provider, signer_address) = connect_with_signer(rpc_url, private_key)?;
        Ok(Self {
            provider,
            signer_address,
        })
    }

    /// Returns the signer's address.
    pub fn signer_address(&self) -> Address {
        self.signer_address
    }

    /// Create a prepared approval transaction.
    pub fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> PreparedCall<'_, IERC20::approveCall> {
        let call = IERC20::approveCall { spender, amount };
        PreparedCall::new(token, call, U256::ZERO, &self.provider)
    }

    /// Approve a spender to use tokens if needed.
    /// Returns a `PreparedCall` if approval is needed, None otherwise.
    pub async fn approve_if_needed(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<Option<PreparedCall<'_, IERC20::approveCall>>> {
        let current_allowance = self
            .get_allowance(token, self.signer_address, spender)
            .await?;

        if current_allowance >= amount {
            return Ok(None);
        }

        Ok(Some(self.approve(token, spender, amount)))
    }

    /// Supply an asset (base or collateral) from the signer to itself.
    pub fn supply(
        &self,
        comet: Address,
        asset: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::supplyCall> {
        let call = IComet::supplyCall { asset, amount };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Supply an asset from the signer to `dst`.
    pub fn supply_to(
        &self,
        comet: Address,
        dst: Address,
        asset: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::supplyToCall> {
        let call = IComet::supplyToCall { dst, asset, amount };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Supply an asset from `from` to `dst`; the signer must be a manager of `from`.
    pub fn supply_from(
        &self,
        comet: Address,
        from: Address,
        dst: Address,
        asset: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::supplyFromCall> {
        let call = IComet::supplyFromCall {
            from,
            dst,
            asset,
            amount,
        };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Withdraw an asset to the signer. Withdrawing base beyond the supplied
    /// balance borrows.
    pub fn withdraw(
        &self,
        comet: Address,
        asset: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::withdrawCall> {
        let call = IComet::withdrawCall { asset, amount };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Withdraw an asset from the signer's account to `to`.
    pub fn withdraw_to(
        &self,
        comet: Address,
        to: Address,
        asset: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::withdrawToCall> {
        let call = IComet::withdrawToCall { to, asset, amount };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Withdraw an asset from `src` to `to`; the signer must be a manager of `src`.
    pub fn withdraw_from(
        &self,
        comet: Address,
        src: Address,
        to: Address,
        asset: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::withdrawFromCall> {
        let call = IComet::withdrawFromCall {
            src,
            to,
            asset,
            amount,
        };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Transfer base from the signer to `dst`.
    pub fn transfer(
        &self,
        comet: Address,
        dst: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::transferCall> {
        let call = IComet::transferCall { dst, amount };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Transfer base from `src` to `dst`.
    pub fn transfer_from(
        &self,
        comet: Address,
        src: Address,
        dst: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::transferFromCall> {
        let call = IComet::transferFromCall { src, dst, amount };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Transfer an asset from the signer to `dst`.
    pub fn transfer_asset(
        &self,
        comet: Address,
        dst: Address,
        asset: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::transferAssetCall> {
        let call = IComet::transferAssetCall { dst, asset, amount };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Transfer an asset from `src` to `dst`.
    pub fn transfer_asset_from(
        &self,
        comet: Address,
        src: Address,
        dst: Address,
        asset: Address,
        amount: U256,
    ) -> PreparedCall<'_, IComet::transferAssetFromCall> {
        let call = IComet::transferAssetFromCall {
            src,
            dst,
            asset,
            amount,
        };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Absorb underwater accounts, crediting liquidator points to `absorber`.
    pub fn absorb(
        &self,
        comet: Address,
        absorber: Address,
        accounts: Vec<Address>,
    ) -> PreparedCall<'_, IComet::absorbCall> {
        let call = IComet::absorbCall { absorber, accounts };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Buy discounted collateral from the protocol with base.
    pub fn buy_collateral(
        &self,
        comet: Address,
        asset: Address,
        min_amount: U256,
        base_amount: U256,
        recipient: Address,
    ) -> PreparedCall<'_, IComet::buyCollateralCall> {
        let call = IComet::buyCollateralCall {
            asset,
            minAmount: min_amount,
            baseAmount: base_amount,
            recipient,
        };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Allow or disallow `manager` to act for the signer.
    pub fn allow(
        &self,
        comet: Address,
        manager: Address,
        is_allowed: bool,
    ) -> PreparedCall<'_, IComet::allowCall> {
        let call = IComet::allowCall {
            manager,
            isAllowed: is_allowed,
        };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Submit an off-chain signed allowance on behalf of `owner`.
    pub fn allow_by_sig(
        &self,
        comet: Address,
        owner: Address,
        manager: Address,
        is_allowed: bool,
        signature: AllowSignature,
    ) -> PreparedCall<'_, IComet::allowBySigCall> {
        let call = IComet::allowBySigCall {
            owner,
            manager,
            isAllowed: is_allowed,
            nonce: signature.nonce,
            expiry: signature.expiry,
            v: signature.v,
            r: signature.r,
            s: signature.s,
        };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Accrue interest and reward tracking for an account.
    pub fn accrue_account(
        &self,
        comet: Address,
        account: Address,
    ) -> PreparedCall<'_, IComet::accrueAccountCall> {
        let call = IComet::accrueAccountCall { account };
        PreparedCall::new(comet, call, U256::ZERO, &self.provider)
    }

    /// Claim rewards owed to `src`.
    pub fn claim(
        &self,
        rewards: Address,
        comet: Address,
        src: Address,
        should_accrue: bool,
    ) -> PreparedCall<'_, ICometRewards::claimCall> {
        let call = ICometRewards::claimCall {
            comet,
            src,
            shouldAccrue: should_accrue,
        };
        PreparedCall::new(rewards, call, U256::ZERO, &self.provider)
    }

    /// Claim rewards owed to `src` and send them to `to`.
    pub fn claim_to(
        &self,
        rewards: Address,
        comet: Address,
        src: Address,
        to: Address,
        should_accrue: bool,
    ) -> PreparedCall<'_, ICometRewards::claimToCall> {
        let call = ICometRewards::claimToCall {
            comet,
            src,
            to,
            shouldAccrue: should_accrue,
        };
        PreparedCall::new(rewards, call, U256::ZERO, &self.provider)
    }
}

impl CometReader for CometTransactionClient {
    fn provider(&self) -> &CometProvider {
        &self.provider
    }
}
