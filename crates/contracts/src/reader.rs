//! Read access to Comet markets, their rewards and their tokens.
//!
//! `CometReader` provides default implementations for every view function the
//! clients use. Implementors only need to provide `provider()`. Every method
//! takes the target contract address explicitly so callers can snapshot the
//! resolved endpoints before awaiting.

#![allow(async_fn_in_trait)]

use alloy::primitives::{Address, I256, U256};

use crate::comet::IComet::{self, AssetInfo, TotalsBasic};
use crate::configurator::IConfigurator;
use crate::erc20::IERC20;
use crate::error::{ContractError, Result};
use crate::provider::{connect_read_only, CometProvider};
use crate::rewards::ICometRewards::{self, RewardOwed};

/// Principal and tracking state of an account, as stored by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserBasic {
    /// Signed principal: positive when supplying, negative when borrowing.
    pub principal: I256,
    pub base_tracking_index: U256,
    pub base_tracking_accrued: U256,
    /// Bitmap of collateral assets the account holds.
    pub assets_in: U256,
}

/// Absorption statistics of a liquidator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidatorPoints {
    pub num_absorbs: U256,
    pub num_absorbed: U256,
    pub approx_spend: U256,
}

/// Trait for Comet read functionality.
pub trait CometReader {
    /// Returns a reference to the provider.
    fn provider(&self) -> &CometProvider;

    /// Get the ledger implementation version.
    async fn get_version(&self, comet: Address) -> Result<String> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.version().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get version: {}", e))
        })?;
        Ok(result)
    }

    /// Get the decimals of the base token.
    async fn get_decimals(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.decimals().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get decimals: {}", e))
        })?;
        Ok(result)
    }

    /// Get the base token address.
    async fn get_base_token(&self, comet: Address) -> Result<Address> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.baseToken().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get base token: {}", e))
        })?;
        Ok(result)
    }

    /// Get the base token price feed address.
    async fn get_base_token_price_feed(&self, comet: Address) -> Result<Address> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.baseTokenPriceFeed().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get base token price feed: {}", e))
        })?;
        Ok(result)
    }

    /// Get the number of listed collateral assets.
    async fn get_num_assets(&self, comet: Address) -> Result<u8> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.numAssets().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get number of assets: {}", e))
        })?;
        u8::try_from(result)
            .map_err(|_| ContractError::CallFailed(format!("Asset count {} out of range", result)))
    }

    /// Get the minimum borrow balance.
    async fn get_base_borrow_min(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.baseBorrowMin().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get base borrow min: {}", e))
        })?;
        Ok(result)
    }

    /// Get the scale used for base accrual.
    async fn get_base_accrual_scale(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.baseAccrualScale().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get base accrual scale: {}", e))
        })?;
        Ok(result)
    }

    /// Get the scale used for base indices.
    async fn get_base_index_scale(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.baseIndexScale().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get base index scale: {}", e))
        })?;
        Ok(result)
    }

    /// Get the scale used for collateral factors.
    async fn get_factor_scale(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.factorScale().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get factor scale: {}", e))
        })?;
        Ok(result)
    }

    /// Get the scale used for prices.
    async fn get_price_scale(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.priceScale().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get price scale: {}", e))
        })?;
        Ok(result)
    }

    /// Get the total base supplied, with interest.
    async fn get_total_supply(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.totalSupply().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get total supply: {}", e))
        })?;
        Ok(result)
    }

    /// Get the total base borrowed, with interest.
    async fn get_total_borrow(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.totalBorrow().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get total borrow: {}", e))
        })?;
        Ok(result)
    }

    /// Get the market-wide indices and principal totals.
    async fn get_totals_basic(&self, comet: Address) -> Result<TotalsBasic> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.totalsBasic().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get totals basic: {}", e))
        })?;
        Ok(result)
    }

    /// Get the total amount of a collateral asset supplied.
    async fn get_totals_collateral(&self, comet: Address, asset: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.totalsCollateral(asset).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get totals collateral: {}", e))
        })?;
        Ok(result.totalSupplyAsset)
    }

    /// Get the base balance supplied by an account.
    async fn get_balance_of(&self, comet: Address, account: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.balanceOf(account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get balance: {}", e))
        })?;
        Ok(result)
    }

    /// Get the base balance borrowed by an account.
    async fn get_borrow_balance_of(&self, comet: Address, account: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.borrowBalanceOf(account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get borrow balance: {}", e))
        })?;
        Ok(result)
    }

    /// Get the amount of a collateral asset supplied by an account.
    async fn get_collateral_balance_of(
        &self,
        comet: Address,
        account: Address,
        asset: Address,
    ) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract
            .collateralBalanceOf(account, asset)
            .call()
            .await
            .map_err(|e| {
                ContractError::CallFailed(format!("Failed to get collateral balance: {}", e))
            })?;
        Ok(result)
    }

    /// Get the stored principal and tracking state of an account.
    async fn get_user_basic(&self, comet: Address, account: Address) -> Result<UserBasic> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.userBasic(account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get user basic: {}", e))
        })?;
        Ok(UserBasic {
            principal: result.principal,
            base_tracking_index: result.baseTrackingIndex,
            base_tracking_accrued: result.baseTrackingAccrued,
            assets_in: result.assetsIn,
        })
    }

    /// Get the reward tracking accrued by an account.
    async fn get_base_tracking_accrued(&self, comet: Address, account: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.baseTrackingAccrued(account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get base tracking accrued: {}", e))
        })?;
        Ok(result)
    }

    /// Get the current utilization (`1e18`-scaled).
    async fn get_utilization(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.getUtilization().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get utilization: {}", e))
        })?;
        Ok(result)
    }

    /// Get the per-second supply rate at a utilization.
    async fn get_supply_rate(&self, comet: Address, utilization: U256) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.getSupplyRate(utilization).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get supply rate: {}", e))
        })?;
        Ok(result)
    }

    /// Get the per-second borrow rate at a utilization.
    async fn get_borrow_rate(&self, comet: Address, utilization: U256) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.getBorrowRate(utilization).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get borrow rate: {}", e))
        })?;
        Ok(result)
    }

    /// Get collateral asset configuration by index.
    async fn get_asset_info(&self, comet: Address, index: u8) -> Result<AssetInfo> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.getAssetInfo(index).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get asset info: {}", e))
        })?;
        Ok(result)
    }

    /// Get collateral asset configuration by asset address.
    async fn get_asset_info_by_address(&self, comet: Address, asset: Address) -> Result<AssetInfo> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.getAssetInfoByAddress(asset).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get asset info by address: {}", e))
        })?;
        Ok(result)
    }

    /// Get the `1e8`-scaled price reported by a price feed.
    async fn get_price(&self, comet: Address, price_feed: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.getPrice(price_feed).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get price: {}", e))
        })?;
        Ok(result)
    }

    /// Get the base reserves, which may be negative.
    async fn get_reserves(&self, comet: Address) -> Result<I256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.getReserves().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get reserves: {}", e))
        })?;
        Ok(result)
    }

    /// Get the reserve level below which collateral can be bought.
    async fn get_target_reserves(&self, comet: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.targetReserves().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get target reserves: {}", e))
        })?;
        Ok(result)
    }

    /// Get the protocol's reserves of a collateral asset.
    async fn get_collateral_reserves(&self, comet: Address, asset: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.getCollateralReserves(asset).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get collateral reserves: {}", e))
        })?;
        Ok(result)
    }

    /// Quote how much collateral `base_amount` of base buys.
    async fn quote_collateral(
        &self,
        comet: Address,
        asset: Address,
        base_amount: U256,
    ) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract
            .quoteCollateral(asset, base_amount)
            .call()
            .await
            .map_err(|e| {
                ContractError::CallFailed(format!("Failed to quote collateral: {}", e))
            })?;
        Ok(result)
    }

    /// Get the absorption statistics of a liquidator.
    async fn get_liquidator_points(
        &self,
        comet: Address,
        account: Address,
    ) -> Result<LiquidatorPoints> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.liquidatorPoints(account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get liquidator points: {}", e))
        })?;
        Ok(LiquidatorPoints {
            num_absorbs: result.numAbsorbs,
            num_absorbed: result.numAbsorbed,
            approx_spend: result.approxSpend,
        })
    }

    /// Whether the ledger considers an account liquidatable.
    async fn is_liquidatable(&self, comet: Address, account: Address) -> Result<bool> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.isLiquidatable(account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to check liquidatable: {}", e))
        })?;
        Ok(result)
    }

    /// Whether the ledger considers an account's borrow collateralized.
    async fn is_borrow_collateralized(&self, comet: Address, account: Address) -> Result<bool> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.isBorrowCollateralized(account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to check borrow collateralized: {}", e))
        })?;
        Ok(result)
    }

    /// Whether `manager` may act for `owner`.
    async fn has_permission(&self, comet: Address, owner: Address, manager: Address) -> Result<bool> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.hasPermission(owner, manager).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to check permission: {}", e))
        })?;
        Ok(result)
    }

    /// Whether `owner` has explicitly allowed `manager`.
    async fn is_allowed(&self, comet: Address, owner: Address, manager: Address) -> Result<bool> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.isAllowed(owner, manager).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to check allowance: {}", e))
        })?;
        Ok(result)
    }

    /// Get the signature nonce of an account.
    async fn get_user_nonce(&self, comet: Address, account: Address) -> Result<U256> {
        let contract = IComet::new(comet, self.provider());
        let result = contract.userNonce(account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get user nonce: {}", e))
        })?;
        Ok(result)
    }

    /// Get the reward owed to an account by a rewards contract.
    async fn get_reward_owed(
        &self,
        rewards: Address,
        comet: Address,
        account: Address,
    ) -> Result<RewardOwed> {
        let contract = ICometRewards::new(rewards, self.provider());
        let result = contract.getRewardOwed(comet, account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get reward owed: {}", e))
        })?;
        Ok(result)
    }

    /// Get the rewards already claimed by an account.
    async fn get_rewards_claimed(
        &self,
        rewards: Address,
        comet: Address,
        account: Address,
    ) -> Result<U256> {
        let contract = ICometRewards::new(rewards, self.provider());
        let result = contract.rewardsClaimed(comet, account).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get rewards claimed: {}", e))
        })?;
        Ok(result)
    }

    /// Get the factory a configurator uses for a Comet proxy.
    async fn get_factory(&self, configurator: Address, comet: Address) -> Result<Address> {
        let contract = IConfigurator::new(configurator, self.provider());
        let result = contract.factory(comet).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get factory: {}", e))
        })?;
        Ok(result)
    }

    /// Get the decimals of an ERC-20 token.
    async fn get_token_decimals(&self, token: Address) -> Result<u8> {
        let contract = IERC20::new(token, self.provider());
        let result = contract.decimals().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get token decimals: {}", e))
        })?;
        Ok(result)
    }

    /// Get the symbol of an ERC-20 token.
    async fn get_token_symbol(&self, token: Address) -> Result<String> {
        let contract = IERC20::new(token, self.provider());
        let result = contract.symbol().call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get token symbol: {}", e))
        })?;
        Ok(result)
    }

    /// Get the ERC-20 balance of an address.
    async fn get_token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        let contract = IERC20::new(token, self.provider());
        let result = contract.balanceOf(owner).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get token balance: {}", e))
        })?;
        Ok(result)
    }

    /// Get the ERC-20 allowance of a spender.
    async fn get_allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        let contract = IERC20::new(token, self.provider());
        let result = contract.allowance(owner, spender).call().await.map_err(|e| {
            ContractError::CallFailed(format!("Failed to get allowance: {}", e))
        })?;
        Ok(result)
    }
}

/// Read-only client for Comet markets.
#[derive(Clone)]
pub struct CometReadClient {
    provider: CometProvider,
}

impl CometReadClient {
    /// Create a read-only client for an RPC endpoint.
    pub fn new(rpc_url: &str) -> Result<Self> {
        Ok(Self {
            provider: connect_read_only(rpc_url)?,
        })
    }

    /// Wrap an existing provider.
    pub fn from_provider(provider: CometProvider) -> Self {
        Self { provider }
    }
}

impl CometReader for CometReadClient {
    fn provider(&self) -> &CometProvider {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_client_invalid_rpc_url() {
        let result = CometReadClient::new("not a valid url");
        assert!(matches!(result, Err(ContractError::RpcConnection(_))));
    }

    #[test]
    fn test_read_client_valid_construction() {
        assert!(CometReadClient::new("http://localhost:8545").is_ok());
    }

    #[tokio::test]
    async fn test_read_against_unreachable_endpoint_is_call_failed() {
        let client = CometReadClient::new("http://127.0.0.1:1").unwrap();
        let result = client.get_utilization(Address::repeat_byte(0x11)).await;
        match result {
            Err(ContractError::CallFailed(message)) => {
                assert!(message.starts_with("Failed to get utilization"));
            }
            other => panic!("expected CallFailed, got {:?}", other),
        }
    }
}
