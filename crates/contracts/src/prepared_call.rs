//! Prepared call types for deferred transaction execution.
//!
//! A `PreparedCall` is a transaction that has been constructed but not yet
//! sent. It can be inspected (target, value, calldata), decomposed into its
//! typed call, or sent and awaited to a receipt.

use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;

use crate::error::{ContractError, Result};
use crate::provider::CometProvider;

/// A prepared transaction that can be inspected or executed.
///
/// # Example
///
/// ```rust,ignore
/// // Send and wait for the receipt
/// let receipt = client.supply(comet, usdc, amount).send().await?;
///
/// // Or only keep the transaction hash of a successful transaction
/// let tx_hash = client.withdraw(comet, usdc, amount).send_and_confirm().await?;
/// ```
pub struct PreparedCall<'a, C: SolCall> {
    to: Address,
    call: C,
    value: U256,
    provider: &'a CometProvider,
}

impl<'a, C: SolCall> PreparedCall<'a, C> {
    /// Create a new prepared call.
    pub fn new(to: Address, call: C, value: U256, provider: &'a CometProvider) -> Self {
        Self {
            to,
            call,
            value,
            provider,
        }
    }

    /// Consumes self and returns `(address, call)`.
    pub fn prepare(self) -> (Address, C) {
        (self.to, self.call)
    }

    /// Returns the target address for this call.
    pub fn to(&self) -> Address {
        self.to
    }

    /// Returns the value (ETH) to send with this call.
    pub fn value(&self) -> U256 {
        self.value
    }

    /// ABI-encoded calldata, selector included.
    pub fn calldata(&self) -> Bytes {
        self.call.abi_encode().into()
    }

    /// Sends the transaction and waits for the receipt.
    pub async fn send(self) -> Result<TransactionReceipt> {
        let tx = TransactionRequest::default()
            .to(self.to)
            .input(self.calldata().into())
            .value(self.value);

        let pending = self.provider.send_transaction(tx).await.map_err(|e| {
            ContractError::TransactionFailed(format!("Failed to send transaction: {}", e))
        })?;

        let receipt = pending.get_receipt().await.map_err(|e| {
            ContractError::TransactionFailed(format!("Failed to get receipt: {}", e))
        })?;

        Ok(receipt)
    }

    /// Sends the transaction and returns its hash once mined successfully.
    ///
    /// A mined transaction with a failed status is returned as
    /// [`ContractError::Reverted`].
    pub async fn send_and_confirm(self) -> Result<B256> {
        let receipt = self.send().await?;
        if !receipt.status() {
            return Err(ContractError::Reverted {
                tx_hash: receipt.transaction_hash,
            });
        }
        Ok(receipt.transaction_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::connect_with_signer;
    use alloy::sol;

    sol! {
        #[sol(rpc)]
        interface ITestContract {
            function testFunction(uint256 value, address receiver) external returns (bool);
        }
    }

    // Anvil's default account 0 private key
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn create_test_provider() -> CometProvider {
        let (provider, _) = connect_with_signer("http://localhost:8545", TEST_PRIVATE_KEY)
            .expect("invalid test provider");
        provider
    }

    fn test_call() -> ITestContract::testFunctionCall {
        ITestContract::testFunctionCall {
            value: U256::from(100),
            receiver: Address::repeat_byte(0x01),
        }
    }

    #[test]
    fn test_to_returns_target_address() {
        let provider = create_test_provider();
        let target = Address::repeat_byte(0x42);

        let prepared = PreparedCall::new(target, test_call(), U256::ZERO, &provider);

        assert_eq!(prepared.to(), target);
    }

    #[test]
    fn test_value_returns_eth_amount() {
        let provider = create_test_provider();
        let value = U256::from(1_000_000_000_000_000_000u64);

        let prepared = PreparedCall::new(Address::repeat_byte(0x42), test_call(), value, &provider);

        assert_eq!(prepared.value(), value);
    }

    #[test]
    fn test_calldata_starts_with_selector() {
        let provider = create_test_provider();
        let prepared =
            PreparedCall::new(Address::repeat_byte(0x42), test_call(), U256::ZERO, &provider);

        let calldata = prepared.calldata();

        assert_eq!(&calldata[0..4], &ITestContract::testFunctionCall::SELECTOR);
        assert_eq!(calldata.len(), 4 + 32 + 32);
        assert_eq!(U256::from_be_slice(&calldata[4..36]), U256::from(100));
    }

    #[test]
    fn test_prepare_returns_address_and_call_tuple() {
        let provider = create_test_provider();
        let target = Address::repeat_byte(0x42);

        let prepared = PreparedCall::new(target, test_call(), U256::ZERO, &provider);
        let (addr, returned_call) = prepared.prepare();

        assert_eq!(addr, target);
        assert_eq!(returned_call.value, U256::from(100));
        assert_eq!(returned_call.receiver, Address::repeat_byte(0x01));
    }
}
