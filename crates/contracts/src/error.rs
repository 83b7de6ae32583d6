//! Error types for the contracts crate.

use alloy_primitives::B256;
use thiserror::Error;

/// Errors that can occur when using contract clients.
#[derive(Debug, Error)]
pub enum ContractError {
    /// RPC connection failed.
    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    /// A view call was rejected or could not be decoded.
    #[error("Contract call failed: {0}")]
    CallFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Transaction was mined but reverted.
    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: B256 },

    /// Invalid private key.
    #[error("Invalid private key")]
    InvalidPrivateKey,
}

/// Result type alias for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;
