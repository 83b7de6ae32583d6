//! Error types for the Comet client.

use comet_rs_contracts::ContractError;
use comet_rs_math::MathError;
use thiserror::Error;

/// Errors that can occur when using the Comet client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No Comet address could be resolved for the client's chain.
    #[error("Client is not initialized: no Comet address resolved for chain {chain_id}")]
    NotInitialized { chain_id: u64 },

    /// A required argument was absent or the zero address.
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// An amount was not strictly positive.
    #[error("Invalid amount for {0}: must be greater than zero")]
    InvalidAmount(&'static str),

    /// The operation needs a rewards or configurator contract that is not configured.
    #[error("{0} contract is not available on this market")]
    ContractUnavailable(&'static str),

    /// Error returned by the RPC endpoint or a contract.
    #[error(transparent)]
    Upstream(#[from] ContractError),

    /// Numeric conversion or derivation error.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Transaction support not configured.
    #[error("Transaction support not configured. Provide rpc_url and private_key.")]
    TransactionNotConfigured,

    /// The network registry document is malformed or inconsistent.
    #[error("Invalid registry: {0}")]
    Registry(String),
}

impl ApiError {
    /// Whether the error was raised by argument validation, before any network call.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized { .. }
                | Self::MissingArgument(_)
                | Self::InvalidAmount(_)
                | Self::ContractUnavailable(_)
                | Self::TransactionNotConfigured
        )
    }

    /// Whether the error came from the RPC endpoint or a contract.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
