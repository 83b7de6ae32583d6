//! Contract bindings and clients for Compound III (Comet) markets.
//!
//! This crate provides Solidity bindings for the Comet ledger, its rewards
//! and configurator contracts, a read trait with default implementations for
//! every view function, and a transaction client whose write methods return
//! [`PreparedCall`]s.
//!
//! # Example
//!
//! ```no_run
//! use comet_rs_contracts::{CometReadClient, CometReader};
//! use alloy::primitives::Address;
//!
//! #[tokio::main]
//! async fn main() -> comet_rs_contracts::Result<()> {
//!     let client = CometReadClient::new("https://eth.llamarpc.com")?;
//!
//!     let comet: Address = "0xc3d688B66703497DAA19211EEdff47f25384cdc3".parse().unwrap();
//!     let utilization = client.get_utilization(comet).await?;
//!     let supply_rate = client.get_supply_rate(comet, utilization).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod comet;
pub mod configurator;
pub mod erc20;
pub mod error;
pub mod prepared_call;
pub mod provider;
pub mod reader;
pub mod rewards;
pub mod tx_client;

pub use comet::IComet::{AssetInfo, TotalsBasic};
pub use error::{ContractError, Result};
pub use prepared_call::PreparedCall;
pub use provider::{connect_read_only, connect_with_signer, CometProvider};
pub use reader::{CometReadClient, CometReader, LiquidatorPoints, UserBasic};
pub use rewards::ICometRewards::RewardOwed;
pub use tx_client::{AllowSignature, CometTransactionClient};
