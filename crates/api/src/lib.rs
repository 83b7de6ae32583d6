//! Compound III (Comet) client library
//!
//! This crate resolves which Comet deployment a client talks to, reads the
//! ledger, derives utilization, APR/APY and account health from raw values,
//! and submits transactions.
//!
//! # Example
//!
//! ```no_run
//! use comet_rs_api::{CometClient, CometClientConfig, Denomination, UtilizationSource};
//! use alloy::primitives::{Address, U256};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), comet_rs_api::ApiError> {
//!     // Read-only client for the first market on Ethereum
//!     let client = CometClient::new(1)?;
//!     let overview = client.market_overview().await?;
//!     println!("{:?} utilization {}%", overview.market, overview.utilization.percent);
//!
//!     // Preview the borrow rate at 90% utilization
//!     let preview = client
//!         .borrow_rate(UtilizationSource::Override(U256::from(900_000_000_000_000_000u64)))
//!         .await?;
//!     println!("borrow APR at 90%: {}%", preview.apr.round_dp(2));
//!
//!     // Account health in USD
//!     let account: Address = "0x...".parse().unwrap();
//!     let health = client.assess_health(account, Denomination::Usd).await?;
//!     println!("health factor {}", health.health_factor);
//!
//!     // Full client with transaction support
//!     let config = CometClientConfig::new()
//!         .with_chain_id(8453)
//!         .with_market("WETH")
//!         .with_rpc_url("https://mainnet.base.org")
//!         .with_private_key("0x...");
//!     let client = CometClient::with_config(config)?;
//!     let weth: Address = "0x4200000000000000000000000000000000000006".parse().unwrap();
//!     let tx_hash = client.supply(weth, U256::from(10u64.pow(17))).await?;
//!     println!("supplied in {}", tx_hash);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All errors are unified through [`ApiError`]. Argument problems
//! ([`ApiError::is_argument_error`]) are reported before any network call;
//! RPC and contract failures are passed through as [`ApiError::Upstream`].

pub mod client;
pub mod endpoint;
pub mod error;
pub mod generation;
pub mod registry;
pub mod types;

pub use client::{CometClient, CometClientConfig, DEFAULT_CHAIN_ID};
pub use endpoint::{ClientEndpointState, EndpointOverrides, EndpointSnapshot};
pub use error::{ApiError, Result};
pub use generation::{Generation, Latest, Outcome, Ticket};
pub use registry::{MarketConfig, NativeCurrency, NetworkConfig, NetworkMarketRegistry};
pub use types::{
    AccountPosition, CollateralHolding, Denomination, MarketOverview, UtilizationSource,
};

pub use comet_rs_contracts::{
    AllowSignature, AssetInfo, CometReadClient, CometReader, CometTransactionClient,
    LiquidatorPoints, RewardOwed, TotalsBasic, UserBasic,
};
pub use comet_rs_math::{
    HealthAssessment, HealthBand, HealthFactor, MathError, RateSample, Scale, ScaledValue,
    UtilizationSample,
};
