//! Command implementations.

pub mod markets;
pub mod position;
pub mod rates;
pub mod resolve;
pub mod transaction;

use std::path::Path;
use std::sync::Arc;

use alloy_primitives::Address;
use anyhow::{bail, Context, Result};
use comet_rs_api::{CometClientConfig, EndpointOverrides, NetworkMarketRegistry};
use rust_decimal::Decimal;
use tracing::debug;

use crate::cli::EndpointArgs;

pub use markets::run_markets;
pub use position::run_position;
pub use rates::run_rates;
pub use resolve::run_resolve;
pub use transaction::{run_claim, run_supply, run_withdraw};

/// Load the registry from `path`, or the built-in one.
pub fn load_registry(path: Option<&Path>) -> Result<Arc<NetworkMarketRegistry>> {
    let registry = match path {
        Some(path) => NetworkMarketRegistry::from_path(path)
            .with_context(|| format!("Failed to load registry from {}", path.display()))?,
        None => NetworkMarketRegistry::builtin().context("Failed to load built-in registry")?,
    };
    debug!(networks = registry.chain_ids().count(), "loaded registry");
    Ok(Arc::new(registry))
}

pub fn parse_address(value: &str, what: &str) -> Result<Address> {
    value
        .parse()
        .with_context(|| format!("Invalid {} address: {}", what, value))
}

fn parse_optional_address(value: Option<&str>, what: &str) -> Result<Option<Address>> {
    value.map(|v| parse_address(v, what)).transpose()
}

/// Address overrides given on the command line.
pub fn endpoint_overrides(args: &EndpointArgs) -> Result<EndpointOverrides> {
    Ok(EndpointOverrides {
        comet: parse_optional_address(args.comet.as_deref(), "comet")?,
        rewards: parse_optional_address(args.rewards.as_deref(), "rewards")?,
        configurator: parse_optional_address(args.configurator.as_deref(), "configurator")?,
    })
}

/// Client configuration for the selected market.
pub fn client_config(
    registry: Arc<NetworkMarketRegistry>,
    args: &EndpointArgs,
    rpc_url: Option<&str>,
) -> Result<CometClientConfig> {
    let overrides = endpoint_overrides(args)?;

    let mut config = CometClientConfig::new()
        .with_chain_id(args.chain.0)
        .with_registry(registry);
    if let Some(market) = &args.market {
        config = config.with_market(market.clone());
    }
    if let Some(comet) = overrides.comet {
        config = config.with_comet_address(comet);
    }
    if let Some(rewards) = overrides.rewards {
        config = config.with_rewards_address(rewards);
    }
    if let Some(configurator) = overrides.configurator {
        config = config.with_configurator_address(configurator);
    }
    if let Some(rpc_url) = rpc_url {
        config = config.with_rpc_url(rpc_url);
    }
    Ok(config)
}

/// Parse a human-readable, strictly positive amount.
pub fn parse_amount(amount: &str) -> Result<Decimal> {
    let value = comet_rs_math::parse_decimal(amount)
        .with_context(|| format!("Invalid amount: {}", amount))?;
    if value <= Decimal::ZERO {
        bail!("Invalid amount: {} (must be greater than zero)", amount);
    }
    Ok(value)
}
