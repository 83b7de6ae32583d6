//! Rates command implementation.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use anyhow::{bail, Context, Result};
use comet_rs_api::{
    CometClient, NetworkMarketRegistry, RateSample, Scale, UtilizationSource,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::client_config;
use crate::cli::{OutputFormat, RatesArgs};
use crate::output::{format_market_overview_detail, format_rate_preview_detail};

/// Rates at a hypothetical utilization.
#[derive(Debug, Serialize)]
pub struct RatePreview {
    pub chain_id: u64,
    pub market: Option<String>,
    pub comet: Address,
    pub utilization_percent: Decimal,
    pub supply: RateSample,
    pub borrow: RateSample,
}

/// Run the rates command.
pub async fn run_rates(
    registry: Arc<NetworkMarketRegistry>,
    args: &RatesArgs,
    format: OutputFormat,
) -> Result<()> {
    // Validate before connecting
    let preview_at = args
        .utilization
        .as_deref()
        .map(parse_utilization)
        .transpose()?;

    let config = client_config(registry, &args.endpoint, args.rpc_url.as_deref())?;
    let client = CometClient::with_config(config).context("Failed to create client")?;

    match preview_at {
        Some((percent, raw)) => {
            let source = UtilizationSource::Override(raw);
            let (supply, borrow) =
                tokio::try_join!(client.supply_rate(source), client.borrow_rate(source))?;
            let endpoints = client.endpoints();
            let preview = RatePreview {
                chain_id: endpoints.chain_id,
                comet: endpoints.comet()?,
                market: endpoints.market,
                utilization_percent: percent,
                supply,
                borrow,
            };

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&preview)?),
                OutputFormat::Table => println!("{}", format_rate_preview_detail(&preview)),
            }
        }
        None => {
            let overview = client.market_overview().await?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&overview)?),
                OutputFormat::Table => println!("{}", format_market_overview_detail(&overview)),
            }
        }
    }

    Ok(())
}

/// Parse a utilization percentage into its `1e18`-scaled form.
fn parse_utilization(value: &str) -> Result<(Decimal, U256)> {
    let percent = comet_rs_math::parse_decimal(value)
        .with_context(|| format!("Invalid utilization: {}", value))?;
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        bail!("Invalid utilization: {} (must be between 0 and 100)", value);
    }
    let raw = comet_rs_math::to_raw_decimal(percent / Decimal::ONE_HUNDRED, Scale::WAD)?;
    Ok((percent, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utilization() {
        let (percent, raw) = parse_utilization("90").unwrap();
        assert_eq!(percent, Decimal::from(90));
        assert_eq!(raw, U256::from(900_000_000_000_000_000u64));

        let (_, raw) = parse_utilization("0").unwrap();
        assert_eq!(raw, U256::ZERO);

        let (_, raw) = parse_utilization("100").unwrap();
        assert_eq!(raw, U256::from(1_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_parse_utilization_out_of_range() {
        assert!(parse_utilization("100.1").is_err());
        assert!(parse_utilization("-5").is_err());
        assert!(parse_utilization("ninety").is_err());
    }
}
