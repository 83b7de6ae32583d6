//! Position command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use comet_rs_api::{CometClient, NetworkMarketRegistry};

use super::{client_config, parse_address};
use crate::cli::{OutputFormat, PositionArgs};
use crate::output::format_position_detail;

/// Run the position command.
pub async fn run_position(
    registry: Arc<NetworkMarketRegistry>,
    args: &PositionArgs,
    format: OutputFormat,
) -> Result<()> {
    let account = parse_address(&args.account, "account")?;

    let config = client_config(registry, &args.endpoint, args.rpc_url.as_deref())?;
    let client = CometClient::with_config(config).context("Failed to create client")?;

    let position = client
        .account_position(account, args.denomination)
        .await
        .with_context(|| format!("Failed to fetch position for {}", account))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&position)?);
        }
        OutputFormat::Table => {
            let base_symbol = client
                .active_market()
                .and_then(|name| client.network().and_then(|n| n.market(name)))
                .map(|m| m.base_asset_symbol.as_str());
            println!(
                "{}",
                format_position_detail(&position, client.active_market(), base_symbol)
            );
        }
    }

    Ok(())
}
