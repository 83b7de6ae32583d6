//! Resolve command implementation.
//!
//! Resolution is local: the registry and the overrides decide the endpoints,
//! no RPC endpoint is contacted.

use anyhow::Result;
use comet_rs_api::{ClientEndpointState, NetworkMarketRegistry};

use super::endpoint_overrides;
use crate::cli::{OutputFormat, ResolveArgs};
use crate::output::format_endpoints_detail;

/// Run the resolve command.
pub fn run_resolve(
    registry: &NetworkMarketRegistry,
    args: &ResolveArgs,
    format: OutputFormat,
) -> Result<()> {
    let overrides = endpoint_overrides(&args.endpoint)?;
    let state = ClientEndpointState::resolve(
        registry,
        args.endpoint.chain.0,
        args.endpoint.market.as_deref(),
        overrides,
    );
    let snapshot = state.snapshot();

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "chain_id": snapshot.chain_id,
                "market": snapshot.market,
                "comet": snapshot.comet,
                "rewards": snapshot.rewards,
                "configurator": snapshot.configurator,
                "initialized": snapshot.is_initialized(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            let network = registry.network(snapshot.chain_id);
            println!("{}", format_endpoints_detail(&snapshot, network));
        }
    }

    Ok(())
}
