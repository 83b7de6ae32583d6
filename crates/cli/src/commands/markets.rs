//! Markets command implementation.

use anyhow::{bail, Result};
use comet_rs_api::{NetworkConfig, NetworkMarketRegistry};

use crate::cli::{MarketsArgs, OutputFormat};
use crate::output::format_markets_table;

/// Run the markets command.
pub fn run_markets(
    registry: &NetworkMarketRegistry,
    args: &MarketsArgs,
    format: OutputFormat,
) -> Result<()> {
    let networks: Vec<&NetworkConfig> = match args.chain {
        Some(chain) => match registry.network(chain.0) {
            Some(network) => vec![network],
            None => bail!("No markets registered for chain {}", chain),
        },
        None => registry.networks().collect(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&networks)?);
        }
        OutputFormat::Table => {
            println!("{}", format_markets_table(&networks));
        }
    }

    Ok(())
}
