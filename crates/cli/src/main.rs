//! Comet CLI - Query and use Compound III markets.

mod cli;
mod commands;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::{
    run_claim, run_markets, run_position, run_rates, run_resolve, run_supply, run_withdraw,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let registry = commands::load_registry(cli.registry.as_deref())?;

    match cli.command {
        Commands::Markets(args) => run_markets(&registry, &args, cli.format)?,
        Commands::Resolve(args) => run_resolve(&registry, &args, cli.format)?,
        Commands::Rates(args) => run_rates(registry, &args, cli.format).await?,
        Commands::Position(args) => run_position(registry, &args, cli.format).await?,
        Commands::Supply(args) => run_supply(registry, &args).await?,
        Commands::Withdraw(args) => run_withdraw(registry, &args).await?,
        Commands::Claim(args) => run_claim(registry, &args).await?,
    }

    Ok(())
}
