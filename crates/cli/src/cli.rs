//! CLI argument definitions using clap.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use comet_rs_api::Denomination;

/// Comet CLI - Query and use Compound III markets
#[derive(Parser, Debug)]
#[command(name = "comet")]
#[command(about = "CLI tool for querying and using Compound III (Comet) markets", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Network/market registry JSON file (default: built-in registry)
    #[arg(long, global = true, env = "COMET_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered networks and markets
    Markets(MarketsArgs),
    /// Show which contracts a chain/market selection resolves to
    Resolve(ResolveArgs),
    /// Show utilization and supply/borrow rates of a market
    Rates(RatesArgs),
    /// Show an account's balances and health in a market
    Position(PositionArgs),
    /// Supply an asset to a market
    Supply(TransactionArgs),
    /// Withdraw an asset from a market
    Withdraw(TransactionArgs),
    /// Claim accrued rewards
    Claim(ClaimArgs),
}

#[derive(Parser, Debug)]
pub struct MarketsArgs {
    /// Only list markets on this chain (e.g., ethereum, base, 8453)
    #[arg(long)]
    pub chain: Option<ChainArg>,
}

/// Selects a market and optionally overrides its contract addresses.
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Chain the market is on (default: ethereum)
    #[arg(long, default_value = "ethereum")]
    pub chain: ChainArg,

    /// Market name (e.g., USDC, WETH). Defaults to the chain's first market
    #[arg(long)]
    pub market: Option<String>,

    /// Use this Comet address instead of the registered one
    #[arg(long)]
    pub comet: Option<String>,

    /// Use this rewards contract instead of the registered one
    #[arg(long)]
    pub rewards: Option<String>,

    /// Use this configurator instead of the registered one
    #[arg(long)]
    pub configurator: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

#[derive(Parser, Debug)]
pub struct RatesArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Preview rates at this utilization, in percent (e.g., "90")
    #[arg(long)]
    pub utilization: Option<String>,

    /// RPC URL for the target chain (default: the registry's endpoint)
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: Option<String>,
}

#[derive(Parser, Debug)]
pub struct PositionArgs {
    /// Account address
    pub account: String,

    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Unit for position values: usd or base
    #[arg(long, default_value = "usd")]
    pub denomination: Denomination,

    /// RPC URL for the target chain (default: the registry's endpoint)
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: Option<String>,
}

#[derive(Parser, Debug)]
pub struct TransactionArgs {
    /// Asset address (the base token or a collateral asset)
    pub asset: String,

    /// Amount in human-readable units (e.g., "100.5")
    pub amount: String,

    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Skip the automatic ERC-20 approval before supplying
    #[arg(long)]
    pub no_approve: bool,

    /// Private key for signing transactions (can also use PRIVATE_KEY env var)
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// RPC URL for the target chain (default: the registry's endpoint)
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ClaimArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Send the rewards to this address instead of the signer
    #[arg(long)]
    pub to: Option<String>,

    /// Claim without accruing the account first
    #[arg(long)]
    pub no_accrue: bool,

    /// Private key for signing transactions (can also use PRIVATE_KEY env var)
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// RPC URL for the target chain (default: the registry's endpoint)
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Chain id that also accepts network names as aliases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainArg(pub u64);

impl FromStr for ChainArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chain_id = match s.to_lowercase().as_str() {
            "ethereum" | "eth" | "mainnet" => 1,
            "arbitrum" | "arb" => 42161,
            "base" => 8453,
            "polygon" | "matic" => 137,
            "optimism" | "op" => 10,
            "scroll" => 534352,
            "mantle" => 5000,
            "sepolia" => 11155111,
            "mumbai" => 80001,
            "base-sepolia" | "basesepolia" => 84532,
            other => other
                .parse::<u64>()
                .map_err(|_| format!("Unknown chain: {}", s))?,
        };
        Ok(ChainArg(chain_id))
    }
}

impl fmt::Display for ChainArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_aliases() {
        assert_eq!("ethereum".parse::<ChainArg>().unwrap(), ChainArg(1));
        assert_eq!("ETH".parse::<ChainArg>().unwrap(), ChainArg(1));
        assert_eq!("arb".parse::<ChainArg>().unwrap(), ChainArg(42161));
        assert_eq!("base-sepolia".parse::<ChainArg>().unwrap(), ChainArg(84532));
    }

    #[test]
    fn test_numeric_chain_ids() {
        assert_eq!("8453".parse::<ChainArg>().unwrap(), ChainArg(8453));
        assert_eq!("31337".parse::<ChainArg>().unwrap(), ChainArg(31337));
    }

    #[test]
    fn test_unknown_chain() {
        let err = "moonbeam".parse::<ChainArg>().unwrap_err();
        assert_eq!(err, "Unknown chain: moonbeam");
    }

    #[test]
    fn test_cli_parses_position() {
        let cli = Cli::try_parse_from([
            "comet",
            "position",
            "0x1234567890123456789012345678901234567890",
            "--chain",
            "base",
            "--market",
            "WETH",
            "--denomination",
            "base",
        ])
        .unwrap();

        match cli.command {
            Commands::Position(args) => {
                assert_eq!(args.endpoint.chain, ChainArg(8453));
                assert_eq!(args.endpoint.market.as_deref(), Some("WETH"));
                assert_eq!(args.denomination, Denomination::BaseAsset);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
