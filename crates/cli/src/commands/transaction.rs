//! Supply, withdraw and claim command implementations.

use std::sync::Arc;

use alloy_primitives::B256;
use anyhow::{Context, Result};
use comet_rs_api::{CometClient, NetworkMarketRegistry};
use comet_rs_math::to_raw_decimal;

use super::{client_config, parse_address, parse_amount};
use crate::cli::{ClaimArgs, EndpointArgs, TransactionArgs};

fn signing_client(
    registry: Arc<NetworkMarketRegistry>,
    endpoint: &EndpointArgs,
    rpc_url: Option<&str>,
    private_key: &str,
    auto_approve: bool,
) -> Result<CometClient> {
    let config = client_config(registry, endpoint, rpc_url)?
        .with_private_key(private_key)
        .with_auto_approve(auto_approve);
    CometClient::with_config(config).context("Failed to create client")
}

fn market_label(client: &CometClient) -> String {
    match client.active_market() {
        Some(market) => format!("{} market on chain {}", market, client.chain_id()),
        None => format!("custom market on chain {}", client.chain_id()),
    }
}

/// Run the supply command.
pub async fn run_supply(registry: Arc<NetworkMarketRegistry>, args: &TransactionArgs) -> Result<()> {
    let asset = parse_address(&args.asset, "asset")?;
    let amount = parse_amount(&args.amount)?;

    println!("Connecting to RPC...");
    let client = signing_client(
        registry,
        &args.endpoint,
        args.rpc_url.as_deref(),
        &args.private_key,
        !args.no_approve,
    )?;

    println!("Fetching token decimals...");
    let scale = client.token_scale(asset).await?;
    let raw = to_raw_decimal(amount, scale)
        .with_context(|| format!("Failed to parse amount: {}", args.amount))?;

    println!(
        "\nTransaction submitted: supplying {} to the {}...",
        args.amount,
        market_label(&client)
    );
    println!("Waiting for confirmation...\n");

    let tx_hash = client.supply(asset, raw).await?;
    print_confirmation(&client, tx_hash);

    Ok(())
}

/// Run the withdraw command.
pub async fn run_withdraw(
    registry: Arc<NetworkMarketRegistry>,
    args: &TransactionArgs,
) -> Result<()> {
    let asset = parse_address(&args.asset, "asset")?;
    let amount = parse_amount(&args.amount)?;

    println!("Connecting to RPC...");
    let client = signing_client(
        registry,
        &args.endpoint,
        args.rpc_url.as_deref(),
        &args.private_key,
        false,
    )?;

    println!("Fetching token decimals...");
    let scale = client.token_scale(asset).await?;
    let raw = to_raw_decimal(amount, scale)
        .with_context(|| format!("Failed to parse amount: {}", args.amount))?;

    println!(
        "\nTransaction submitted: withdrawing {} from the {}...",
        args.amount,
        market_label(&client)
    );
    println!("Waiting for confirmation...\n");

    let tx_hash = client.withdraw(asset, raw).await?;
    print_confirmation(&client, tx_hash);

    Ok(())
}

/// Run the claim command.
pub async fn run_claim(registry: Arc<NetworkMarketRegistry>, args: &ClaimArgs) -> Result<()> {
    let to = args
        .to
        .as_deref()
        .map(|to| parse_address(to, "recipient"))
        .transpose()?;
    let should_accrue = !args.no_accrue;

    println!("Connecting to RPC...");
    let client = signing_client(
        registry,
        &args.endpoint,
        args.rpc_url.as_deref(),
        &args.private_key,
        false,
    )?;

    println!(
        "\nTransaction submitted: claiming rewards from the {}...",
        market_label(&client)
    );
    println!("Waiting for confirmation...\n");

    let tx_hash = match to {
        Some(to) => client.claim_rewards_to(to, should_accrue).await?,
        None => client.claim_rewards(should_accrue).await?,
    };
    print_confirmation(&client, tx_hash);

    Ok(())
}

fn print_confirmation(client: &CometClient, tx_hash: B256) {
    println!("Transaction confirmed!");
    println!("  Tx Hash:   {:#x}", tx_hash);
    if let Some(network) = client.network() {
        println!(
            "  Explorer:  {}/tx/{:#x}",
            network.block_explorer_url.trim_end_matches('/'),
            tx_hash
        );
    }
}
