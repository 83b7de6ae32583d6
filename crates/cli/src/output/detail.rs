//! Detailed output formatting for endpoints, rates and positions.

use alloy_primitives::Address;
use colored::{ColoredString, Colorize};
use comet_rs_api::{
    AccountPosition, Denomination, EndpointSnapshot, HealthBand, MarketOverview, NetworkConfig,
    RateSample,
};

use super::table::format_collateral_table;
use super::{format_amount, format_percent, format_value};
use crate::commands::rates::RatePreview;

fn header(output: &mut String, title: &str) {
    output.push_str(&format!("{}\n", "=".repeat(60)));
    output.push_str(&format!("{}\n", title.bold()));
    output.push_str(&format!("{}\n\n", "=".repeat(60)));
}

fn format_optional_address(address: Option<Address>) -> String {
    address.map_or_else(|| "-".to_string(), |a| a.to_string())
}

fn market_title(market: Option<&str>, chain_id: u64) -> String {
    match market {
        Some(market) => format!("{} market (chain {})", market, chain_id),
        None => format!("Custom market (chain {})", chain_id),
    }
}

fn push_rate(output: &mut String, label: &str, rate: &RateSample) {
    output.push_str(&format!("{}\n", label.cyan().bold()));
    output.push_str(&format!("  APR:          {}\n", format_percent(rate.apr)));
    output.push_str(&format!("  APY:          {}\n", format_percent(rate.apy)));
    output.push_str(&format!(
        "  Per Second:   {}\n\n",
        rate.rate_per_second.to_decimal_string()
    ));
}

fn colored_band(band: HealthBand) -> ColoredString {
    let text = band.to_string();
    match band {
        HealthBand::Critical => text.red().bold(),
        HealthBand::Warning => text.yellow().bold(),
        HealthBand::Safe => text.green(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn format_endpoints_detail(snapshot: &EndpointSnapshot, network: Option<&NetworkConfig>) -> String {
    let mut output = String::new();
    header(
        &mut output,
        &market_title(snapshot.market.as_deref(), snapshot.chain_id),
    );

    output.push_str(&format!("{}\n", "Network".cyan().bold()));
    output.push_str(&format!("  Chain ID:     {}\n", snapshot.chain_id));
    match network {
        Some(network) => {
            output.push_str(&format!("  Name:         {}\n", network.name));
            output.push_str(&format!("  RPC:          {}\n\n", network.rpc_url));
        }
        None => output.push_str("  Name:         (not in registry)\n\n"),
    }

    output.push_str(&format!("{}\n", "Contracts".cyan().bold()));
    output.push_str(&format!(
        "  Comet:        {}\n",
        format_optional_address(snapshot.comet)
    ));
    output.push_str(&format!(
        "  Rewards:      {}\n",
        format_optional_address(snapshot.rewards)
    ));
    output.push_str(&format!(
        "  Configurator: {}\n\n",
        format_optional_address(snapshot.configurator)
    ));

    let status = if snapshot.is_initialized() {
        "initialized".green()
    } else {
        "not initialized".red().bold()
    };
    output.push_str(&format!("  Status:       {}\n", status));

    if let (Some(network), Some(comet)) = (network, snapshot.comet) {
        output.push_str(&format!(
            "  Explorer:     {}\n",
            network.explorer_address_url(comet)
        ));
    }

    output
}

pub fn format_market_overview_detail(overview: &MarketOverview) -> String {
    let mut output = String::new();
    header(
        &mut output,
        &market_title(overview.market.as_deref(), overview.chain_id),
    );

    output.push_str(&format!("{}\n", "Market".cyan().bold()));
    output.push_str(&format!("  Comet:        {}\n", overview.comet));
    output.push_str(&format!("  Base Token:   {}\n", overview.base_token));
    output.push_str(&format!("  Decimals:     {}\n", overview.base_decimals));
    output.push_str(&format!(
        "  Total Supply: {}\n",
        format_amount(overview.total_supply)
    ));
    output.push_str(&format!(
        "  Total Borrow: {}\n",
        format_amount(overview.total_borrow)
    ));
    output.push_str(&format!(
        "  Utilization:  {}\n",
        format_percent(overview.utilization.percent)
    ));
    output.push_str(&format!("  Reserves:     {}\n", format_amount(overview.reserves)));
    output.push_str(&format!(
        "  Target:       {}\n\n",
        format_amount(overview.target_reserves)
    ));

    push_rate(&mut output, "Supply", &overview.supply);
    push_rate(&mut output, "Borrow", &overview.borrow);

    output
}

pub fn format_rate_preview_detail(preview: &RatePreview) -> String {
    let mut output = String::new();
    header(
        &mut output,
        &market_title(preview.market.as_deref(), preview.chain_id),
    );

    output.push_str(&format!("  Comet:        {}\n", preview.comet));
    output.push_str(&format!(
        "  Utilization:  {} (preview)\n\n",
        format_percent(preview.utilization_percent)
    ));

    push_rate(&mut output, "Supply", &preview.supply);
    push_rate(&mut output, "Borrow", &preview.borrow);

    output
}

pub fn format_position_detail(
    position: &AccountPosition,
    market: Option<&str>,
    base_symbol: Option<&str>,
) -> String {
    let unit = match position.denomination {
        Denomination::Usd => None,
        Denomination::BaseAsset => Some(base_symbol.unwrap_or("base")),
    };
    let assessment = &position.assessment;

    let mut output = String::new();
    header(&mut output, &format!("Position of {}", position.account));

    output.push_str(&format!("{}\n", "Market".cyan().bold()));
    output.push_str(&format!("  Name:         {}\n", market.unwrap_or("custom")));
    output.push_str(&format!("  Comet:        {}\n", position.comet));
    output.push_str(&format!("  Denomination: {}\n\n", position.denomination));

    output.push_str(&format!("{}\n", "Base".cyan().bold()));
    output.push_str(&format!("  Supplied:     {}\n", format_amount(position.supplied)));
    output.push_str(&format!("  Borrowed:     {}\n", format_amount(position.borrowed)));
    output.push_str(&format!(
        "  Base Price:   {}\n\n",
        format_value(position.base_price, None)
    ));

    output.push_str(&format!("{}\n", "Collateral".cyan().bold()));
    output.push_str(&format_collateral_table(&position.collateral, unit));
    output.push_str("\n\n");

    output.push_str(&format!("{}\n", "Health".cyan().bold()));
    output.push_str(&format!(
        "  Supplied:     {}\n",
        format_value(assessment.supplied_value, unit)
    ));
    output.push_str(&format!(
        "  Borrowed:     {}\n",
        format_value(assessment.borrowed_value, unit)
    ));
    output.push_str(&format!(
        "  Collateral:   {}\n",
        format_value(assessment.collateral_value, unit)
    ));
    output.push_str(&format!("  Health Factor: {}\n", assessment.health_factor));
    output.push_str(&format!("  Band:         {}\n", colored_band(assessment.band)));
    output.push_str(&format!(
        "  Liquidatable: {}\n",
        yes_no(position.is_liquidatable)
    ));
    output.push_str(&format!(
        "  Borrow Collateralized: {}\n",
        yes_no(position.is_borrow_collateralized)
    ));

    output
}
