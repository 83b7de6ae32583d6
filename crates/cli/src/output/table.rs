//! Table formatting for market and collateral lists.

use comet_rs_api::{CollateralHolding, NetworkConfig};
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use super::{format_amount, format_percent, format_value};

#[derive(Tabled)]
struct MarketRow {
    #[tabled(rename = "Chain ID")]
    chain_id: u64,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Base")]
    base: String,
    #[tabled(rename = "Comet")]
    comet: String,
    #[tabled(rename = "Rewards")]
    rewards: String,
    #[tabled(rename = "Default")]
    default: String,
}

#[derive(Tabled)]
struct CollateralRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Liq. Factor")]
    factor: String,
    #[tabled(rename = "Risk-Adjusted")]
    risk_adjusted: String,
}

pub(crate) fn truncate_address(addr: &str) -> String {
    if addr.len() > 10 {
        format!("{}...{}", &addr[..6], &addr[addr.len() - 4..])
    } else {
        addr.to_string()
    }
}

pub fn format_markets_table(networks: &[&NetworkConfig]) -> String {
    let rows: Vec<MarketRow> = networks
        .iter()
        .flat_map(|network| {
            network.markets.iter().enumerate().map(move |(i, market)| MarketRow {
                chain_id: network.chain_id,
                network: network.name.clone(),
                market: market.name.clone(),
                base: market.base_asset_symbol.clone(),
                comet: truncate_address(&market.comet_address.to_string()),
                rewards: market
                    .rewards_address
                    .map(|a| truncate_address(&a.to_string()))
                    .unwrap_or_else(|| "-".to_string()),
                default: if i == 0 { "Yes".to_string() } else { String::new() },
            })
        })
        .collect();

    if rows.is_empty() {
        return "No markets found.".to_string();
    }

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string()
}

pub fn format_collateral_table(collateral: &[CollateralHolding], unit: Option<&str>) -> String {
    if collateral.is_empty() {
        return "No collateral supplied.".to_string();
    }

    let rows: Vec<CollateralRow> = collateral
        .iter()
        .map(|c| CollateralRow {
            asset: truncate_address(&c.asset.to_string()),
            balance: format_amount(c.balance),
            value: format_value(c.value, unit),
            factor: format_percent(c.liquidate_collateral_factor * Decimal::ONE_HUNDRED),
            risk_adjusted: format_value(c.risk_adjusted_value, unit),
        })
        .collect();

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string()
}
