//! Output formatting for CLI results.

pub mod detail;
pub mod table;

use rust_decimal::Decimal;

pub use detail::{
    format_endpoints_detail, format_market_overview_detail, format_position_detail,
    format_rate_preview_detail,
};
pub use table::format_markets_table;

fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

fn format_usd(value: Decimal) -> String {
    let million = Decimal::from(1_000_000);
    let thousand = Decimal::from(1_000);
    if value.abs() >= million {
        format!("${:.2}M", (value / million).round_dp(2))
    } else if value.abs() >= thousand {
        format!("${:.2}K", (value / thousand).round_dp(2))
    } else {
        format!("${:.2}", value.round_dp(2))
    }
}

/// Token amount, up to six decimals.
fn format_amount(value: Decimal) -> String {
    value.round_dp(6).normalize().to_string()
}

/// A value in USD when `unit` is `None`, otherwise in `unit`.
fn format_value(value: Decimal, unit: Option<&str>) -> String {
    match unit {
        None => format_usd(value),
        Some(unit) => format!("{} {}", format_amount(value), unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(Decimal::new(1_250_000, 0)), "$1.25M");
        assert_eq!(format_usd(Decimal::new(2_500, 0)), "$2.50K");
        assert_eq!(format_usd(Decimal::new(1999, 2)), "$19.99");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Decimal::new(15, 1), Some("WETH")), "1.5 WETH");
        assert_eq!(format_value(Decimal::new(15, 1), None), "$1.50");
        assert_eq!(format_amount(Decimal::new(1_234_567_891, 9)), "1.234568");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Decimal::new(31536, 4)), "3.15%");
    }
}
