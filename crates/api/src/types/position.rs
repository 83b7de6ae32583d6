//! Account-level types.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use comet_rs_math::HealthAssessment;
use rust_decimal::Decimal;
use serde::Serialize;

/// Unit in which position values are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denomination {
    /// US dollars, as reported by the market's price feeds.
    #[default]
    Usd,
    /// The market's base asset.
    BaseAsset,
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usd => f.write_str("usd"),
            Self::BaseAsset => f.write_str("base"),
        }
    }
}

impl FromStr for Denomination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usd" => Ok(Self::Usd),
            "base" | "base-asset" | "base_asset" => Ok(Self::BaseAsset),
            _ => Err(format!("Unknown denomination: {}", s)),
        }
    }
}

/// One collateral asset held by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollateralHolding {
    pub asset: Address,
    /// Balance in asset units.
    pub balance: Decimal,
    /// Unadjusted value in the requested denomination.
    pub value: Decimal,
    /// Value after applying the liquidation collateral factor.
    pub risk_adjusted_value: Decimal,
    pub liquidate_collateral_factor: Decimal,
}

/// An account's position in one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountPosition {
    pub account: Address,
    pub comet: Address,
    pub denomination: Denomination,
    /// Base supplied, in base units.
    pub supplied: Decimal,
    /// Base borrowed, in base units.
    pub borrowed: Decimal,
    /// Base asset price in USD.
    pub base_price: Decimal,
    /// Collateral assets with a non-zero balance.
    pub collateral: Vec<CollateralHolding>,
    pub assessment: HealthAssessment,
    /// The ledger's own liquidation signal.
    pub is_liquidatable: bool,
    /// The ledger's own borrow collateralization check.
    pub is_borrow_collateralized: bool,
}
