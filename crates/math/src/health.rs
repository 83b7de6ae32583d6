//! Account health evaluation.
//!
//! The health factor is the ratio of risk-adjusted collateral value to
//! borrowed value. An account with nothing borrowed has an infinite health
//! factor.
//!
//! The bands and the collateralization flag derived here are display
//! heuristics. Whether an account can actually be absorbed is decided by the
//! ledger's own `isLiquidatable` and `isBorrowCollateralized`.

use std::fmt;

use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::fixed_point::{to_decimal, Scale};

/// Health factor below which a position is shown as critical.
pub const CRITICAL_THRESHOLD: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

/// Health factor below which a position is shown as a warning.
pub const WARNING_THRESHOLD: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Ratio of collateral value to borrowed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum HealthFactor {
    /// Nothing is borrowed.
    Infinite,
    /// Full-precision ratio.
    Finite(Decimal),
}

impl HealthFactor {
    /// Compute the health factor from collateral and borrowed values in the
    /// same denomination.
    pub fn from_values(collateral_value: Decimal, borrowed_value: Decimal) -> Result<Self> {
        if borrowed_value <= Decimal::ZERO {
            return Ok(Self::Infinite);
        }
        collateral_value
            .checked_div(borrowed_value)
            .map(Self::Finite)
            .ok_or_else(|| {
                MathError::Overflow(format!("{} / {}", collateral_value, borrowed_value))
            })
    }

    /// The finite ratio, if any.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Infinite => None,
            Self::Finite(v) => Some(*v),
        }
    }

    /// Display heuristic: collateral covers debt at the liquidation factors.
    pub fn is_collateralized(&self) -> bool {
        match self {
            Self::Infinite => true,
            Self::Finite(v) => *v >= Decimal::ONE,
        }
    }

    /// Presentation band for this health factor.
    pub fn band(&self) -> HealthBand {
        match self {
            Self::Infinite => HealthBand::Safe,
            Self::Finite(v) if *v < CRITICAL_THRESHOLD => HealthBand::Critical,
            Self::Finite(v) if *v < WARNING_THRESHOLD => HealthBand::Warning,
            Self::Finite(_) => HealthBand::Safe,
        }
    }
}

impl fmt::Display for HealthFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infinite => f.write_str("∞"),
            Self::Finite(v) => {
                let rounded = v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                write!(f, "{:.2}", rounded)
            }
        }
    }
}

/// Presentation band for a health factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    /// Below 1.2.
    Critical,
    /// 1.2 to 1.5.
    Warning,
    /// 1.5 and above, or nothing borrowed.
    Safe,
}

impl fmt::Display for HealthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Safe => "safe",
        };
        f.write_str(label)
    }
}

/// Snapshot of an account's position, computed per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub supplied_value: Decimal,
    pub borrowed_value: Decimal,
    /// Risk-adjusted value of all collateral.
    pub collateral_value: Decimal,
    pub health_factor: HealthFactor,
    pub band: HealthBand,
    pub is_collateralized: bool,
}

impl HealthAssessment {
    /// Evaluate a position from values in a single denomination.
    pub fn evaluate(
        supplied_value: Decimal,
        borrowed_value: Decimal,
        collateral_value: Decimal,
    ) -> Result<Self> {
        let health_factor = HealthFactor::from_values(collateral_value, borrowed_value)?;
        Ok(Self {
            supplied_value,
            borrowed_value,
            collateral_value,
            health_factor,
            band: health_factor.band(),
            is_collateralized: health_factor.is_collateralized(),
        })
    }
}

/// Value of a token balance using a `1e8` price.
pub fn asset_value(balance: U256, asset_scale: Scale, price: U256) -> Result<Decimal> {
    let amount = to_decimal(balance, asset_scale)?;
    let price = to_decimal(price, Scale::PRICE)?;
    amount
        .checked_mul(price)
        .ok_or_else(|| MathError::Overflow(format!("{} * {}", amount, price)))
}

/// Risk-adjusted value of a collateral balance.
///
/// `factor` is the asset's `1e18`-scaled collateral factor, normally
/// `liquidateCollateralFactor`.
pub fn collateral_value(
    balance: U256,
    asset_scale: Scale,
    price: U256,
    factor: U256,
) -> Result<Decimal> {
    let value = asset_value(balance, asset_scale, price)?;
    let factor = to_decimal(factor, Scale::WAD)?;
    value
        .checked_mul(factor)
        .ok_or_else(|| MathError::Overflow(format!("{} * {}", value, factor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thresholds() {
        assert_eq!(CRITICAL_THRESHOLD, dec!(1.2));
        assert_eq!(WARNING_THRESHOLD, dec!(1.5));
    }

    #[test]
    fn test_zero_borrow_is_infinite() {
        let hf = HealthFactor::from_values(dec!(1000), Decimal::ZERO).unwrap();
        assert_eq!(hf, HealthFactor::Infinite);
        assert_eq!(hf.to_string(), "∞");
        assert!(hf.is_collateralized());
        assert_eq!(hf.band(), HealthBand::Safe);
        assert_eq!(hf.value(), None);
    }

    #[test]
    fn test_double_collateral_is_two() {
        let hf = HealthFactor::from_values(dec!(2000), dec!(1000)).unwrap();
        assert_eq!(hf, HealthFactor::Finite(dec!(2)));
        assert_eq!(hf.to_string(), "2.00");
    }

    #[test]
    fn test_display_rounds_to_two_places_but_keeps_precision() {
        let hf = HealthFactor::from_values(dec!(1), dec!(3)).unwrap();
        assert_eq!(hf.to_string(), "0.33");
        assert!(hf.value().unwrap() > dec!(0.3333));

        let hf = HealthFactor::Finite(dec!(1.125));
        assert_eq!(hf.to_string(), "1.13");
    }

    #[test]
    fn test_bands() {
        assert_eq!(HealthFactor::Finite(dec!(0.95)).band(), HealthBand::Critical);
        assert_eq!(HealthFactor::Finite(dec!(1.19)).band(), HealthBand::Critical);
        assert_eq!(HealthFactor::Finite(dec!(1.2)).band(), HealthBand::Warning);
        assert_eq!(HealthFactor::Finite(dec!(1.49)).band(), HealthBand::Warning);
        assert_eq!(HealthFactor::Finite(dec!(1.5)).band(), HealthBand::Safe);
        assert_eq!(HealthFactor::Finite(dec!(10)).band(), HealthBand::Safe);
    }

    #[test]
    fn test_is_collateralized_boundary() {
        assert!(HealthFactor::Finite(dec!(1)).is_collateralized());
        assert!(!HealthFactor::Finite(dec!(0.999)).is_collateralized());
    }

    #[test]
    fn test_evaluate() {
        let assessment = HealthAssessment::evaluate(dec!(0), dec!(800), dec!(1000)).unwrap();
        assert_eq!(assessment.health_factor, HealthFactor::Finite(dec!(1.25)));
        assert_eq!(assessment.band, HealthBand::Warning);
        assert!(assessment.is_collateralized);

        let assessment = HealthAssessment::evaluate(dec!(500), dec!(0), dec!(0)).unwrap();
        assert_eq!(assessment.health_factor, HealthFactor::Infinite);
        assert_eq!(assessment.band, HealthBand::Safe);
    }

    #[test]
    fn test_asset_value() {
        // 2.5 WETH at $3,000.00
        let balance = U256::from(2_500_000_000_000_000_000u64);
        let price = U256::from(300_000_000_000u64);
        let value = asset_value(balance, Scale::WAD, price).unwrap();
        assert_eq!(value, dec!(7500));
    }

    #[test]
    fn test_collateral_value_applies_factor() {
        // 1 WETH at $2,000 with an 0.85 liquidation factor
        let balance = U256::from(1_000_000_000_000_000_000u64);
        let price = U256::from(200_000_000_000u64);
        let factor = U256::from(850_000_000_000_000_000u64);
        let value = collateral_value(balance, Scale::WAD, price, factor).unwrap();
        assert_eq!(value, dec!(1700));
    }
}
