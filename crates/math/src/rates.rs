//! Rate derivations for the Comet interest rate model.
//!
//! The ledger reports interest as a per-second rate scaled by `1e18` and
//! utilization as a `1e18`-scaled ratio. This module annualizes the former and
//! turns the latter into a percentage.
//!
//! ```text
//! APR = r * SECONDS_PER_YEAR * 100
//! APY = ((1 + r) ^ SECONDS_PER_YEAR - 1) * 100
//! ```
//!
//! APR is computed in exact decimal arithmetic. APY needs a real-valued power
//! with a large exponent and is evaluated in double precision as
//! `expm1(N * ln1p(r))`, which is the same formula with better accuracy for
//! the tiny per-second rates seen in practice.
//!
//! # Example
//!
//! ```rust
//! use comet_rs_math::rates::{to_apr, to_apy};
//! use alloy_primitives::U256;
//!
//! // 1e-9 per second
//! let rate = U256::from(1_000_000_000u64);
//! let apr = to_apr(rate).unwrap();
//! let apy = to_apy(rate).unwrap();
//! assert!(apy > apr);
//! ```

use alloy_primitives::U256;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::fixed_point::{to_decimal, Scale, ScaledValue};

/// Seconds in a non-leap year, the annualization convention used by Comet.
pub const SECONDS_PER_YEAR: u64 = 60 * 60 * 24 * 365;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Convert a `1e18`-scaled utilization into a percentage in `[0, 100]`.
///
/// Values above 100% are returned as [`MathError::UtilizationOutOfRange`]
/// rather than clamped.
pub fn utilization_percent(raw: U256) -> Result<Decimal> {
    let percent = to_decimal(raw, Scale::WAD)?
        .checked_mul(HUNDRED)
        .ok_or_else(|| MathError::Overflow(format!("utilization {}", raw)))?;

    if percent > HUNDRED {
        return Err(MathError::UtilizationOutOfRange { percent });
    }
    Ok(percent)
}

/// Annual percentage rate for a `1e18`-scaled per-second rate.
pub fn to_apr(rate_per_second: U256) -> Result<Decimal> {
    to_decimal(rate_per_second, Scale::WAD)?
        .checked_mul(Decimal::from(SECONDS_PER_YEAR))
        .and_then(|v| v.checked_mul(HUNDRED))
        .ok_or_else(|| MathError::Overflow(format!("APR of rate {}", rate_per_second)))
}

/// Annual percentage yield for a `1e18`-scaled per-second rate, compounded
/// every second.
pub fn to_apy(rate_per_second: U256) -> Result<Decimal> {
    let overflow = || MathError::Overflow(format!("APY of rate {}", rate_per_second));

    let rate = to_decimal(rate_per_second, Scale::WAD)?
        .to_f64()
        .ok_or_else(overflow)?;

    let apy = (SECONDS_PER_YEAR as f64 * rate.ln_1p()).exp_m1() * 100.0;
    if !apy.is_finite() {
        return Err(overflow());
    }

    Decimal::from_f64(apy).ok_or_else(overflow)
}

/// A utilization reading and its percentage form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilizationSample {
    /// Raw `1e18`-scaled utilization.
    pub raw: ScaledValue,
    /// Utilization in percent.
    pub percent: Decimal,
}

impl UtilizationSample {
    /// Derive a sample from the ledger's raw utilization.
    pub fn from_raw(raw: U256) -> Result<Self> {
        Ok(Self {
            raw: ScaledValue::wad(raw),
            percent: utilization_percent(raw)?,
        })
    }
}

/// A per-second rate together with its annualized forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSample {
    /// Raw `1e18`-scaled per-second rate.
    pub rate_per_second: ScaledValue,
    /// Utilization the rate was quoted for.
    pub utilization: ScaledValue,
    /// Annual percentage rate.
    pub apr: Decimal,
    /// Annual percentage yield.
    pub apy: Decimal,
}

impl RateSample {
    /// Derive APR and APY for a rate quoted at `utilization`.
    pub fn derive(rate_per_second: U256, utilization: U256) -> Result<Self> {
        Ok(Self {
            rate_per_second: ScaledValue::wad(rate_per_second),
            utilization: ScaledValue::wad(utilization),
            apr: to_apr(rate_per_second)?,
            apy: to_apy(rate_per_second)?,
        })
    }
}
