//! Fixed-point conversions between on-chain integers and decimals.
//!
//! Every amount the ledger returns is an unsigned 256-bit integer carrying an
//! implicit power-of-ten scale: `1e6` for USDC balances, `1e8` for price
//! feeds, `1e18` for per-second rates, factors and utilization.
//!
//! Conversions split the integer into whole and fractional parts *before*
//! building a [`Decimal`], so no floating point is involved at any stage.
//! [`to_decimal_string`] is exact for every input; [`to_decimal`] is exact up
//! to the 28 significant digits a `Decimal` can hold.
//!
//! # Example
//!
//! ```rust
//! use comet_rs_math::fixed_point::{to_decimal, to_raw, Scale};
//! use alloy_primitives::U256;
//! use rust_decimal::Decimal;
//!
//! let raw = to_raw("1250.5", Scale::USDC).unwrap();
//! assert_eq!(raw, U256::from(1_250_500_000u64));
//! assert_eq!(to_decimal(raw, Scale::USDC).unwrap(), Decimal::new(12505, 1));
//! ```

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};

/// Largest power of ten representable in 256 bits.
pub const MAX_DECIMALS: u32 = 77;

/// Maximum number of fractional digits a `Decimal` can carry.
const DECIMAL_MAX_SCALE: u32 = 28;

/// A power-of-ten scale, stored as its exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Scale {
    decimals: u32,
}

impl Scale {
    /// Unscaled integers (`1e0`).
    pub const UNIT: Scale = Scale { decimals: 0 };
    /// USDC-style token amounts (`1e6`).
    pub const USDC: Scale = Scale { decimals: 6 };
    /// Price feed values (`1e8`).
    pub const PRICE: Scale = Scale { decimals: 8 };
    /// Rates, factors and utilization (`1e18`).
    pub const WAD: Scale = Scale { decimals: 18 };

    /// Build a scale from a number of decimals, e.g. an ERC-20 `decimals()`.
    pub fn from_decimals(decimals: u32) -> Result<Self> {
        if decimals > MAX_DECIMALS {
            return Err(MathError::InvalidDecimals { decimals });
        }
        Ok(Self { decimals })
    }

    /// Build a scale from its integer factor, e.g. the ledger's `scale` field.
    ///
    /// The factor must be a non-zero power of ten.
    pub fn from_factor(factor: U256) -> Result<Self> {
        if factor.is_zero() {
            return Err(MathError::InvalidScale { factor });
        }

        let ten = U256::from(10u8);
        let mut remaining = factor;
        let mut decimals = 0u32;
        while remaining > U256::from(1u8) {
            let (quotient, remainder) = remaining.div_rem(ten);
            if !remainder.is_zero() {
                return Err(MathError::InvalidScale { factor });
            }
            remaining = quotient;
            decimals += 1;
        }

        Ok(Self { decimals })
    }

    /// Number of decimals represented by this scale.
    pub fn decimals(self) -> u32 {
        self.decimals
    }

    /// The integer factor, `10^decimals`.
    pub fn factor(self) -> U256 {
        U256::from(10u8).pow(U256::from(self.decimals))
    }
}

impl TryFrom<u32> for Scale {
    type Error = MathError;

    fn try_from(decimals: u32) -> Result<Self> {
        Self::from_decimals(decimals)
    }
}

impl From<Scale> for u32 {
    fn from(scale: Scale) -> Self {
        scale.decimals
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1e{}", self.decimals)
    }
}

/// A raw on-chain integer together with its scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledValue {
    /// Raw integer as returned by the contract.
    pub raw: U256,
    /// Implicit power-of-ten scale of `raw`.
    pub scale: Scale,
}

impl ScaledValue {
    /// Create a new scaled value.
    pub fn new(raw: U256, scale: Scale) -> Self {
        Self { raw, scale }
    }

    /// Create a `1e18`-scaled value.
    pub fn wad(raw: U256) -> Self {
        Self::new(raw, Scale::WAD)
    }

    /// Convert to a `Decimal`.
    pub fn to_decimal(&self) -> Result<Decimal> {
        to_decimal(self.raw, self.scale)
    }

    /// Convert to an exact decimal string.
    pub fn to_decimal_string(&self) -> String {
        to_decimal_string(self.raw, self.scale)
    }

    /// Express the same quantity at another scale.
    ///
    /// Moving to a coarser scale truncates the digits the target cannot hold.
    pub fn rescale(&self, target: Scale) -> Result<Self> {
        let raw = if target.decimals >= self.scale.decimals {
            let factor = Scale::from_decimals(target.decimals - self.scale.decimals)?.factor();
            self.raw.checked_mul(factor).ok_or_else(|| {
                MathError::Overflow(format!("rescaling {} from {} to {}", self.raw, self.scale, target))
            })?
        } else {
            let factor = Scale::from_decimals(self.scale.decimals - target.decimals)?.factor();
            self.raw / factor
        };
        Ok(Self::new(raw, target))
    }

    /// Add two values of the same scale.
    pub fn checked_add(&self, other: &ScaledValue) -> Result<Self> {
        self.ensure_same_scale(other)?;
        let raw = self.raw.checked_add(other.raw).ok_or_else(|| {
            MathError::Overflow(format!("{} + {}", self.raw, other.raw))
        })?;
        Ok(Self::new(raw, self.scale))
    }

    /// Subtract a value of the same scale.
    pub fn checked_sub(&self, other: &ScaledValue) -> Result<Self> {
        self.ensure_same_scale(other)?;
        let raw = self.raw.checked_sub(other.raw).ok_or_else(|| {
            MathError::Overflow(format!("{} - {}", self.raw, other.raw))
        })?;
        Ok(Self::new(raw, self.scale))
    }

    fn ensure_same_scale(&self, other: &ScaledValue) -> Result<()> {
        if self.scale != other.scale {
            return Err(MathError::ScaleMismatch {
                left: self.scale.decimals,
                right: other.scale.decimals,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ScaledValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

/// Convert a raw integer to a `Decimal`.
///
/// Fractional digits beyond the 28 a `Decimal` can store are truncated; when
/// the whole and fractional parts together exceed 28 significant digits the
/// result is rounded to fit.
pub fn to_decimal(raw: U256, scale: Scale) -> Result<Decimal> {
    let (integer, fraction) = raw.div_rem(scale.factor());

    let whole = Decimal::from_str_exact(&integer.to_string()).map_err(|_| {
        MathError::Overflow(format!("{} at scale {} does not fit a decimal", raw, scale))
    })?;

    let (fraction, fraction_decimals) = if scale.decimals > DECIMAL_MAX_SCALE {
        let dropped = Scale::from_decimals(scale.decimals - DECIMAL_MAX_SCALE)?;
        (fraction / dropped.factor(), DECIMAL_MAX_SCALE)
    } else {
        (fraction, scale.decimals)
    };

    let mut fractional = Decimal::from_str_exact(&fraction.to_string())
        .map_err(|e| MathError::Overflow(format!("fractional part of {}: {}", raw, e)))?;
    fractional
        .set_scale(fraction_decimals)
        .map_err(|e| MathError::Overflow(format!("fractional part of {}: {}", raw, e)))?;

    whole
        .checked_add(fractional)
        .ok_or_else(|| MathError::Overflow(format!("{} at scale {}", raw, scale)))
}

/// Convert a raw integer to an exact decimal string.
///
/// Trailing fractional zeros are dropped; whole numbers carry no decimal point.
pub fn to_decimal_string(raw: U256, scale: Scale) -> String {
    let (integer, fraction) = raw.div_rem(scale.factor());
    if fraction.is_zero() {
        return integer.to_string();
    }

    let digits = format!(
        "{:0>width$}",
        fraction.to_string(),
        width = scale.decimals as usize
    );
    format!("{}.{}", integer, digits.trim_end_matches('0'))
}

/// Parse a non-negative decimal string into a raw integer at `scale`.
///
/// The parse is exact: fractional digits the scale cannot represent are
/// rejected unless they are zeros.
pub fn to_raw(value: &str, scale: Scale) -> Result<U256> {
    let trimmed = value.trim();
    let invalid = || MathError::InvalidNumber(value.to_string());

    let (integer, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if integer.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !integer.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let decimals = scale.decimals as usize;
    let significant = fraction.trim_end_matches('0');
    if significant.len() > decimals {
        return Err(MathError::ExcessPrecision {
            value: trimmed.to_string(),
            decimals: scale.decimals,
        });
    }

    let overflow = || MathError::Overflow(format!("{} at scale {}", trimmed, scale));

    let whole = if integer.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(integer, 10).map_err(|_| overflow())?
    };
    let fractional = if significant.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", significant, width = decimals);
        U256::from_str_radix(&padded, 10).map_err(|_| overflow())?
    };

    whole
        .checked_mul(scale.factor())
        .and_then(|v| v.checked_add(fractional))
        .ok_or_else(overflow)
}

/// Convert a non-negative `Decimal` into a raw integer at `scale`.
pub fn to_raw_decimal(value: Decimal, scale: Scale) -> Result<U256> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MathError::InvalidNumber(value.to_string()));
    }
    to_raw(&value.normalize().to_string(), scale)
}

/// Parse a decimal string, rejecting anything `Decimal` cannot hold exactly.
pub fn parse_decimal(value: &str) -> Result<Decimal> {
    Decimal::from_str_exact(value.trim()).map_err(|_| MathError::InvalidNumber(value.to_string()))
}

impl FromStr for Scale {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        let factor = U256::from_str_radix(s.trim(), 10)
            .map_err(|_| MathError::InvalidNumber(s.to_string()))?;
        Self::from_factor(factor)
    }
}
