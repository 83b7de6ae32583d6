//! Compound III numeric model
//!
//! This crate turns the raw fixed-point integers returned by a Comet market
//! into the values people read: decimal amounts, utilization percentages,
//! annualized rates and account health.
//!
//! # Overview
//!
//! - [`fixed_point`]: exact conversions between `U256` and `Decimal`
//! - [`rates`]: utilization, APR and APY from per-second rates
//! - [`health`]: health factor, display bands and collateral valuation
//!
//! Everything here is pure and synchronous.
//!
//! # Example
//!
//! ```rust
//! use comet_rs_math::{to_apr, to_apy, utilization_percent, HealthFactor};
//! use alloy_primitives::U256;
//! use rust_decimal::Decimal;
//!
//! let utilization = utilization_percent(U256::from(800_000_000_000_000_000u64)).unwrap();
//! assert_eq!(utilization, Decimal::from(80));
//!
//! let rate = U256::from(1_268_391_679u64);
//! assert!(to_apy(rate).unwrap() > to_apr(rate).unwrap());
//!
//! let hf = HealthFactor::from_values(Decimal::from(1500), Decimal::ZERO).unwrap();
//! assert_eq!(hf.to_string(), "∞");
//! ```

pub mod error;
pub mod fixed_point;
pub mod health;
pub mod rates;

pub use error::{MathError, Result};

pub use fixed_point::{
    parse_decimal, to_decimal, to_decimal_string, to_raw, to_raw_decimal, Scale, ScaledValue,
    MAX_DECIMALS,
};

pub use health::{
    asset_value, collateral_value, HealthAssessment, HealthBand, HealthFactor,
    CRITICAL_THRESHOLD, WARNING_THRESHOLD,
};

pub use rates::{
    to_apr, to_apy, utilization_percent, RateSample, UtilizationSample, SECONDS_PER_YEAR,
};
