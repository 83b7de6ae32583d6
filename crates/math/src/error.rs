//! Error types for the math library.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during fixed-point conversion and rate derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// The scale factor is not a power of ten representable in 256 bits
    #[error("Invalid scale {factor}: expected a power of ten up to 10^77")]
    InvalidScale { factor: U256 },

    /// The scale exponent exceeds the largest power of ten that fits in 256 bits
    #[error("Invalid scale exponent {decimals}: at most 77 decimals are supported")]
    InvalidDecimals { decimals: u32 },

    /// The magnitude does not fit the conversion target
    #[error("Overflow: {0}")]
    Overflow(String),

    /// The input string is not a non-negative decimal number
    #[error("Invalid decimal number: {0:?}")]
    InvalidNumber(String),

    /// The decimal carries more significant fractional digits than the scale allows
    #[error("Value {value} has more than {decimals} fractional digits")]
    ExcessPrecision { value: String, decimals: u32 },

    /// Utilization above 100% reported by the ledger
    #[error("Utilization {percent}% is outside the range [0, 100]")]
    UtilizationOutOfRange { percent: Decimal },

    /// Arithmetic between values of different scales
    #[error("Scale mismatch: 10^{left} vs 10^{right}")]
    ScaleMismatch { left: u32, right: u32 },
}

/// Result type alias for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
