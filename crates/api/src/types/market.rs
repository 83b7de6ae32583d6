//! Market-level types.

use alloy_primitives::{Address, U256};
use comet_rs_math::{RateSample, UtilizationSample};
use rust_decimal::Decimal;
use serde::Serialize;

/// Which utilization a rate query is evaluated at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UtilizationSource {
    /// The market's current utilization, fetched from the ledger.
    #[default]
    Current,
    /// A hypothetical `1e18`-scaled utilization, for previews.
    Override(U256),
}

/// Totals, utilization and rates of a market at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketOverview {
    pub chain_id: u64,
    pub market: Option<String>,
    pub comet: Address,
    pub base_token: Address,
    pub base_decimals: u32,
    /// Total base supplied, in base units.
    pub total_supply: Decimal,
    /// Total base borrowed, in base units.
    pub total_borrow: Decimal,
    pub utilization: UtilizationSample,
    pub supply: RateSample,
    pub borrow: RateSample,
    /// Protocol reserves in base units. Negative when the market is in deficit.
    pub reserves: Decimal,
    pub target_reserves: Decimal,
}
