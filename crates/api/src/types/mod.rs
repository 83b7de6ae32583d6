//! Types returned by the Comet client.

pub mod market;
pub mod position;

pub use market::{MarketOverview, UtilizationSource};
pub use position::{AccountPosition, CollateralHolding, Denomination};
