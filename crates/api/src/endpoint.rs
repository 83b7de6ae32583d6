//! Resolution of the contract addresses a client talks to.
//!
//! A client addresses one Comet market at a time. Its endpoints come from the
//! [`NetworkMarketRegistry`] unless the caller overrides them:
//!
//! 1. An explicit Comet address always wins. Explicit rewards and
//!    configurator addresses win independently of it.
//! 2. Otherwise a requested market that exists on the chain is used.
//! 3. Otherwise the chain's first registered market is used.
//! 4. An unknown chain without a Comet override leaves the client
//!    uninitialized.
//!
//! Resolution itself never fails. Operations check [`EndpointSnapshot`]
//! accessors, which turn missing addresses into errors.

use alloy_primitives::Address;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::registry::{MarketConfig, NetworkMarketRegistry};

/// Addresses supplied explicitly by the caller.
///
/// Overrides are permanent for the lifetime of the endpoint state: market
/// switches never replace them. A chain switch discards them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EndpointOverrides {
    pub comet: Option<Address>,
    pub rewards: Option<Address>,
    pub configurator: Option<Address>,
}

impl EndpointOverrides {
    pub fn is_empty(&self) -> bool {
        self.comet.is_none() && self.rewards.is_none() && self.configurator.is_none()
    }
}

/// The resolved endpoints of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEndpointState {
    chain_id: u64,
    active_market: Option<String>,
    comet_address: Option<Address>,
    rewards_address: Option<Address>,
    configurator_address: Option<Address>,
    overrides: EndpointOverrides,
}

impl ClientEndpointState {
    /// Resolve endpoints for a chain, an optional market name and overrides.
    pub fn resolve(
        registry: &NetworkMarketRegistry,
        chain_id: u64,
        market: Option<&str>,
        overrides: EndpointOverrides,
    ) -> Self {
        let network = registry.network(chain_id);

        // An explicit Comet address bypasses the registry entirely; rewards
        // and configurator then come only from their own overrides.
        let selected = match overrides.comet {
            Some(_) => None,
            None => market
                .and_then(|name| network.and_then(|n| n.market(name)))
                .or_else(|| network.and_then(|n| n.first_market())),
        };

        let active_market = match selected {
            Some(m) => Some(m.name.clone()),
            // The requested name is kept as a label.
            None if overrides.comet.is_some() => market.map(str::to_string),
            None => None,
        };

        let mut state = Self {
            chain_id,
            active_market,
            comet_address: None,
            rewards_address: None,
            configurator_address: None,
            overrides,
        };
        state.apply_market(selected);

        debug!(
            chain_id,
            market = ?state.active_market,
            comet = ?state.comet_address,
            rewards = ?state.rewards_address,
            configurator = ?state.configurator_address,
            "resolved endpoints"
        );

        state
    }

    fn apply_market(&mut self, market: Option<&MarketConfig>) {
        self.comet_address = self.overrides.comet.or(market.map(|m| m.comet_address));
        self.rewards_address = self
            .overrides
            .rewards
            .or(market.and_then(|m| m.rewards_address));
        self.configurator_address = self
            .overrides
            .configurator
            .or(market.and_then(|m| m.configurator_address));
    }

    /// Switch to another market on the same chain.
    ///
    /// Returns `false` and leaves the state untouched when the market is not
    /// registered for the current chain.
    pub fn switch_market(&mut self, registry: &NetworkMarketRegistry, name: &str) -> bool {
        let Some(market) = registry.market(self.chain_id, name) else {
            warn!(chain_id = self.chain_id, market = name, "unknown market, keeping current endpoints");
            return false;
        };

        self.active_market = Some(market.name.clone());
        self.apply_market(Some(market));
        debug!(
            chain_id = self.chain_id,
            market = name,
            comet = ?self.comet_address,
            "switched market"
        );
        true
    }

    /// Re-resolve everything for another chain.
    ///
    /// The active market is kept when the new chain has a market of the same
    /// name. Overrides are dropped.
    pub fn switch_chain(&mut self, registry: &NetworkMarketRegistry, chain_id: u64) {
        let previous = self.active_market.take();
        *self = Self::resolve(
            registry,
            chain_id,
            previous.as_deref(),
            EndpointOverrides::default(),
        );
    }

    /// Override the Comet address permanently.
    pub fn set_comet_address(&mut self, address: Address) {
        self.overrides.comet = Some(address);
        self.comet_address = Some(address);
    }

    /// Override the rewards address permanently.
    pub fn set_rewards_address(&mut self, address: Address) {
        self.overrides.rewards = Some(address);
        self.rewards_address = Some(address);
    }

    /// Override the configurator address permanently.
    pub fn set_configurator_address(&mut self, address: Address) {
        self.overrides.configurator = Some(address);
        self.configurator_address = Some(address);
    }

    /// Whether a Comet address is available.
    pub fn is_initialized(&self) -> bool {
        self.comet_address.is_some()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn active_market(&self) -> Option<&str> {
        self.active_market.as_deref()
    }

    pub fn comet_address(&self) -> Option<Address> {
        self.comet_address
    }

    pub fn rewards_address(&self) -> Option<Address> {
        self.rewards_address
    }

    pub fn configurator_address(&self) -> Option<Address> {
        self.configurator_address
    }

    pub fn overrides(&self) -> EndpointOverrides {
        self.overrides
    }

    /// Copy of the current endpoints, taken by an operation before it awaits.
    pub fn snapshot(&self) -> EndpointSnapshot {
        EndpointSnapshot {
            chain_id: self.chain_id,
            market: self.active_market.clone(),
            comet: self.comet_address,
            rewards: self.rewards_address,
            configurator: self.configurator_address,
        }
    }
}

/// Immutable copy of resolved endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointSnapshot {
    pub chain_id: u64,
    pub market: Option<String>,
    pub comet: Option<Address>,
    pub rewards: Option<Address>,
    pub configurator: Option<Address>,
}

impl EndpointSnapshot {
    /// The Comet address, or [`ApiError::NotInitialized`].
    pub fn comet(&self) -> Result<Address> {
        self.comet.ok_or(ApiError::NotInitialized {
            chain_id: self.chain_id,
        })
    }

    /// The rewards address, or [`ApiError::ContractUnavailable`].
    pub fn rewards(&self) -> Result<Address> {
        self.rewards.ok_or(ApiError::ContractUnavailable("Rewards"))
    }

    /// The configurator address, or [`ApiError::ContractUnavailable`].
    pub fn configurator(&self) -> Result<Address> {
        self.configurator
            .ok_or(ApiError::ContractUnavailable("Configurator"))
    }

    pub fn is_initialized(&self) -> bool {
        self.comet.is_some()
    }
}
