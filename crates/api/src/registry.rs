//! Deployed Comet markets, grouped by network.
//!
//! The registry is a static configuration document. A built-in copy covering
//! the public deployments is embedded at compile time; callers can load their
//! own from JSON. Markets keep the order in which the document lists them, and
//! the first market of a network is its default.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApiError, Result};

const BUILTIN_NETWORKS: &str = include_str!("../data/networks.json");

/// Native currency of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Contract addresses of a single Comet market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConfig {
    /// Market name, unique within its network (e.g. "USDC").
    pub name: String,
    /// Symbol of the market's base asset.
    pub base_asset_symbol: String,
    /// Comet proxy address.
    pub comet_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurator_address: Option<Address>,
}

/// A network and the markets deployed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    /// Default public RPC endpoint.
    pub rpc_url: String,
    pub block_explorer_url: String,
    pub native_currency: NativeCurrency,
    /// Markets in registration order.
    pub markets: Vec<MarketConfig>,
}

impl NetworkConfig {
    /// Look up a market by name.
    pub fn market(&self, name: &str) -> Option<&MarketConfig> {
        self.markets.iter().find(|m| m.name == name)
    }

    /// The first registered market, used when none is requested.
    pub fn first_market(&self) -> Option<&MarketConfig> {
        self.markets.first()
    }

    /// Market names in registration order.
    pub fn market_names(&self) -> impl Iterator<Item = &str> {
        self.markets.iter().map(|m| m.name.as_str())
    }

    /// Link to an address on the network's block explorer.
    pub fn explorer_address_url(&self, address: Address) -> String {
        format!(
            "{}/address/{}",
            self.block_explorer_url.trim_end_matches('/'),
            address
        )
    }
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    networks: Vec<NetworkConfig>,
}

/// Immutable mapping from chain id to the markets deployed on that chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkMarketRegistry {
    networks: BTreeMap<u64, NetworkConfig>,
}

impl NetworkMarketRegistry {
    /// The registry embedded in this crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_NETWORKS)
    }

    /// Parse and validate a registry document.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: RegistryDocument = serde_json::from_str(json)
            .map_err(|e| ApiError::Registry(format!("Failed to parse registry: {}", e)))?;
        Self::from_networks(document.networks)
    }

    /// Read a registry document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ApiError::Registry(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Build a registry from network records.
    ///
    /// All validation problems are reported together in one
    /// [`ApiError::Registry`].
    pub fn from_networks(networks: Vec<NetworkConfig>) -> Result<Self> {
        let mut problems = Vec::new();
        let mut by_chain = BTreeMap::new();

        for network in networks {
            validate_network(&network, &mut problems);
            let chain_id = network.chain_id;
            if by_chain.insert(chain_id, network).is_some() {
                problems.push(format!("duplicate chain id {}", chain_id));
            }
        }

        if !problems.is_empty() {
            return Err(ApiError::Registry(problems.join("; ")));
        }

        Ok(Self { networks: by_chain })
    }

    /// Look up a network.
    pub fn network(&self, chain_id: u64) -> Option<&NetworkConfig> {
        self.networks.get(&chain_id)
    }

    /// Look up a market on a network.
    pub fn market(&self, chain_id: u64, name: &str) -> Option<&MarketConfig> {
        self.network(chain_id).and_then(|n| n.market(name))
    }

    /// All networks, ordered by chain id.
    pub fn networks(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.values()
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.networks.keys().copied()
    }

    pub fn contains_chain(&self, chain_id: u64) -> bool {
        self.networks.contains_key(&chain_id)
    }
}

fn validate_network(network: &NetworkConfig, problems: &mut Vec<String>) {
    let chain_id = network.chain_id;

    if let Err(e) = Url::parse(&network.rpc_url) {
        problems.push(format!(
            "chain {}: invalid rpc url {:?}: {}",
            chain_id, network.rpc_url, e
        ));
    }

    let mut seen = HashSet::new();
    for market in &network.markets {
        if market.name.trim().is_empty() {
            problems.push(format!("chain {}: market with empty name", chain_id));
            continue;
        }
        if !seen.insert(market.name.as_str()) {
            problems.push(format!(
                "chain {}: duplicate market {}",
                chain_id, market.name
            ));
        }
        if market.comet_address == Address::ZERO {
            problems.push(format!(
                "chain {}: market {} has a zero comet address",
                chain_id, market.name
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(name: &str, byte: u8) -> MarketConfig {
        MarketConfig {
            name: name.to_string(),
            base_asset_symbol: name.to_string(),
            comet_address: Address::repeat_byte(byte),
            rewards_address: None,
            configurator_address: None,
        }
    }

    fn network(chain_id: u64, markets: Vec<MarketConfig>) -> NetworkConfig {
        NetworkConfig {
            chain_id,
            name: format!("Chain {}", chain_id),
            rpc_url: "http://localhost:8545".to_string(),
            block_explorer_url: "https://explorer.example/".to_string(),
            native_currency: NativeCurrency {
                name: "Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            markets,
        }
    }

    #[test]
    fn test_builtin_registry_loads() {
        let registry = NetworkMarketRegistry::builtin().unwrap();
        let chains: Vec<u64> = registry.chain_ids().collect();
        assert_eq!(
            chains,
            vec![1, 10, 137, 5000, 8453, 42161, 80001, 84532, 534352, 11155111]
        );
    }

    #[test]
    fn test_builtin_market_order() {
        let registry = NetworkMarketRegistry::builtin().unwrap();
        let mainnet = registry.network(1).unwrap();
        let names: Vec<&str> = mainnet.market_names().collect();
        assert_eq!(names, vec!["USDC", "WETH", "USDT", "wstETH", "USDS"]);

        let arbitrum = registry.network(42161).unwrap();
        assert_eq!(arbitrum.first_market().unwrap().name, "USDC.e");
    }

    #[test]
    fn test_builtin_mainnet_usdc_addresses() {
        let registry = NetworkMarketRegistry::builtin().unwrap();
        let usdc = registry.market(1, "USDC").unwrap();
        assert_eq!(
            usdc.comet_address,
            "0xc3d688B66703497DAA19211EEdff47f25384cdc3"
                .parse::<Address>()
                .unwrap()
        );
        assert_eq!(
            usdc.rewards_address,
            Some(
                "0x1B0e765F6224C21223AeA2af16c1C46E38885a40"
                    .parse()
                    .unwrap()
            )
        );
        assert_eq!(
            usdc.configurator_address,
            Some(
                "0x316f9708bB98af7dA9c68C1C3b5e79039cD336E3"
                    .parse()
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_unknown_lookups() {
        let registry = NetworkMarketRegistry::builtin().unwrap();
        assert!(registry.network(999).is_none());
        assert!(registry.market(1, "DAI").is_none());
        assert!(registry.market(999, "USDC").is_none());
        assert!(!registry.contains_chain(999));
    }

    #[test]
    fn test_from_json_optional_addresses() {
        let json = r#"{
            "networks": [{
                "chainId": 31337,
                "name": "Local",
                "rpcUrl": "http://localhost:8545",
                "blockExplorerUrl": "http://localhost",
                "nativeCurrency": {"name": "Ether", "symbol": "ETH", "decimals": 18},
                "markets": [{
                    "name": "USDC",
                    "baseAssetSymbol": "USDC",
                    "cometAddress": "0x1111111111111111111111111111111111111111"
                }]
            }]
        }"#;
        let registry = NetworkMarketRegistry::from_json(json).unwrap();
        let usdc = registry.market(31337, "USDC").unwrap();
        assert_eq!(usdc.comet_address, Address::repeat_byte(0x11));
        assert!(usdc.rewards_address.is_none());
        assert!(usdc.configurator_address.is_none());
    }

    #[test]
    fn test_malformed_json_is_registry_error() {
        let result = NetworkMarketRegistry::from_json("{\"networks\": 3}");
        assert!(matches!(result, Err(ApiError::Registry(_))));
    }

    #[test]
    fn test_missing_file_is_registry_error() {
        let result = NetworkMarketRegistry::from_path("/nonexistent/networks.json");
        assert!(matches!(result, Err(ApiError::Registry(_))));
    }

    #[test]
    fn test_validation_collects_all_problems() {
        let networks = vec![
            network(1, vec![market("USDC", 0x11), market("USDC", 0x22)]),
            network(1, vec![market("WETH", 0x33)]),
            network(2, vec![market(" ", 0x44), market("DAI", 0x00)]),
        ];
        let err = NetworkMarketRegistry::from_networks(networks).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("chain 1: duplicate market USDC"));
        assert!(message.contains("duplicate chain id 1"));
        assert!(message.contains("chain 2: market with empty name"));
        assert!(message.contains("chain 2: market DAI has a zero comet address"));
    }

    #[test]
    fn test_invalid_rpc_url_rejected() {
        let mut bad = network(5, vec![market("USDC", 0x11)]);
        bad.rpc_url = "not a url".to_string();
        let err = NetworkMarketRegistry::from_networks(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("invalid rpc url"));
    }

    #[test]
    fn test_explorer_address_url() {
        let net = network(1, vec![]);
        let url = net.explorer_address_url(Address::repeat_byte(0xab));
        assert_eq!(
            url.to_lowercase(),
            format!("https://explorer.example/address/0x{}", "ab".repeat(20))
        );
    }
}
