//! Provider construction for contract clients.
//!
//! Both clients hold a type-erased [`DynProvider`] so read-only and signing
//! connections share one concrete type.

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};

use crate::error::{ContractError, Result};

/// The provider type used by every client in this crate.
pub type CometProvider = DynProvider;

fn parse_rpc_url(rpc_url: &str) -> Result<url::Url> {
    rpc_url
        .parse()
        .map_err(|e| ContractError::RpcConnection(format!("{}", e)))
}

/// Connect to an RPC endpoint without a signer.
pub fn connect_read_only(rpc_url: &str) -> Result<CometProvider> {
    let url = parse_rpc_url(rpc_url)?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// Connect to an RPC endpoint with a local private key signer.
///
/// Returns the provider together with the signer's address.
pub fn connect_with_signer(rpc_url: &str, private_key: &str) -> Result<(CometProvider, Address)> {
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|_| ContractError::InvalidPrivateKey)?;
    let signer_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    let url = parse_rpc_url(rpc_url)?;
    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url).erased();

    Ok((provider, signer_address))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's default account 0 private key
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_connect_read_only_rejects_bad_url() {
        let result = connect_read_only("not a valid url");
        assert!(matches!(result, Err(ContractError::RpcConnection(_))));
    }

    #[test]
    fn test_connect_with_signer_derives_address() {
        let (_, address) = connect_with_signer("http://localhost:8545", TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            address,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_connect_with_signer_checks_key_before_url() {
        let result = connect_with_signer("not a valid url", "invalid_key");
        assert!(matches!(result, Err(ContractError::InvalidPrivateKey)));
    }
}
