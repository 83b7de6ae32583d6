//! Test helper utilities for API crate integration tests.
//!
//! `MockComet` answers JSON-RPC `eth_call` requests from canned ABI-encoded
//! outputs, keyed by exact calldata first and function selector second.

#![allow(dead_code)]

use std::collections::HashMap;

use alloy::primitives::hex;
use alloy::sol_types::{SolCall, SolValue};
use comet_rs_api::{CometClient, CometClientConfig};
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// Anvil's default account 0 private key
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const ONE_WAD: u128 = 1_000_000_000_000_000_000;

/// Start a mock JSON-RPC server.
pub async fn start_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client configuration pointing at a mock server.
pub fn client_config_with_mock(server: &MockServer) -> CometClientConfig {
    CometClientConfig::new().with_rpc_url(server.uri())
}

/// Read-only client for mainnet USDC pointing at a mock server.
pub fn mainnet_client(server: &MockServer) -> CometClient {
    CometClient::with_config(client_config_with_mock(server)).unwrap()
}

/// ABI-encode a single return value.
pub fn encode<T: SolValue>(value: T) -> Vec<u8> {
    value.abi_encode()
}

/// Canned `eth_call` responses.
#[derive(Debug, Clone, Default)]
pub struct MockComet {
    by_selector: HashMap<[u8; 4], Vec<u8>>,
    by_calldata: HashMap<Vec<u8>, Vec<u8>>,
}

impl MockComet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `C` with `output`.
    pub fn on<C: SolCall>(mut self, output: Vec<u8>) -> Self {
        self.by_selector.insert(C::SELECTOR, output);
        self
    }

    /// Answer this exact call with `output`.
    pub fn on_call<C: SolCall>(mut self, call: C, output: Vec<u8>) -> Self {
        self.by_calldata.insert(call.abi_encode(), output);
        self
    }

    /// Mount on a server, answering every POST.
    pub async fn mount(self, server: &MockServer) {
        Mock::given(method("POST"))
            .respond_with(self)
            .mount(server)
            .await;
    }

    fn eth_call(&self, params: &Value) -> Result<Value, String> {
        let input = params[0]["input"]
            .as_str()
            .or_else(|| params[0]["data"].as_str())
            .ok_or_else(|| "missing calldata".to_string())?;
        let calldata = hex::decode(input).map_err(|e| e.to_string())?;
        if calldata.len() < 4 {
            return Err("calldata too short".to_string());
        }

        let output = self.by_calldata.get(&calldata).or_else(|| {
            let mut selector = [0u8; 4];
            selector.copy_from_slice(&calldata[..4]);
            self.by_selector.get(&selector)
        });

        match output {
            Some(bytes) => Ok(json!(hex::encode_prefixed(bytes))),
            None => Err("execution reverted".to_string()),
        }
    }
}

impl Respond for MockComet {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let id = body["id"].clone();

        let result = match body["method"].as_str() {
            Some("eth_chainId") => Ok(json!("0x1")),
            Some("eth_blockNumber") => Ok(json!("0x1")),
            Some("eth_call") => self.eth_call(&body["params"]),
            other => Err(format!("unsupported method {:?}", other)),
        };

        let response = match result {
            Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
            Err(message) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": 3, "message": message}
            }),
        };
        ResponseTemplate::new(200).set_body_json(response)
    }
}

/// Mount a server that fails the test if it receives any request.
pub async fn expect_no_requests(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
