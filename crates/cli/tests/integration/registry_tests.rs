//! Tests for the registry-only commands: markets and resolve.

use std::io::Write;

use predicates::prelude::*;

use super::helpers::comet_cmd;

#[test]
fn test_markets_table_output() {
    comet_cmd()
        .args(["markets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ethereum"))
        .stdout(predicate::str::contains("Arbitrum"))
        .stdout(predicate::str::contains("wstETH"))
        .stdout(predicate::str::contains("USDC.e"));
}

#[test]
fn test_markets_filtered_by_chain_json() {
    let output = comet_cmd()
        .args(["markets", "--chain", "base", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let networks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let networks = networks.as_array().unwrap();
    assert_eq!(networks.len(), 1);
    assert_eq!(networks[0]["chainId"], 8453);

    let names: Vec<&str> = networks[0]["markets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["USDC", "USDbC", "WETH", "AERO"]);
}

#[test]
fn test_markets_unregistered_chain() {
    comet_cmd()
        .args(["markets", "--chain", "31337"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No markets registered for chain 31337"));
}

#[test]
fn test_resolve_defaults_to_first_market() {
    let output = comet_cmd()
        .args(["resolve", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(resolved["chain_id"], 1);
    assert_eq!(resolved["market"], "USDC");
    assert_eq!(
        resolved["comet"].as_str().unwrap().to_lowercase(),
        "0xc3d688b66703497daa19211eedff47f25384cdc3"
    );
    assert_eq!(resolved["initialized"], true);
}

#[test]
fn test_resolve_named_market_table() {
    comet_cmd()
        .args(["resolve", "--chain", "arbitrum", "--market", "WETH"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WETH market (chain 42161)"))
        .stdout(predicate::str::contains("initialized"));
}

#[test]
fn test_resolve_with_comet_override() {
    let output = comet_cmd()
        .args([
            "resolve",
            "--chain",
            "1",
            "--comet",
            "0x4242424242424242424242424242424242424242",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        resolved["comet"].as_str().unwrap().to_lowercase(),
        "0x4242424242424242424242424242424242424242"
    );
    assert_eq!(resolved["initialized"], true);
}

#[test]
fn test_resolve_unregistered_chain_is_uninitialized() {
    let output = comet_cmd()
        .args(["resolve", "--chain", "31337", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(resolved["initialized"], false);
    assert!(resolved["comet"].is_null());
    assert!(resolved["market"].is_null());
}

#[test]
fn test_custom_registry_file() {
    let mut file = tempfile_in_target("custom-registry.json");
    file.1
        .write_all(
            br#"{"networks":[{
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
            }]}"#,
        )
        .unwrap();
    drop(file.1);

    comet_cmd()
        .args(["markets", "--registry"])
        .arg(&file.0)
        .assert()
        .success()
        .stdout(predicate::str::contains("Local"))
        .stdout(predicate::str::contains("31337"))
        .stdout(predicate::str::contains("Ethereum").not());
}

#[test]
fn test_invalid_registry_file() {
    let mut file = tempfile_in_target("invalid-registry.json");
    file.1.write_all(b"{\"networks\": 42}").unwrap();
    drop(file.1);

    comet_cmd()
        .args(["markets", "--registry"])
        .arg(&file.0)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load registry"));
}

/// Create a scratch file under the build directory.
fn tempfile_in_target(name: &str) -> (std::path::PathBuf, std::fs::File) {
    let dir = std::path::Path::new(env!("CARGO_TARGET_TMPDIR"));
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    (path, file)
}
