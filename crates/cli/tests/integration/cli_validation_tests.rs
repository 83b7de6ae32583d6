//! CLI argument validation tests.
//!
//! These tests verify that the CLI properly validates arguments and provides
//! helpful error messages without requiring network access.

use predicates::prelude::*;

use super::helpers::{comet_cmd, comet_cmd_with_mock, expect_no_requests, start_mock_server};

const ACCOUNT: &str = "0x1234567890123456789012345678901234567890";
const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
// Anvil's default account 0 private key
const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[test]
fn test_help_output() {
    comet_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("comet"))
        .stdout(predicate::str::contains("markets"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("rates"))
        .stdout(predicate::str::contains("position"))
        .stdout(predicate::str::contains("supply"))
        .stdout(predicate::str::contains("claim"));
}

#[test]
fn test_rates_help() {
    comet_cmd()
        .args(["rates", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--chain"))
        .stdout(predicate::str::contains("--market"))
        .stdout(predicate::str::contains("--utilization"))
        .stdout(predicate::str::contains("--rpc-url"));
}

#[test]
fn test_invalid_command() {
    comet_cmd()
        .arg("invalid_command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_invalid_chain_value() {
    comet_cmd()
        .args(["markets", "--chain", "invalid_chain"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown chain"));
}

#[test]
fn test_invalid_output_format() {
    comet_cmd()
        .args(["markets", "--format", "invalid_format"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_position_missing_account() {
    comet_cmd()
        .args(["position"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_invalid_denomination() {
    comet_cmd()
        .args(["position", ACCOUNT, "--denomination", "eur"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown denomination"));
}

#[test]
fn test_supply_requires_private_key() {
    comet_cmd()
        .args(["supply", USDC, "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--private-key"));
}

#[tokio::test]
async fn test_supply_rejects_zero_amount_before_connecting() {
    let server = start_mock_server().await;
    expect_no_requests(&server).await;

    comet_cmd_with_mock(&server)
        .args(["supply", USDC, "0", "--private-key", TEST_PRIVATE_KEY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}

#[tokio::test]
async fn test_withdraw_rejects_malformed_amount_before_connecting() {
    let server = start_mock_server().await;
    expect_no_requests(&server).await;

    comet_cmd_with_mock(&server)
        .args(["withdraw", USDC, "1.2.3", "--private-key", TEST_PRIVATE_KEY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}

#[tokio::test]
async fn test_invalid_asset_address() {
    let server = start_mock_server().await;
    expect_no_requests(&server).await;

    comet_cmd_with_mock(&server)
        .args(["supply", "0xnotanaddress", "1", "--private-key", TEST_PRIVATE_KEY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid asset address"));
}

#[tokio::test]
async fn test_rates_on_unregistered_chain_is_not_initialized() {
    let server = start_mock_server().await;
    expect_no_requests(&server).await;

    comet_cmd_with_mock(&server)
        .args(["rates", "--chain", "31337"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_rates_on_unregistered_chain_without_rpc() {
    comet_cmd()
        .args(["rates", "--chain", "31337"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rpc_url"));
}

#[test]
fn test_utilization_out_of_range() {
    comet_cmd()
        .args(["rates", "--utilization", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be between 0 and 100"));
}
