//! Rates command tests against a mock JSON-RPC endpoint.

use alloy::primitives::{address, Address, I256, U256};
use comet_rs_contracts::comet::IComet;
use predicates::prelude::*;

use super::helpers::{comet_cmd_with_mock, encode, start_mock_server, MockComet, ONE_WAD};

const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

fn wad(numerator: u128, denominator: u128) -> U256 {
    U256::from(ONE_WAD * numerator / denominator)
}

fn market_mock() -> MockComet {
    let utilization = wad(8, 10);
    MockComet::new()
        .on::<IComet::baseTokenCall>(encode(USDC))
        .on::<IComet::decimalsCall>(encode(U256::from(6)))
        .on::<IComet::totalSupplyCall>(encode(U256::from(1_000_000_000_000u64)))
        .on::<IComet::totalBorrowCall>(encode(U256::from(800_000_000_000u64)))
        .on::<IComet::getUtilizationCall>(encode(utilization))
        .on::<IComet::getReservesCall>(encode(I256::try_from(-2_500_000i64).unwrap()))
        .on::<IComet::targetReservesCall>(encode(U256::from(5_000_000_000_000u64)))
        .on_call(
            IComet::getSupplyRateCall { utilization },
            encode(U256::from(1_000_000_000u64)),
        )
        .on_call(
            IComet::getBorrowRateCall { utilization },
            encode(U256::from(2_000_000_000u64)),
        )
        .on_call(
            IComet::getSupplyRateCall {
                utilization: wad(9, 10),
            },
            encode(U256::from(3_000_000_000u64)),
        )
        .on_call(
            IComet::getBorrowRateCall {
                utilization: wad(9, 10),
            },
            encode(U256::from(4_000_000_000u64)),
        )
}

#[tokio::test]
async fn test_rates_table_output() {
    let server = start_mock_server().await;
    market_mock().mount(&server).await;

    comet_cmd_with_mock(&server)
        .args(["rates", "--chain", "ethereum"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USDC market (chain 1)"))
        .stdout(predicate::str::contains("80.00%"))
        .stdout(predicate::str::contains("3.15%"))
        .stdout(predicate::str::contains("6.31%"));
}

#[tokio::test]
async fn test_rates_json_output() {
    let server = start_mock_server().await;
    market_mock().mount(&server).await;

    let output = comet_cmd_with_mock(&server)
        .args(["rates", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let overview: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(overview["chain_id"], 1);
    assert_eq!(overview["market"], "USDC");
    assert_eq!(overview["base_decimals"], 6);
    assert!(overview["supply"]["apr"].as_str().unwrap().starts_with("3.1536"));
    assert!(overview["borrow"]["apr"].as_str().unwrap().starts_with("6.3072"));
    assert!(overview["reserves"].as_str().unwrap().starts_with("-2.5"));
}

#[tokio::test]
async fn test_rates_preview_at_utilization() {
    let server = start_mock_server().await;
    market_mock().mount(&server).await;

    comet_cmd_with_mock(&server)
        .args(["rates", "--utilization", "90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("90.00% (preview)"))
        .stdout(predicate::str::contains("9.46%"))
        .stdout(predicate::str::contains("12.61%"));
}

#[tokio::test]
async fn test_rates_upstream_failure() {
    let server = start_mock_server().await;
    // No canned responses: every eth_call reverts
    MockComet::new().mount(&server).await;

    comet_cmd_with_mock(&server)
        .args(["rates"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
