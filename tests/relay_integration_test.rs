//! Integration tests for the relay client, simulator, and status tracker
//!
//! All relay traffic goes against a local mock server. The polling tests
//! shrink the fixed interval so they finish in milliseconds without
//! changing the loop's shape.

use std::collections::HashMap;
use std::time::Duration;

use mockito::Matcher;
use tokio_util::sync::CancellationToken;

use jito_relay::errors::RelayError;
use jito_relay::relay::RelayClient;
use jito_relay::simulate::{BundleSimulator, SimulationOptions, SimulationOutcome};
use jito_relay::tracker::{BundleStatusClassification, BundleStatusTracker};
use jito_relay::types::{BundleHandle, BundleOptions, BundleSubmission, EncodedTransaction, TxEncoding};

fn tx(payload: &str) -> EncodedTransaction {
    EncodedTransaction::new(payload, TxEncoding::Base64)
}

fn bundle(n: usize) -> BundleSubmission {
    let txs = (0..n).map(|i| tx(&format!("dHgt{}", i))).collect();
    BundleSubmission::new(txs, BundleOptions::default())
}

fn handle(id: &str) -> BundleHandle {
    BundleHandle::from(id.to_string())
}

// ── send_bundle ─────────────────────────────────────────────────────────

#[tokio::test]
async fn send_bundle_returns_relay_handle() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJsonString(
            r#"{"method":"sendBundle"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"bundle-abc"}"#)
        .create_async()
        .await;

    let relay = RelayClient::new(server.url());
    let handle = relay.send_bundle(&bundle(2)).await.unwrap();

    assert_eq!(handle.as_str(), "bundle-abc");
    mock.assert_async().await;
}

#[tokio::test]
async fn send_bundle_surfaces_rpc_error_object() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"bundle too large"}}"#,
        )
        .create_async()
        .await;

    let relay = RelayClient::new(server.url());
    match relay.send_bundle(&bundle(1)).await {
        Err(RelayError::Submission { code, message }) => {
            assert_eq!(code, -32602);
            assert_eq!(message, "bundle too large");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn send_bundle_maps_http_failure_to_transport() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let relay = RelayClient::new(server.url());
    assert!(matches!(
        relay.send_bundle(&bundle(1)).await,
        Err(RelayError::Transport { status: 500, .. })
    ));
}

#[tokio::test]
async fn send_bundle_validates_before_any_network_call() {
    // Deliberately unroutable base URL: validation must fail first.
    let relay = RelayClient::new("http://127.0.0.1:1");
    assert!(matches!(
        relay.send_bundle(&bundle(6)).await,
        Err(RelayError::InvalidBundle(_))
    ));
}

// ── send_transaction ────────────────────────────────────────────────────

#[tokio::test]
async fn send_transaction_uses_bundle_only_lane() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/transactions")
        .match_query(Matcher::UrlEncoded("bundleOnly".into(), "true".into()))
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"sig-1"}"#)
        .create_async()
        .await;

    let relay = RelayClient::new(server.url());
    let signature = relay.send_transaction(&tx("dHg"), true).await.unwrap();

    assert_eq!(signature, "sig-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn send_transaction_forwards_uuid_credential() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/transactions")
        .match_query(Matcher::UrlEncoded("uuid".into(), "my-secret-uuid".into()))
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"sig-2"}"#)
        .create_async()
        .await;

    let relay = RelayClient::new(server.url()).with_uuid("my-secret-uuid");
    relay.send_transaction(&tx("dHg"), false).await.unwrap();
    mock.assert_async().await;
}

// ── Tip account selection ───────────────────────────────────────────────

#[test]
fn random_tip_account_is_roughly_uniform() {
    let relay = RelayClient::mainnet();
    let draws = 10_000usize;
    let mut counts: HashMap<String, usize> = HashMap::new();

    for _ in 0..draws {
        *counts.entry(relay.random_tip_account().to_string()).or_default() += 1;
    }

    assert_eq!(counts.len(), 8, "all 8 tip accounts should be visited");

    // Chi-square sanity check against the uniform expectation; df = 7, the
    // bound is far out in the tail so the test only catches gross skew.
    let expected = draws as f64 / 8.0;
    let chi_square: f64 = counts
        .values()
        .map(|&observed| {
            let delta = observed as f64 - expected;
            delta * delta / expected
        })
        .sum();
    assert!(chi_square < 60.0, "chi_square = {chi_square}");
}

// ── Simulation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn simulate_success_reports_slot_and_units() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJsonString(
            r#"{"method":"simulateBundle"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{"jsonrpc":"2.0","id":1,"result":{
                "context":{"slot":1234},
                "value":{"err":null,"logs":[["Program log: ok"]],"unitsConsumed":4200,"returnData":null}
            }}"#,
        )
        .create_async()
        .await;

    let simulator = BundleSimulator::new();
    let txs = vec![tx("dHgt0")];
    let outcome = simulator
        .simulate(&txs, &SimulationOptions::default(), &server.url())
        .await
        .unwrap();

    match outcome {
        SimulationOutcome::Ok {
            slot,
            units_consumed,
            logs,
            ..
        } => {
            assert_eq!(slot, 1234);
            assert_eq!(units_consumed, Some(4200));
            assert_eq!(logs.unwrap().len(), 1);
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn simulation_failure_short_circuits_the_send() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJsonString(
            r#"{"method":"simulateBundle"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{"jsonrpc":"2.0","id":1,"result":{
                "context":{"slot":1234},
                "value":{
                    "err":{"TransactionFailure":"custom program error"},
                    "logs":[["Program log: step 1"],["Program log: failed"]],
                    "unitsConsumed":null,
                    "returnData":null
                }
            }}"#,
        )
        .create_async()
        .await;
    // The bundle endpoint must never be hit when simulation fails.
    let send_mock = server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let simulator = BundleSimulator::new();
    let relay = RelayClient::new(server.url());
    let submission = bundle(2);

    let outcome = simulator
        .simulate(
            &submission.transactions,
            &SimulationOptions::default(),
            &server.url(),
        )
        .await
        .unwrap();

    match &outcome {
        SimulationOutcome::SimError { err, logs } => {
            assert!(err.get("TransactionFailure").is_some());
            // One log group per submitted transaction, submission order.
            let logs = logs.as_ref().unwrap();
            assert_eq!(logs.len(), submission.transactions.len());
            assert_eq!(logs[0][0], "Program log: step 1");
            assert_eq!(logs[1][0], "Program log: failed");
        }
        other => panic!("unexpected: {:?}", other),
    }

    if outcome.is_ok() {
        let _ = relay.send_bundle(&submission).await;
    }
    send_mock.assert_async().await;
}

// ── Status tracking ─────────────────────────────────────────────────────

fn inflight_body(entry: &str) -> String {
    format!(
        r#"{{"jsonrpc":"2.0","id":1,"result":{{"context":{{"slot":100}},"value":[{}]}}}}"#,
        entry
    )
}

#[tokio::test]
async fn tracker_returns_landed_with_slot() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJsonString(
            r#"{"method":"getInflightBundleStatuses"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(inflight_body(
            r#"{"bundle_id":"b1","status":"Landed","landed_slot":42}"#,
        ))
        .create_async()
        .await;

    let tracker = BundleStatusTracker::with_poll_interval(
        RelayClient::new(server.url()),
        Duration::from_millis(10),
    );
    let status = tracker
        .wait_for_landing(&handle("b1"), Duration::from_secs(2), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(status, BundleStatusClassification::Landed { slot: Some(42) });
    assert!(status.is_landed());
}

#[tokio::test]
async fn tracker_returns_confirmed_from_final_shape() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(inflight_body(
            r#"{"bundle_id":"b1","confirmation_status":"confirmed","slot":7,"transactions":["sig1"],"err":null}"#,
        ))
        .create_async()
        .await;

    let tracker = BundleStatusTracker::with_poll_interval(
        RelayClient::new(server.url()),
        Duration::from_millis(10),
    );
    let status = tracker
        .wait_for_landing(&handle("b1"), Duration::from_secs(2), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        status,
        BundleStatusClassification::Confirmed { slot: Some(7) }
    );
}

#[tokio::test]
async fn tracker_times_out_while_pending() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(inflight_body(r#"{"bundle_id":"b1","status":"Pending"}"#))
        .expect_at_least(2)
        .create_async()
        .await;

    let tracker = BundleStatusTracker::with_poll_interval(
        RelayClient::new(server.url()),
        Duration::from_millis(25),
    );
    match tracker
        .wait_for_landing(&handle("b1"), Duration::from_millis(200), CancellationToken::new())
        .await
    {
        Err(RelayError::ConfirmationTimeout { bundle_id, elapsed }) => {
            assert_eq!(bundle_id, "b1");
            assert!(elapsed >= Duration::from_millis(200));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn tracker_keeps_polling_through_unknown_shapes() {
    // No recognized field at all: classified Unknown, loop continues
    // until the timeout, never a hard error.
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(inflight_body(r#"{"bundle_id":"b1"}"#))
        .expect_at_least(2)
        .create_async()
        .await;

    let tracker = BundleStatusTracker::with_poll_interval(
        RelayClient::new(server.url()),
        Duration::from_millis(25),
    );
    assert!(matches!(
        tracker
            .wait_for_landing(&handle("b1"), Duration::from_millis(150), CancellationToken::new())
            .await,
        Err(RelayError::ConfirmationTimeout { .. })
    ));
}

#[tokio::test]
async fn tracker_survives_transient_poll_failures_until_timeout() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let tracker = BundleStatusTracker::with_poll_interval(
        RelayClient::new(server.url()),
        Duration::from_millis(25),
    );
    assert!(matches!(
        tracker
            .wait_for_landing(&handle("b1"), Duration::from_millis(150), CancellationToken::new())
            .await,
        Err(RelayError::ConfirmationTimeout { .. })
    ));
}

#[tokio::test]
async fn tracker_aborts_on_cancellation() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/bundles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(inflight_body(r#"{"bundle_id":"b1","status":"Pending"}"#))
        .create_async()
        .await;

    let tracker = BundleStatusTracker::with_poll_interval(
        RelayClient::new(server.url()),
        Duration::from_millis(25),
    );
    let cancel = CancellationToken::new();
    let waiter = tokio::spawn({
        let tracker = tracker.clone();
        let cancel = cancel.clone();
        async move {
            tracker
                .wait_for_landing(&handle("b1"), Duration::from_secs(30), cancel)
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(60)).await;
    cancel.cancel();

    match waiter.await.unwrap() {
        Err(RelayError::Cancelled { bundle_id }) => assert_eq!(bundle_id, "b1"),
        other => panic!("unexpected: {:?}", other),
    }
}
