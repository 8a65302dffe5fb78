//! Purchase and transfer flows, including the partial-failure composition.

use serde_json::{json, Value};

use aetherion_broker::environment::{EnvironmentError, WalletKind};
use aetherion_broker::tx::{ForwardOutcome, TxError};
use aetherion_broker::Broker;

mod common;
use common::ScriptedEnvironment;

fn receipt(block_hex: &str) -> Value {
    json!({ "status": "0x1", "blockNumber": block_hex })
}

#[tokio::test]
async fn test_purchase_on_disconnected_session_issues_no_provider_calls() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    let broker = Broker::new(common::test_config(), env);
    let session = common::disconnected(common::connected_session());

    let err = broker
        .purchase_tokens(&session, "646", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, TxError::NotConnected));
    assert!(err.to_string().contains("not connected"));
    assert!(broker.environment().calls().is_empty());
}

#[tokio::test]
async fn test_purchase_sends_marker_payload_and_confirms() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    env.push_ok(json!(
        "0x1111111111111111111111111111111111111111111111111111111111111111"
    ));
    env.push_ok(receipt("0x10"));
    let broker = Broker::new(common::test_config(), env);
    let session = common::connected_session();

    let outcome = broker
        .purchase_tokens(&session, "646", None, None)
        .await
        .unwrap();

    assert_eq!(outcome.token_amount, "1000000.00");
    assert_eq!(outcome.block_number, 16);
    assert_eq!(
        broker.environment().call_methods(),
        vec!["eth_sendTransaction", "eth_getTransactionReceipt"]
    );

    // The transaction data carries the ICO_PURCHASE marker ("IC" = 0x4943).
    let calls = broker.environment().calls();
    let tx = &calls[0].1[0];
    let data = tx["data"].as_str().unwrap();
    assert!(data.starts_with("0x4943"));
    let decoded = String::from_utf8(alloy::hex::decode(data).unwrap()).unwrap();
    assert_eq!(decoded, "ICO_PURCHASE:1000000.00:646:SING");

    // No treasury configured: the purchase goes to self.
    assert_eq!(
        tx["to"].as_str().unwrap().to_lowercase(),
        common::TEST_ADDRESS
    );
}

#[tokio::test]
async fn test_purchase_waits_through_pending_receipts() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    env.push_ok(json!(
        "0x2222222222222222222222222222222222222222222222222222222222222222"
    ));
    env.push_ok(Value::Null); // still pending
    env.push_ok(receipt("0x20"));
    let mut config = common::test_config();
    config.timeouts.poll_interval_ms = 10;
    let broker = Broker::new(config, env);
    let session = common::connected_session();

    let outcome = broker
        .purchase_tokens(&session, "100", None, None)
        .await
        .unwrap();

    assert_eq!(outcome.block_number, 32);
    assert_eq!(
        broker.environment().call_methods(),
        vec![
            "eth_sendTransaction",
            "eth_getTransactionReceipt",
            "eth_getTransactionReceipt",
        ]
    );
}

#[tokio::test]
async fn test_reverted_purchase_is_reported() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    env.push_ok(json!(
        "0x3333333333333333333333333333333333333333333333333333333333333333"
    ));
    env.push_ok(json!({ "status": "0x0", "blockNumber": "0x5" }));
    let broker = Broker::new(common::test_config(), env);
    let session = common::connected_session();

    let err = broker
        .purchase_tokens(&session, "100", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TxError::Reverted(_)));
}

#[tokio::test]
async fn test_forward_failure_does_not_roll_back_purchase() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    // Purchase succeeds...
    env.push_ok(json!(
        "0x4444444444444444444444444444444444444444444444444444444444444444"
    ));
    env.push_ok(receipt("0x10"));
    // ...then the forward transfer is rejected by the provider.
    env.push_err(EnvironmentError::Rpc {
        code: 4001,
        message: "User rejected the request".to_string(),
    });
    let broker = Broker::new(common::test_config(), env);
    let session = common::connected_session();
    let destination = common::TEST_ADDRESS.parse().unwrap();

    let outcome = broker
        .purchase_tokens(&session, "646", None, Some(destination))
        .await
        .unwrap();

    assert_eq!(outcome.token_amount, "1000000.00");
    match outcome.forward {
        Some(ForwardOutcome::Failed { error }) => {
            assert!(error.contains("4001"), "unexpected error: {}", error)
        }
        other => panic!("expected failed forward, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transfer_is_zero_value_to_self() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    env.push_ok(json!(
        "0x5555555555555555555555555555555555555555555555555555555555555555"
    ));
    env.push_ok(receipt("0x10"));
    let broker = Broker::new(common::test_config(), env);
    let session = common::connected_session();
    let destination = common::TEST_ADDRESS.parse().unwrap();

    broker
        .transfer_to_aetherion(&session, destination, "250.00", None)
        .await
        .unwrap();

    let calls = broker.environment().calls();
    let tx = &calls[0].1[0];
    assert_eq!(tx["value"], "0x0");
    assert_eq!(tx["to"], tx["from"]);

    let decoded =
        String::from_utf8(alloy::hex::decode(tx["data"].as_str().unwrap()).unwrap()).unwrap();
    assert!(decoded.starts_with("AETHERION_TRANSFER:250.00:SING:0x"));
}

#[tokio::test]
async fn test_ico_details_track_simulated_purchases() {
    let env = ScriptedEnvironment::new(vec![]);
    let broker = Broker::new(common::test_config(), env);

    let details = broker.ico_details();
    assert_eq!(details.progress, 12.6);
    assert_eq!(details.tokens_sold, 126_000_000);

    let session = broker.connect_wallet(WalletKind::Metamask).await;
    broker
        .purchase_tokens(&session, "646", None, None)
        .await
        .unwrap();

    let details = broker.ico_details();
    assert_eq!(details.tokens_sold, 127_000_000);
    assert_eq!(details.progress, 12.7);
    assert!((0.0..=100.0).contains(&details.progress));
}
