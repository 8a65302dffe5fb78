//! Connection negotiation against scripted provider environments.

use aetherion_broker::environment::{EnvironmentError, WalletKind, CODE_USER_REJECTED};
use aetherion_broker::{Broker, ConnectionStatus, ProviderSource};

mod common;
use common::ScriptedEnvironment;

#[tokio::test]
async fn test_fallback_identity_when_nothing_is_injected() {
    let env = ScriptedEnvironment::new(vec![]);
    let broker = Broker::new(common::test_config(), env);

    let session = broker.connect_wallet(WalletKind::Metamask).await;

    assert_eq!(session.status, ConnectionStatus::Connected);
    assert!(common::is_simulated(&session));
    assert_eq!(session.chain_id, 1);

    let rendered = session.address.unwrap().to_string();
    assert!(rendered.starts_with("0x"));
    assert_eq!(rendered.len(), 42);
    assert!(rendered[2..].chars().all(|c| c.is_ascii_hexdigit()));

    let balance: f64 = session.balance.parse().unwrap();
    assert!((10.0..15.0).contains(&balance));

    // A missing injected wallet produces zero provider traffic.
    assert!(broker.environment().calls().is_empty());
}

#[tokio::test]
async fn test_fallback_is_deterministic_per_seed() {
    let first = Broker::new(common::test_config(), ScriptedEnvironment::new(vec![]))
        .connect_wallet(WalletKind::Metamask)
        .await;
    let second = Broker::new(common::test_config(), ScriptedEnvironment::new(vec![]))
        .connect_wallet(WalletKind::Metamask)
        .await;

    assert_eq!(first.address, second.address);
    assert_eq!(first.balance, second.balance);
    assert_eq!(first.source, ProviderSource::Simulated { seed: 7 });
}

#[tokio::test]
async fn test_connect_errors_when_fallback_disabled() {
    let env = ScriptedEnvironment::new(vec![]);
    let mut config = common::test_config();
    config.demo.fallback = false;
    let broker = Broker::new(config, env);

    let session = broker.connect_wallet(WalletKind::Metamask).await;

    assert_eq!(session.status, ConnectionStatus::Error);
    assert!(session.address.is_none());
    assert!(session.balance.is_empty());
}

#[tokio::test]
async fn test_successful_handshake_builds_real_session() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    env.script_handshake("0x1");
    let broker = Broker::new(common::test_config(), env);

    let session = broker.connect_wallet(WalletKind::Metamask).await;

    assert_eq!(session.status, ConnectionStatus::Connected);
    assert_eq!(session.source, ProviderSource::Real);
    assert_eq!(
        session.address.unwrap().to_string().to_lowercase(),
        common::TEST_ADDRESS
    );
    assert_eq!(session.chain_id, 1);
    assert_eq!(session.balance, "1.0000");

    assert_eq!(
        broker.environment().call_methods(),
        vec![
            "wallet_requestPermissions",
            "eth_requestAccounts",
            "eth_chainId",
            "eth_getBalance",
        ]
    );
}

#[tokio::test]
async fn test_wrong_injected_wallet_is_never_used() {
    // Coinbase is injected, MetaMask was requested: the handshake must not
    // touch the provider and the demo fallback takes over.
    let env = ScriptedEnvironment::new(vec![WalletKind::Coinbase]);
    let broker = Broker::new(common::test_config(), env);

    let session = broker.connect_wallet(WalletKind::Metamask).await;

    assert!(common::is_simulated(&session));
    assert!(broker.environment().calls().is_empty());
}

#[tokio::test]
async fn test_user_rejection_aborts_handshake() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    env.push_err(EnvironmentError::Rpc {
        code: CODE_USER_REJECTED,
        message: "User rejected the request".to_string(),
    });
    let mut config = common::test_config();
    config.demo.fallback = false;
    let broker = Broker::new(config, env);

    let session = broker.connect_wallet(WalletKind::Metamask).await;

    assert_eq!(session.status, ConnectionStatus::Error);
    // Only the permission request went out.
    assert_eq!(
        broker.environment().call_methods(),
        vec!["wallet_requestPermissions"]
    );
}

#[tokio::test]
async fn test_walletconnect_needs_no_injection() {
    let env = ScriptedEnvironment::new(vec![]);
    env.script_handshake("0x38");
    let mut config = common::test_config();
    config.demo.fallback = false;
    let broker = Broker::new(config, env);

    let session = broker.connect_wallet(WalletKind::WalletConnect).await;

    assert_eq!(session.status, ConnectionStatus::Connected);
    assert_eq!(session.chain_id, 56);
}

#[tokio::test]
async fn test_disconnect_clears_real_session() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    env.script_handshake("0x1");
    let broker = Broker::new(common::test_config(), env);

    let mut session = broker.connect_wallet(WalletKind::Metamask).await;
    broker.disconnect_wallet(&mut session).await;

    assert_eq!(session.status, ConnectionStatus::Disconnected);
    assert!(session.address.is_none());
}

#[tokio::test]
async fn test_balance_failure_degrades_to_zero() {
    let env = ScriptedEnvironment::new(vec![WalletKind::Metamask]);
    env.push_ok(serde_json::json!([{ "parentCapability": "eth_accounts" }]));
    env.push_ok(serde_json::json!([common::TEST_ADDRESS]));
    env.push_ok(serde_json::json!("0x1"));
    env.push_err(EnvironmentError::Timeout(10));
    let mut config = common::test_config();
    config.demo.fallback = false;
    let broker = Broker::new(config, env);

    let session = broker.connect_wallet(WalletKind::Metamask).await;

    assert_eq!(session.status, ConnectionStatus::Connected);
    assert_eq!(session.balance, "0.0000");
}
