//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use aetherion_broker::environment::{EnvironmentError, WalletEnvironment, WalletKind};
use aetherion_broker::{BrokerConfig, ConnectionStatus, ProviderSource, WalletSession};

/// Anvil's first well-known test account. Publicly known, never funded.
pub const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

/// Wallet environment driven by a queue of canned responses.
///
/// Every request is recorded, so tests can assert on exactly which provider
/// traffic an operation produced (including none at all).
#[derive(Default)]
pub struct ScriptedEnvironment {
    injected: Vec<WalletKind>,
    responses: Mutex<VecDeque<Result<Value, EnvironmentError>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedEnvironment {
    pub fn new(injected: Vec<WalletKind>) -> Self {
        Self {
            injected,
            ..Self::default()
        }
    }

    pub fn push_ok(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn push_err(&self, err: EnvironmentError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// Queue the canned responses for a successful handshake.
    pub fn script_handshake(&self, chain_id_hex: &str) {
        self.push_ok(serde_json::json!([{ "parentCapability": "eth_accounts" }]));
        self.push_ok(serde_json::json!([TEST_ADDRESS]));
        self.push_ok(serde_json::json!(chain_id_hex));
        // 1 ETH
        self.push_ok(serde_json::json!("0xde0b6b3a7640000"));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|(method, _)| method).collect()
    }
}

impl WalletEnvironment for ScriptedEnvironment {
    fn injected_wallets(&self) -> Vec<WalletKind> {
        self.injected.clone()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, EnvironmentError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(EnvironmentError::Transport(format!(
                    "no scripted response for {}",
                    method
                )))
            })
    }
}

/// Broker configuration with a fixed demo seed.
pub fn test_config() -> BrokerConfig {
    let mut config = BrokerConfig::default();
    config.demo.seed = 7;
    config
}

/// A connected real session, as produced by a completed handshake.
pub fn connected_session() -> WalletSession {
    WalletSession::connected(
        WalletKind::Metamask,
        TEST_ADDRESS.parse().unwrap(),
        1,
        "1.0000".to_string(),
    )
}

/// Mark a session disconnected without going through the negotiator.
pub fn disconnected(mut session: WalletSession) -> WalletSession {
    session.status = ConnectionStatus::Disconnected;
    session
}

pub fn is_simulated(session: &WalletSession) -> bool {
    matches!(session.source, ProviderSource::Simulated { .. })
}
