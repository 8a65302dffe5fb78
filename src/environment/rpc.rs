//! JSON-RPC wallet environment over HTTP.
//!
//! # Responsibilities
//! - Speak JSON-RPC 2.0 to a wallet bridge endpoint
//! - Enforce a deadline on every provider call
//! - Surface provider error codes (EIP-1193) to callers

use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::timeout;

use crate::config::schema::{EnvironmentConfig, TimeoutConfig};
use crate::environment::types::{EnvironmentError, WalletKind};
use crate::environment::WalletEnvironment;

/// Wallet environment backed by an HTTP JSON-RPC bridge.
///
/// The bridge fronts whatever real provider the deployment has (a browser
/// extension relay, a WalletConnect relay, a node). The set of injected
/// wallet kinds it advertises comes from configuration; a single bridge may
/// legitimately advertise several kinds at once.
#[derive(Debug, Clone)]
pub struct RpcEnvironment {
    client: reqwest::Client,
    bridge_url: String,
    injected: Vec<WalletKind>,
    timeout_duration: Duration,
}

impl RpcEnvironment {
    pub fn new(
        config: &EnvironmentConfig,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, EnvironmentError> {
        let url: url::Url = config.bridge_url.parse().map_err(|e| {
            EnvironmentError::Transport(format!(
                "invalid bridge URL '{}': {}",
                config.bridge_url, e
            ))
        })?;

        let timeout_duration = Duration::from_secs(timeouts.rpc_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout_duration)
            .build()
            .map_err(|e| {
                EnvironmentError::Transport(format!("failed to build bridge client: {}", e))
            })?;

        tracing::info!(
            bridge = %url,
            injected = ?config.injected,
            timeout_secs = timeouts.rpc_secs,
            "wallet environment initialized"
        );

        Ok(Self {
            client,
            bridge_url: url.to_string(),
            injected: config.injected.clone(),
            timeout_duration,
        })
    }
}

impl WalletEnvironment for RpcEnvironment {
    fn injected_wallets(&self) -> Vec<WalletKind> {
        self.injected.clone()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, EnvironmentError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let fut = self.client.post(&self.bridge_url).json(&payload).send();
        let response = match timeout(self.timeout_duration, fut).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                return Err(EnvironmentError::Transport(format!(
                    "bridge request failed: {}",
                    e
                )))
            }
            Err(_) => {
                tracing::warn!(method = method, "provider request timed out");
                return Err(EnvironmentError::Timeout(self.timeout_duration.as_secs()));
            }
        };

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            EnvironmentError::Transport(format!("bridge returned invalid JSON: {}", e))
        })?;

        if !status.is_success() {
            return Err(EnvironmentError::Transport(format!(
                "bridge status {}: {}",
                status, body
            )));
        }

        if let Some(err) = body.get("error") {
            let code = err.get("code").and_then(Value::as_i64).unwrap_or(-32000);
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown provider error")
                .to_string();
            tracing::warn!(method = method, code = code, message = %message, "provider error");
            return Err(EnvironmentError::Rpc { code, message });
        }

        body.get("result")
            .cloned()
            .ok_or_else(|| EnvironmentError::Transport("bridge response missing result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_bridge_url() {
        let config = EnvironmentConfig {
            bridge_url: "not a url".to_string(),
            ..EnvironmentConfig::default()
        };
        let result = RpcEnvironment::new(&config, &TimeoutConfig::default());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid bridge URL"));
    }

    #[test]
    fn test_accepts_default_config() {
        let env = RpcEnvironment::new(&EnvironmentConfig::default(), &TimeoutConfig::default());
        assert!(env.is_ok());
    }
}
