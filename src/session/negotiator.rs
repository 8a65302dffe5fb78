//! Connection negotiation.
//!
//! # Responsibilities
//! - Verify the environment actually offers the requested wallet kind
//! - Run the provider handshake (permissions, accounts, chain, balance)
//! - Apply the demo fallback policy when the handshake cannot complete
//!
//! `connect` is infallible at the API boundary: every failure path ends in a
//! session whose status says what happened. Nothing here retries; a failed
//! connect must be re-initiated by the user.

use alloy::primitives::Address;
use serde_json::json;

use crate::config::schema::DemoConfig;
use crate::environment::types::{format_ether, parse_chain_id, parse_hex_quantity};
use crate::environment::{EnvironmentError, WalletEnvironment, WalletKind};
use crate::session::types::{ConnectionStatus, ProviderSource, WalletSession};

/// Negotiates wallet sessions against an environment.
pub struct Negotiator<'a, E> {
    env: &'a E,
    demo: &'a DemoConfig,
}

impl<'a, E: WalletEnvironment> Negotiator<'a, E> {
    pub fn new(env: &'a E, demo: &'a DemoConfig) -> Self {
        Self { env, demo }
    }

    /// Connect a wallet of the requested kind.
    ///
    /// Returns a `Connected` session from a real handshake, a `Connected`
    /// simulated session when the handshake fails and demo fallback is
    /// enabled, or an `Error` session otherwise.
    pub async fn connect(&self, kind: WalletKind) -> WalletSession {
        match self.handshake(kind).await {
            Ok(session) => {
                tracing::info!(
                    session = %session.id,
                    wallet = %kind,
                    address = ?session.address,
                    chain_id = session.chain_id,
                    "wallet connected"
                );
                session
            }
            Err(e) if self.demo.fallback => {
                tracing::warn!(
                    wallet = %kind,
                    error = %e,
                    seed = self.demo.seed,
                    "handshake failed, issuing simulated identity"
                );
                WalletSession::simulated(kind, self.demo.seed)
            }
            Err(e) => {
                tracing::error!(wallet = %kind, error = %e, "wallet connection failed");
                WalletSession::failed(kind)
            }
        }
    }

    async fn handshake(&self, kind: WalletKind) -> Result<WalletSession, EnvironmentError> {
        // Never silently use the wrong wallet: an injected kind must actually
        // be advertised by the environment before we touch it.
        if kind.requires_injection() && !self.env.injected_wallets().contains(&kind) {
            return Err(EnvironmentError::Unavailable(format!(
                "no injected provider advertises {}",
                kind
            )));
        }

        // Permission request is best effort; only an explicit user rejection
        // aborts the handshake.
        match self
            .env
            .request("wallet_requestPermissions", json!([{ "eth_accounts": {} }]))
            .await
        {
            Err(e) if e.is_user_rejection() => return Err(e),
            Err(e) => {
                tracing::debug!(wallet = %kind, error = %e, "permission request not honored")
            }
            Ok(_) => {}
        }

        let accounts = self.env.request("eth_requestAccounts", json!([])).await?;
        let address = primary_account(&accounts)?;

        let chain = self.env.request("eth_chainId", json!([])).await?;
        let chain_id = parse_chain_id(&chain)?;

        // A session is usable without a balance; degrade to zero on failure.
        let balance = match self
            .env
            .request("eth_getBalance", json!([address, "latest"]))
            .await
            .and_then(|v| parse_hex_quantity(&v))
        {
            Ok(wei) => format_ether(wei),
            Err(e) => {
                tracing::warn!(wallet = %kind, error = %e, "balance query failed");
                "0.0000".to_string()
            }
        };

        Ok(WalletSession::connected(kind, address, chain_id, balance))
    }

    /// Tear down a session.
    ///
    /// WalletConnect-class providers get a best-effort disconnect call; the
    /// session fields are cleared regardless.
    pub async fn disconnect(&self, session: &mut WalletSession) {
        if session.kind == WalletKind::WalletConnect
            && session.source == ProviderSource::Real
            && session.is_connected()
        {
            if let Err(e) = self.env.request("wallet_disconnect", json!([])).await {
                tracing::debug!(session = %session.id, error = %e, "provider disconnect failed");
            }
        }

        session.address = None;
        session.balance = "0.0000".to_string();
        session.status = ConnectionStatus::Disconnected;
        tracing::info!(session = %session.id, wallet = %session.kind, "session closed");
    }
}

fn primary_account(accounts: &serde_json::Value) -> Result<Address, EnvironmentError> {
    let raw = accounts
        .as_array()
        .and_then(|a| a.first())
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| {
            EnvironmentError::Transport("provider returned no accounts".to_string())
        })?;
    raw.parse()
        .map_err(|e| EnvironmentError::Transport(format!("invalid account address '{}': {}", raw, e)))
}
