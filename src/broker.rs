//! Broker facade.
//!
//! # Data Flow
//! ```text
//! UI collaborator (escrow form, purchase widget, CLI)
//!     → Broker::connect_wallet      → session::Negotiator
//!     → Broker::switch_network      → network::NetworkSwitcher
//!     → Broker::purchase_tokens     → tx::TxSubmitter → sale counter
//!     → Broker::ico_details         → sale::reader
//! ```
//!
//! Each session is owned by exactly one caller flow; broker methods borrow
//! it. The broker itself holds no per-session mutable state, so no locking
//! is needed beyond the sale counter.

use std::time::Instant;

use alloy::primitives::Address;
use serde_json::json;
use thiserror::Error;

use crate::config::schema::BrokerConfig;
use crate::environment::types::{format_ether, parse_hex_quantity};
use crate::environment::{detect, EnvironmentError, WalletEnvironment, WalletKind};
use crate::network::NetworkSwitcher;
use crate::observability::metrics;
use crate::sale::{ico_details, IcoDetails, SaleState};
use crate::session::types::{ConnectionStatus, ProviderSource};
use crate::session::{Negotiator, WalletSession};
use crate::tx::{PurchaseOutcome, TransferOutcome, TxError, TxSubmitter};

/// Errors from broker session maintenance operations.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("session is not connected")]
    NotConnected,

    #[error("provider error: {0}")]
    Environment(#[from] EnvironmentError),
}

/// Mediates between callers and heterogeneous wallet providers.
pub struct Broker<E> {
    env: E,
    config: BrokerConfig,
    sale: SaleState,
}

impl<E: WalletEnvironment> Broker<E> {
    pub fn new(config: BrokerConfig, env: E) -> Self {
        let sale = SaleState::new(config.sale.clone());
        Self { env, config, sale }
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    pub fn sale(&self) -> &SaleState {
        &self.sale
    }

    /// Wallet kinds a connect attempt could target right now.
    pub fn available_wallets(&self) -> Vec<WalletKind> {
        detect::available_wallets(&self.env)
    }

    /// Connect a wallet. Never fails: inspect the session's status.
    pub async fn connect_wallet(&self, kind: WalletKind) -> WalletSession {
        let session = Negotiator::new(&self.env, &self.config.demo)
            .connect(kind)
            .await;
        let outcome = match (&session.status, &session.source) {
            (ConnectionStatus::Connected, ProviderSource::Simulated { .. }) => "simulated",
            (ConnectionStatus::Connected, ProviderSource::Real) => "connected",
            _ => "error",
        };
        metrics::record_connect(kind, outcome);
        session
    }

    /// Tear down a session.
    pub async fn disconnect_wallet(&self, session: &mut WalletSession) {
        Negotiator::new(&self.env, &self.config.demo)
            .disconnect(session)
            .await;
    }

    /// Switch the session's active chain. Returns true only on confirmation.
    pub async fn switch_network(&self, session: &mut WalletSession, chain_id: u64) -> bool {
        let switched = NetworkSwitcher::new(&self.env).switch(session, chain_id).await;
        metrics::record_network_switch(if switched { "switched" } else { "failed" });
        switched
    }

    /// Re-read the session's native balance from its provider.
    pub async fn refresh_balance(&self, session: &mut WalletSession) -> Result<(), BrokerError> {
        if !session.is_connected() {
            return Err(BrokerError::NotConnected);
        }
        match session.source {
            // Simulated balances are fixed by the seed.
            ProviderSource::Simulated { .. } => Ok(()),
            ProviderSource::Real => {
                let address = session.address.ok_or(BrokerError::NotConnected)?;
                let raw = self
                    .env
                    .request("eth_getBalance", json!([address, "latest"]))
                    .await?;
                session.balance = format_ether(parse_hex_quantity(&raw)?);
                Ok(())
            }
        }
    }

    /// Purchase sale tokens for a USD amount, optionally forwarding the
    /// purchased amount to an Aetherion address afterwards.
    pub async fn purchase_tokens(
        &self,
        session: &WalletSession,
        usd_amount: &str,
        payment_token: Option<&str>,
        forward_to: Option<Address>,
    ) -> Result<PurchaseOutcome, TxError> {
        let started = Instant::now();
        let result = self
            .submitter()
            .purchase_tokens(session, usd_amount, payment_token, forward_to)
            .await;

        match &result {
            Ok(outcome) => {
                metrics::record_transaction("purchase", "confirmed");
                metrics::record_confirmation_seconds(started.elapsed().as_secs_f64());
                // Whole tokens; the sale counter tracks units, not cents.
                let tokens = outcome.token_amount.parse::<f64>().unwrap_or(0.0) as u64;
                self.sale.record_purchase(tokens);
            }
            Err(_) => metrics::record_transaction("purchase", "failed"),
        }
        result
    }

    /// Send a transfer intent for an Aetherion destination address.
    pub async fn transfer_to_aetherion(
        &self,
        session: &WalletSession,
        destination: Address,
        amount: &str,
        symbol: Option<&str>,
    ) -> Result<TransferOutcome, TxError> {
        let result = self
            .submitter()
            .transfer_to_aetherion(session, destination, amount, symbol)
            .await;
        metrics::record_transaction(
            "transfer",
            if result.is_ok() { "confirmed" } else { "failed" },
        );
        result
    }

    /// Current sale snapshot.
    pub fn ico_details(&self) -> IcoDetails {
        ico_details(&self.sale)
    }

    fn submitter(&self) -> TxSubmitter<'_, E> {
        TxSubmitter::new(
            &self.env,
            &self.sale,
            &self.config.timeouts,
            self.config.sale.payload_codec,
        )
    }
}
