//! Network switching.
//!
//! # Responsibilities
//! - Ask the active provider to switch chains
//! - Register unknown-but-supported chains, then retry the switch once
//! - Convert every failure into a boolean result; nothing here throws
//!
//! Switching is not idempotent from the provider's point of view (it may
//! re-prompt the user), so callers must not retry automatically.

use serde_json::json;

use crate::environment::{EnvironmentError, WalletEnvironment};
use crate::network::registry;
use crate::session::types::{ProviderSource, WalletSession};

/// Switches the active chain of a wallet session.
pub struct NetworkSwitcher<'a, E> {
    env: &'a E,
}

impl<'a, E: WalletEnvironment> NetworkSwitcher<'a, E> {
    pub fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Switch the session to `chain_id`.
    ///
    /// Returns `true` only on a confirmed switch; the session's chain id is
    /// updated if and only if the switch was confirmed.
    pub async fn switch(&self, session: &mut WalletSession, chain_id: u64) -> bool {
        if !session.is_connected() {
            tracing::warn!(session = %session.id, "network switch on a session that is not connected");
            return false;
        }

        match session.source {
            ProviderSource::Simulated { .. } => {
                // No provider behind the session; the static table is the
                // only gate.
                if registry::lookup(chain_id).is_none() {
                    tracing::warn!(chain_id, "chain not in supported network table");
                    return false;
                }
                session.chain_id = chain_id;
                tracing::info!(session = %session.id, chain_id, "simulated session switched");
                true
            }
            ProviderSource::Real => match self.switch_real(chain_id).await {
                Ok(()) => {
                    session.chain_id = chain_id;
                    tracing::info!(session = %session.id, chain_id, "network switched");
                    true
                }
                Err(e) => {
                    tracing::error!(session = %session.id, chain_id, error = %e, "network switch failed");
                    false
                }
            },
        }
    }

    async fn switch_real(&self, chain_id: u64) -> Result<(), EnvironmentError> {
        match self.request_switch(chain_id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_unrecognized_chain() => {
                // Provider does not know the chain yet: register it from the
                // static table and retry the switch exactly once.
                let descriptor = registry::lookup(chain_id).ok_or_else(|| {
                    EnvironmentError::Unavailable(format!(
                        "chain {} not in supported network table",
                        chain_id
                    ))
                })?;
                self.env
                    .request("wallet_addEthereumChain", descriptor.add_chain_params())
                    .await?;
                self.request_switch(chain_id).await
            }
            Err(e) => Err(e),
        }
    }

    async fn request_switch(&self, chain_id: u64) -> Result<(), EnvironmentError> {
        let hex = format!("{:#x}", chain_id);
        self.env
            .request("wallet_switchEthereumChain", json!([{ "chainId": hex }]))
            .await
            .map(|_| ())
    }
}
