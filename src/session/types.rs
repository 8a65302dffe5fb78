//! Session types.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::environment::{SimulatedIdentity, WalletKind};

/// Connection lifecycle of a wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Where a session's identity came from.
///
/// A `Simulated` session was built from a demo seed, never from a provider
/// handshake. Callers that must not accept demo identities can check this
/// instead of guessing from the session contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSource {
    Real,
    Simulated { seed: u64 },
}

/// A negotiated wallet session, owned by exactly one caller flow at a time.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSession {
    pub id: Uuid,
    pub kind: WalletKind,
    pub address: Option<Address>,
    pub chain_id: u64,
    /// Native balance as a decimal string.
    pub balance: String,
    pub status: ConnectionStatus,
    pub source: ProviderSource,
}

impl WalletSession {
    /// Session populated from a successful provider handshake.
    pub fn connected(kind: WalletKind, address: Address, chain_id: u64, balance: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            address: Some(address),
            chain_id,
            balance,
            status: ConnectionStatus::Connected,
            source: ProviderSource::Real,
        }
    }

    /// Deterministic demo session derived from a seed: a valid address, a
    /// balance in [10, 15), chain id 1.
    pub fn simulated(kind: WalletKind, seed: u64) -> Self {
        let identity = SimulatedIdentity::derive(seed);
        Self {
            id: Uuid::new_v4(),
            kind,
            address: Some(identity.address),
            chain_id: 1,
            balance: identity.balance_string(),
            status: ConnectionStatus::Connected,
            source: ProviderSource::Simulated { seed },
        }
    }

    /// Session representing a failed connection attempt, with empty fields.
    pub fn failed(kind: WalletKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            address: None,
            chain_id: 0,
            balance: String::new(),
            status: ConnectionStatus::Error,
            source: ProviderSource::Real,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.source, ProviderSource::Simulated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_session_shape() {
        let session = WalletSession::simulated(WalletKind::Metamask, 42);
        assert_eq!(session.status, ConnectionStatus::Connected);
        assert_eq!(session.chain_id, 1);
        assert!(session.is_simulated());

        let rendered = session.address.unwrap().to_string();
        assert_eq!(rendered.len(), 42);
        assert!(rendered.starts_with("0x"));
        assert!(rendered[2..].chars().all(|c| c.is_ascii_hexdigit()));

        let balance: f64 = session.balance.parse().unwrap();
        assert!((10.0..15.0).contains(&balance));
    }

    #[test]
    fn test_simulated_sessions_share_identity_per_seed() {
        let a = WalletSession::simulated(WalletKind::Metamask, 7);
        let b = WalletSession::simulated(WalletKind::Coinbase, 7);
        assert_eq!(a.address, b.address);
        assert_eq!(a.balance, b.balance);
        // Session ids stay unique even for identical identities.
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_failed_session_has_empty_fields() {
        let session = WalletSession::failed(WalletKind::Binance);
        assert_eq!(session.status, ConnectionStatus::Error);
        assert!(session.address.is_none());
        assert!(session.balance.is_empty());
        assert!(!session.is_connected());
    }
}
