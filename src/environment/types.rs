//! Wallet environment types and error definitions.

use std::fmt;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// EIP-1193 error code for a request the user rejected.
pub const CODE_USER_REJECTED: i64 = 4001;

/// EIP-1193 error code for a chain the provider does not recognize.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

/// Wallet families the broker can negotiate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletKind {
    Metamask,
    Coinbase,
    Binance,
    #[serde(rename = "walletconnect")]
    WalletConnect,
    /// Deep-link-only wallets with no injected provider object.
    Other,
}

impl WalletKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletKind::Metamask => "metamask",
            WalletKind::Coinbase => "coinbase",
            WalletKind::Binance => "binance",
            WalletKind::WalletConnect => "walletconnect",
            WalletKind::Other => "other",
        }
    }

    /// Kinds that announce themselves through an injected provider object.
    ///
    /// WalletConnect-class and deep-link wallets are reachable without one.
    pub fn requires_injection(&self) -> bool {
        matches!(
            self,
            WalletKind::Metamask | WalletKind::Coinbase | WalletKind::Binance
        )
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WalletKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "metamask" => Ok(WalletKind::Metamask),
            "coinbase" => Ok(WalletKind::Coinbase),
            "binance" => Ok(WalletKind::Binance),
            "walletconnect" | "wallet_connect" => Ok(WalletKind::WalletConnect),
            "other" => Ok(WalletKind::Other),
            other => Err(format!("unknown wallet kind '{}'", other)),
        }
    }
}

/// Errors that can occur while talking to a wallet provider.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// Transport-level failure reaching the provider.
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider call exceeded the configured deadline.
    #[error("provider request timed out after {0} seconds")]
    Timeout(u64),

    /// JSON-RPC error returned by the provider.
    #[error("provider rejected request (code {code}): {message}")]
    Rpc { code: i64, message: String },

    /// No provider matching the requested wallet kind is available.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl EnvironmentError {
    /// The provider error code, when the provider returned one.
    pub fn error_code(&self) -> Option<i64> {
        match self {
            EnvironmentError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.error_code() == Some(CODE_USER_REJECTED)
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.error_code() == Some(CODE_UNRECOGNIZED_CHAIN)
    }
}

/// Parse a chain id from a provider response (hex string, decimal string, or number).
pub fn parse_chain_id(value: &Value) -> Result<u64, EnvironmentError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let raw = value.as_str().ok_or_else(|| {
        EnvironmentError::Transport("chain id must be a string or number".to_string())
    })?;
    if raw.starts_with("0x") || raw.starts_with("0X") {
        u64::from_str_radix(raw.trim_start_matches("0x").trim_start_matches("0X"), 16)
            .map_err(|e| EnvironmentError::Transport(format!("invalid hex chain id: {}", e)))
    } else {
        raw.parse()
            .map_err(|e| EnvironmentError::Transport(format!("invalid chain id: {}", e)))
    }
}

/// Parse a `0x`-prefixed hex quantity (balances, block numbers) into a U256.
pub fn parse_hex_quantity(value: &Value) -> Result<U256, EnvironmentError> {
    let raw = value
        .as_str()
        .ok_or_else(|| EnvironmentError::Transport("quantity must be a hex string".to_string()))?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    U256::from_str_radix(digits, 16)
        .map_err(|e| EnvironmentError::Transport(format!("invalid hex quantity '{}': {}", raw, e)))
}

/// Render a U256 as a `0x`-prefixed hex quantity.
pub fn to_hex_quantity(value: U256) -> String {
    format!("{:#x}", value)
}

const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;
const WEI_PER_TENTH_MILLI: u128 = 100_000_000_000_000;

/// Format a wei balance as a decimal native-currency string with four
/// fractional digits (truncated, not rounded).
pub fn format_ether(wei: U256) -> String {
    let unit = U256::from(WEI_PER_ETH);
    let whole = wei / unit;
    let frac = (wei % unit) / U256::from(WEI_PER_TENTH_MILLI);
    format!("{}.{:04}", whole, frac.to::<u64>())
}
