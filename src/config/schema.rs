//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the broker.
//! All types derive Serde traits for deserialization from config files.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::environment::WalletKind;
use crate::tx::PayloadCodec;

/// Root configuration for the wallet broker.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BrokerConfig {
    /// Wallet environment settings (bridge endpoint, injected kinds).
    pub environment: EnvironmentConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Demo fallback settings.
    pub demo: DemoConfig,

    /// Token sale parameters.
    pub sale: SaleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// How the broker reaches wallet providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// JSON-RPC bridge to real providers.
    Rpc,
    /// Deterministic in-memory providers.
    Simulated,
}

/// Wallet environment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Provider selection mode.
    pub mode: EnvironmentMode,

    /// Wallet bridge JSON-RPC endpoint.
    pub bridge_url: String,

    /// Wallet kinds the bridge advertises as injected. One bridge may
    /// advertise several kinds at once.
    pub injected: Vec<WalletKind>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            mode: EnvironmentMode::Rpc,
            bridge_url: "http://localhost:8545".to_string(),
            injected: Vec::new(),
        }
    }
}

/// Timeout configuration for provider operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-request provider RPC timeout in seconds.
    pub rpc_secs: u64,

    /// Total time to wait for a transaction confirmation in seconds.
    pub confirmation_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            rpc_secs: 10,
            confirmation_secs: 60,
            poll_interval_ms: 2000,
        }
    }
}

/// Demo fallback configuration.
///
/// With `fallback` enabled, a failed provider handshake yields a
/// deterministic simulated session instead of an error, so flows stay
/// exercisable end to end without a real wallet. Sessions built this way are
/// marked `ProviderSource::Simulated` and are never silently upgraded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Enable the simulated-identity fallback.
    pub fallback: bool,

    /// Seed for deterministic identity derivation.
    pub seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fallback: true,
            seed: 42,
        }
    }
}

/// Token sale parameters (the Singularity sale).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SaleConfig {
    /// Sale token symbol.
    pub symbol: String,

    /// Token price in USD.
    pub token_price: f64,

    /// Total tokens offered.
    pub total_tokens: u64,

    /// Tokens already sold when the broker starts.
    pub initial_tokens_sold: u64,

    /// Soft cap in USD; the sale fails if the window closes below it.
    pub soft_cap_usd: f64,

    /// Hard cap in USD; the sale completes once raised funds reach it.
    pub hard_cap_usd: f64,

    /// Sale window start, seconds since epoch.
    pub start_time: u64,

    /// Sale window end, seconds since epoch.
    pub end_time: u64,

    /// Sale treasury address. Purchases are sent to self when unset.
    pub treasury: Option<Address>,

    /// Fixed USD price of the native currency used to size purchase
    /// transactions. Placeholder for a price oracle.
    pub native_usd_price: f64,

    /// Payload strategy for intent-carrying transactions.
    pub payload_codec: PayloadCodec,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            symbol: "SING".to_string(),
            token_price: 0.000646,
            total_tokens: 1_000_000_000,
            initial_tokens_sold: 126_000_000,
            soft_cap_usd: 250_000.0,
            hard_cap_usd: 646_000.0,
            // 2025-01-01 .. 2027-01-01
            start_time: 1_735_689_600,
            end_time: 1_798_761_600,
            treasury: None,
            native_usd_price: 3_000.0,
            payload_codec: PayloadCodec::Marker,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
