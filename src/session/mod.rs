//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! connect request (wallet kind)
//!     → negotiator.rs (kind verification, provider handshake)
//!         ├── success        → WalletSession { source: Real }
//!         ├── demo fallback  → WalletSession { source: Simulated }
//!         └── otherwise      → WalletSession { status: Error }
//! ```
//!
//! A session is `Connected` only when address and chain id were both
//! retrieved from a provider or synthesized by the demo identity generator.

pub mod negotiator;
pub mod types;

pub use negotiator::Negotiator;
pub use types::{ConnectionStatus, ProviderSource, WalletSession};
