//! Aetherion wallet connection & transaction broker.
//!
//! Mediates between an application and heterogeneous wallet providers:
//! capability detection, session negotiation with an explicit demo fallback,
//! network switching, intent-carrying transaction submission, and token sale
//! progress.

pub mod broker;
pub mod config;
pub mod environment;
pub mod network;
pub mod observability;
pub mod sale;
pub mod session;
pub mod tx;

pub use broker::{Broker, BrokerError};
pub use config::schema::BrokerConfig;
pub use environment::{RpcEnvironment, SimulatedEnvironment, WalletEnvironment, WalletKind};
pub use session::{ConnectionStatus, ProviderSource, WalletSession};
