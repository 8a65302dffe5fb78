//! Wallet environment subsystem.
//!
//! # Data Flow
//! ```text
//! Broker operation
//!     → WalletEnvironment::request (uniform RPC surface)
//!         → rpc.rs (JSON-RPC bridge, per-call timeout)
//!         → simulated.rs (deterministic in-memory provider)
//!     → detect.rs (capability query, no side effects)
//! ```
//!
//! # Design Decisions
//! - The environment is an injected dependency, never ambient global state
//! - Every provider call runs under an explicit deadline
//! - The simulated environment answers the same RPC surface as a real one,
//!   so demo mode and tests exercise production code paths

use std::future::Future;

use serde_json::Value;

pub mod detect;
pub mod rpc;
pub mod simulated;
pub mod types;

pub use detect::available_wallets;
pub use rpc::RpcEnvironment;
pub use simulated::{SimulatedEnvironment, SimulatedIdentity};
pub use types::{EnvironmentError, WalletKind, CODE_UNRECOGNIZED_CHAIN, CODE_USER_REJECTED};

/// A host environment holding zero or more wallet providers.
///
/// Implementations expose a capability query (which wallet families are
/// injected) and a uniform request surface for the provider RPC methods the
/// broker consumes: `eth_requestAccounts`, `eth_chainId`, `eth_getBalance`,
/// `eth_sendTransaction`, `eth_getTransactionReceipt`,
/// `wallet_switchEthereumChain`, `wallet_addEthereumChain`,
/// `wallet_requestPermissions`, `wallet_disconnect`.
pub trait WalletEnvironment: Send + Sync {
    /// Wallet kinds currently advertised by injected provider objects.
    fn injected_wallets(&self) -> Vec<WalletKind>;

    /// Issue a raw provider RPC request.
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, EnvironmentError>> + Send;
}
