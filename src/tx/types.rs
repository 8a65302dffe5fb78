//! Transaction types and error definitions.

use alloy::primitives::B256;
use serde::Serialize;
use thiserror::Error;

use crate::environment::EnvironmentError;

/// Errors that can occur while submitting a transaction.
#[derive(Debug, Error)]
pub enum TxError {
    /// The session is not in the `Connected` state.
    #[error("session is not connected")]
    NotConnected,

    /// An amount string could not be parsed or was not positive.
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    /// A marker payload could not be encoded or decoded.
    #[error("malformed marker payload: {0}")]
    Payload(String),

    /// The provider or network layer failed.
    #[error("provider error: {0}")]
    Environment(#[from] EnvironmentError),

    /// The transaction was not confirmed within the configured window.
    #[error("transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// The transaction was mined but reverted.
    #[error("transaction reverted: {0}")]
    Reverted(String),
}

/// Result of a confirmed transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    pub tx_hash: B256,
    /// Block the transaction landed in; zero for simulated sessions.
    pub block_number: u64,
}

/// Outcome of the optional follow-on transfer after a purchase.
///
/// A failed forward does not roll back the purchase; the error rides along
/// in the purchase outcome instead.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardOutcome {
    Completed(TransferOutcome),
    Failed { error: String },
}

/// Result of a confirmed token purchase.
#[derive(Debug, Serialize)]
pub struct PurchaseOutcome {
    pub tx_hash: B256,
    /// Block the transaction landed in; zero for simulated sessions.
    pub block_number: u64,
    /// Purchased token amount, two decimal places.
    pub token_amount: String,
    pub usd_amount: String,
    pub symbol: String,
    /// Present when a forward transfer was requested.
    pub forward: Option<ForwardOutcome>,
}
