//! Transaction subsystem.
//!
//! # Data Flow
//! ```text
//! purchase / transfer request
//!     → intent.rs (TransactionIntent, payload encoding)
//!     → submitter.rs (eth_sendTransaction, receipt polling)
//!     → PurchaseOutcome / TransferOutcome
//! ```
//!
//! # Design Decisions
//! - Intent travels in transaction data; the codec (marker text or ABI) is
//!   a deployment choice, not a code path fork
//! - Confirmation is awaited before an outcome is reported
//! - No automatic retry: submission is not idempotent

pub mod intent;
pub mod submitter;
pub mod types;

pub use intent::{PayloadCodec, TransactionIntent};
pub use submitter::TxSubmitter;
pub use types::{ForwardOutcome, PurchaseOutcome, TransferOutcome, TxError};
