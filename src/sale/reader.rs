//! Sale progress computation.
//!
//! Pure function over the sale state: no mutation, no I/O, no failure modes.
//! The total offering is a validated positive constant, so the progress
//! division cannot trap.

use serde::Serialize;

use crate::sale::state::{SaleState, SaleStatus};

/// Snapshot of the sale handed to UI collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct IcoDetails {
    pub symbol: String,
    pub token_price: f64,
    pub total_tokens: u64,
    pub tokens_sold: u64,
    pub remaining_tokens: u64,
    /// Completion percentage in [0, 100].
    pub progress: f64,
    pub raised_usd: f64,
    pub status: SaleStatus,
    pub start_time: u64,
    pub end_time: u64,
}

/// Compute the current sale snapshot.
pub fn ico_details(state: &SaleState) -> IcoDetails {
    let config = state.config();
    let sold = state.tokens_sold().min(config.total_tokens);
    let progress = sold as f64 * 100.0 / config.total_tokens as f64;

    IcoDetails {
        symbol: config.symbol.clone(),
        token_price: config.token_price,
        total_tokens: config.total_tokens,
        tokens_sold: sold,
        remaining_tokens: config.total_tokens - sold,
        progress,
        raised_usd: sold as f64 * config.token_price,
        status: state.status(),
        start_time: config.start_time,
        end_time: config.end_time,
    }
}
