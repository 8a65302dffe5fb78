//! Sale lifecycle state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

pub use crate::config::schema::SaleConfig;

/// Phase of the token sale.
///
/// Transitions are monotone: `Upcoming → Active → (Completed | Failed)`.
/// Completion by cap can only move forward because `tokens_sold` never
/// decreases; completion by time is fixed once the window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Upcoming,
    Active,
    Completed,
    Failed,
}

/// Static sale configuration plus the mutable sold counter.
#[derive(Debug)]
pub struct SaleState {
    config: SaleConfig,
    tokens_sold: AtomicU64,
}

impl SaleState {
    pub fn new(config: SaleConfig) -> Self {
        let initial = config.initial_tokens_sold.min(config.total_tokens);
        Self {
            tokens_sold: AtomicU64::new(initial),
            config,
        }
    }

    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    pub fn tokens_sold(&self) -> u64 {
        self.tokens_sold.load(Ordering::SeqCst)
    }

    /// Record a purchase, saturating at the total offering.
    ///
    /// Returns the counter value after the purchase.
    pub fn record_purchase(&self, tokens: u64) -> u64 {
        let total = self.config.total_tokens;
        let mut current = self.tokens_sold.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(tokens).min(total);
            match self.tokens_sold.compare_exchange(
                current,
                next,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return next,
                Err(observed) => current = observed,
            }
        }
    }

    /// Funds raised so far in USD.
    pub fn raised_usd(&self) -> f64 {
        self.tokens_sold() as f64 * self.config.token_price
    }

    /// Sale status at the given unix time.
    pub fn status_at(&self, now: u64) -> SaleStatus {
        if self.tokens_sold() >= self.config.total_tokens
            || self.raised_usd() >= self.config.hard_cap_usd
        {
            return SaleStatus::Completed;
        }
        if now < self.config.start_time {
            return SaleStatus::Upcoming;
        }
        if now <= self.config.end_time {
            return SaleStatus::Active;
        }
        if self.raised_usd() >= self.config.soft_cap_usd {
            SaleStatus::Completed
        } else {
            SaleStatus::Failed
        }
    }

    pub fn status(&self) -> SaleStatus {
        self.status_at(unix_now())
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
