//! Metrics collection and exposition.
//!
//! # Metrics
//! - `broker_connect_total` (counter): connect attempts by wallet, outcome
//! - `broker_network_switch_total` (counter): switch attempts by outcome
//! - `broker_transactions_total` (counter): submissions by kind, outcome
//! - `broker_tx_confirmation_seconds` (histogram): confirmation latency
//!
//! # Design Decisions
//! - Low-overhead updates through the `metrics` facade
//! - The Prometheus exporter is installed by the binary only; library users
//!   plug in their own recorder or none at all

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::environment::WalletKind;

/// Install the Prometheus exporter on the given address.
///
/// Failure to bind is logged and ignored; the broker works without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

pub fn record_connect(wallet: WalletKind, outcome: &'static str) {
    counter!("broker_connect_total", "wallet" => wallet.as_str(), "outcome" => outcome)
        .increment(1);
}

pub fn record_network_switch(outcome: &'static str) {
    counter!("broker_network_switch_total", "outcome" => outcome).increment(1);
}

pub fn record_transaction(kind: &'static str, outcome: &'static str) {
    counter!("broker_transactions_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_confirmation_seconds(seconds: f64) {
    histogram!("broker_tx_confirmation_seconds").record(seconds);
}
