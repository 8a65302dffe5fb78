//! Configuration validation.
//!
//! Semantic checks on top of what serde already enforces syntactically. The
//! validator is a pure function and reports every violation it finds, not
//! just the first, so a bad config file can be fixed in one pass.

use std::fmt;

use crate::config::schema::BrokerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic violation in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, returning all violations.
pub fn validate_config(config: &BrokerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.environment.bridge_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new(
            "environment.bridge_url",
            format!("not a valid URL: '{}'", config.environment.bridge_url),
        ));
    }

    if config.timeouts.rpc_secs == 0 {
        errors.push(ValidationError::new("timeouts.rpc_secs", "must be positive"));
    }
    if config.timeouts.confirmation_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.confirmation_secs",
            "must be positive",
        ));
    }
    if config.timeouts.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "timeouts.poll_interval_ms",
            "must be positive",
        ));
    }

    let sale = &config.sale;
    if !(sale.token_price.is_finite() && sale.token_price > 0.0) {
        errors.push(ValidationError::new(
            "sale.token_price",
            "must be a positive number",
        ));
    }
    if !(sale.native_usd_price.is_finite() && sale.native_usd_price > 0.0) {
        errors.push(ValidationError::new(
            "sale.native_usd_price",
            "must be a positive number",
        ));
    }
    if sale.total_tokens == 0 {
        errors.push(ValidationError::new("sale.total_tokens", "must be positive"));
    }
    if sale.initial_tokens_sold > sale.total_tokens {
        errors.push(ValidationError::new(
            "sale.initial_tokens_sold",
            "cannot exceed total_tokens",
        ));
    }
    if sale.soft_cap_usd > sale.hard_cap_usd {
        errors.push(ValidationError::new(
            "sale.soft_cap_usd",
            "cannot exceed hard_cap_usd",
        ));
    }
    if sale.start_time >= sale.end_time {
        errors.push(ValidationError::new(
            "sale.start_time",
            "sale window must start before it ends",
        ));
    }
    if sale.symbol.trim().is_empty() {
        errors.push(ValidationError::new("sale.symbol", "must not be empty"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "unknown level '{}' (expected one of {:?})",
                config.observability.log_level, LOG_LEVELS
            ),
        ));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "not a valid socket address: '{}'",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
