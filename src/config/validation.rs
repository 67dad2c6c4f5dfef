//! Configuration validation.
//!
//! Serde handles the syntactic half; this module runs the semantic
//! checks and returns every violation, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("chain.rpc_url '{0}' is not a valid URL")]
    InvalidRpcUrl(String),

    #[error("chain.chain_id must be non-zero")]
    ZeroChainId,

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("timeouts.request_secs ({request}) must exceed chain.confirmation_timeout_secs ({confirmation})")]
    RequestTimeoutTooShort { request: u64, confirmation: u64 },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.chain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::InvalidRpcUrl(config.chain.rpc_url.clone()));
    }

    if config.chain.chain_id == 0 {
        errors.push(ValidationError::ZeroChainId);
    }

    for (name, value) in [
        ("chain.rpc_timeout_secs", config.chain.rpc_timeout_secs),
        (
            "chain.confirmation_timeout_secs",
            config.chain.confirmation_timeout_secs,
        ),
        (
            "chain.receipt_poll_interval_ms",
            config.chain.receipt_poll_interval_ms,
        ),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroDuration(name));
        }
    }

    if config.timeouts.request_secs <= config.chain.confirmation_timeout_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.timeouts.request_secs,
            confirmation: config.chain.confirmation_timeout_secs,
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
