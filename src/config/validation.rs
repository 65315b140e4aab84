//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate upstream URL shape and socket addresses
//! - Validate value ranges (body size > 0, search depth within the parser limit)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::RelayConfig;
use crate::relay::kcptdm::MAX_SEARCH_DEPTH;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
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

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::new("listener.max_body_size", "must be > 0"));
    }

    match url::Url::parse(config.upstream.base()) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::new(
                    "upstream.base_url",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            if url.path() != "/" || url.query().is_some() {
                errors.push(ValidationError::new(
                    "upstream.base_url",
                    "must not carry a path or query",
                ));
            }
        }
        Err(e) => {
            errors.push(ValidationError::new(
                "upstream.base_url",
                format!("invalid URL '{}': {}", config.upstream.base_url, e),
            ));
        }
    }

    if config.upstream.default_xklx.trim().is_empty() {
        errors.push(ValidationError::new("upstream.default_xklx", "must not be empty"));
    }

    let depth = config.upstream.max_search_depth;
    if depth == 0 || depth > MAX_SEARCH_DEPTH {
        errors.push(ValidationError::new(
            "upstream.max_search_depth",
            format!("must be between 1 and {}", MAX_SEARCH_DEPTH),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
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
