//! Structured logging.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(log_level: &str) -> String {
    format!("xsxk_relay={level},tower_http={level}", level = log_level)
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
