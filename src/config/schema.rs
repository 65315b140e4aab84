//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::relay::kcptdm::DEFAULT_MAX_DEPTH;
use crate::relay::paths::DEFAULT_XKLX;

/// Root configuration for the course-selection relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Upstream course-registration service.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Static landing page and assets.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Maximum inbound request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Upstream service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme and authority of the upstream, without a trailing slash.
    pub base_url: String,

    /// Course-selection category used when the caller sends none.
    pub default_xklx: String,

    /// User-Agent sent when the caller did not supply one.
    pub default_user_agent: String,

    /// Accept-Language sent when the caller did not supply one.
    pub default_accept_language: String,

    /// Deepest nesting level visited while looking for `kcptdm`, at most 127.
    pub max_search_depth: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://bkjx.nenu.edu.cn".to_string(),
            default_xklx: DEFAULT_XKLX.to_string(),
            default_user_agent: "Mozilla/5.0".to_string(),
            default_accept_language: "zh-CN,zh;q=0.8".to_string(),
            max_search_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl UpstreamConfig {
    /// Base URL with any trailing slash removed.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Budget for one `/api/*` call in seconds. 0 disables it.
    pub request_secs: u64,

    /// Upstream round-trip timeout in seconds. 0 leaves the transport default.
    pub upstream_secs: u64,

    /// Upstream connect timeout in seconds. 0 leaves the transport default.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 0,
            upstream_secs: 0,
            connect_secs: 0,
        }
    }
}

/// Static file serving.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Mount `/` and `/static`.
    pub enabled: bool,

    /// Directory holding `index.html` and the front-end assets.
    pub dir: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: "static".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
