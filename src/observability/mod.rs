//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the relay produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through handler log events
//! - Session cookies are never logged
//! - Metrics are cheap and recorded whether or not an exporter is installed

pub mod logging;
pub mod metrics;
