//! Course-selection relay library.
//!
//! Relays simplified JSON requests from a browser front end to the
//! university course-registration service, and folds its two-step course
//! lookup into one call.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
