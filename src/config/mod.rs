//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc to the relay and the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing is reloaded at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, RelayConfig, StaticFilesConfig, TimeoutConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
