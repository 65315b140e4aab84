//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, static files)
//!     → request.rs (request ID)
//!     → handlers.rs (decode body, call the relay)
//!     → response.rs (JSON / raw text / JSON error)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
