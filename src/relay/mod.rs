//! Upstream relay subsystem.
//!
//! # Data Flow
//! ```text
//! /api/* handler (RelayRequest + caller headers)
//!     → service.rs (validate cookie, pick category)
//!     → headers.rs + paths.rs (browser-like headers, endpoint path)
//!     → form.rs (payload → form body)
//!     → transport.rs (one POST to the upstream)
//!     → reply.rs (JSON or raw text)
//!
//! search:
//!     hzkc → kcptdm.rs (find correlation key) → kxkc
//! ```

pub mod error;
pub mod form;
pub mod headers;
pub mod kcptdm;
pub mod paths;
pub mod reply;
pub mod service;
pub mod transport;

pub use error::RelayError;
pub use form::Payload;
pub use headers::{build_headers, ClientHints, UpstreamHeaders};
pub use kcptdm::find_kcptdm;
pub use paths::{path_for, Endpoint};
pub use reply::UpstreamReply;
pub use service::{Relay, RelayRequest};
pub use transport::{HttpTransport, UpstreamRequest, UpstreamResponse, UpstreamTransport};
