//! Upstream endpoint paths.

use std::fmt;

/// Category used when the caller sends none.
pub const DEFAULT_XKLX: &str = "07";

/// The four upstream endpoints the relay talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Selection round configuration.
    Config,
    /// Course group search (first step of `search`).
    Hzkc,
    /// Seat-level detail for one course group (second step of `search`).
    Kxkc,
    /// Registration.
    Add,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Config => "config",
            Endpoint::Hzkc => "hzkc",
            Endpoint::Kxkc => "kxkc",
            Endpoint::Add => "add",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the upstream path for a category and endpoint.
///
/// An absent or empty category falls back to [`DEFAULT_XKLX`].
pub fn path_for(xklx: Option<&str>, endpoint: Endpoint) -> String {
    let xklx = match xklx {
        Some(x) if !x.is_empty() => x,
        _ => DEFAULT_XKLX,
    };
    format!("/new/student/xsxk/xklx/{}/{}", xklx, endpoint)
}
