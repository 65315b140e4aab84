//! Outbound header construction.
//!
//! The upstream only answers requests that look like they came from its own
//! course-selection page, so every call carries the same browser-like header
//! set. The session cookie is forwarded verbatim and never inspected.

use axum::http::{header, HeaderMap};

use crate::config::UpstreamConfig;

const ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const ACCEPT_ENCODING: &str = "gzip, deflate, br, zstd";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Inbound request headers that are mirrored to the upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientHints {
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
}

impl ClientHints {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            user_agent: get(header::USER_AGENT),
            accept_language: get(header::ACCEPT_LANGUAGE),
        }
    }
}

/// Ordered outbound header set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamHeaders(Vec<(&'static str, String)>);

impl UpstreamHeaders {
    fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.push((name, value.into()));
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the header set for one upstream call.
///
/// `xklx` is inserted into the Referer unescaped.
pub fn build_headers(
    hints: &ClientHints,
    cookie: Option<&str>,
    xklx: &str,
    upstream: &UpstreamConfig,
) -> UpstreamHeaders {
    let base = upstream.base();
    let mut headers = UpstreamHeaders::default();

    headers.push(
        "User-Agent",
        hints
            .user_agent
            .as_deref()
            .unwrap_or(upstream.default_user_agent.as_str()),
    );
    headers.push("Accept", ACCEPT);
    headers.push(
        "Accept-Language",
        hints
            .accept_language
            .as_deref()
            .unwrap_or(upstream.default_accept_language.as_str()),
    );
    headers.push("Accept-Encoding", ACCEPT_ENCODING);
    headers.push("Content-Type", FORM_CONTENT_TYPE);
    headers.push("X-Requested-With", "XMLHttpRequest");
    headers.push("Origin", base);
    headers.push("Referer", format!("{}/xsxk.html?xklxdm={}", base, xklx));
    headers.push("Connection", "keep-alive");

    if let Some(cookie) = cookie.filter(|c| !c.is_empty()) {
        headers.push("Cookie", cookie);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_defaults_when_client_sends_nothing() {
        let upstream = UpstreamConfig::default();
        let headers = build_headers(&ClientHints::default(), None, "07", &upstream);

        assert_eq!(headers.get("user-agent"), Some("Mozilla/5.0"));
        assert_eq!(headers.get("Accept-Language"), Some("zh-CN,zh;q=0.8"));
        assert_eq!(headers.get("Origin"), Some("https://bkjx.nenu.edu.cn"));
        assert_eq!(
            headers.get("Referer"),
            Some("https://bkjx.nenu.edu.cn/xsxk.html?xklxdm=07")
        );
        assert_eq!(headers.get("X-Requested-With"), Some("XMLHttpRequest"));
        assert!(headers.get("Cookie").is_none());
        assert_eq!(headers.len(), 9);
    }

    #[test]
    fn test_cookie_forwarded_verbatim() {
        let upstream = UpstreamConfig::default();
        let cookie = "JSESSIONID=abc; route=x=y";
        let headers = build_headers(&ClientHints::default(), Some(cookie), "09", &upstream);

        assert_eq!(headers.get("Cookie"), Some(cookie));
        assert_eq!(
            headers.get("Referer"),
            Some("https://bkjx.nenu.edu.cn/xsxk.html?xklxdm=09")
        );
    }

    #[test]
    fn test_client_hints_mirrored() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::USER_AGENT, HeaderValue::from_static("Firefox/130"));
        inbound.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let hints = ClientHints::from_headers(&inbound);
        let headers = build_headers(&hints, Some("c=1"), "07", &UpstreamConfig::default());

        assert_eq!(headers.get("User-Agent"), Some("Firefox/130"));
        assert_eq!(headers.get("Accept-Language"), Some("en-US"));
    }

    #[test]
    fn test_category_not_escaped() {
        let headers = build_headers(
            &ClientHints::default(),
            None,
            "a&b",
            &UpstreamConfig::default(),
        );
        assert_eq!(
            headers.get("Referer"),
            Some("https://bkjx.nenu.edu.cn/xsxk.html?xklxdm=a&b")
        );
    }
}
