//! Client address resolution.
//!
//! Proxy headers are consulted in a fixed order and the first non-empty
//! value wins, used verbatim. A multi-valued `X-Forwarded-For` is not split.
//! The socket peer address is the last resort, then the `UNKNOWN` sentinel.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Returned when neither headers nor the connection reveal an address.
pub const UNKNOWN_CLIENT: &str = "UNKNOWN";

/// Headers consulted, in precedence order.
pub const CLIENT_IP_HEADERS: [&str; 5] = [
    "client-ip",
    "x-forwarded-for",
    "x-forwarded",
    "forwarded-for",
    "forwarded",
];

/// Resolve the originating address of a request.
pub fn resolve_client_ip(headers: &HeaderMap, remote_addr: Option<SocketAddr>) -> String {
    for name in CLIENT_IP_HEADERS {
        if let Some(value) = header_str(headers, name) {
            return value.to_string();
        }
    }

    match remote_addr {
        Some(addr) => addr.ip().to_canonical().to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Extractor yielding the resolved client address.
///
/// ```ignore
/// async fn handler(ClientIp(ip): ClientIp) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let remote = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(ClientIp(resolve_client_ip(&parts.headers, remote)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn test_client_ip_beats_forwarded_for() {
        let h = headers(&[("client-ip", "1.2.3.4"), ("x-forwarded-for", "5.6.7.8")]);
        assert_eq!(resolve_client_ip(&h, None), "1.2.3.4");
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let mut h = HeaderMap::new();
        let name = axum::http::HeaderName::from_bytes(b"X-Forwarded-For").unwrap();
        h.insert(name, HeaderValue::from_static("5.6.7.8"));
        assert_eq!(resolve_client_ip(&h, None), "5.6.7.8");
    }

    #[test]
    fn test_precedence_order() {
        let h = headers(&[("forwarded", "5.5.5.5"), ("x-forwarded", "3.3.3.3"), ("forwarded-for", "4.4.4.4")]);
        assert_eq!(resolve_client_ip(&h, None), "3.3.3.3");

        let h = headers(&[("forwarded", "5.5.5.5"), ("forwarded-for", "4.4.4.4")]);
        assert_eq!(resolve_client_ip(&h, None), "4.4.4.4");

        let h = headers(&[("forwarded", "5.5.5.5")]);
        assert_eq!(resolve_client_ip(&h, None), "5.5.5.5");
    }

    #[test]
    fn test_empty_header_is_skipped() {
        let h = headers(&[("client-ip", ""), ("x-forwarded-for", "5.6.7.8")]);
        assert_eq!(resolve_client_ip(&h, None), "5.6.7.8");
    }

    #[test]
    fn test_forwarded_list_used_verbatim() {
        let h = headers(&[("x-forwarded-for", "1.1.1.1, 10.0.0.1")]);
        assert_eq!(resolve_client_ip(&h, None), "1.1.1.1, 10.0.0.1");
    }

    #[test]
    fn test_falls_back_to_remote_addr() {
        let addr: SocketAddr = "192.30.252.7:5555".parse().unwrap();
        assert_eq!(resolve_client_ip(&HeaderMap::new(), Some(addr)), "192.30.252.7");

        let v6: SocketAddr = "[::1]:5555".parse().unwrap();
        assert_eq!(resolve_client_ip(&HeaderMap::new(), Some(v6)), "::1");
    }

    #[test]
    fn test_mapped_ipv4_is_canonicalized() {
        let addr: SocketAddr = "[::ffff:127.0.0.1]:5555".parse().unwrap();
        assert_eq!(resolve_client_ip(&HeaderMap::new(), Some(addr)), "127.0.0.1");
    }

    #[test]
    fn test_unknown_without_any_source() {
        assert_eq!(resolve_client_ip(&HeaderMap::new(), None), UNKNOWN_CLIENT);
    }
}
