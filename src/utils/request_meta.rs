//! Request metadata extraction for redirect handlers.

use axum::http::{HeaderMap, header};

/// Returns the `Host` header value, if present and valid UTF-8.
pub fn host_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::HOST).and_then(|v| v.to_str().ok())
}

/// Returns the client IP, preferring the first `X-Forwarded-For` hop.
pub fn client_ip(headers: &HeaderMap, peer: Option<String>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or(peer)
}

/// Returns the value of cookie `name` from the `Cookie` header.
pub fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Builds the public URL of a short link.
///
/// `base_url` takes precedence; otherwise `scheme://host` is derived from
/// the request.
pub fn short_url(base_url: Option<&str>, headers: &HeaderMap, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if let Some(base) = base_url {
        return format!("{}/{}", base.trim_end_matches('/'), path);
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = host_from_headers(headers).unwrap_or("localhost");
    format!("{}://{}/{}", scheme, host, path)
}
