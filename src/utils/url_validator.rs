//! Destination URL validation.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Enter a valid URL.")]
    InvalidFormat,

    #[error("Only HTTP and HTTPS URLs are allowed.")]
    UnsupportedProtocol,

    #[error("URL must include a host.")]
    MissingHost,
}

/// Checks that `input` is an absolute HTTP(S) URL and returns it trimmed.
///
/// The destination is stored as given: the redirect must send clients to
/// exactly what the operator entered.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for malformed or relative URLs,
/// [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes such as
/// `javascript:` or `data:`, and [`UrlValidationError::MissingHost`] if the URL
/// has no host.
pub fn validate_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|_| UrlValidationError::InvalidFormat)?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
