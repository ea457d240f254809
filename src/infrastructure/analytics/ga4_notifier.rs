//! Google Analytics 4 Measurement Protocol notifier.

use std::time::Duration;

use reqwest::{Client, header};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::VisitNotifier;
use crate::domain::visit::Visit;

const COLLECT_ENDPOINT: &str = "https://www.google-analytics.com/mp/collect";

/// Credentials and limits for GA4 delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ga4Config {
    pub measurement_id: String,
    pub api_secret: String,
    /// Upper bound on one delivery, independent of the request lifetime.
    pub timeout: Duration,
    /// Overrides the collect endpoint (tests, regional endpoints).
    pub endpoint: Option<String>,
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    client_id: String,
    events: [Event<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Event<'a> {
    name: &'static str,
    params: PageView<'a>,
}

#[derive(Debug, Serialize)]
struct PageView<'a> {
    page_title: &'a str,
    page_location: &'a str,
}

/// Sends a `page_view` event per visit from a detached tokio task.
#[derive(Clone)]
pub struct Ga4Notifier {
    client: Client,
    config: Ga4Config,
}

impl Ga4Notifier {
    /// Creates a notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Ga4Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Builds the collect URL with IP and user agent overrides.
    fn collect_url(&self, visit: &Visit) -> Result<reqwest::Url, url::ParseError> {
        let endpoint = self.config.endpoint.as_deref().unwrap_or(COLLECT_ENDPOINT);
        let mut url = reqwest::Url::parse(endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("measurement_id", &self.config.measurement_id)
                .append_pair("api_secret", &self.config.api_secret);
            if let Some(ip) = &visit.context.client_ip {
                query.append_pair("ip_override", ip);
            }
            if let Some(ua) = &visit.context.user_agent {
                query.append_pair("ua", ua);
            }
        }
        Ok(url)
    }

    async fn send(self, visit: Visit) {
        let url = match self.collect_url(&visit) {
            Ok(url) => url,
            Err(e) => {
                debug!(error = %e, "GA4 endpoint is not a valid URL");
                return;
            }
        };

        let client_id = visit
            .context
            .ga_cookie
            .as_deref()
            .and_then(client_id_from_cookie)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let payload = Payload {
            client_id,
            events: [Event {
                name: "page_view",
                params: PageView {
                    page_title: &visit.destination,
                    page_location: &visit.context.short_url,
                },
            }],
        };

        let mut request = self.client.post(url).json(&payload);
        if let Some(ua) = &visit.context.user_agent {
            request = request.header(header::USER_AGENT, ua);
        }

        let timeout = self.config.timeout;
        match tokio::time::timeout(timeout, request.send()).await {
            Ok(Ok(response)) => {
                debug!(short_code = %visit.short_code, status = %response.status(), "GA4 event sent");
            }
            Ok(Err(e)) => debug!(short_code = %visit.short_code, error = %e, "GA4 delivery failed"),
            Err(_) => debug!(short_code = %visit.short_code, ?timeout, "GA4 delivery timed out"),
        }
    }
}

impl VisitNotifier for Ga4Notifier {
    fn notify(&self, visit: Visit) {
        let notifier = self.clone();
        tokio::spawn(notifier.send(visit));
    }
}

/// Extracts the client id from a `_ga` cookie value.
///
/// `GA1.1.123456.789012` yields `123456.789012`. Values that do not start
/// with `GA` are used as-is; malformed `GA` values yield `None`.
pub fn client_id_from_cookie(cookie: &str) -> Option<String> {
    let cookie = cookie.trim();
    if cookie.is_empty() {
        return None;
    }
    if !cookie.starts_with("GA") {
        return Some(cookie.to_string());
    }

    let parts: Vec<&str> = cookie.split('.').collect();
    if parts.len() > 2 {
        Some(parts[2..].join("."))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::visit::VisitContext;

    fn notifier(endpoint: Option<&str>) -> Ga4Notifier {
        Ga4Notifier::new(Ga4Config {
            measurement_id: "G-TEST".to_string(),
            api_secret: "s3cret".to_string(),
            timeout: Duration::from_millis(200),
            endpoint: endpoint.map(str::to_string),
        })
        .unwrap()
    }

    fn visit(ip: Option<&str>, ua: Option<&str>) -> Visit {
        Visit::new(
            "promo",
            "https://example.com",
            &VisitContext {
                short_url: "https://s.example.com/promo".to_string(),
                client_ip: ip.map(str::to_string),
                user_agent: ua.map(str::to_string),
                ga_cookie: None,
            },
        )
    }

    #[test]
    fn test_client_id_from_ga_cookie() {
        assert_eq!(
            client_id_from_cookie("GA1.1.123456.789012"),
            Some("123456.789012".to_string())
        );
    }

    #[test]
    fn test_client_id_passthrough() {
        assert_eq!(
            client_id_from_cookie("custom-id"),
            Some("custom-id".to_string())
        );
    }

    #[test]
    fn test_client_id_malformed() {
        assert_eq!(client_id_from_cookie("GA1.1"), None);
        assert_eq!(client_id_from_cookie("  "), None);
    }

    #[test]
    fn test_collect_url_includes_overrides() {
        let url = notifier(None)
            .collect_url(&visit(Some("203.0.113.5"), Some("Mozilla/5.0 (X11)")))
            .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(url.as_str().starts_with(COLLECT_ENDPOINT));
        assert!(pairs.contains(&("measurement_id".into(), "G-TEST".into())));
        assert!(pairs.contains(&("api_secret".into(), "s3cret".into())));
        assert!(pairs.contains(&("ip_override".into(), "203.0.113.5".into())));
        assert!(pairs.contains(&("ua".into(), "Mozilla/5.0 (X11)".into())));
    }

    #[test]
    fn test_collect_url_without_client_metadata() {
        let url = notifier(None).collect_url(&visit(None, None)).unwrap();
        assert!(!url.as_str().contains("ip_override"));
        assert!(!url.as_str().contains("ua="));
    }

    #[tokio::test]
    async fn test_notify_returns_immediately_on_unreachable_endpoint() {
        let notifier = notifier(Some("http://127.0.0.1:9/mp/collect"));
        let started = std::time::Instant::now();

        notifier.notify(visit(None, None));

        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
