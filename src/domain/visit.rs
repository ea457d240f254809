//! Visit event emitted after a successful resolution.

/// Request metadata describing one redirect, handed to a
/// [`crate::infrastructure::analytics::VisitNotifier`].
///
/// All client metadata is optional so missing headers are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitContext {
    /// Full public URL of the short link that was requested.
    pub short_url: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    /// Raw value of the `_ga` cookie, if the client sent one.
    pub ga_cookie: Option<String>,
}

/// A resolved visit, ready to be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub short_code: String,
    pub destination: String,
    pub context: VisitContext,
}

impl Visit {
    pub fn new(short_code: &str, destination: &str, context: &VisitContext) -> Self {
        Self {
            short_code: short_code.to_string(),
            destination: destination.to_string(),
            context: context.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_copies_context() {
        let ctx = VisitContext {
            short_url: "https://s.example.com/promo".to_string(),
            client_ip: Some("192.168.1.1".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            ga_cookie: None,
        };

        let visit = Visit::new("promo", "https://example.com", &ctx);

        assert_eq!(visit.short_code, "promo");
        assert_eq!(visit.destination, "https://example.com");
        assert_eq!(visit.context, ctx);
    }
}
