//! Route-conflict oracle consumed by alias validation.

/// Name of the route that dispatches short codes to their destinations.
pub const REDIRECT_ROUTE: &str = "redirect";

/// Reports which named route, if any, a request path resolves to.
///
/// Aliases are checked against this so that a short code never shadows a
/// system route, including routes added after the reserved word list.
#[cfg_attr(test, mockall::automock)]
pub trait RouteOracle: Send + Sync {
    /// Returns the name of the route matching `path`, or `None`.
    fn resolve(&self, path: &str) -> Option<String>;
}
