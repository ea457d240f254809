//! Fire-and-forget visit notification.
//!
//! A [`VisitNotifier`] is told about every successful redirect. `notify`
//! returns immediately; delivery happens on a detached task and its outcome
//! never reaches the request.
//!
//! - [`Ga4Notifier`] - Google Analytics 4 Measurement Protocol
//! - [`NullNotifier`] - Used when analytics is not configured

mod ga4_notifier;
mod null_notifier;

pub use ga4_notifier::{Ga4Config, Ga4Notifier, client_id_from_cookie};
pub use null_notifier::NullNotifier;

use crate::domain::visit::Visit;

/// Receives visits from the resolution path.
#[cfg_attr(test, mockall::automock)]
pub trait VisitNotifier: Send + Sync {
    /// Hands off a visit for delivery. Must not block or fail.
    fn notify(&self, visit: Visit);
}
