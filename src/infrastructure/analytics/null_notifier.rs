use super::VisitNotifier;
use crate::domain::visit::Visit;

/// Notifier that drops every visit.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl VisitNotifier for NullNotifier {
    fn notify(&self, _visit: Visit) {}
}
