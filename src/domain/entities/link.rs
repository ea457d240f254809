//! Link entity representing a short code to destination mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored short link.
///
/// `id` and `created_at` are assigned by the store and never change.
/// `short_code` is unique among live links and may be renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        short_code: String,
        original_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            original_url,
            created_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
}

/// Field changes applied to a link as one atomic unit.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub original_url: Option<String>,
    pub short_code: Option<String>,
}

impl LinkPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.original_url.is_none() && self.short_code.is_none()
    }

    /// Applies the patch to a link in place.
    pub fn apply_to(&self, link: &mut Link) {
        if let Some(url) = &self.original_url {
            link.original_url = url.clone();
        }
        if let Some(code) = &self.short_code {
            link.short_code = code.clone();
        }
    }
}
