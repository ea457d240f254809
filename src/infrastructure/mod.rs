//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`analytics`] - Visit notification (GA4 and no-op)
//! - [`cache`] - Cache backends and the best-effort redirect cache
//! - [`persistence`] - PostgreSQL and in-memory link repositories

pub mod analytics;
pub mod cache;
pub mod persistence;
