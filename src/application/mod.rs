//! Application layer services implementing the link lifecycle.
//!
//! Services consume repository and cache abstractions and expose the
//! operations HTTP handlers and the admin CLI call into.
//!
//! # Available Services
//!
//! - [`services::resolution_service::ResolutionService`] - Short code to destination, cache-aside
//! - [`services::link_service::LinkService`] - Create, rename and delete with cache invalidation
//! - [`services::alias_validator::AliasValidator`] - Reserved namespace and uniqueness checks

pub mod services;
