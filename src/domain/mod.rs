//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`route_oracle`] - Route lookup used to keep aliases out of the system namespace
//! - [`visit`] - Redirect visit event model
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; behavior lives in [`crate::application::services`].

pub mod entities;
pub mod repositories;
pub mod route_oracle;
pub mod visit;

/// Normalized short code representing the site root.
pub const ROOT_SENTINEL: &str = "@root";

/// Maximum length of a stored short code.
pub const MAX_CODE_LENGTH: usize = 15;
