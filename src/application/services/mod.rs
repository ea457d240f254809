//! Business logic services for the application layer.

pub mod alias_validator;
pub mod link_service;
pub mod resolution_service;

pub use alias_validator::{AliasError, AliasValidator, ValidAlias};
pub use link_service::{CreateLink, LinkService, UpdateLink};
pub use resolution_service::{Resolution, ResolutionService, ResolutionSource};
