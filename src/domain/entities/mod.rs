//! Core domain entities.
//!
//! - [`Link`] - a persistent short code mapping (source of truth)
//! - [`CacheEntry`] - an ephemeral cached copy of a link
//!
//! Creation and update payloads are separate structs: [`NewLink`] and [`LinkPatch`].

pub mod cache_entry;
pub mod link;

pub use cache_entry::CacheEntry;
pub use link::{Link, LinkPatch, NewLink};
