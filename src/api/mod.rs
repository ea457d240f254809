//! HTTP layer translating requests into link operations.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request processing middleware
//!
//! Route composition lives in [`crate::routes`].

pub mod dto;
pub mod handlers;
pub mod middleware;
