//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validator`] - Destination URL validation
//! - [`request_meta`] - Host, client IP and cookie extraction
//! - [`db_error`] - Database constraint classification

pub mod code_generator;
pub mod db_error;
pub mod request_meta;
pub mod url_validator;
