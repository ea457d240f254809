//! Error types shared across layers.
//!
//! - [`StoreError`] - failures reported by a [`crate::domain::repositories::LinkRepository`]
//! - [`LinkError`] - outcomes of link services, including user-facing validation errors
//! - [`AppError`] - HTTP boundary error rendered as a JSON body

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors raised by link storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The `short_code` uniqueness constraint rejected the write.
    #[error("short code '{0}' is already in use")]
    CodeTaken(String),

    #[error("link not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Database(other.to_string()),
        }
    }
}

/// A single user-facing validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Outcome of a link operation that did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// One or more inputs were rejected. Never empty.
    #[error("{}", join_messages(.0))]
    Validation(Vec<FieldError>),

    #[error("short link not found")]
    NotFound,

    #[error(transparent)]
    Store(StoreError),
}

impl LinkError {
    /// Returns the validation messages, or an empty slice for other variants.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<StoreError> for LinkError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    Unavailable { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Unavailable { message, details } => {
                ("service_unavailable", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };
        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<LinkError> for AppError {
    fn from(e: LinkError) -> Self {
        match e {
            LinkError::Validation(errors) => {
                AppError::bad_request(join_messages(&errors), json!({ "errors": errors }))
            }
            LinkError::NotFound => AppError::not_found("Short link not found", json!({})),
            LinkError::Store(StoreError::CodeTaken(code)) => AppError::conflict(
                "Unique constraint violation",
                json!({ "short_code": code }),
            ),
            LinkError::Store(e) => {
                tracing::error!(error = %e, "Link store failure");
                AppError::internal("Database error", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors: Vec<FieldError> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                let field: &'static str = match field.as_ref() {
                    "url" => "url",
                    "alias" => "alias",
                    "page" => "page",
                    "page_size" => "page_size",
                    _ => "request",
                };
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for '{}'", field));
                    FieldError::new(field, message)
                })
            })
            .collect();

        AppError::bad_request(join_messages(&errors), json!({ "errors": errors }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = LinkError::Validation(vec![
            FieldError::new("url", "Enter a valid URL."),
            FieldError::new("alias", "Alias 'login' is reserved and cannot be used."),
        ]);

        assert_eq!(
            err.to_string(),
            "Enter a valid URL.; Alias 'login' is reserved and cannot be used."
        );

        let app: AppError = err.into();
        let info = app.to_error_info();
        assert_eq!(info.code, "validation_error");
        assert_eq!(info.details["errors"].as_array().unwrap().len(), 2);
        assert_eq!(info.details["errors"][1]["field"], "alias");
    }

    #[test]
    fn test_store_not_found_maps_to_link_not_found() {
        let err: LinkError = StoreError::NotFound.into();
        assert!(matches!(err, LinkError::NotFound));

        let app: AppError = err.into();
        assert!(matches!(app, AppError::NotFound { .. }));
    }

    #[test]
    fn test_database_error_is_internal() {
        let err: LinkError = StoreError::Database("connection reset".into()).into();
        let app: AppError = err.into();
        assert_eq!(app.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
