use crate::error::StoreError;

/// Name of the uniqueness constraint on `links.short_code`.
pub const SHORT_CODE_CONSTRAINT: &str = "links_short_code_key";

pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_CODE_CONSTRAINT))
}

/// Maps a write failure to [`StoreError::CodeTaken`] when it was caused by
/// the short code constraint.
pub fn map_write_error(e: sqlx::Error, code: &str) -> StoreError {
    if is_unique_violation_on_code(&e) {
        StoreError::CodeTaken(code.to_string())
    } else {
        StoreError::from(e)
    }
}
