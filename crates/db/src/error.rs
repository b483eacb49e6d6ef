//! Translation of sqlx failures into [`CoreError`].
//!
//! Every repository call made by the engines passes through [`classify`]
//! exactly once, so the transport never sees a raw driver error.

use stockroom_core::error::CoreError;

/// PostgreSQL SQLSTATE codes the ledger distinguishes.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NOT_NULL_VIOLATION: &str = "23502";
const CHECK_VIOLATION: &str = "23514";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Map a sqlx error onto the four caller-visible kinds.
///
/// - unique violations become `Conflict` naming the constraint;
/// - foreign key, not-null and malformed-literal failures become `Validation`;
/// - check violations (e.g. `quantity >= 0`) become `Conflict`;
/// - `RowNotFound` becomes `NotFound`;
/// - anything else is `Internal` and logged with the driver detail.
pub fn classify(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::RowNotFound => CoreError::not_found("Record", "requested row"),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                )),
                Some(FOREIGN_KEY_VIOLATION) => CoreError::Validation(format!(
                    "Referenced record does not exist: {constraint}"
                )),
                Some(NOT_NULL_VIOLATION) => {
                    CoreError::Validation("A required value is missing".to_string())
                }
                Some(INVALID_TEXT_REPRESENTATION) => {
                    CoreError::Validation("Malformed value".to_string())
                }
                Some(CHECK_VIOLATION) => CoreError::Conflict(format!(
                    "Value violates check constraint: {constraint}"
                )),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    CoreError::Internal(db_err.to_string())
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            CoreError::Internal(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn row_not_found_is_not_found() {
        assert_matches!(classify(sqlx::Error::RowNotFound), CoreError::NotFound { .. });
    }

    #[test]
    fn pool_failures_are_internal() {
        assert_matches!(classify(sqlx::Error::PoolTimedOut), CoreError::Internal(_));
        assert_matches!(classify(sqlx::Error::PoolClosed), CoreError::Internal(_));
    }
}
