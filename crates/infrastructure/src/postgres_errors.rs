use hoso_core::AppError;

use crate::RELATED_DATA_CONFLICT;

/// Statement category, which decides how a foreign-key violation is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementKind {
    Read,
    Write,
    Delete,
}

// SQLSTATE codes for rejected input: not-null, unique, check, invalid text
// representation, undefined column, datetime format, numeric range, string length.
const VALIDATION_CODES: &[&str] = &[
    "23502", "23505", "23514", "22P02", "42703", "22007", "22008", "22003", "22001",
];

const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn map_sqlx_error(error: sqlx::Error, kind: StatementKind, context: &str) -> AppError {
    match &error {
        sqlx::Error::Database(database_error) => {
            let code = database_error.code();
            match code.as_deref() {
                Some(FOREIGN_KEY_VIOLATION) if kind == StatementKind::Delete => {
                    AppError::Conflict(RELATED_DATA_CONFLICT.to_owned())
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    AppError::Validation(database_error.message().to_owned())
                }
                Some(code) if VALIDATION_CODES.contains(&code) => {
                    AppError::Validation(database_error.message().to_owned())
                }
                _ => AppError::Internal(format!("{context}: {error}")),
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => AppError::Transient(format!("{context}: {error}")),
        _ => AppError::Internal(format!("{context}: {error}")),
    }
}

#[cfg(test)]
mod tests {
    use hoso_core::AppError;

    use super::{StatementKind, map_sqlx_error};

    #[test]
    fn pool_timeout_is_transient() {
        let error = map_sqlx_error(sqlx::Error::PoolTimedOut, StatementKind::Read, "list bo_luat");
        assert!(error.is_transient());
    }

    #[test]
    fn missing_row_is_internal() {
        let error = map_sqlx_error(sqlx::Error::RowNotFound, StatementKind::Write, "insert");
        assert!(matches!(error, AppError::Internal(message) if message.starts_with("insert")));
    }
}
