use sqlx::error::ErrorKind;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Timed out after {0:?} waiting for the database connection")]
    ConnectTimeout(Duration),

    #[error("Database connection is not established")]
    NotConnected,

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(#[source] sqlx::Error),

    #[error("Uniqueness violation: {0}")]
    UniqueViolation(#[source] sqlx::Error),

    #[error("SQL execution error: {0}")]
    Execution(#[source] sqlx::Error),
}

/// The three classes of statement failure the console distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ForeignKey,
    Unique,
    Other,
}

impl FailureKind {
    pub fn from_error_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::ForeignKeyViolation => FailureKind::ForeignKey,
            ErrorKind::UniqueViolation => FailureKind::Unique,
            _ => FailureKind::Other,
        }
    }

    /// The short line printed to the console. Detail only goes to the log.
    pub fn console_message(&self) -> &'static str {
        match self {
            FailureKind::ForeignKey => {
                "Error: foreign key violation (related record is missing or still referenced)."
            }
            FailureKind::Unique => "Error: uniqueness violation (duplicate key).",
            FailureKind::Other => "SQL execution error: operation not performed.",
        }
    }

    /// The label the failure is logged under.
    pub fn log_label(&self) -> &'static str {
        match self {
            FailureKind::ForeignKey => "ForeignKeyViolation",
            FailureKind::Unique => "UniqueViolation",
            FailureKind::Other => "SQL execution error",
        }
    }
}

impl DbError {
    /// Sorts a driver error into one of the classified variants.
    pub fn classify(err: sqlx::Error) -> Self {
        let kind = err
            .as_database_error()
            .map(|db| FailureKind::from_error_kind(db.kind()))
            .unwrap_or(FailureKind::Other);

        match kind {
            FailureKind::ForeignKey => DbError::ForeignKeyViolation(err),
            FailureKind::Unique => DbError::UniqueViolation(err),
            FailureKind::Other => DbError::Execution(err),
        }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            DbError::ForeignKeyViolation(_) => FailureKind::ForeignKey,
            DbError::UniqueViolation(_) => FailureKind::Unique,
            _ => FailureKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_kinds_are_classified() {
        assert_eq!(
            FailureKind::from_error_kind(ErrorKind::ForeignKeyViolation),
            FailureKind::ForeignKey
        );
        assert_eq!(
            FailureKind::from_error_kind(ErrorKind::UniqueViolation),
            FailureKind::Unique
        );
    }

    #[test]
    fn everything_else_is_unclassified() {
        assert_eq!(
            FailureKind::from_error_kind(ErrorKind::NotNullViolation),
            FailureKind::Other
        );
        assert_eq!(
            FailureKind::from_error_kind(ErrorKind::CheckViolation),
            FailureKind::Other
        );
        assert_eq!(FailureKind::from_error_kind(ErrorKind::Other), FailureKind::Other);
    }

    #[test]
    fn non_database_errors_classify_as_execution() {
        let err = DbError::classify(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Execution(_)));
        assert_eq!(err.failure_kind(), FailureKind::Other);
    }

    #[test]
    fn console_messages_are_distinct() {
        let messages = [
            FailureKind::ForeignKey.console_message(),
            FailureKind::Unique.console_message(),
            FailureKind::Other.console_message(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert!(messages[0].contains("foreign key"));
    }
}
