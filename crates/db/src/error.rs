//! Error types for the bookshelf-db crate.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish or acquire a database connection.
    #[error("database connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// A module migration failed to apply.
    #[error("migration {module}/{id} failed: {source}")]
    MigrationFailed {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },

    /// A query failed to execute.
    #[error("query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),
}

impl DbError {
    /// Check if this error indicates a connection problem.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, DbError::ConnectionFailed(_))
    }

    /// Check if this error is a unique-constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::QueryFailed(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DbError::ConnectionFailed(err)
            }
            other => DbError::QueryFailed(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_connection_errors() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_connection_error());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn row_not_found_is_a_query_error() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(!err.is_connection_error());
        assert!(err.to_string().starts_with("query failed: "));
    }
}
