//! Database error types
//!
//! Maps SQLx errors onto the cases the adapters care about. Constraint
//! violations keep the name of the violated constraint so adapters can tell
//! a taken policy number from a duplicate open policy.

use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {message}")]
    DuplicateEntry {
        constraint: Option<String>,
        message: String,
    },

    /// Foreign key constraint violation
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation {
        constraint: Option<String>,
        message: String,
    },

    /// Check constraint violation
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        constraint: Option<String>,
        message: String,
    },

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Customer", "CUS-123");
    /// assert!(error.to_string().contains("Customer"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Name of the violated constraint, for constraint errors
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DatabaseError::DuplicateEntry { constraint, .. }
            | DatabaseError::ForeignKeyViolation { constraint, .. }
            | DatabaseError::ConstraintViolation { constraint, .. } => constraint.as_deref(),
            _ => None,
        }
    }

    /// Checks if this error is a unique violation of the named constraint
    pub fn is_unique_violation_of(&self, name: &str) -> bool {
        matches!(self, DatabaseError::DuplicateEntry { .. }) && self.constraint() == Some(name)
    }

    /// Checks if this error is a foreign key violation of the named constraint
    pub fn is_foreign_key_violation_of(&self, name: &str) -> bool {
        matches!(self, DatabaseError::ForeignKeyViolation { .. }) && self.constraint() == Some(name)
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
/// based on the PostgreSQL error code.
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(str::to_string);
                let message = db_err.message().to_string();
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry { constraint, message },
                    Some("23503") => DatabaseError::ForeignKeyViolation { constraint, message },
                    Some("23514") => DatabaseError::ConstraintViolation { constraint, message },
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[test]
    fn test_pool_timeout_is_pool_exhausted() {
        let err = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DatabaseError::PoolExhausted));
    }

    #[test]
    fn test_constraint_name_is_kept() {
        let err = DatabaseError::DuplicateEntry {
            constraint: Some("customers_email_key".to_string()),
            message: "duplicate key value violates unique constraint".to_string(),
        };
        assert_eq!(err.constraint(), Some("customers_email_key"));
        assert!(err.is_unique_violation_of("customers_email_key"));
        assert!(!err.is_unique_violation_of("customers_phone_key"));
        assert!(!err.is_foreign_key_violation_of("customers_email_key"));
    }

    #[test]
    fn test_foreign_key_violation_by_name() {
        let err = DatabaseError::ForeignKeyViolation {
            constraint: Some("beneficiaries_plan_id_fkey".to_string()),
            message: "insert or update on table \"beneficiaries\" violates foreign key constraint".to_string(),
        };
        assert!(err.is_foreign_key_violation_of("beneficiaries_plan_id_fkey"));
        assert!(!err.is_unique_violation_of("beneficiaries_plan_id_fkey"));
    }
}
