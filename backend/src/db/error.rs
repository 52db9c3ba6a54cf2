//! Store error classification
//!
//! Resolvers never inspect SQLite result codes directly. Every repository call
//! returns [StoreError], which tells constraint failures apart from anything
//! else the driver reports.

/// Failure reported by a repository call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced row does not exist (e.g. comment on a missing link).
    #[error("foreign key constraint failed")]
    ForeignKeyViolation,

    /// A unique constraint rejected the write (duplicate email, duplicate vote).
    #[error("unique constraint failed")]
    UniqueViolation,

    /// Any other driver or connection failure.
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKeyViolation;
            }
            if db_err.is_unique_violation() {
                return Self::UniqueViolation;
            }
        }
        Self::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
