//! Error taxonomy for the data-access layer
//!
//! "Not found" is never an error here: reads return `Option`/empty
//! collections and callers check for absence. Everything below is a real
//! failure that callers may want to branch on.

use sea_orm::{DbErr, EntityTrait, SqlErr};
use thiserror::Error;

/// Failures surfaced by repositories, unit-of-work scopes and the bulk proxy.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique/foreign-key/check constraint rejected a write.
    #[error("constraint violation: {message}")]
    ConstraintViolation {
        /// Constraint message reported by the backend
        message: String,
        #[source]
        source: DbErr,
    },

    /// The session or transport to the backing store failed.
    #[error("connection failure")]
    ConnectionFailure(#[source] DbErr),

    /// A commit was rejected because of concurrent modification.
    #[error("transaction conflict")]
    TransactionConflict(#[source] DbErr),

    /// The repository does not implement this operation for its backend.
    #[error("`{entity}` repository does not support `{operation}`")]
    UnsupportedOperation {
        /// Table name of the bound entity
        entity: String,
        /// Operation that was invoked
        operation: &'static str,
    },

    /// A statement could not be built from the given inputs.
    #[error("failed to build statement: {0}")]
    Statement(String),

    /// Any other mapper error, surfaced verbatim.
    #[error(transparent)]
    Backend(DbErr),
}

impl StoreError {
    pub(crate) fn unsupported<E: EntityTrait>(operation: &'static str) -> Self {
        let entity = E::default();
        Self::UnsupportedOperation {
            entity: entity.table_name().to_owned(),
            operation,
        }
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(
                SqlErr::UniqueConstraintViolation(message)
                | SqlErr::ForeignKeyConstraintViolation(message),
            ) => Self::ConstraintViolation {
                message,
                source: err,
            },
            _ => match &err {
                DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::ConnectionFailure(err),
                _ => Self::Backend(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn connection_errors_classify_as_connection_failure() {
        let err = StoreError::from(DbErr::Conn(RuntimeErr::Internal("refused".to_owned())));
        assert!(matches!(err, StoreError::ConnectionFailure(_)));
    }

    #[test]
    fn other_errors_pass_through_as_backend() {
        let err = StoreError::from(DbErr::Custom("boom".to_owned()));
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
