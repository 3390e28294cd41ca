//! Contract error types for the order service
//!
//! These errors are transport-agnostic; handlers surface them directly.

use datakit_db::StoreError;

/// Order service domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Order, user or product not found
    NotFound {
        /// Resource type (order, user, product)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// A write collided with existing data
    Conflict {
        /// Conflict reason
        reason: String,
    },
    /// Request rejected before touching storage
    Validation {
        /// Validation error message
        message: String,
    },
    /// Repository operation not implemented for this backend
    Unsupported {
        /// Operation name
        operation: String,
    },
    /// Storage-level failure
    Storage {
        /// Failure description
        message: String,
    },
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            Self::Conflict { reason } => {
                write!(f, "Conflict: {}", reason)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::Unsupported { operation } => {
                write!(f, "Unsupported operation: {}", operation)
            }
            Self::Storage { message } => {
                write!(f, "Storage failure: {}", message)
            }
        }
    }
}

impl std::error::Error for OrderError {}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation { message, .. } => Self::Conflict { reason: message },
            StoreError::UnsupportedOperation { entity, operation } => Self::Unsupported {
                operation: format!("{}.{}", entity, operation),
            },
            StoreError::ConnectionFailure(_)
            | StoreError::TransactionConflict(_)
            | StoreError::Statement(_)
            | StoreError::Backend(_) => Self::Storage {
                message: err.to_string(),
            },
        }
    }
}
