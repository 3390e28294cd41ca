//! Transactional scope coordination
//!
//! [`UnitOfWork::pipeline`] is the scoped-acquisition construct: the scope
//! commits on normal exit and rolls back on any error exit, propagating the
//! error. Dropping the in-flight future (cancellation) releases the
//! transaction un-committed, which the mapper rolls back. Repositories used
//! outside any scope auto-commit per call.

use std::sync::Arc;

use futures::future::BoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Coordinates one transactional scope at a time over a session.
///
/// The session is exclusively owned by the repository/unit-of-work pairing
/// for the scope's duration; it is not safe to interleave writes on it from
/// concurrent logical flows.
pub struct UnitOfWork {
    conn: Arc<DatabaseConnection>,
}

impl UnitOfWork {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Runs `op` inside a fresh transaction. Commit on `Ok`, rollback and
    /// propagate on `Err`. The error type only needs a conversion from
    /// [`StoreError`], so domain errors flow through the scope unchanged.
    pub async fn pipeline<F, T, E>(&self, op: F) -> Result<T, E>
    where
        F: for<'t> FnOnce(&'t DatabaseTransaction) -> BoxFuture<'t, Result<T, E>> + Send,
        T: Send,
        E: From<StoreError> + Send,
    {
        run_scope(self.conn.as_ref(), op).await
    }

    /// Runs `op` in a nested scope under an already-open transaction, using
    /// the backend's savepoint support. Nesting never happens implicitly;
    /// this is the only way to stack scopes.
    pub async fn nested<F, T, E>(txn: &DatabaseTransaction, op: F) -> Result<T, E>
    where
        F: for<'t> FnOnce(&'t DatabaseTransaction) -> BoxFuture<'t, Result<T, E>> + Send,
        T: Send,
        E: From<StoreError> + Send,
    {
        run_scope(txn, op).await
    }
}

async fn run_scope<C, F, T, E>(conn: &C, op: F) -> Result<T, E>
where
    C: TransactionTrait,
    F: for<'t> FnOnce(&'t DatabaseTransaction) -> BoxFuture<'t, Result<T, E>> + Send,
    T: Send,
    E: From<StoreError> + Send,
{
    let txn = conn
        .begin()
        .await
        .map_err(|err| E::from(StoreError::from(err)))?;
    debug!("transaction scope opened");
    match op(&txn).await {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|err| E::from(commit_failure(err)))?;
            debug!("transaction scope committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed after scope error");
            } else {
                debug!("transaction scope rolled back");
            }
            Err(err)
        }
    }
}

/// Commit-time failures that are neither connection nor constraint problems
/// are concurrent-modification conflicts.
fn commit_failure(err: DbErr) -> StoreError {
    match StoreError::from(err) {
        StoreError::Backend(inner) => StoreError::TransactionConflict(inner),
        other => other,
    }
}
