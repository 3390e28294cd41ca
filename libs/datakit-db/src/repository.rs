//! Entity-scoped repository
//!
//! A repository is bound to exactly one entity type for its lifetime.
//! Operations that need another shape rebind with
//! [`SqlRepository::with_changed_query_model`], which shares the underlying
//! session so a single transactional scope can touch several entity types.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryResult, Statement,
};

use crate::bulk::{BulkApplied, BulkInsert};
use crate::clause::{Assignments, Clause};
use crate::error::StoreError;
use crate::statement;

/// Typed CRUD facade over one entity type.
///
/// `exists` and `count` fail with [`StoreError::UnsupportedOperation`]
/// unless a backend implementation overrides them. Absence is a result,
/// not an error: `get_one` returns `None`, `get_all`/`delete` return empty
/// collections, and `update` on zero matching rows is a no-op.
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: EntityTrait,
{
    /// Inserts one record. Returns the stored row when the backend can
    /// return it, `None` otherwise. A conflicting write surfaces as
    /// [`StoreError::ConstraintViolation`].
    async fn add(&self, values: Assignments<E>) -> Result<Option<E::Model>, StoreError>;

    /// Inserts one record, treating a conflict as a silent no-op: the
    /// conflicting insert yields `Ok(None)` instead of an error.
    async fn add_or_ignore(&self, values: Assignments<E>) -> Result<Option<E::Model>, StoreError>;

    /// All rows matching the AND of `clauses`, in storage-defined order.
    async fn get_all(&self, clauses: &[Clause]) -> Result<Vec<E::Model>, StoreError>;

    /// First row matching the AND of `clauses`, or `None`.
    async fn get_one(&self, clauses: &[Clause]) -> Result<Option<E::Model>, StoreError>;

    /// Applies `values` to every matching row. Zero matches is a no-op.
    async fn update(&self, clauses: &[Clause], values: Assignments<E>) -> Result<(), StoreError>;

    /// Deletes every matching row and returns the pre-deletion snapshot.
    async fn delete(&self, clauses: &[Clause]) -> Result<Vec<E::Model>, StoreError>;

    async fn exists(&self, _clauses: &[Clause]) -> Result<bool, StoreError> {
        Err(StoreError::unsupported::<E>("exists"))
    }

    async fn count(&self, _clauses: &[Clause]) -> Result<u64, StoreError> {
        Err(StoreError::unsupported::<E>("count"))
    }
}

/// SeaORM-backed [`Repository`], generic over any session: a pooled
/// connection (auto-commit per call) or an open transaction.
pub struct SqlRepository<'c, C, E> {
    conn: &'c C,
    entity: PhantomData<fn() -> E>,
}

/// Binds a repository for `E` to the given session.
pub fn repository<E, C>(conn: &C) -> SqlRepository<'_, C, E>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    SqlRepository::new(conn)
}

impl<'c, C, E> SqlRepository<'c, C, E>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    pub fn new(conn: &'c C) -> Self {
        Self {
            conn,
            entity: PhantomData,
        }
    }

    /// Rebinds to another entity type on the same session. The returned
    /// repository participates in whatever transactional scope this one
    /// is running in.
    pub fn with_changed_query_model<T: EntityTrait>(&self) -> SqlRepository<'c, C, T> {
        SqlRepository {
            conn: self.conn,
            entity: PhantomData,
        }
    }

    /// Batch insert of pre-constructed entity instances, preserving input
    /// order and persisting explicitly set fields only. For other batching
    /// policies construct a [`BulkInsert`] directly.
    pub async fn add_many<A>(&self, entries: Vec<A>) -> Result<BulkApplied<E>, StoreError>
    where
        A: ActiveModelTrait<Entity = E> + Send,
    {
        BulkInsert::new(entries).execute(self.conn).await
    }

    async fn insert_one(
        &self,
        values: Assignments<E>,
        ignore_conflicts: bool,
    ) -> Result<Option<E::Model>, StoreError> {
        let backend = self.conn.get_database_backend();
        let returning = backend.support_returning();
        let (columns, row) = values.into_parts();
        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        let stmt = statement::insert::<E>(backend, &column_refs, &[row], ignore_conflicts, returning)?;
        if returning {
            match self.conn.query_one(stmt).await.map_err(StoreError::from)? {
                Some(row) => Ok(Some(model_from_row::<E>(&row)?)),
                None => Ok(None),
            }
        } else {
            self.conn.execute(stmt).await.map_err(StoreError::from)?;
            Ok(None)
        }
    }

    async fn fetch_all(&self, stmt: Statement) -> Result<Vec<E::Model>, StoreError> {
        let rows = self.conn.query_all(stmt).await.map_err(StoreError::from)?;
        rows.iter().map(model_from_row::<E>).collect()
    }
}

fn model_from_row<E: EntityTrait>(row: &QueryResult) -> Result<E::Model, StoreError> {
    E::Model::from_query_result(row, "").map_err(StoreError::from)
}

#[async_trait]
impl<'c, C, E> Repository<E> for SqlRepository<'c, C, E>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    async fn add(&self, values: Assignments<E>) -> Result<Option<E::Model>, StoreError> {
        self.insert_one(values, false).await
    }

    async fn add_or_ignore(&self, values: Assignments<E>) -> Result<Option<E::Model>, StoreError> {
        self.insert_one(values, true).await
    }

    async fn get_all(&self, clauses: &[Clause]) -> Result<Vec<E::Model>, StoreError> {
        let backend = self.conn.get_database_backend();
        self.fetch_all(statement::select::<E>(backend, clauses, None))
            .await
    }

    async fn get_one(&self, clauses: &[Clause]) -> Result<Option<E::Model>, StoreError> {
        let backend = self.conn.get_database_backend();
        let stmt = statement::select::<E>(backend, clauses, Some(1));
        match self.conn.query_one(stmt).await.map_err(StoreError::from)? {
            Some(row) => Ok(Some(model_from_row::<E>(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, clauses: &[Clause], values: Assignments<E>) -> Result<(), StoreError> {
        if values.is_empty() {
            return Ok(());
        }
        let backend = self.conn.get_database_backend();
        let (columns, set_values) = values.into_parts();
        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        let stmt = statement::update::<E>(backend, clauses, &column_refs, set_values);
        self.conn.execute(stmt).await.map_err(StoreError::from)?;
        Ok(())
    }

    async fn delete(&self, clauses: &[Clause]) -> Result<Vec<E::Model>, StoreError> {
        let backend = self.conn.get_database_backend();
        if backend.support_returning() {
            self.fetch_all(statement::delete::<E>(backend, clauses, true))
                .await
        } else {
            // Snapshot first so callers still get the deleted rows back.
            let snapshot = self.get_all(clauses).await?;
            let stmt = statement::delete::<E>(backend, clauses, false);
            self.conn.execute(stmt).await.map_err(StoreError::from)?;
            Ok(snapshot)
        }
    }

    async fn exists(&self, clauses: &[Clause]) -> Result<bool, StoreError> {
        let backend = self.conn.get_database_backend();
        let stmt = statement::exists::<E>(backend, clauses);
        match self.conn.query_one(stmt).await.map_err(StoreError::from)? {
            Some(row) => row
                .try_get::<bool>("", statement::EXISTS_COLUMN)
                .map_err(StoreError::from),
            None => Ok(false),
        }
    }

    async fn count(&self, clauses: &[Clause]) -> Result<u64, StoreError> {
        let backend = self.conn.get_database_backend();
        let stmt = statement::count::<E>(backend, clauses);
        match self.conn.query_one(stmt).await.map_err(StoreError::from)? {
            Some(row) => {
                let n = row
                    .try_get::<i64>("", statement::COUNT_COLUMN)
                    .map_err(StoreError::from)?;
                Ok(u64::try_from(n).unwrap_or(0))
            }
            None => Ok(0),
        }
    }
}
