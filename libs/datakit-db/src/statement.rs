//! Statement building with shape-keyed SQL caching
//!
//! Every repository operation funnels through here. Statements are rendered
//! with `sea_query` and executed as raw [`Statement`]s; the rendered SQL
//! text is memoized in a process-wide cache keyed by the statement's shape
//! (backend, kind, table, column list, clause shapes, row count). On a cache
//! hit only the bind values are rebuilt. Placeholder order is part of the
//! contract: SET values precede WHERE values, LIMIT binds last.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use sea_orm::sea_query::{
    Alias, Asterisk, Expr, Func, MysqlQueryBuilder, OnConflict, PostgresQueryBuilder, Query,
    QueryStatementWriter, SimpleExpr, SqliteQueryBuilder,
};
use sea_orm::{DbBackend, EntityTrait, Statement, Value};
use xxhash_rust::xxh3::Xxh3;

use crate::clause::Clause;
use crate::error::StoreError;

const KIND_SELECT: u8 = 0;
const KIND_COUNT: u8 = 1;
const KIND_EXISTS: u8 = 2;
const KIND_UPDATE: u8 = 3;
const KIND_DELETE: u8 = 4;
const KIND_INSERT: u8 = 5;

/// Column label used by [`count`] statements.
pub(crate) const COUNT_COLUMN: &str = "num_items";
/// Column label used by [`exists`] statements.
pub(crate) const EXISTS_COLUMN: &str = "has_any";

static STATEMENTS: LazyLock<StatementCache> = LazyLock::new(StatementCache::new);

/// Memoizes rendered SQL text by statement shape.
pub(crate) struct StatementCache {
    shapes: RwLock<HashMap<u64, Arc<str>>>,
}

impl StatementCache {
    pub(crate) fn new() -> Self {
        Self {
            shapes: RwLock::new(HashMap::new()),
        }
    }

    fn sql_for(&self, key: u64, build: impl FnOnce() -> String) -> Arc<str> {
        if let Some(sql) = self.shapes.read().get(&key) {
            return Arc::clone(sql);
        }
        let sql: Arc<str> = Arc::from(build());
        Arc::clone(self.shapes.write().entry(key).or_insert(sql))
    }

    fn try_sql_for(
        &self,
        key: u64,
        build: impl FnOnce() -> Result<String, StoreError>,
    ) -> Result<Arc<str>, StoreError> {
        if let Some(sql) = self.shapes.read().get(&key) {
            return Ok(Arc::clone(sql));
        }
        let sql: Arc<str> = Arc::from(build()?);
        Ok(Arc::clone(self.shapes.write().entry(key).or_insert(sql)))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.shapes.read().len()
    }
}

struct ShapeKey(Xxh3);

impl ShapeKey {
    fn new(kind: u8, backend: DbBackend, table: &str) -> Self {
        let mut hasher = Xxh3::new();
        hasher.update(&[kind, backend_tag(backend)]);
        hasher.update(table.as_bytes());
        Self(hasher)
    }

    fn flag(&mut self, on: bool) {
        self.0.update(&[u8::from(on)]);
    }

    fn num(&mut self, n: u64) {
        self.0.update(&n.to_le_bytes());
    }

    fn columns(&mut self, columns: &[&str]) {
        for column in columns {
            self.0.update(column.as_bytes());
            self.0.update(&[0]);
        }
    }

    fn clauses(&mut self, clauses: &[Clause]) {
        for clause in clauses {
            let (tag, arity) = clause.shape();
            self.0.update(clause.column().as_bytes());
            self.0.update(&[0, tag]);
            self.0.update(&(arity as u64).to_le_bytes());
        }
    }

    fn finish(self) -> u64 {
        self.0.digest()
    }
}

fn backend_tag(backend: DbBackend) -> u8 {
    match backend {
        DbBackend::MySql => 0,
        DbBackend::Postgres => 1,
        DbBackend::Sqlite => 2,
    }
}

fn render<S: QueryStatementWriter>(backend: DbBackend, stmt: &S) -> String {
    match backend {
        DbBackend::MySql => stmt.build(MysqlQueryBuilder).0,
        DbBackend::Postgres => stmt.build(PostgresQueryBuilder).0,
        DbBackend::Sqlite => stmt.build(SqliteQueryBuilder).0,
    }
}

fn clause_values(clauses: &[Clause]) -> Vec<Value> {
    clauses.iter().flat_map(|clause| clause.bind_values()).collect()
}

pub(crate) fn select<E: EntityTrait>(
    backend: DbBackend,
    clauses: &[Clause],
    limit: Option<u64>,
) -> Statement {
    let entity = E::default();
    let table = entity.table_name();

    let mut key = ShapeKey::new(KIND_SELECT, backend, table);
    key.clauses(clauses);
    key.flag(limit.is_some());
    let sql = STATEMENTS.sql_for(key.finish(), || {
        let mut stmt = Query::select();
        stmt.column(Asterisk).from(Alias::new(table));
        for clause in clauses {
            stmt.and_where(clause.to_expr());
        }
        if limit.is_some() {
            stmt.limit(0);
        }
        render(backend, &stmt)
    });

    let mut values = clause_values(clauses);
    if let Some(n) = limit {
        values.push(n.into());
    }
    Statement::from_sql_and_values(backend, sql.as_ref(), values)
}

pub(crate) fn count<E: EntityTrait>(backend: DbBackend, clauses: &[Clause]) -> Statement {
    let entity = E::default();
    let table = entity.table_name();

    let mut key = ShapeKey::new(KIND_COUNT, backend, table);
    key.clauses(clauses);
    let sql = STATEMENTS.sql_for(key.finish(), || {
        let mut stmt = Query::select();
        stmt.expr_as(Func::count(Expr::col(Asterisk)), Alias::new(COUNT_COLUMN))
            .from(Alias::new(table));
        for clause in clauses {
            stmt.and_where(clause.to_expr());
        }
        render(backend, &stmt)
    });

    Statement::from_sql_and_values(backend, sql.as_ref(), clause_values(clauses))
}

pub(crate) fn exists<E: EntityTrait>(backend: DbBackend, clauses: &[Clause]) -> Statement {
    let entity = E::default();
    let table = entity.table_name();

    let mut key = ShapeKey::new(KIND_EXISTS, backend, table);
    key.clauses(clauses);
    let sql = STATEMENTS.sql_for(key.finish(), || {
        let mut inner = Query::select();
        inner.column(Asterisk).from(Alias::new(table));
        for clause in clauses {
            inner.and_where(clause.to_expr());
        }
        let mut stmt = Query::select();
        stmt.expr_as(Expr::exists(inner), Alias::new(EXISTS_COLUMN));
        render(backend, &stmt)
    });

    Statement::from_sql_and_values(backend, sql.as_ref(), clause_values(clauses))
}

pub(crate) fn update<E: EntityTrait>(
    backend: DbBackend,
    clauses: &[Clause],
    columns: &[&str],
    set_values: Vec<Value>,
) -> Statement {
    let entity = E::default();
    let table = entity.table_name();

    let mut key = ShapeKey::new(KIND_UPDATE, backend, table);
    key.columns(columns);
    key.clauses(clauses);
    let sql = STATEMENTS.sql_for(key.finish(), || {
        let mut stmt = Query::update();
        stmt.table(Alias::new(table));
        for (column, value) in columns.iter().zip(set_values.iter()) {
            stmt.value(Alias::new(*column), value.clone());
        }
        for clause in clauses {
            stmt.and_where(clause.to_expr());
        }
        render(backend, &stmt)
    });

    let mut values = set_values;
    values.extend(clause_values(clauses));
    Statement::from_sql_and_values(backend, sql.as_ref(), values)
}

pub(crate) fn delete<E: EntityTrait>(
    backend: DbBackend,
    clauses: &[Clause],
    returning: bool,
) -> Statement {
    let entity = E::default();
    let table = entity.table_name();

    let mut key = ShapeKey::new(KIND_DELETE, backend, table);
    key.clauses(clauses);
    key.flag(returning);
    let sql = STATEMENTS.sql_for(key.finish(), || {
        let mut stmt = Query::delete();
        stmt.from_table(Alias::new(table));
        for clause in clauses {
            stmt.and_where(clause.to_expr());
        }
        if returning {
            stmt.returning_all();
        }
        render(backend, &stmt)
    });

    Statement::from_sql_and_values(backend, sql.as_ref(), clause_values(clauses))
}

/// Multi-row INSERT. An empty column set inserts server-side defaults only.
pub(crate) fn insert<E: EntityTrait>(
    backend: DbBackend,
    columns: &[&str],
    rows: &[Vec<Value>],
    ignore_conflicts: bool,
    returning: bool,
) -> Result<Statement, StoreError> {
    let entity = E::default();
    let table = entity.table_name();

    let mut key = ShapeKey::new(KIND_INSERT, backend, table);
    key.columns(columns);
    key.num(rows.len() as u64);
    key.flag(ignore_conflicts);
    key.flag(returning);
    let sql = STATEMENTS.try_sql_for(key.finish(), || {
        let mut stmt = Query::insert();
        stmt.into_table(Alias::new(table));
        if columns.is_empty() {
            stmt.or_default_values();
        } else {
            stmt.columns(columns.iter().map(|column| Alias::new(*column)));
            for row in rows {
                stmt.values(row.iter().cloned().map(SimpleExpr::from))
                    .map_err(|err| StoreError::Statement(err.to_string()))?;
            }
        }
        if ignore_conflicts {
            stmt.on_conflict(OnConflict::new().do_nothing().to_owned());
        }
        if returning {
            stmt.returning_all();
        }
        Ok(render(backend, &stmt))
    })?;

    let values: Vec<Value> = if columns.is_empty() {
        Vec::new()
    } else {
        rows.iter().flatten().cloned().collect()
    };
    Ok(Statement::from_sql_and_values(
        backend,
        sql.as_ref(),
        values,
    ))
}
