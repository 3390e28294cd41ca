//! Typed predicates and value assignments
//!
//! A [`Clause`] is one predicate over one column of the bound entity;
//! repository operations AND together every clause they are given.
//! [`Assignments`] carries the column/value pairs for `add` and `update`.
//! Both are constructed from the entity's `Column` enum, so a field that
//! does not belong to the bound entity cannot be named.

use std::marker::PhantomData;

use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone)]
enum Predicate {
    Binary(BinaryOp, Value),
    Like(String),
    IsNull,
    IsNotNull,
    In(Vec<Value>),
}

/// A single predicate over a column of the bound entity.
#[derive(Debug, Clone)]
pub struct Clause {
    column: String,
    predicate: Predicate,
}

impl Clause {
    pub fn eq<C, V>(column: C, value: V) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        Self::binary(column, BinaryOp::Eq, value)
    }

    pub fn ne<C, V>(column: C, value: V) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        Self::binary(column, BinaryOp::Ne, value)
    }

    pub fn gt<C, V>(column: C, value: V) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        Self::binary(column, BinaryOp::Gt, value)
    }

    pub fn gte<C, V>(column: C, value: V) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        Self::binary(column, BinaryOp::Gte, value)
    }

    pub fn lt<C, V>(column: C, value: V) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        Self::binary(column, BinaryOp::Lt, value)
    }

    pub fn lte<C, V>(column: C, value: V) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        Self::binary(column, BinaryOp::Lte, value)
    }

    pub fn like<C: ColumnTrait>(column: C, pattern: impl Into<String>) -> Self {
        Self {
            column: column.as_str().to_owned(),
            predicate: Predicate::Like(pattern.into()),
        }
    }

    pub fn is_null<C: ColumnTrait>(column: C) -> Self {
        Self {
            column: column.as_str().to_owned(),
            predicate: Predicate::IsNull,
        }
    }

    pub fn is_not_null<C: ColumnTrait>(column: C) -> Self {
        Self {
            column: column.as_str().to_owned(),
            predicate: Predicate::IsNotNull,
        }
    }

    pub fn is_in<C, V, I>(column: C, values: I) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Self {
            column: column.as_str().to_owned(),
            predicate: Predicate::In(values.into_iter().map(Into::into).collect()),
        }
    }

    fn binary<C, V>(column: C, op: BinaryOp, value: V) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        Self {
            column: column.as_str().to_owned(),
            predicate: Predicate::Binary(op, value.into()),
        }
    }

    pub(crate) fn column(&self) -> &str {
        &self.column
    }

    /// Structural signature of this clause: everything that shapes the
    /// rendered SQL, but not the bound values. The `IN` arity is part of
    /// the shape because it changes the placeholder count.
    pub(crate) fn shape(&self) -> (u8, usize) {
        match &self.predicate {
            Predicate::Binary(op, _) => (*op as u8, 1),
            Predicate::Like(_) => (6, 1),
            Predicate::IsNull => (7, 0),
            Predicate::IsNotNull => (8, 0),
            Predicate::In(values) => (9, values.len()),
        }
    }

    /// Bound values in placeholder order.
    pub(crate) fn bind_values(&self) -> Vec<Value> {
        match &self.predicate {
            Predicate::Binary(_, value) => vec![value.clone()],
            Predicate::Like(pattern) => vec![Value::from(pattern.clone())],
            Predicate::IsNull | Predicate::IsNotNull => Vec::new(),
            Predicate::In(values) => values.clone(),
        }
    }

    pub(crate) fn to_expr(&self) -> SimpleExpr {
        let col = Expr::col(Alias::new(self.column.as_str()));
        match &self.predicate {
            Predicate::Binary(BinaryOp::Eq, value) => col.eq(value.clone()),
            Predicate::Binary(BinaryOp::Ne, value) => col.ne(value.clone()),
            Predicate::Binary(BinaryOp::Gt, value) => col.gt(value.clone()),
            Predicate::Binary(BinaryOp::Gte, value) => col.gte(value.clone()),
            Predicate::Binary(BinaryOp::Lt, value) => col.lt(value.clone()),
            Predicate::Binary(BinaryOp::Lte, value) => col.lte(value.clone()),
            Predicate::Like(pattern) => col.like(pattern.as_str()),
            Predicate::IsNull => col.is_null(),
            Predicate::IsNotNull => col.is_not_null(),
            Predicate::In(values) => col.is_in(values.iter().cloned()),
        }
    }
}

/// Ordered column/value pairs for `add` and `update`, typed by the bound
/// entity. Identity columns are storage-authoritative and simply never set.
#[derive(Debug, Clone)]
pub struct Assignments<E: EntityTrait> {
    columns: Vec<String>,
    values: Vec<Value>,
    entity: PhantomData<fn() -> E>,
}

impl<E: EntityTrait> Assignments<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: E::Column, value: impl Into<Value>) -> Self {
        self.columns.push(column.as_str().to_owned());
        self.values.push(value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Value>) {
        (self.columns, self.values)
    }
}

impl<E: EntityTrait> Default for Assignments<E> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            values: Vec::new(),
            entity: PhantomData,
        }
    }
}
