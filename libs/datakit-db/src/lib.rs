//! datakit-db
//!
//! Typed data-access kit over SeaORM: entity-scoped repositories with
//! composable predicate clauses, a unit-of-work scope for multi-entity
//! atomicity, a deferred bulk-insert proxy, and a statement builder that
//! memoizes rendered SQL by statement shape.

pub mod bulk;
pub mod clause;
pub mod error;
pub mod repository;
pub mod session;
mod statement;
pub mod unit_of_work;

pub use bulk::{BulkApplied, BulkInsert};
pub use clause::{Assignments, Clause};
pub use error::StoreError;
pub use repository::{repository, Repository, SqlRepository};
pub use session::Datastore;
pub use unit_of_work::UnitOfWork;
