//! Session factory boundary
//!
//! [`Datastore`] wraps the pooled connection and hands out repositories
//! (auto-commit per call) and unit-of-work scopes. Given a live session it
//! adopts it as-is; given connect options it creates the pool itself.

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait};
use tracing::info;

use crate::error::StoreError;
use crate::repository::SqlRepository;
use crate::unit_of_work::UnitOfWork;

#[derive(Clone)]
pub struct Datastore {
    conn: Arc<DatabaseConnection>,
}

impl Datastore {
    /// Creates the connection pool and owns it for this datastore's lifetime.
    pub async fn connect(options: ConnectOptions) -> Result<Self, StoreError> {
        let url = options.get_url().to_owned();
        let conn = Database::connect(options)
            .await
            .map_err(StoreError::from)?;
        info!(url = %url, "datastore connected");
        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Adopts an already-established session.
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self {
            conn: Arc::new(conn),
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        self.conn.as_ref()
    }

    /// Binds a repository for `E` in auto-commit mode.
    pub fn repository<E: EntityTrait>(&self) -> SqlRepository<'_, DatabaseConnection, E> {
        SqlRepository::new(self.conn.as_ref())
    }

    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(Arc::clone(&self.conn))
    }
}
