//! Storage layer - database entities, mappers and session setup

use datakit_db::{Datastore, StoreError};
use sea_orm::ConnectOptions;
use tracing::info;

use crate::config::Config;

pub mod entity;
pub mod mapper;

/// Opens the connection pool described by `config`.
pub async fn connect(config: &Config) -> Result<Datastore, StoreError> {
    let mut options = ConnectOptions::new(&config.database_url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(config.sqlx_logging);
    info!(
        max_connections = config.max_connections,
        "opening order store"
    );
    Datastore::connect(options).await
}
