//! Configuration for the order service module

use std::time::Duration;

use serde::Deserialize;

/// Order service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum idle connections kept in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Time to wait for a connection checkout
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Idle time before a pooled connection is closed
    #[serde(with = "humantime_serde", default = "default_idle_timeout")]
    pub idle_timeout: Duration,

    /// Log every statement through the mapper
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Config {
    /// Configuration with defaults for everything but the URL.
    pub fn for_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(8)
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(300)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_url_applies_defaults() {
        let config = Config::for_url("sqlite::memory:");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout, Duration::from_secs(8));
        assert!(!config.sqlx_logging);
    }
}
