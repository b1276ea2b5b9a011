//! Connection pool management

use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::{Error as SqlxError, MySqlPool};

use crate::config::settings::DatabaseConfig;

/// Database connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600), // 10 minutes
            max_lifetime: Duration::from_secs(1800), // 30 minutes
        }
    }
}

impl From<&DatabaseConfig> for PoolConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            min_connections: config.max_connections.min(1),
            acquire_timeout: Duration::from_secs(config.connection_timeout),
            ..Self::default()
        }
    }
}

/// Open a pool against the given database URL
pub async fn connect_pool(database_url: &str, config: &PoolConfig) -> Result<MySqlPool, SqlxError> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(database_url)
        .await
}

/// Pool statistics for monitoring
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_connections: u32,
}

impl PoolStats {
    pub fn of(pool: &MySqlPool, config: &PoolConfig) -> Self {
        Self {
            size: pool.size(),
            idle: pool.num_idle() as u32,
            max_connections: config.max_connections,
        }
    }

    pub fn active_connections(&self) -> u32 {
        self.size.saturating_sub(self.idle)
    }
}
