use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;

use crate::config::constants::*;
use crate::error::{CarelineError, Result};

/// Main configuration container for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration settings
    pub server: ServerConfig,
    /// Database configuration settings
    pub database: DatabaseConfig,
    /// Which storage backend to use
    pub storage: StorageType,
    /// Password hashing policy
    pub hashing: HashingConfig,
    /// Logging configuration settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables or use defaults
    pub fn load() -> Self {
        Self {
            server: ServerConfig::load(),
            database: DatabaseConfig::load(),
            storage: env::var("STORAGE_TYPE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            hashing: HashingConfig::load(),
            logging: LoggingConfig::load(),
        }
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        if self.storage == StorageType::MySql {
            self.database.validate()?;
        }
        self.hashing.validate()
    }
}

/// Server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to listen on
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Number of worker threads
    pub worker_threads: usize,
    /// Comma separated CORS origins, `*` for any
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            worker_threads: num_cpus::get(),
            cors_allowed_origins: DEFAULT_CORS_ALLOWED_ORIGINS.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables or use defaults
    pub fn load() -> Self {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HTTP_HOST.to_string());
        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_HTTP_PORT);
        let worker_threads = env::var("WORKER_THREADS")
            .ok()
            .and_then(|t| t.parse::<usize>().ok())
            .unwrap_or_else(num_cpus::get);
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGINS.to_string());

        Self {
            host,
            port,
            worker_threads,
            cors_allowed_origins,
        }
    }

    /// Get socket address from host and port
    pub fn address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .map_err(|e| CarelineError::config(format!("Invalid server address: {}", e)))
    }

    /// CORS origins, empty when any origin is allowed
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty() && o != "*")
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(CarelineError::config("Server host cannot be empty"));
        }
        if self.port == 0 {
            return Err(CarelineError::config("Server port cannot be 0"));
        }
        if self.worker_threads == 0 || self.worker_threads > MAX_WORKER_THREADS {
            return Err(CarelineError::config(format!(
                "Invalid worker_threads: {}. Must be between 1 and {}",
                self.worker_threads, MAX_WORKER_THREADS
            )));
        }
        Ok(())
    }
}

/// Database configuration settings
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Database name
    pub name: String,
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connection_timeout: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("connection_timeout", &self.connection_timeout)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_DB_PASS.to_string(),
            name: DEFAULT_DB_NAME.to_string(),
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            max_connections: DEFAULT_DB_POOL,
            connection_timeout: DEFAULT_DB_CONN_TIMEOUT_SECS,
        }
    }
}

impl DatabaseConfig {
    /// Load database configuration from environment variables or use defaults
    pub fn load() -> Self {
        let user = env::var("DB_USER").unwrap_or_else(|_| DEFAULT_DB_USER.to_string());
        let password = env::var("DB_PASS").unwrap_or_else(|_| DEFAULT_DB_PASS.to_string());
        let name = env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string());
        let host = env::var("DB_HOST").unwrap_or_else(|_| DEFAULT_DB_HOST.to_string());
        let port = env::var("DB_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_DB_PORT);
        let max_connections = env::var("DB_POOL")
            .ok()
            .and_then(|c| c.parse::<u32>().ok())
            .unwrap_or(DEFAULT_DB_POOL);
        let connection_timeout = env::var("DATABASE_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DB_CONN_TIMEOUT_SECS);

        Self {
            user,
            password,
            name,
            host,
            port,
            max_connections,
            connection_timeout,
        }
    }

    /// Generate database URL from individual components
    pub fn url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }

    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(CarelineError::config("Database host cannot be empty"));
        }
        if self.name.is_empty() {
            return Err(CarelineError::config("Database name cannot be empty"));
        }
        if self.user.is_empty() {
            return Err(CarelineError::config("Database username cannot be empty"));
        }
        if self.max_connections == 0 {
            return Err(CarelineError::config("DB_POOL must be greater than 0"));
        }
        Ok(())
    }
}

/// Storage backend enumeration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageType {
    /// MySQL via sqlx
    #[default]
    MySql,
    /// Process-local maps, for tests and demos
    Memory,
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "database" | "db" => Ok(StorageType::MySql),
            "memory" | "mem" => Ok(StorageType::Memory),
            _ => Err(format!("Invalid storage type: {}", s)),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::MySql => f.write_str("mysql"),
            StorageType::Memory => f.write_str("memory"),
        }
    }
}

/// Argon2id cost parameters and rehash policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
    /// Re-hash and store the password at login when the stored hash is weaker than policy
    pub rehash_on_login: bool,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
            rehash_on_login: DEFAULT_REHASH_ON_LOGIN,
        }
    }
}

impl HashingConfig {
    pub fn load() -> Self {
        let memory_kib = env::var("HASH_MEMORY_KIB")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_HASH_MEMORY_KIB);
        let iterations = env::var("HASH_ITERATIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_HASH_ITERATIONS);
        let parallelism = env::var("HASH_PARALLELISM")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_HASH_PARALLELISM);
        let rehash_on_login = env::var("HASH_REHASH_ON_LOGIN")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(DEFAULT_REHASH_ON_LOGIN);

        Self {
            memory_kib,
            iterations,
            parallelism,
            rehash_on_login,
        }
    }

    /// Argon2 parameters for this policy
    pub fn params(&self) -> Result<argon2::Params> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| CarelineError::config(format!("Invalid hashing parameters: {}", e)))
    }

    fn validate(&self) -> Result<()> {
        self.params().map(|_| ())
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Load logging configuration from environment variables or use defaults
    pub fn load() -> Self {
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        let json = env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

        Self { level, json }
    }
}
