pub mod memory;
pub mod mysql;

// MySQL specific modules
mod mysql_doctor;
mod mysql_hospital;
mod mysql_patient;

// Connection pooling
pub mod pool;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    config::settings::{Config, DatabaseConfig, StorageType},
    error::{CarelineError, Result as AppResult},
    models::{
        AccountId, AccountKind, DoctorRecord, HospitalRecord, PatientRecord, PatientView,
        StoredCredential,
    },
};

use self::memory::MemoryStorage;
use self::mysql::MySqlStorage;

/// Storage Result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Error types for storage operations
#[derive(Debug, Error, Clone)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Connection pool exhausted: {0}")]
    PoolExhausted(String),

    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

}

impl StorageError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            StorageError::Database(_) => "database",
            StorageError::Connection(_) => "connection",
            StorageError::PoolExhausted(_) => "pool",
            StorageError::UniqueViolation(_) => "unique_violation",
            StorageError::NotFound(_) => "not_found",
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::UniqueViolation(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) => Self::Database(db_err.to_string()),
            sqlx::Error::Io(io_err) => Self::Connection(io_err.to_string()),
            sqlx::Error::PoolTimedOut => Self::PoolExhausted("Connection pool timeout".to_string()),
            sqlx::Error::PoolClosed => Self::Connection("Connection pool closed".to_string()),
            _ => Self::Database(error.to_string()),
        }
    }
}

impl From<StorageError> for CarelineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => CarelineError::NotFound(msg),
            StorageError::Database(_) => CarelineError::Database(err.to_string()),
            _ => CarelineError::Storage(err.to_string()),
        }
    }
}

/// Persistence collaborator for account records.
///
/// Implementations enforce uniqueness themselves: a second row with the same
/// email (per table), or a patient with an already used referral code, must
/// fail with [`StorageError::UniqueViolation`] and leave nothing behind.
#[async_trait]
pub trait Storage: Sync + Send {
    /// Health check with connection validation
    async fn health_check(&self) -> Result<bool>;

    /// Close all connections gracefully
    async fn close(&self) -> Result<()>;

    /// Whether a patient uses this email, or this referral code when given
    async fn patient_exists(&self, email: &str, referral_no: Option<&str>) -> Result<bool>;
    async fn create_patient(&self, patient: &PatientRecord) -> Result<AccountId>;
    async fn list_patients(&self, limit: u32) -> Result<Vec<PatientView>>;

    async fn hospital_exists(&self, email: &str) -> Result<bool>;
    async fn create_hospital(&self, hospital: &HospitalRecord) -> Result<AccountId>;

    async fn doctor_exists(&self, email: &str) -> Result<bool>;
    async fn create_doctor(&self, doctor: &DoctorRecord) -> Result<AccountId>;

    /// Display name and stored hash for a login attempt
    async fn get_credentials(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<StoredCredential>>;

    /// Replace the stored hash, used when rehashing on login
    async fn update_password_hash(
        &self,
        kind: AccountKind,
        email: &str,
        password_hash: &str,
    ) -> Result<()>;
}

/// Storage factory
pub struct StorageFactory;

impl StorageFactory {
    /// Create MySQL storage and make sure the schema exists
    #[instrument(skip(config))]
    pub async fn create_mysql_storage(config: &DatabaseConfig) -> AppResult<MySqlStorage> {
        info!("Creating MySQL storage for {}:{}/{}", config.host, config.port, config.name);

        let storage = MySqlStorage::connect(config).await?;
        storage.init_schema().await?;

        info!("✅ MySQL storage created successfully");
        Ok(storage)
    }

    /// Create memory storage for testing
    pub fn create_memory_storage() -> MemoryStorage {
        info!("Creating memory storage");
        MemoryStorage::new()
    }
}

/// Build the storage backend selected in the configuration
#[instrument(skip(config))]
pub async fn init_storage(config: &Config) -> AppResult<Arc<dyn Storage>> {
    info!("Initializing storage layer ({:?})", config.storage);

    let storage: Arc<dyn Storage> = match config.storage {
        StorageType::MySql => {
            Arc::new(StorageFactory::create_mysql_storage(&config.database).await?)
        }
        StorageType::Memory => Arc::new(StorageFactory::create_memory_storage()),
    };

    let healthy = storage
        .health_check()
        .await
        .map_err(|e| CarelineError::Storage(format!("Storage health check failed: {}", e)))?;
    if !healthy {
        return Err(CarelineError::Storage("Storage health check failed".to_string()));
    }

    info!("✅ Storage layer initialized successfully");
    Ok(storage)
}
