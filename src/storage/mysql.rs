use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, error, info};

use crate::config::settings::DatabaseConfig;
use crate::models::{
    AccountId, AccountKind, DoctorRecord, HospitalRecord, PatientRecord, PatientView,
    StoredCredential,
};
use crate::storage::pool::{connect_pool, PoolConfig, PoolStats};
use crate::storage::{Result, Storage, StorageError};

use crate::storage::mysql_doctor::MySqlDoctorExt;
use crate::storage::mysql_hospital::MySqlHospitalExt;
use crate::storage::mysql_patient::MySqlPatientExt;

/// Tables with their uniqueness constraints. The UNIQUE keys are what makes
/// concurrent duplicate registrations fail; the application-level existence
/// check only produces the friendlier early answer. Emails and referral codes
/// use a binary collation so they compare byte for byte, as in memory storage.
const SCHEMA: &[&str] = &[
    r"CREATE TABLE IF NOT EXISTS patients (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        location_address VARCHAR(512) NOT NULL,
        country VARCHAR(128) NOT NULL,
        tel VARCHAR(64) NOT NULL,
        email VARCHAR(254) COLLATE utf8mb4_bin NOT NULL,
        referral_no VARCHAR(128) COLLATE utf8mb4_bin NULL,
        access_no VARCHAR(128) NULL,
        age INT NOT NULL,
        sex VARCHAR(16) NOT NULL,
        password VARCHAR(255) NOT NULL,
        created_at DATETIME NOT NULL,
        UNIQUE KEY uq_patients_email (email),
        UNIQUE KEY uq_patients_referral_no (referral_no)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
    r"CREATE TABLE IF NOT EXISTS hospitals (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        hospital_name VARCHAR(255) NOT NULL,
        address VARCHAR(512) NOT NULL,
        country VARCHAR(128) NOT NULL,
        hospital_type VARCHAR(128) NOT NULL,
        emergency_line VARCHAR(64) NOT NULL,
        help_line VARCHAR(64) NOT NULL,
        reg_number VARCHAR(128) NOT NULL,
        email VARCHAR(254) COLLATE utf8mb4_bin NOT NULL,
        telephone VARCHAR(64) NOT NULL,
        docs TEXT NOT NULL,
        contact_number VARCHAR(64) NOT NULL,
        password VARCHAR(255) NULL,
        created_at DATETIME NOT NULL,
        UNIQUE KEY uq_hospitals_email (email)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
    r"CREATE TABLE IF NOT EXISTS doctors (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        doctor_name VARCHAR(255) NOT NULL,
        specialty VARCHAR(255) NOT NULL,
        access_number VARCHAR(128) NOT NULL,
        license_number VARCHAR(128) NOT NULL,
        is_online BOOLEAN NOT NULL,
        email VARCHAR(254) COLLATE utf8mb4_bin NOT NULL,
        telephone VARCHAR(64) NOT NULL,
        docs TEXT NOT NULL,
        password VARCHAR(255) NOT NULL,
        contact_number VARCHAR(64) NOT NULL,
        created_at DATETIME NOT NULL,
        UNIQUE KEY uq_doctors_email (email)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
];

/// MySQL storage implementation
pub struct MySqlStorage {
    pool: MySqlPool,
    pool_config: PoolConfig,
}

impl MySqlStorage {
    /// Open a pool from the database settings
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool_config = PoolConfig::from(config);
        let pool = connect_pool(&config.url(), &pool_config)
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to connect to MySQL: {}", e)))?;

        Ok(Self { pool, pool_config })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Create the account tables if they are missing
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema");
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await.map_err(|e| {
                error!("Schema statement failed: {}", e);
                StorageError::Database(format!("Failed to initialize schema: {}", e))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for MySqlStorage {
    async fn health_check(&self) -> Result<bool> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        let stats = PoolStats::of(&self.pool, &self.pool_config);
        debug!(
            "MySQL pool: size={}, idle={}, active={}, max={}",
            stats.size,
            stats.idle,
            stats.active_connections(),
            stats.max_connections
        );
        Ok(true)
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        info!("MySQL pool closed");
        Ok(())
    }

    async fn patient_exists(&self, email: &str, referral_no: Option<&str>) -> Result<bool> {
        self.count_patients_matching(email, referral_no).await.map(|n| n > 0)
    }

    async fn create_patient(&self, patient: &PatientRecord) -> Result<AccountId> {
        self.insert_patient(patient).await
    }

    async fn list_patients(&self, limit: u32) -> Result<Vec<PatientView>> {
        self.select_patients(limit).await
    }

    async fn hospital_exists(&self, email: &str) -> Result<bool> {
        self.count_hospitals_by_email(email).await.map(|n| n > 0)
    }

    async fn create_hospital(&self, hospital: &HospitalRecord) -> Result<AccountId> {
        self.insert_hospital(hospital).await
    }

    async fn doctor_exists(&self, email: &str) -> Result<bool> {
        self.count_doctors_by_email(email).await.map(|n| n > 0)
    }

    async fn create_doctor(&self, doctor: &DoctorRecord) -> Result<AccountId> {
        self.insert_doctor(doctor).await
    }

    async fn get_credentials(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<StoredCredential>> {
        let (name_column, table) = match kind {
            AccountKind::Patient => ("name", "patients"),
            AccountKind::Hospital => ("hospital_name", "hospitals"),
            AccountKind::Doctor => ("doctor_name", "doctors"),
        };
        let sql = format!("SELECT {}, password FROM {} WHERE email = ?", name_column, table);

        let row: Option<(String, Option<String>)> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(name, password_hash)| StoredCredential { name, password_hash }))
    }

    async fn update_password_hash(
        &self,
        kind: AccountKind,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        let sql = format!("UPDATE {} SET password = ? WHERE email = ?", kind.table());
        let result = sqlx::query(&sql)
            .bind(password_hash)
            .bind(email)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("No {} with email {}", kind, email)));
        }
        Ok(())
    }
}
