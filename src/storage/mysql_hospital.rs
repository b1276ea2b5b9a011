use tracing::{debug, error};

use crate::models::{AccountId, HospitalRecord};
use crate::storage::mysql::MySqlStorage;
use crate::storage::{Result, StorageError};

/// Hospital queries for the MySQL backend
pub trait MySqlHospitalExt {
    async fn count_hospitals_by_email(&self, email: &str) -> Result<i64>;

    async fn insert_hospital(&self, hospital: &HospitalRecord) -> Result<AccountId>;
}

impl MySqlHospitalExt for MySqlStorage {
    async fn count_hospitals_by_email(&self, email: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(r"SELECT COUNT(1) FROM hospitals WHERE email = ?")
            .bind(email)
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    async fn insert_hospital(&self, hospital: &HospitalRecord) -> Result<AccountId> {
        let result = sqlx::query(
            r"INSERT INTO hospitals (
                hospital_name, address, country, hospital_type, emergency_line,
                help_line, reg_number, email, telephone, docs,
                contact_number, password, created_at
              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&hospital.hospital_name)
        .bind(&hospital.address)
        .bind(&hospital.country)
        .bind(&hospital.hospital_type)
        .bind(&hospital.emergency_line)
        .bind(&hospital.help_line)
        .bind(&hospital.reg_number)
        .bind(&hospital.email)
        .bind(&hospital.telephone)
        .bind(&hospital.docs)
        .bind(&hospital.contact_number)
        .bind(&hospital.password_hash)
        .bind(hospital.created_at)
        .execute(self.get_pool())
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if !matches!(err, StorageError::UniqueViolation(_)) {
                error!("Failed to insert hospital: {}", err);
            }
            err
        })?;

        let id = result.last_insert_id();
        debug!("Inserted hospital {}", id);
        Ok(id)
    }
}
