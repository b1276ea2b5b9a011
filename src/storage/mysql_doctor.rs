use tracing::{debug, error};

use crate::models::{AccountId, DoctorRecord};
use crate::storage::mysql::MySqlStorage;
use crate::storage::{Result, StorageError};

/// Doctor queries for the MySQL backend
pub trait MySqlDoctorExt {
    async fn count_doctors_by_email(&self, email: &str) -> Result<i64>;

    async fn insert_doctor(&self, doctor: &DoctorRecord) -> Result<AccountId>;
}

impl MySqlDoctorExt for MySqlStorage {
    async fn count_doctors_by_email(&self, email: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(r"SELECT COUNT(1) FROM doctors WHERE email = ?")
            .bind(email)
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    async fn insert_doctor(&self, doctor: &DoctorRecord) -> Result<AccountId> {
        let result = sqlx::query(
            r"INSERT INTO doctors (
                doctor_name, specialty, access_number, license_number, is_online,
                email, telephone, docs, password, contact_number, created_at
              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&doctor.doctor_name)
        .bind(&doctor.specialty)
        .bind(&doctor.access_number)
        .bind(&doctor.license_number)
        .bind(doctor.is_online)
        .bind(&doctor.email)
        .bind(&doctor.telephone)
        .bind(&doctor.docs)
        .bind(&doctor.password_hash)
        .bind(&doctor.contact_number)
        .bind(doctor.created_at)
        .execute(self.get_pool())
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if !matches!(err, StorageError::UniqueViolation(_)) {
                error!("Failed to insert doctor: {}", err);
            }
            err
        })?;

        let id = result.last_insert_id();
        debug!("Inserted doctor {}", id);
        Ok(id)
    }
}
