use tracing::{debug, error};

use crate::models::{AccountId, PatientRecord, PatientView};
use crate::storage::mysql::MySqlStorage;
use crate::storage::{Result, StorageError};

/// Patient queries for the MySQL backend
pub trait MySqlPatientExt {
    /// Rows sharing the email, or the referral code when one is given
    async fn count_patients_matching(&self, email: &str, referral_no: Option<&str>) -> Result<i64>;

    /// Insert one patient row
    async fn insert_patient(&self, patient: &PatientRecord) -> Result<AccountId>;

    /// Oldest patients first
    async fn select_patients(&self, limit: u32) -> Result<Vec<PatientView>>;
}

impl MySqlPatientExt for MySqlStorage {
    async fn count_patients_matching(&self, email: &str, referral_no: Option<&str>) -> Result<i64> {
        // NULL never equals anything, so a missing referral code only checks the email
        let count: i64 = sqlx::query_scalar(
            r"SELECT COUNT(1) FROM patients WHERE email = ? OR referral_no = ?",
        )
        .bind(email)
        .bind(referral_no)
        .fetch_one(self.get_pool())
        .await?;

        Ok(count)
    }

    async fn insert_patient(&self, patient: &PatientRecord) -> Result<AccountId> {
        let result = sqlx::query(
            r"INSERT INTO patients (
                name, location_address, country, tel, email,
                referral_no, access_no, age, sex, password, created_at
              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&patient.name)
        .bind(&patient.location_address)
        .bind(&patient.country)
        .bind(&patient.tel)
        .bind(&patient.email)
        .bind(&patient.referral_no)
        .bind(&patient.access_no)
        .bind(patient.age)
        .bind(&patient.sex)
        .bind(&patient.password_hash)
        .bind(patient.created_at)
        .execute(self.get_pool())
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if !matches!(err, StorageError::UniqueViolation(_)) {
                error!("Failed to insert patient: {}", err);
            }
            err
        })?;

        let id = result.last_insert_id();
        debug!("Inserted patient {}", id);
        Ok(id)
    }

    async fn select_patients(&self, limit: u32) -> Result<Vec<PatientView>> {
        let patients = sqlx::query_as::<_, PatientView>(
            r"SELECT id, name, location_address, country, tel, email,
                     referral_no, access_no, age, sex, created_at
              FROM patients
              ORDER BY id
              LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.get_pool())
        .await?;

        Ok(patients)
    }
}
