use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex as TokioMutex;
use tracing::debug;

use crate::models::{
    AccountId, AccountKind, DoctorRecord, HospitalRecord, PatientRecord, PatientView,
    StoredCredential,
};
use crate::storage::{Result, Storage, StorageError};

// In-memory storage data structure (one Mutex makes check-and-insert atomic)
struct StorageData {
    patients: HashMap<AccountId, PatientRecord>,
    hospitals: HashMap<AccountId, HospitalRecord>,
    doctors: HashMap<AccountId, DoctorRecord>,
    next_id: AccountId,
}

impl StorageData {
    fn new() -> Self {
        Self {
            patients: HashMap::new(),
            hospitals: HashMap::new(),
            doctors: HashMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> AccountId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn patient_conflict(&self, email: &str, referral_no: Option<&str>) -> bool {
        self.patients.values().any(|p| {
            p.email == email
                || referral_no.map_or(false, |r| p.referral_no.as_deref() == Some(r))
        })
    }
}

/// In-memory storage implementation (useful for testing)
pub struct MemoryStorage {
    data: TokioMutex<StorageData>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            data: TokioMutex::new(StorageData::new()),
        }
    }

    /// Number of stored rows of one kind
    pub async fn count(&self, kind: AccountKind) -> usize {
        let data = self.data.lock().await;
        match kind {
            AccountKind::Patient => data.patients.len(),
            AccountKind::Hospital => data.hospitals.len(),
            AccountKind::Doctor => data.doctors.len(),
        }
    }

    /// Stored doctor row by email
    pub async fn find_doctor(&self, email: &str) -> Option<DoctorRecord> {
        let data = self.data.lock().await;
        data.doctors.values().find(|d| d.email == email).cloned()
    }

    /// Stored hospital row by email
    pub async fn find_hospital(&self, email: &str) -> Option<HospitalRecord> {
        let data = self.data.lock().await;
        data.hospitals.values().find(|h| h.email == email).cloned()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    async fn patient_exists(&self, email: &str, referral_no: Option<&str>) -> Result<bool> {
        let data = self.data.lock().await;
        Ok(data.patient_conflict(email, referral_no))
    }

    async fn create_patient(&self, patient: &PatientRecord) -> Result<AccountId> {
        let mut data = self.data.lock().await;
        if data.patient_conflict(&patient.email, patient.referral_no.as_deref()) {
            return Err(StorageError::UniqueViolation(format!(
                "patients: email or referral_no already present for {}",
                patient.email
            )));
        }
        let id = data.allocate_id();
        data.patients.insert(id, patient.clone());
        debug!("Stored patient {}", id);
        Ok(id)
    }

    async fn list_patients(&self, limit: u32) -> Result<Vec<PatientView>> {
        let data = self.data.lock().await;
        let mut ids: Vec<&AccountId> = data.patients.keys().collect();
        ids.sort();
        Ok(ids
            .into_iter()
            .take(limit as usize)
            .map(|id| PatientView::from_record(*id, &data.patients[id]))
            .collect())
    }

    async fn hospital_exists(&self, email: &str) -> Result<bool> {
        let data = self.data.lock().await;
        Ok(data.hospitals.values().any(|h| h.email == email))
    }

    async fn create_hospital(&self, hospital: &HospitalRecord) -> Result<AccountId> {
        let mut data = self.data.lock().await;
        if data.hospitals.values().any(|h| h.email == hospital.email) {
            return Err(StorageError::UniqueViolation(format!(
                "hospitals: email already present for {}",
                hospital.email
            )));
        }
        let id = data.allocate_id();
        data.hospitals.insert(id, hospital.clone());
        debug!("Stored hospital {}", id);
        Ok(id)
    }

    async fn doctor_exists(&self, email: &str) -> Result<bool> {
        let data = self.data.lock().await;
        Ok(data.doctors.values().any(|d| d.email == email))
    }

    async fn create_doctor(&self, doctor: &DoctorRecord) -> Result<AccountId> {
        let mut data = self.data.lock().await;
        if data.doctors.values().any(|d| d.email == doctor.email) {
            return Err(StorageError::UniqueViolation(format!(
                "doctors: email already present for {}",
                doctor.email
            )));
        }
        let id = data.allocate_id();
        data.doctors.insert(id, doctor.clone());
        debug!("Stored doctor {}", id);
        Ok(id)
    }

    async fn get_credentials(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<StoredCredential>> {
        let data = self.data.lock().await;
        let found = match kind {
            AccountKind::Patient => data.patients.values().find(|p| p.email == email).map(|p| {
                StoredCredential {
                    name: p.name.clone(),
                    password_hash: Some(p.password_hash.clone()),
                }
            }),
            AccountKind::Hospital => data.hospitals.values().find(|h| h.email == email).map(|h| {
                StoredCredential {
                    name: h.hospital_name.clone(),
                    password_hash: h.password_hash.clone(),
                }
            }),
            AccountKind::Doctor => data.doctors.values().find(|d| d.email == email).map(|d| {
                StoredCredential {
                    name: d.doctor_name.clone(),
                    password_hash: Some(d.password_hash.clone()),
                }
            }),
        };
        Ok(found)
    }

    async fn update_password_hash(
        &self,
        kind: AccountKind,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        let mut data = self.data.lock().await;
        let updated = match kind {
            AccountKind::Patient => data
                .patients
                .values_mut()
                .find(|p| p.email == email)
                .map(|p| p.password_hash = password_hash.to_string()),
            AccountKind::Hospital => data
                .hospitals
                .values_mut()
                .find(|h| h.email == email)
                .map(|h| h.password_hash = Some(password_hash.to_string())),
            AccountKind::Doctor => data
                .doctors
                .values_mut()
                .find(|d| d.email == email)
                .map(|d| d.password_hash = password_hash.to_string()),
        };
        updated.ok_or_else(|| StorageError::NotFound(format!("No {} with email {}", kind, email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn patient(email: &str, referral_no: Option<&str>) -> PatientRecord {
        PatientRecord {
            name: "Akosua Owusu".to_string(),
            location_address: "4 Oxford St".to_string(),
            country: "Ghana".to_string(),
            tel: "0207777777".to_string(),
            email: email.to_string(),
            referral_no: referral_no.map(str::to_string),
            access_no: None,
            age: 29,
            sex: "F".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_patient_email_is_unique() {
        let storage = MemoryStorage::new();
        storage.create_patient(&patient("a@example.com", None)).await.unwrap();

        let err = storage
            .create_patient(&patient("a@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation(_)));
        assert_eq!(storage.count(AccountKind::Patient).await, 1);
    }

    #[tokio::test]
    async fn test_email_local_part_is_case_sensitive() {
        let storage = MemoryStorage::new();
        storage.create_patient(&patient("ama@example.com", None)).await.unwrap();
        storage.create_patient(&patient("AMA@example.com", None)).await.unwrap();

        assert_eq!(storage.count(AccountKind::Patient).await, 2);
        assert!(storage
            .get_credentials(AccountKind::Patient, "Ama@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_patient_referral_is_unique_when_present() {
        let storage = MemoryStorage::new();
        storage.create_patient(&patient("a@example.com", Some("REF1"))).await.unwrap();
        storage.create_patient(&patient("b@example.com", None)).await.unwrap();
        storage.create_patient(&patient("c@example.com", None)).await.unwrap();

        assert!(storage.patient_exists("zzz@example.com", Some("REF1")).await.unwrap());
        assert!(!storage.patient_exists("zzz@example.com", None).await.unwrap());
        assert!(matches!(
            storage.create_patient(&patient("d@example.com", Some("REF1"))).await,
            Err(StorageError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_limited() {
        let storage = MemoryStorage::new();
        for i in 0..12 {
            storage
                .create_patient(&patient(&format!("p{}@example.com", i), None))
                .await
                .unwrap();
        }

        let listed = storage.list_patients(10).await.unwrap();
        assert_eq!(listed.len(), 10);
        assert_eq!(listed[0].email, "p0@example.com");
        assert!(listed.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_update_password_hash_requires_row() {
        let storage = MemoryStorage::new();
        let err = storage
            .update_password_hash(AccountKind::Doctor, "none@example.com", "$argon2id$x")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
