use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::auth::CredentialHasher;
use crate::error::{CarelineError, Result};
use crate::models::{
    AccountId, AccountKind, DoctorRecord, HospitalRecord, NewDoctor, NewHospital, NewPatient,
    PatientRecord,
};
use crate::storage::{Storage, StorageError};

/// Registers patients, hospitals and doctors.
///
/// Each registration is one insert. The existence check up front answers the
/// common duplicate case without hashing; the storage UNIQUE constraints
/// settle races between concurrent registrations, and both paths end in
/// [`CarelineError::Duplicate`].
#[derive(Clone)]
pub struct AccountRegistrar {
    storage: Arc<dyn Storage>,
    hasher: Arc<CredentialHasher>,
}

impl AccountRegistrar {
    pub fn new(storage: Arc<dyn Storage>, hasher: Arc<CredentialHasher>) -> Self {
        Self { storage, hasher }
    }

    /// A patient matches on email or, when given, referral code
    pub async fn patient_exists(&self, email: &str, referral_no: Option<&str>) -> Result<bool> {
        self.storage
            .patient_exists(email, referral_no)
            .await
            .map_err(|e| persistence_error(AccountKind::Patient, "existence check", e))
    }

    pub async fn hospital_exists(&self, email: &str) -> Result<bool> {
        self.storage
            .hospital_exists(email)
            .await
            .map_err(|e| persistence_error(AccountKind::Hospital, "existence check", e))
    }

    pub async fn doctor_exists(&self, email: &str) -> Result<bool> {
        self.storage
            .doctor_exists(email)
            .await
            .map_err(|e| persistence_error(AccountKind::Doctor, "existence check", e))
    }

    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register_patient(&self, payload: NewPatient) -> Result<AccountId> {
        if self
            .patient_exists(&payload.email, payload.referral_no.as_deref())
            .await?
        {
            warn!("Patient registration rejected: already exists");
            return Err(CarelineError::Duplicate(AccountKind::Patient));
        }

        let password_hash = self.hasher.hash_blocking(payload.password.clone()).await?;
        let record = PatientRecord::from_payload(payload, password_hash.into_string());

        let id = self
            .storage
            .create_patient(&record)
            .await
            .map_err(|e| insert_error(AccountKind::Patient, e))?;

        info!("Registered patient {}", id);
        Ok(id)
    }

    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register_hospital(&self, payload: NewHospital) -> Result<AccountId> {
        if self.hospital_exists(&payload.email).await? {
            warn!("Hospital registration rejected: already exists");
            return Err(CarelineError::Duplicate(AccountKind::Hospital));
        }

        let password_hash = match payload.password.clone() {
            Some(password) => Some(self.hasher.hash_blocking(password).await?.into_string()),
            None => None,
        };
        let record = HospitalRecord::from_payload(payload, password_hash);

        let id = self
            .storage
            .create_hospital(&record)
            .await
            .map_err(|e| insert_error(AccountKind::Hospital, e))?;

        info!("Registered hospital {}", id);
        Ok(id)
    }

    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register_doctor(&self, payload: NewDoctor) -> Result<AccountId> {
        if self.doctor_exists(&payload.email).await? {
            warn!("Doctor registration rejected: already exists");
            return Err(CarelineError::Duplicate(AccountKind::Doctor));
        }

        let password_hash = self.hasher.hash_blocking(payload.password.clone()).await?;
        let record = DoctorRecord::from_payload(payload, password_hash.into_string());

        let id = self
            .storage
            .create_doctor(&record)
            .await
            .map_err(|e| insert_error(AccountKind::Doctor, e))?;

        info!("Registered doctor {}", id);
        Ok(id)
    }
}

fn insert_error(kind: AccountKind, err: StorageError) -> CarelineError {
    match err {
        StorageError::UniqueViolation(detail) => {
            warn!("{} insert hit a unique constraint: {}", kind, detail);
            CarelineError::Duplicate(kind)
        }
        other => persistence_error(kind, "insert", other),
    }
}

fn persistence_error(kind: AccountKind, operation: &str, err: StorageError) -> CarelineError {
    error!("{} {} failed ({}): {}", kind, operation, err.category(), err);
    err.into()
}
