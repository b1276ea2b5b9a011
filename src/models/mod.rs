pub mod account;
pub mod auth;

pub use account::{
    AccountId, AccountKind, DoctorRecord, DoctorStatus, HospitalRecord, NewDoctor, NewHospital,
    NewPatient, PatientRecord, PatientView,
};
pub use auth::{DoctorLoginData, LoginData, LoginOutcome, Password, StoredCredential};
