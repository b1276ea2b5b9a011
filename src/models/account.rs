use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::models::auth::Password;

/// Identifier assigned by storage when an account row is inserted.
pub type AccountId = u64;

/// The three kinds of account that can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Patient,
    Hospital,
    Doctor,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Patient => "patient",
            AccountKind::Hospital => "hospital",
            AccountKind::Doctor => "doctor",
        }
    }

    /// Table holding this kind of account
    pub fn table(&self) -> &'static str {
        match self {
            AccountKind::Patient => "patients",
            AccountKind::Hospital => "hospitals",
            AccountKind::Doctor => "doctors",
        }
    }

    /// Client-facing message for an already registered account
    pub fn duplicate_message(&self) -> &'static str {
        match self {
            AccountKind::Patient => "User already exists.",
            AccountKind::Hospital => "Hospital already exists.",
            AccountKind::Doctor => "doctor already exists.",
        }
    }

    /// Client-facing message for a successful registration
    pub fn added_message(&self) -> &'static str {
        match self {
            AccountKind::Patient => "User added successfully.",
            AccountKind::Hospital => "Hospital added successfully.",
            AccountKind::Doctor => "doctor added successfully.",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Doctor availability, accepted case-insensitively as "online" or "offline".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorStatus {
    Online,
    Offline,
}

impl DoctorStatus {
    /// Persisted form of the status
    pub fn is_online(&self) -> bool {
        matches!(self, DoctorStatus::Online)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DoctorStatus::Online => "online",
            DoctorStatus::Offline => "offline",
        }
    }
}

impl FromStr for DoctorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(DoctorStatus::Online),
            "offline" => Ok(DoctorStatus::Offline),
            _ => Err("Status must be \"Online\" or \"Offline\"".to_string()),
        }
    }
}

impl Serialize for DoctorStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DoctorStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Patient registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub location_address: String,
    pub country: String,
    pub tel: String,
    pub email: String,
    #[serde(default)]
    pub referral_no: Option<String>,
    #[serde(default)]
    pub access_no: Option<String>,
    pub age: i32,
    pub sex: String,
    pub password: Password,
}

/// Hospital registration payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewHospital {
    pub hospital_name: String,
    pub address: String,
    pub country: String,
    #[serde(rename = "Type")]
    pub hospital_type: String,
    pub emergency_line: String,
    pub help_line: String,
    pub reg_number: String,
    pub email: String,
    pub telephone: String,
    pub docs: String,
    pub contact_number: String,
    #[serde(default)]
    pub password: Option<Password>,
}

/// Doctor registration payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewDoctor {
    pub doctor_name: String,
    pub specialty: String,
    pub access_number: String,
    pub license_number: String,
    pub status: DoctorStatus,
    pub email: String,
    pub telephone: String,
    pub docs: String,
    pub password: Password,
    pub contact_number: String,
}

/// Patient row as inserted; the password column only ever holds a credential hash
#[derive(Debug, Clone)]
pub struct PatientRecord {
    pub name: String,
    pub location_address: String,
    pub country: String,
    pub tel: String,
    pub email: String,
    pub referral_no: Option<String>,
    pub access_no: Option<String>,
    pub age: i32,
    pub sex: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Hospital row as inserted
#[derive(Debug, Clone)]
pub struct HospitalRecord {
    pub hospital_name: String,
    pub address: String,
    pub country: String,
    pub hospital_type: String,
    pub emergency_line: String,
    pub help_line: String,
    pub reg_number: String,
    pub email: String,
    pub telephone: String,
    pub docs: String,
    pub contact_number: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Doctor row as inserted
#[derive(Debug, Clone)]
pub struct DoctorRecord {
    pub doctor_name: String,
    pub specialty: String,
    pub access_number: String,
    pub license_number: String,
    pub is_online: bool,
    pub email: String,
    pub telephone: String,
    pub docs: String,
    pub password_hash: String,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
}

impl PatientRecord {
    /// Build the stored row from a validated payload and its credential hash
    pub fn from_payload(payload: NewPatient, password_hash: String) -> Self {
        Self {
            name: payload.name,
            location_address: payload.location_address,
            country: payload.country,
            tel: payload.tel,
            email: payload.email,
            referral_no: payload.referral_no,
            access_no: payload.access_no,
            age: payload.age,
            sex: payload.sex,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl HospitalRecord {
    pub fn from_payload(payload: NewHospital, password_hash: Option<String>) -> Self {
        Self {
            hospital_name: payload.hospital_name,
            address: payload.address,
            country: payload.country,
            hospital_type: payload.hospital_type,
            emergency_line: payload.emergency_line,
            help_line: payload.help_line,
            reg_number: payload.reg_number,
            email: payload.email,
            telephone: payload.telephone,
            docs: payload.docs,
            contact_number: payload.contact_number,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl DoctorRecord {
    pub fn from_payload(payload: NewDoctor, password_hash: String) -> Self {
        Self {
            doctor_name: payload.doctor_name,
            specialty: payload.specialty,
            access_number: payload.access_number,
            license_number: payload.license_number,
            is_online: payload.status.is_online(),
            email: payload.email,
            telephone: payload.telephone,
            docs: payload.docs,
            password_hash,
            contact_number: payload.contact_number,
            created_at: Utc::now(),
        }
    }
}

/// Patient as listed by the read endpoint. Carries no credential material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct PatientView {
    pub id: AccountId,
    pub name: String,
    pub location_address: String,
    pub country: String,
    pub tel: String,
    pub email: String,
    pub referral_no: Option<String>,
    pub access_no: Option<String>,
    pub age: i32,
    pub sex: String,
    pub created_at: DateTime<Utc>,
}

impl PatientView {
    pub fn from_record(id: AccountId, record: &PatientRecord) -> Self {
        Self {
            id,
            name: record.name.clone(),
            location_address: record.location_address.clone(),
            country: record.country.clone(),
            tel: record.tel.clone(),
            email: record.email.clone(),
            referral_no: record.referral_no.clone(),
            access_no: record.access_no.clone(),
            age: record.age,
            sex: record.sex.clone(),
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_status_is_case_insensitive() {
        assert_eq!("ONLINE".parse::<DoctorStatus>(), Ok(DoctorStatus::Online));
        assert_eq!("Offline".parse::<DoctorStatus>(), Ok(DoctorStatus::Offline));
        assert!("Pending".parse::<DoctorStatus>().is_err());
        assert!(DoctorStatus::Online.is_online());
        assert!(!DoctorStatus::Offline.is_online());
    }

    #[test]
    fn doctor_payload_uses_pascal_case_keys() {
        let payload: NewDoctor = serde_json::from_value(serde_json::json!({
            "DoctorName": "Dr. Ama Mensah",
            "Specialty": "Cardiology",
            "AccessNumber": "AC-1",
            "LicenseNumber": "LIC-1",
            "Status": "ONLINE",
            "Email": "ama@example.com",
            "Telephone": "0200000000",
            "Docs": "cv.pdf",
            "Password": "s3cret",
            "ContactNumber": "0240000000"
        }))
        .unwrap();

        assert_eq!(payload.status, DoctorStatus::Online);
        let record = DoctorRecord::from_payload(payload, "$argon2id$stub".to_string());
        assert!(record.is_online);
        assert_eq!(record.password_hash, "$argon2id$stub");
    }

    #[test]
    fn hospital_type_field_maps_from_type_key() {
        let payload: NewHospital = serde_json::from_value(serde_json::json!({
            "HospitalName": "Korle Bu",
            "Address": "Guggisberg Ave",
            "Country": "Ghana",
            "Type": "Teaching",
            "EmergencyLine": "112",
            "HelpLine": "0302000000",
            "RegNumber": "REG-9",
            "Email": "info@kbth.example",
            "Telephone": "0302000001",
            "Docs": "license.pdf",
            "ContactNumber": "0302000002"
        }))
        .unwrap();

        assert_eq!(payload.hospital_type, "Teaching");
        assert!(payload.password.is_none());
    }
}
