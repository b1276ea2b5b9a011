// Common test helpers for integration tests

#![allow(dead_code)]

use actix_web::web;
use serde_json::{json, Value};
use std::sync::Arc;

use careline_server::config::settings::{Config, HashingConfig, StorageType};
use careline_server::server::app_state::AppState;
use careline_server::storage::memory::MemoryStorage;

/// Configuration with argon2 costs low enough for tests
pub fn test_config() -> Config {
    Config {
        storage: StorageType::Memory,
        hashing: HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            rehash_on_login: false,
        },
        ..Config::default()
    }
}

pub fn app_state_with_memory() -> (web::Data<AppState>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let state = AppState::new_with_storage(storage.clone(), &test_config())
        .expect("Failed to build AppState");
    (web::Data::new(state), storage)
}

pub fn patient_body(email: &str) -> Value {
    json!({
        "name": "Ama Mensah",
        "location_address": "12 Ring Road, Accra",
        "country": "Ghana",
        "tel": "0201234567",
        "email": email,
        "referral_no": null,
        "access_no": "ACC-100",
        "age": 34,
        "sex": "F",
        "password": "correct-horse"
    })
}

pub fn hospital_body(email: &str) -> Value {
    json!({
        "HospitalName": "Korle Bu Teaching Hospital",
        "Address": "Guggisberg Ave",
        "Country": "Ghana",
        "Type": "Teaching",
        "EmergencyLine": "112",
        "HelpLine": "0302000000",
        "RegNumber": "REG-001",
        "Email": email,
        "Telephone": "0302000001",
        "Docs": "license.pdf",
        "ContactNumber": "0302000002"
    })
}

pub fn doctor_body(email: &str, status: &str) -> Value {
    json!({
        "DoctorName": "Dr. Kofi Boateng",
        "Specialty": "Cardiology",
        "AccessNumber": "AC-55",
        "LicenseNumber": "MDC-55",
        "Status": status,
        "Email": email,
        "Telephone": "0207654321",
        "Docs": "cert.pdf",
        "Password": "stethoscope",
        "ContactNumber": "0247654321"
    })
}
