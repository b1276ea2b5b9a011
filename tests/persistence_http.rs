mod common;

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use careline_server::models::{
    AccountId, AccountKind, DoctorRecord, HospitalRecord, PatientRecord, PatientView,
    StoredCredential,
};
use careline_server::server::app_state::AppState;
use careline_server::server::startup::configure_routes;
use careline_server::storage::{Result, Storage, StorageError};

use common::{patient_body, test_config};

const DB_DETAIL: &str = "Duplicate entry 'secret-row' for key 'uq_internal_detail'";

/// Backend whose writes and credential reads always fail
struct FailingStorage;

fn db_failure<T>() -> Result<T> {
    Err(StorageError::Database(DB_DETAIL.to_string()))
}

#[async_trait]
impl Storage for FailingStorage {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    async fn patient_exists(&self, _email: &str, _referral_no: Option<&str>) -> Result<bool> {
        Ok(false)
    }

    async fn create_patient(&self, _patient: &PatientRecord) -> Result<AccountId> {
        db_failure()
    }

    async fn list_patients(&self, _limit: u32) -> Result<Vec<PatientView>> {
        db_failure()
    }

    async fn hospital_exists(&self, _email: &str) -> Result<bool> {
        db_failure()
    }

    async fn create_hospital(&self, _hospital: &HospitalRecord) -> Result<AccountId> {
        db_failure()
    }

    async fn doctor_exists(&self, _email: &str) -> Result<bool> {
        db_failure()
    }

    async fn create_doctor(&self, _doctor: &DoctorRecord) -> Result<AccountId> {
        db_failure()
    }

    async fn get_credentials(
        &self,
        _kind: AccountKind,
        _email: &str,
    ) -> Result<Option<StoredCredential>> {
        db_failure()
    }

    async fn update_password_hash(
        &self,
        _kind: AccountKind,
        _email: &str,
        _password_hash: &str,
    ) -> Result<()> {
        db_failure()
    }
}

fn failing_state() -> web::Data<AppState> {
    let state = AppState::new_with_storage(Arc::new(FailingStorage), &test_config())
        .expect("Failed to build AppState");
    web::Data::new(state)
}

async fn assert_generic_failure(resp: actix_web::dev::ServiceResponse) {
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Internal server error.");

    let raw = body.to_string();
    assert!(!raw.contains("secret-row"));
    assert!(!raw.contains("uq_internal_detail"));
}

#[actix_web::test]
async fn test_failed_patient_insert_hides_database_detail() {
    let app =
        test::init_service(App::new().app_data(failing_state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/patients/new")
        .set_json(patient_body("ama@example.com"))
        .to_request();
    assert_generic_failure(test::call_service(&app, req).await).await;
}

#[actix_web::test]
async fn test_failed_credential_lookup_hides_database_detail() {
    let app =
        test::init_service(App::new().app_data(failing_state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "ama@example.com", "password": "correct-horse" }))
        .to_request();
    assert_generic_failure(test::call_service(&app, req).await).await;
}

#[actix_web::test]
async fn test_failed_listing_hides_database_detail() {
    let app =
        test::init_service(App::new().app_data(failing_state()).configure(configure_routes)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    assert_generic_failure(test::call_service(&app, req).await).await;
}
