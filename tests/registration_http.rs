mod common;

use actix_web::{test, App};
use serde_json::Value;

use careline_server::models::AccountKind;
use careline_server::server::startup::configure_routes;

use common::{app_state_with_memory, doctor_body, hospital_body, patient_body};

#[actix_web::test]
async fn test_patient_registration_then_duplicate() {
    let (state, storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/patients/new")
        .set_json(patient_body("ama@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User added successfully.");
    assert_eq!(body["data"]["added"], true);

    let req = test::TestRequest::post()
        .uri("/patients/new")
        .set_json(patient_body("ama@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User already exists.");

    assert_eq!(storage.count(AccountKind::Patient).await, 1);
}

#[actix_web::test]
async fn test_patient_domain_case_is_the_same_account() {
    let (state, storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    for email in ["ama@example.com", "ama@EXAMPLE.com"] {
        let req = test::TestRequest::post()
            .uri("/patients/new")
            .set_json(patient_body(email))
            .to_request();
        test::call_service(&app, req).await;
    }

    assert_eq!(storage.count(AccountKind::Patient).await, 1);
}

#[actix_web::test]
async fn test_patient_local_part_case_is_a_different_account() {
    let (state, storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    for email in ["ama@example.com", "AMA@example.com"] {
        let req = test::TestRequest::post()
            .uri("/patients/new")
            .set_json(patient_body(email))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
    }

    assert_eq!(storage.count(AccountKind::Patient).await, 2);
}

#[actix_web::test]
async fn test_invalid_patient_reports_every_field() {
    let (state, storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let mut body = patient_body("not-an-email");
    body["age"] = Value::String("thirty".to_string());
    body.as_object_mut().unwrap().remove("country");

    let req = test::TestRequest::post()
        .uri("/patients/new")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"age"));
    assert!(fields.contains(&"country"));
    assert_eq!(storage.count(AccountKind::Patient).await, 0);
}

#[actix_web::test]
async fn test_malformed_json_is_a_validation_error() {
    let (state, _storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/patients/new")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "body");
}

#[actix_web::test]
async fn test_doctor_status_is_checked() {
    let (state, storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/doctors/new")
        .set_json(doctor_body("kofi@example.com", "Pending"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);
    assert_eq!(storage.count(AccountKind::Doctor).await, 0);

    let req = test::TestRequest::post()
        .uri("/doctors/new")
        .set_json(doctor_body("kofi@example.com", "ONLINE"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "doctor added successfully.");

    let doctor = storage.find_doctor("kofi@example.com").await.unwrap();
    assert!(doctor.is_online);
    assert!(doctor.password_hash.starts_with("$argon2id$"));

    let req = test::TestRequest::post()
        .uri("/doctors/new")
        .set_json(doctor_body("kofi@example.com", "offline"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "doctor already exists.");
}

#[actix_web::test]
async fn test_hospital_registration_then_duplicate() {
    let (state, storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/hospitals/new")
        .set_json(hospital_body("info@korlebu.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Hospital added successfully.");
    assert_eq!(body["data"]["added"], true);

    let req = test::TestRequest::post()
        .uri("/hospitals/new")
        .set_json(hospital_body("info@korlebu.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Hospital already exists.");

    assert_eq!(storage.count(AccountKind::Hospital).await, 1);
}
