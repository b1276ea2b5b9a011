mod common;

use actix_web::{test, App};
use serde_json::{json, Value};

use careline_server::server::startup::configure_routes;

use common::{app_state_with_memory, doctor_body, patient_body};

#[actix_web::test]
async fn test_patient_login_returns_name() {
    let (state, _storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/patients/new")
        .set_json(patient_body("ama@example.com"))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "ama@example.com", "password": "correct-horse" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful.");
    assert_eq!(body["data"], json!({ "name": "Ama Mensah" }));
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let (state, _storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/patients/new")
        .set_json(patient_body("ama@example.com"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "ghost@example.com", "password": "correct-horse" }))
        .to_request();
    let unknown = test::call_service(&app, req).await;
    assert_eq!(unknown.status().as_u16(), 401);
    let unknown: Value = test::read_body_json(unknown).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "ama@example.com", "password": "wrong-horse" }))
        .to_request();
    let wrong = test::call_service(&app, req).await;
    assert_eq!(wrong.status().as_u16(), 401);
    let wrong: Value = test::read_body_json(wrong).await;

    assert_eq!(unknown, wrong);
    assert_eq!(wrong["message"], "Invalid email or password.");
}

#[actix_web::test]
async fn test_doctor_login() {
    let (state, _storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/doctors/new")
        .set_json(doctor_body("kofi@example.com", "online"))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::post()
        .uri("/doctors/login")
        .set_json(json!({ "Email": "kofi@example.com", "Password": "stethoscope" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], "Dr. Kofi Boateng");

    let req = test::TestRequest::post()
        .uri("/doctors/login")
        .set_json(json!({ "Email": "kofi@example.com", "Password": "" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);
}

#[actix_web::test]
async fn test_login_requires_both_fields() {
    let (state, _storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "ama@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "password");
}
