mod common;

use actix_web::{test, App};
use serde_json::Value;

use careline_server::server::startup::configure_routes;

use common::{app_state_with_memory, patient_body};

#[actix_web::test]
async fn test_record_list_hides_password_hashes() {
    let (state, _storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    for i in 0..12 {
        let mut body = patient_body(&format!("patient{}@example.com", i));
        body["access_no"] = Value::Null;
        let req = test::TestRequest::post()
            .uri("/patients/new")
            .set_json(body)
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(records[0]["email"], "patient0@example.com");

    let raw = body.to_string();
    assert!(!raw.contains("password"));
    assert!(!raw.contains("argon2"));
    assert!(!raw.contains("correct-horse"));
}

#[actix_web::test]
async fn test_health_endpoints() {
    let (state, _storage) = app_state_with_memory();
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["dependencies"]["storage_type"], "memory");

    let req = test::TestRequest::get().uri("/api/info").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "CareLine Server");
}
