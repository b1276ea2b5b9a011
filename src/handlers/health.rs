use actix_web::{web, HttpResponse, Result as ActixResult};
use serde_json::json;
use tracing::warn;

use crate::server::app_state::AppState;

/// HTTP health check endpoint
pub async fn health_check() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

/// HTTP readiness check endpoint
pub async fn readiness_check(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let storage_ok = match app_state.storage.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!("Readiness storage check failed: {}", e);
            false
        }
    };

    let status = if storage_ok { "ready" } else { "degraded" };
    let body = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dependencies": {
            "database": storage_ok,
            "storage_type": app_state.config.storage.to_string(),
        }
    });

    if storage_ok {
        Ok(HttpResponse::Ok().json(body))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(body))
    }
}
