//! API handlers for system information

use actix_web::{HttpResponse, Result};
use serde_json::json;

/// Get API information
pub async fn api_info() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "name": "CareLine Server",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Registration and login backend for patients, hospitals and doctors",
        "endpoints": [
            "POST /patients/new",
            "POST /hospitals/new",
            "POST /doctors/new",
            "POST /login",
            "POST /doctors/login",
            "GET /"
        ]
    })))
}
