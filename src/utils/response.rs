use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

use crate::models::{AccountKind, LoginOutcome};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful.";

/// Success envelope shared by every JSON endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn into_http(self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

/// Create success response for a registration
pub fn account_added(kind: AccountKind) -> HttpResponse {
    ApiResponse::ok(kind.added_message(), json!({ "added": true })).into_http()
}

/// Create success response for a login, exposing only the display name
pub fn login_success(outcome: &LoginOutcome) -> HttpResponse {
    ApiResponse::ok(LOGIN_SUCCESS_MESSAGE, json!({ "name": outcome.name })).into_http()
}
