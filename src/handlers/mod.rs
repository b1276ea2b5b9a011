// Registration handlers
pub mod account_handler;

// Login handlers
pub mod auth_handler;

// Record listing
pub mod records;

// Health check handler
pub mod health;

// API handlers
pub mod api;

use actix_web::{error::InternalError, web, ResponseError};

use crate::config::constants::MAX_JSON_PAYLOAD_BYTES;
use crate::error::CarelineError;
use crate::validation::ValidationResult;

/// JSON extractor settings. Unreadable bodies are reported like any other
/// validation failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_PAYLOAD_BYTES)
        .error_handler(|err, _req| {
            let mut result = ValidationResult::new();
            result.add_error("body", err.to_string());
            let response = CarelineError::Validation(result).error_response();
            InternalError::from_response(err, response).into()
        })
}
