use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::AccountKind;
use crate::validation::ValidationResult;

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

/// Message returned in place of internal failure details.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// Unified error type for the entire application
#[derive(Debug, Error)]
pub enum CarelineError {
    #[error("Validation error: {0}")]
    Validation(ValidationResult),

    #[error("{}", .0.duplicate_message())]
    Duplicate(AccountKind),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CarelineError>;

pub type AppError = CarelineError;

impl CarelineError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        Self::Internal(msg.into())
    }

    /// The single undifferentiated login failure.
    pub fn invalid_credentials() -> Self {
        Self::Authentication(INVALID_CREDENTIALS_MESSAGE.to_string())
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CarelineError::Validation(_) => "validation",
            CarelineError::Duplicate(_) => "duplicate",
            CarelineError::Authentication(_) => "auth",
            CarelineError::Storage(_) => "storage",
            CarelineError::Database(_) => "database",
            CarelineError::Config(_) => "config",
            CarelineError::Hashing(_) => "hashing",
            CarelineError::NotFound(_) => "not_found",
            CarelineError::Internal(_) => "internal",
        }
    }

    /// Get HTTP status code for this error
    pub fn http_status_code(&self) -> u16 {
        match self {
            CarelineError::Validation(_) => 422,
            CarelineError::Duplicate(_) => 400,
            CarelineError::Authentication(_) => 401,
            CarelineError::NotFound(_) => 404,
            CarelineError::Storage(_)
            | CarelineError::Database(_)
            | CarelineError::Config(_)
            | CarelineError::Hashing(_)
            | CarelineError::Internal(_) => 500,
        }
    }

    /// Message safe to show to API clients. Persistence and internal
    /// failures never leak their details.
    pub fn public_message(&self) -> String {
        match self {
            CarelineError::Validation(_) => "Validation failed.".to_string(),
            CarelineError::Duplicate(kind) => kind.duplicate_message().to_string(),
            CarelineError::Authentication(_) => INVALID_CREDENTIALS_MESSAGE.to_string(),
            CarelineError::NotFound(msg) => msg.clone(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Convert to JSON for API responses
    pub fn to_json(&self) -> serde_json::Value {
        let message = self.public_message();
        let mut body = serde_json::json!({
            "success": false,
            "message": message,
            "detail": message,
        });
        if let CarelineError::Validation(result) = self {
            body["errors"] = serde_json::json!(result.errors);
        }
        body
    }
}

impl ResponseError for CarelineError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_json())
    }
}

impl From<tokio::task::JoinError> for CarelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        CarelineError::Internal(format!("Blocking task failed: {}", err))
    }
}
