use actix_web::{web, HttpResponse};
use tracing::error;

use crate::config::constants::RECORD_LIST_LIMIT;
use crate::error::{CarelineError, Result};
use crate::server::app_state::AppState;

/// GET / lists the first patients, never their password hashes
pub async fn list_records(state: web::Data<AppState>) -> Result<HttpResponse> {
    let patients = state
        .storage
        .list_patients(RECORD_LIST_LIMIT)
        .await
        .map_err(|e| {
            error!("Failed to list patients: {}", e);
            CarelineError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(patients))
}
