use actix_web::{web, HttpResponse};
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;
use crate::models::{AccountKind, DoctorLoginData, LoginData};
use crate::server::app_state::AppState;
use crate::utils::response::login_success;
use crate::validation::parse_payload;

/// POST /login
#[instrument(skip_all)]
pub async fn login(state: web::Data<AppState>, body: web::Json<Value>) -> Result<HttpResponse> {
    let LoginData { email, password } = parse_payload(body.into_inner())?;

    let outcome = state.auth.login(AccountKind::Patient, &email, password).await?;
    Ok(login_success(&outcome))
}

/// POST /doctors/login
#[instrument(skip_all)]
pub async fn doctor_login(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse> {
    let DoctorLoginData { email, password } = parse_payload(body.into_inner())?;

    let outcome = state.auth.login(AccountKind::Doctor, &email, password).await?;
    Ok(login_success(&outcome))
}
