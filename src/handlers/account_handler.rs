use actix_web::{web, HttpResponse};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::models::{AccountKind, NewDoctor, NewHospital, NewPatient};
use crate::server::app_state::AppState;
use crate::utils::response::account_added;
use crate::validation::parse_payload;

/// POST /patients/new
#[instrument(skip_all)]
pub async fn register_patient(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse> {
    let payload: NewPatient = parse_payload(body.into_inner())?;
    debug!("Patient payload accepted");

    state.registrar.register_patient(payload).await?;
    Ok(account_added(AccountKind::Patient))
}

/// POST /hospitals/new
#[instrument(skip_all)]
pub async fn register_hospital(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse> {
    let payload: NewHospital = parse_payload(body.into_inner())?;
    debug!("Hospital payload accepted");

    state.registrar.register_hospital(payload).await?;
    Ok(account_added(AccountKind::Hospital))
}

/// POST /doctors/new
#[instrument(skip_all)]
pub async fn register_doctor(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse> {
    let payload: NewDoctor = parse_payload(body.into_inner())?;
    debug!("Doctor payload accepted");

    state.registrar.register_doctor(payload).await?;
    Ok(account_added(AccountKind::Doctor))
}
