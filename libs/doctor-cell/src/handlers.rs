use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_utils::validation::parse_date;
use shared_utils::AppState;

use crate::models::DoctorError;
use crate::services::doctor::DoctorService;

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let doctors = DoctorService::new(&state.db).list_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "data": doctors
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&state.db).get_doctor(&doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": doctor
    })))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let date = match query.date.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => parse_date(value).map_err(AppError::ValidationError)?,
        _ => return Err(AppError::ValidationError("Date is required".to_string())),
    };

    let slots = DoctorService::new(&state.db)
        .available_slots(&doctor_id, date)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": slots
    })))
}
