use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;
use shared_utils::AppState;
use support_network_cell::require_accessible_subject;

use crate::models::{AppointmentError, CreateAppointmentRequest};
use crate::services::booking::BookingService;

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::DoctorNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::SlotUnavailable | AppointmentError::InvalidStatusTransition(_) => {
                AppError::Conflict(err.to_string())
            }
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;

    let appointments = BookingService::new(&state.db)
        .list_appointments(&subject_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": appointments
    })))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;
    debug!("User {} booking for subject {}", user.id, subject_id);

    let appointment = BookingService::new(&state.db)
        .create_appointment(&subject_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": appointment
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;

    let appointment = BookingService::new(&state.db)
        .get_appointment(&subject_id, &appointment_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;

    BookingService::new(&state.db)
        .cancel_appointment(&subject_id, &appointment_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled successfully"
    })))
}
