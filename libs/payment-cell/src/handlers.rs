use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;
use shared_utils::AppState;
use support_network_cell::require_accessible_subject;

use crate::models::{CreatePaymentRequest, PaymentError};
use crate::services::ledger::PaymentService;

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::AppointmentNotFound | PaymentError::NotFound => AppError::NotFound(err.to_string()),
            PaymentError::AlreadyPaid => AppError::Conflict(err.to_string()),
            PaymentError::ValidationError(msg) => AppError::ValidationError(msg),
            PaymentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn list_payments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;

    let payments = PaymentService::new(&state.db).list_payments(&subject_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": payments
    })))
}

#[axum::debug_handler]
pub async fn create_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;

    let payment = PaymentService::new(&state.db)
        .create_payment(&subject_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": payment
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(payment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;

    let payment = PaymentService::new(&state.db)
        .get_payment(&subject_id, &payment_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": payment
    })))
}
