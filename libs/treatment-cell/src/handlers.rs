use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;
use shared_utils::AppState;
use support_network_cell::require_accessible_subject;

use crate::models::{NewRegimenEntry, TreatmentError};
use crate::services::ledger::TreatmentService;

impl From<TreatmentError> for AppError {
    fn from(err: TreatmentError) -> Self {
        match err {
            TreatmentError::ValidationError(msg) => AppError::ValidationError(msg),
            TreatmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn get_treatment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;

    let treatment = TreatmentService::new(&state.db).get_treatment(&subject_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": treatment
    })))
}

#[axum::debug_handler]
pub async fn add_medication(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<NewRegimenEntry>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;

    let medication = TreatmentService::new(&state.db)
        .add_medication(&subject_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": medication
        })),
    ))
}

#[axum::debug_handler]
pub async fn add_supplement(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<NewRegimenEntry>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let subject_id = require_accessible_subject(&state.db, &user.id).await?;

    let supplement = TreatmentService::new(&state.db)
        .add_supplement(&subject_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": supplement
        })),
    ))
}
