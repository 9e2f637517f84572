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

use crate::models::{JoinSupportNetworkRequest, SupportNetworkError, UpdateLinkStatusRequest};
use crate::services::network::SupportNetworkService;

impl From<SupportNetworkError> for AppError {
    fn from(err: SupportNetworkError) -> Self {
        match err {
            SupportNetworkError::AccessDenied => AppError::access_denied(),
            SupportNetworkError::UserNotFound => AppError::NotFound(err.to_string()),
            SupportNetworkError::LinkNotFound => AppError::NotFound(err.to_string()),
            SupportNetworkError::InvalidShareCode
            | SupportNetworkError::NotSupportMember
            | SupportNetworkError::AlreadyLinked => AppError::BadRequest(err.to_string()),
            SupportNetworkError::ValidationError(msg) => AppError::ValidationError(msg),
            SupportNetworkError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn get_support_network(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    debug!("Loading support network for {}", user.id);

    let view = SupportNetworkService::new(&state.db).get_network(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": view
    })))
}

#[axum::debug_handler]
pub async fn join_support_network(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<JoinSupportNetworkRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let link = SupportNetworkService::new(&state.db).join(&user.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": link
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_link_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(link_id): Path<String>,
    ApiJson(request): ApiJson<UpdateLinkStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let member = SupportNetworkService::new(&state.db)
        .update_link_status(&user.id, &link_id, request.status)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": member
    })))
}
