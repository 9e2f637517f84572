use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::user::UserType;
use shared_utils::extractor::ApiJson;
use shared_utils::AppState;

use crate::models::{AuthError, LoginRequest, RegisterRequest};
use crate::services::account::AccountService;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::UserNotFound => AppError::NotFound(err.to_string()),
            AuthError::EmailTaken => AppError::Conflict(err.to_string()),
            AuthError::MissingShareCode
            | AuthError::MissingRelationship
            | AuthError::InvalidShareCode => AppError::BadRequest(err.to_string()),
            AuthError::ValidationError(msg) => AppError::ValidationError(msg),
            AuthError::TokenError(msg) => AppError::Internal(msg),
            AuthError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    debug!("Registering {}", request.email);

    let service = AccountService::new(&state.db, &state.config);
    let response = service.register(request).await?;

    let message = match response.user.user_type {
        UserType::SupportNetwork => "Registration completed and linked successfully",
        UserType::Pregnant => "Registration completed successfully",
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": response,
            "message": message
        })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state.db, &state.config);
    let response = service.login(request).await?;

    Ok(Json(json!({
        "success": true,
        "data": response
    })))
}

/// Tokens are stateless, so there is nothing to revoke.
pub async fn logout() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state.db, &state.config);
    let profile = service.me(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "data": profile
    })))
}
