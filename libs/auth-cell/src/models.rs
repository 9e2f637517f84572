use serde::{Deserialize, Serialize};

use shared_models::user::{PublicUser, UserType};
use support_network_cell::{SupportLinkView, SupportMember};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub user_type: Option<UserType>,
    pub share_code: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

/// Caller profile together with whichever side of the support network they sit on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeView {
    #[serde(flatten)]
    pub user: PublicUser,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub support_network: Vec<SupportMember>,
    pub supporting_pregnant: Option<SupportLinkView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Share code is required for support network members")]
    MissingShareCode,

    #[error("Relationship is required for support network members")]
    MissingRelationship,

    #[error("Invalid share code")]
    InvalidShareCode,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}
