use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shared_models::user::{LinkStatus, UserContact, UserType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupportLink {
    pub id: String,
    pub pregnant_id: String,
    pub support_id: String,
    pub relationship: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A support member as seen by the subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportMember {
    pub id: String,
    pub relationship: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub support: UserContact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectContact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub share_code: Option<String>,
}

/// The subject a support member is linked to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportLinkView {
    pub id: String,
    pub relationship: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub pregnant: SubjectContact,
}

/// Support network seen from either side of the link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SupportNetworkView {
    Pregnant { members: Vec<SupportMember> },
    Support { link: SupportLinkView },
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct MemberRow {
    pub id: String,
    pub relationship: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub support_id: String,
    pub support_name: String,
    pub support_email: String,
    pub support_phone: Option<String>,
}

impl From<MemberRow> for SupportMember {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            relationship: row.relationship,
            status: row.status,
            created_at: row.created_at,
            support: UserContact {
                id: row.support_id,
                name: row.support_name,
                email: row.support_email,
                phone: row.support_phone,
            },
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct LinkRow {
    pub id: String,
    pub relationship: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub pregnant_id: String,
    pub pregnant_name: String,
    pub pregnant_email: String,
    pub pregnant_phone: Option<String>,
    pub pregnant_share_code: Option<String>,
}

impl From<LinkRow> for SupportLinkView {
    fn from(row: LinkRow) -> Self {
        Self {
            id: row.id,
            relationship: row.relationship,
            status: row.status,
            created_at: row.created_at,
            pregnant: SubjectContact {
                id: row.pregnant_id,
                name: row.pregnant_name,
                email: row.pregnant_email,
                phone: row.pregnant_phone,
                share_code: row.pregnant_share_code,
            },
        }
    }
}

/// Caller role joined with their (optional) support link.
#[derive(Debug, Clone, FromRow)]
pub struct AccessRow {
    pub user_type: UserType,
    pub pregnant_id: Option<String>,
    pub status: Option<LinkStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSupportNetworkRequest {
    pub share_code: String,
    pub relationship: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkStatusRequest {
    pub status: LinkStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum SupportNetworkError {
    #[error("User not found")]
    UserNotFound,

    #[error("Support link not found")]
    LinkNotFound,

    #[error("Invalid share code")]
    InvalidShareCode,

    #[error("Only support network members can join a pregnant user's network")]
    NotSupportMember,

    #[error("User is already linked to a pregnant user")]
    AlreadyLinked,

    #[error("Access denied")]
    AccessDenied,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for SupportNetworkError {
    fn from(err: sqlx::Error) -> Self {
        SupportNetworkError::DatabaseError(err.to_string())
    }
}
