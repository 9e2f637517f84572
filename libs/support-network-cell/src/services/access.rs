use tracing::{debug, warn};

use shared_database::Database;
use shared_models::error::AppError;
use shared_models::user::{LinkStatus, UserType};

use crate::models::{AccessRow, SupportNetworkError};

/// Decides whose records a caller may act on: their own when they are the
/// pregnant subject, the linked subject's through an active support link,
/// nobody otherwise.
pub struct SupportAccessService {
    db: Database,
}

impl SupportAccessService {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    pub async fn resolve_accessible_subject(
        &self,
        user_id: &str,
    ) -> Result<Option<String>, SupportNetworkError> {
        let row: Option<AccessRow> = sqlx::query_as(
            "SELECT u.user_type, l.pregnant_id, l.status
             FROM users u
             LEFT JOIN support_links l ON l.support_id = u.id
             WHERE u.id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        let subject = row.and_then(|row| accessible_subject(user_id, row));
        debug!("Resolved accessible subject for {}: {:?}", user_id, subject);
        Ok(subject)
    }
}

pub fn accessible_subject(user_id: &str, row: AccessRow) -> Option<String> {
    match row.user_type {
        UserType::Pregnant => Some(user_id.to_string()),
        UserType::SupportNetwork => match (row.pregnant_id, row.status) {
            (Some(pregnant_id), Some(LinkStatus::Active)) => Some(pregnant_id),
            _ => None,
        },
    }
}

/// Resolves the caller's subject or fails with 403.
pub async fn require_accessible_subject(db: &Database, user_id: &str) -> Result<String, AppError> {
    SupportAccessService::new(db)
        .resolve_accessible_subject(user_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| {
            warn!("No accessible subject for user {}", user_id);
            AppError::access_denied()
        })
}
