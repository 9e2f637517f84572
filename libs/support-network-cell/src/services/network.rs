use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{is_unique_violation, Database};
use shared_models::user::{LinkStatus, UserType};
use shared_utils::validation::require_non_empty;

use crate::models::{
    JoinSupportNetworkRequest, LinkRow, MemberRow, SupportLink, SupportLinkView, SupportMember,
    SupportNetworkError, SupportNetworkView,
};

const MEMBER_COLUMNS: &str = "l.id, l.relationship, l.status, l.created_at,
    u.id AS support_id, u.name AS support_name, u.email AS support_email, u.phone AS support_phone";

const LINK_COLUMNS: &str = "l.id, l.relationship, l.status, l.created_at,
    u.id AS pregnant_id, u.name AS pregnant_name, u.email AS pregnant_email,
    u.phone AS pregnant_phone, u.share_code AS pregnant_share_code";

pub struct SupportNetworkService {
    db: Database,
}

impl SupportNetworkService {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    pub async fn get_network(&self, user_id: &str) -> Result<SupportNetworkView, SupportNetworkError> {
        let user_type: Option<UserType> = sqlx::query_scalar("SELECT user_type FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        match user_type {
            Some(UserType::Pregnant) => {
                let members = self.list_members(user_id).await?;
                Ok(SupportNetworkView::Pregnant { members })
            }
            Some(UserType::SupportNetwork) => match self.find_link_for_support(user_id).await? {
                Some(link) if link.status == LinkStatus::Active => Ok(SupportNetworkView::Support { link }),
                _ => Err(SupportNetworkError::AccessDenied),
            },
            None => Err(SupportNetworkError::AccessDenied),
        }
    }

    pub async fn list_members(&self, pregnant_id: &str) -> Result<Vec<SupportMember>, SupportNetworkError> {
        let rows: Vec<MemberRow> = sqlx::query_as(&format!(
            "SELECT {MEMBER_COLUMNS}
             FROM support_links l
             JOIN users u ON u.id = l.support_id
             WHERE l.pregnant_id = ?
             ORDER BY l.created_at DESC, l.rowid DESC"
        ))
        .bind(pregnant_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(SupportMember::from).collect())
    }

    pub async fn find_link_for_support(
        &self,
        support_id: &str,
    ) -> Result<Option<SupportLinkView>, SupportNetworkError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS}
             FROM support_links l
             JOIN users u ON u.id = l.pregnant_id
             WHERE l.support_id = ?"
        ))
        .bind(support_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(SupportLinkView::from))
    }

    /// Links an existing support member to the subject owning `share_code`.
    pub async fn join(
        &self,
        user_id: &str,
        request: JoinSupportNetworkRequest,
    ) -> Result<SupportLinkView, SupportNetworkError> {
        require_non_empty(&request.share_code, "Share code").map_err(SupportNetworkError::ValidationError)?;
        require_non_empty(&request.relationship, "Relationship").map_err(SupportNetworkError::ValidationError)?;

        let user_type: UserType = sqlx::query_scalar("SELECT user_type FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(SupportNetworkError::UserNotFound)?;

        if user_type != UserType::SupportNetwork {
            return Err(SupportNetworkError::NotSupportMember);
        }

        let mut conn = self.db.pool().acquire().await?;
        let pregnant_id = find_pregnant_by_share_code(&mut *conn, &request.share_code)
            .await?
            .ok_or(SupportNetworkError::InvalidShareCode)?;

        insert_link(&mut *conn, &pregnant_id, user_id, request.relationship.trim()).await?;
        drop(conn);

        info!("Support member {} joined network of {}", user_id, pregnant_id);

        self.find_link_for_support(user_id)
            .await?
            .ok_or(SupportNetworkError::LinkNotFound)
    }

    /// Lets the subject activate or deactivate one of their links.
    pub async fn update_link_status(
        &self,
        pregnant_id: &str,
        link_id: &str,
        status: LinkStatus,
    ) -> Result<SupportMember, SupportNetworkError> {
        let result = sqlx::query(
            "UPDATE support_links SET status = ?, updated_at = ? WHERE id = ? AND pregnant_id = ?",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(link_id)
        .bind(pregnant_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            warn!("Link {} not owned by {}", link_id, pregnant_id);
            return Err(SupportNetworkError::LinkNotFound);
        }

        info!("Support link {} set to {}", link_id, status);

        let row: MemberRow = sqlx::query_as(&format!(
            "SELECT {MEMBER_COLUMNS}
             FROM support_links l
             JOIN users u ON u.id = l.support_id
             WHERE l.id = ?"
        ))
        .bind(link_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(row.into())
    }
}

/// Looks up the pregnant user owning a share code. Codes match case-insensitively.
pub async fn find_pregnant_by_share_code(
    conn: &mut SqliteConnection,
    share_code: &str,
) -> Result<Option<String>, sqlx::Error> {
    let code = share_code.trim().to_uppercase();
    debug!("Looking up share code {}", code);

    sqlx::query_scalar("SELECT id FROM users WHERE share_code = ? AND user_type = 'PREGNANT'")
        .bind(code)
        .fetch_optional(conn)
        .await
}

/// Inserts an ACTIVE link. A second link for the same support member fails
/// with `AlreadyLinked`.
pub async fn insert_link(
    conn: &mut SqliteConnection,
    pregnant_id: &str,
    support_id: &str,
    relationship: &str,
) -> Result<SupportLink, SupportNetworkError> {
    let now = Utc::now();
    let link = SupportLink {
        id: Uuid::new_v4().to_string(),
        pregnant_id: pregnant_id.to_string(),
        support_id: support_id.to_string(),
        relationship: relationship.to_string(),
        status: LinkStatus::Active,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO support_links (id, pregnant_id, support_id, relationship, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&link.id)
    .bind(&link.pregnant_id)
    .bind(&link.support_id)
    .bind(&link.relationship)
    .bind(link.status)
    .bind(link.created_at)
    .bind(link.updated_at)
    .execute(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            SupportNetworkError::AlreadyLinked
        } else {
            SupportNetworkError::from(e)
        }
    })?;

    Ok(link)
}
