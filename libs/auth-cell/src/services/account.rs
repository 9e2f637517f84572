use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{is_unique_violation, Database};
use shared_models::user::{PublicUser, UserRecord, UserType};
use shared_utils::jwt::issue_token;
use shared_utils::password::{hash_password_blocking, verify_password_blocking};
use shared_utils::validation::{is_valid_email, require_min_len};
use support_network_cell::services::network::{find_pregnant_by_share_code, insert_link};
use support_network_cell::{SupportNetworkError, SupportNetworkService};

use crate::models::{AuthError, AuthResponse, LoginRequest, MeView, RegisterRequest};
use crate::services::share_code::generate_share_code;

const MAX_SHARE_CODE_ATTEMPTS: usize = 10;

pub struct AccountService {
    db: Database,
    jwt_secret: String,
    expires_in_hours: i64,
}

/// Fields of a registration that survived validation.
#[derive(Debug)]
struct NewAccount {
    email: String,
    name: String,
    phone: Option<String>,
    user_type: UserType,
    link: Option<(String, String)>,
}

impl AccountService {
    pub fn new(db: &Database, config: &AppConfig) -> Self {
        Self {
            db: db.clone(),
            jwt_secret: config.jwt_secret.clone(),
            expires_in_hours: config.jwt_expires_in_hours,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let account = validate_registration(&request)?;

        if self.email_exists(&account.email).await? {
            return Err(AuthError::EmailTaken);
        }

        if let Some((share_code, _)) = &account.link {
            let mut conn = self.db.pool().acquire().await?;
            if find_pregnant_by_share_code(&mut *conn, share_code).await?.is_none() {
                return Err(AuthError::InvalidShareCode);
            }
        }

        let password_hash = hash_password_blocking(request.password)
            .await
            .map_err(AuthError::DatabaseError)?;

        for attempt in 1..=MAX_SHARE_CODE_ATTEMPTS {
            let share_code = match account.user_type {
                UserType::Pregnant => Some(generate_share_code()),
                UserType::SupportNetwork => None,
            };

            match self.create_account(&account, &password_hash, share_code).await {
                Ok(user) => {
                    info!("Registered {} user {}", user.user_type, user.id);
                    let token = self.token_for(&user.id, &user.email)?;
                    return Ok(AuthResponse { user, token });
                }
                Err(CreateError::ShareCodeTaken) => {
                    warn!("Share code collision on attempt {}, retrying", attempt);
                }
                Err(CreateError::Auth(err)) => return Err(err),
            }
        }

        Err(AuthError::DatabaseError(
            "Could not allocate a unique share code".to_string(),
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = request.email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::ValidationError("Invalid email".to_string()));
        }
        require_min_len(&request.password, 6, "Password must be at least 6 characters")
            .map_err(AuthError::ValidationError)?;

        let record: Option<UserRecord> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;

        let Some(record) = record else {
            debug!("Login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let matches = verify_password_blocking(request.password, record.password_hash.clone())
            .await
            .map_err(AuthError::DatabaseError)?;
        if !matches {
            warn!("Wrong password for user {}", record.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_for(&record.id, &record.email)?;
        Ok(AuthResponse {
            user: record.into(),
            token,
        })
    }

    pub async fn me(&self, user_id: &str) -> Result<MeView, AuthError> {
        let record: UserRecord = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let network = SupportNetworkService::new(&self.db);
        let (support_network, supporting_pregnant) = match record.user_type {
            UserType::Pregnant => (network.list_members(&record.id).await.map_err(network_error)?, None),
            UserType::SupportNetwork => (
                Vec::new(),
                network.find_link_for_support(&record.id).await.map_err(network_error)?,
            ),
        };

        Ok(MeView {
            updated_at: record.updated_at,
            user: record.into(),
            support_network,
            supporting_pregnant,
        })
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(found.is_some())
    }

    /// Writes the user and its treatment or support link in one transaction.
    async fn create_account(
        &self,
        account: &NewAccount,
        password_hash: &str,
        share_code: Option<String>,
    ) -> Result<PublicUser, CreateError> {
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: account.email.clone(),
            password_hash: password_hash.to_string(),
            name: account.name.clone(),
            phone: account.phone.clone(),
            user_type: account.user_type,
            share_code,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await.map_err(AuthError::from)?;

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, phone, user_type, share_code, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.name)
        .bind(&record.phone)
        .bind(record.user_type)
        .bind(&record.share_code)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(classify_user_insert_error)?;

        match &account.link {
            None => {
                sqlx::query(
                    "INSERT INTO treatments (id, user_id, created_at, updated_at) VALUES (?, ?, ?, ?)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&record.id)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(AuthError::from)?;
            }
            Some((share_code, relationship)) => {
                let pregnant_id = find_pregnant_by_share_code(&mut *tx, share_code)
                    .await
                    .map_err(AuthError::from)?
                    .ok_or(AuthError::InvalidShareCode)?;
                insert_link(&mut *tx, &pregnant_id, &record.id, relationship)
                    .await
                    .map_err(network_error)?;
            }
        }

        tx.commit().await.map_err(AuthError::from)?;

        Ok(record.into())
    }

    fn token_for(&self, user_id: &str, email: &str) -> Result<String, AuthError> {
        issue_token(user_id, email, &self.jwt_secret, self.expires_in_hours).map_err(AuthError::TokenError)
    }
}

#[derive(Debug)]
enum CreateError {
    ShareCodeTaken,
    Auth(AuthError),
}

/// A share-code collision is retried with a fresh code; any other unique
/// violation on `users` is the email.
fn classify_user_insert_error(err: sqlx::Error) -> CreateError {
    if is_unique_violation(&err) && err.to_string().contains("share_code") {
        CreateError::ShareCodeTaken
    } else if is_unique_violation(&err) {
        CreateError::Auth(AuthError::EmailTaken)
    } else {
        CreateError::Auth(err.into())
    }
}

impl From<AuthError> for CreateError {
    fn from(err: AuthError) -> Self {
        CreateError::Auth(err)
    }
}

fn network_error(err: SupportNetworkError) -> AuthError {
    match err {
        SupportNetworkError::DatabaseError(msg) => AuthError::DatabaseError(msg),
        other => AuthError::ValidationError(other.to_string()),
    }
}

fn validate_registration(request: &RegisterRequest) -> Result<NewAccount, AuthError> {
    let email = request.email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(AuthError::ValidationError("Invalid email".to_string()));
    }
    require_min_len(&request.password, 6, "Password must be at least 6 characters")
        .map_err(AuthError::ValidationError)?;
    require_min_len(&request.name, 2, "Name must be at least 2 characters")
        .map_err(AuthError::ValidationError)?;

    let user_type = request.user_type.unwrap_or_default();
    let link = match user_type {
        UserType::Pregnant => None,
        UserType::SupportNetwork => {
            let share_code = non_blank(&request.share_code).ok_or(AuthError::MissingShareCode)?;
            let relationship = non_blank(&request.relationship).ok_or(AuthError::MissingRelationship)?;
            Some((share_code, relationship))
        }
    };

    Ok(NewAccount {
        email,
        name: request.name.trim().to_string(),
        phone: non_blank(&request.phone),
        user_type,
        link,
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
