//! Fixtures shared by the cells' integration tests.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::Database;
use shared_models::user::{LinkStatus, UserType};

use crate::jwt::issue_token;
use crate::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";
pub const TEST_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGVzdHNhbHR0ZXN0c2FsdA$placeholder";

pub struct TestConfig {
    pub jwt_secret: String,
    pub database_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            database_url: "sqlite::memory:".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database_url.clone(),
            jwt_secret: self.jwt_secret.clone(),
            jwt_expires_in_hours: 24,
            server_port: 0,
            seed_demo_data: false,
        }
    }

    /// App state over a fresh in-memory database.
    pub async fn to_state(&self) -> AppState {
        let db = Database::in_memory().await.expect("in-memory database");
        AppState::new(self.to_app_config(), db)
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub user_type: UserType,
    pub share_code: Option<String>,
}

impl TestUser {
    pub fn pregnant(email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: "Ana Paula Silva".to_string(),
            user_type: UserType::Pregnant,
            share_code: Some(format!("T{}", &Uuid::new_v4().simple().to_string()[..7].to_uppercase())),
        }
    }

    pub fn support(email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: "Maria Silva".to_string(),
            user_type: UserType::SupportNetwork,
            share_code: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Inserts the user row directly, skipping password hashing.
    pub async fn insert(self, db: &Database) -> Self {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, phone, user_type, share_code, created_at, updated_at)
             VALUES (?, ?, ?, ?, NULL, ?, ?, ?, ?)",
        )
        .bind(&self.id)
        .bind(&self.email)
        .bind(TEST_PASSWORD_HASH)
        .bind(&self.name)
        .bind(self.user_type)
        .bind(&self.share_code)
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .expect("insert test user");
        self
    }

    pub fn token(&self) -> String {
        JwtTestUtils::create_test_token(&self.id, &self.email)
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token())
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user_id: &str, email: &str) -> String {
        issue_token(user_id, email, TEST_JWT_SECRET, 24).expect("sign test token")
    }

    pub fn create_expired_token(user_id: &str, email: &str) -> String {
        issue_token(user_id, email, TEST_JWT_SECRET, -1).expect("sign test token")
    }

    pub fn create_invalid_signature_token(user_id: &str, email: &str) -> String {
        issue_token(user_id, email, "wrong-secret", 24).expect("sign test token")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct TestFixtures;

impl TestFixtures {
    pub async fn link_support(
        db: &Database,
        pregnant_id: &str,
        support_id: &str,
        relationship: &str,
        status: LinkStatus,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO support_links (id, pregnant_id, support_id, relationship, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(pregnant_id)
        .bind(support_id)
        .bind(relationship)
        .bind(status)
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .expect("insert support link");
        id
    }

    pub async fn insert_doctor(db: &Database, name: &str, rating: f64, price: f64) -> String {
        let id = Uuid::new_v4().to_string();
        let suffix = &id[..8];
        sqlx::query(
            "INSERT INTO doctors (id, name, email, specialty, crm, avatar, bio, rating, review_count, experience, price, created_at)
             VALUES (?, ?, ?, 'Obstetrícia', ?, NULL, 'Pré-natal', ?, 10, 12, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(format!("{}@clinic.test", suffix))
        .bind(format!("CRM-{}", suffix))
        .bind(rating)
        .bind(price)
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .expect("insert doctor");
        id
    }

    pub async fn insert_slot(db: &Database, doctor_id: &str, date: NaiveDate, time: &str, available: bool) -> String {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO doctor_slots (id, doctor_id, date, time, available) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(doctor_id)
            .bind(date)
            .bind(time)
            .bind(available)
            .execute(db.pool())
            .await
            .expect("insert slot");
        id
    }

    pub async fn slot_available(db: &Database, slot_id: &str) -> bool {
        sqlx::query_scalar("SELECT available FROM doctor_slots WHERE id = ?")
            .bind(slot_id)
            .fetch_one(db.pool())
            .await
            .expect("load slot")
    }

    pub fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("fixture date")
    }
}
