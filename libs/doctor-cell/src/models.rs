use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub crm: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub rating: f64,
    pub review_count: i64,
    pub experience: i64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// Listing card, without the bio and contact email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub crm: String,
    pub avatar: Option<String>,
    pub rating: f64,
    pub review_count: i64,
    pub experience: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlots {
    pub doctor_id: String,
    pub date: NaiveDate,
    pub available_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for DoctorError {
    fn from(err: sqlx::Error) -> Self {
        DoctorError::DatabaseError(err.to_string())
    }
}
