use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One medication or supplement in a treatment. Both share the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RegimenEntry {
    pub id: String,
    pub treatment_id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub time: String,
    pub duration: String,
    pub start_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub type Medication = RegimenEntry;
pub type Supplement = RegimenEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegimenKind {
    Medication,
    Supplement,
}

impl RegimenKind {
    pub(crate) fn table(self) -> &'static str {
        match self {
            RegimenKind::Medication => "medications",
            RegimenKind::Supplement => "supplements",
        }
    }
}

/// Treatment with its active medications and supplements, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentView {
    #[serde(flatten)]
    pub treatment: Treatment,
    pub medications: Vec<Medication>,
    pub supplements: Vec<Supplement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegimenEntry {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub time: String,
    pub duration: String,
    pub start_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum TreatmentError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for TreatmentError {
    fn from(err: sqlx::Error) -> Self {
        TreatmentError::DatabaseError(err.to_string())
    }
}
