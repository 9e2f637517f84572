use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "PENDING"),
            AppointmentStatus::Confirmed => write!(f, "CONFIRMED"),
            AppointmentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub doctor_id: String,
    pub slot_id: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorBrief {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBrief {
    pub id: String,
    pub status: String,
    pub method: String,
    pub amount: f64,
}

/// An appointment with its doctor and, once paid, its payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor: DoctorBrief,
    pub payment: Option<PaymentBrief>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct AppointmentRow {
    #[sqlx(flatten)]
    pub appointment: Appointment,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub doctor_avatar: Option<String>,
    pub doctor_bio: Option<String>,
    pub doctor_price: f64,
    pub payment_id: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub payment_amount: Option<f64>,
}

impl From<AppointmentRow> for AppointmentView {
    fn from(row: AppointmentRow) -> Self {
        let payment = match (row.payment_id, row.payment_status, row.payment_method, row.payment_amount) {
            (Some(id), Some(status), Some(method), Some(amount)) => Some(PaymentBrief {
                id,
                status,
                method,
                amount,
            }),
            _ => None,
        };

        Self {
            doctor: DoctorBrief {
                id: row.appointment.doctor_id.clone(),
                name: row.doctor_name,
                specialty: row.doctor_specialty,
                avatar: row.doctor_avatar,
                bio: row.doctor_bio,
                price: row.doctor_price,
            },
            appointment: row.appointment,
            payment,
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Slot unavailable")]
    SlotUnavailable,

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AppointmentError {
    fn from(err: sqlx::Error) -> Self {
        AppointmentError::DatabaseError(err.to_string())
    }
}
