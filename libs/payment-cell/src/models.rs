use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Pix,
    Cash,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::CreditCard => write!(f, "CREDIT_CARD"),
            PaymentMethod::DebitCard => write!(f, "DEBIT_CARD"),
            PaymentMethod::Pix => write!(f, "PIX"),
            PaymentMethod::Cash => write!(f, "CASH"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub appointment_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidDoctor {
    pub name: String,
    pub specialty: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidAppointment {
    pub id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
    pub doctor: PaidDoctor,
}

/// A payment with the appointment it settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Payment,
    pub appointment: PaidAppointment,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct PaymentRow {
    #[sqlx(flatten)]
    pub payment: Payment,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub appointment_status: String,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub doctor_avatar: Option<String>,
}

impl From<PaymentRow> for PaymentView {
    fn from(row: PaymentRow) -> Self {
        Self {
            appointment: PaidAppointment {
                id: row.payment.appointment_id.clone(),
                date: row.appointment_date,
                time: row.appointment_time,
                status: row.appointment_status,
                doctor: PaidDoctor {
                    name: row.doctor_name,
                    specialty: row.doctor_specialty,
                    avatar: row.doctor_avatar,
                },
            },
            payment: row.payment,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub appointment_id: String,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum PaymentError {
    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Payment not found")]
    NotFound,

    #[error("Payment already exists for this appointment")]
    AlreadyPaid,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PaymentError {
    fn from(err: sqlx::Error) -> Self {
        PaymentError::DatabaseError(err.to_string())
    }
}
