use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use shared_database::{is_unique_violation, Database};
use shared_utils::validation::require_non_empty;

use crate::models::{CreatePaymentRequest, PaymentError, PaymentRow, PaymentStatus, PaymentView};

const VIEW_QUERY: &str = "SELECT p.id, p.user_id, p.appointment_id, p.amount, p.method, p.status, p.created_at,
        a.date AS appointment_date, a.time AS appointment_time, a.status AS appointment_status,
        d.name AS doctor_name, d.specialty AS doctor_specialty, d.avatar AS doctor_avatar
    FROM payments p
    JOIN appointments a ON a.id = p.appointment_id
    JOIN doctors d ON d.id = a.doctor_id";

pub struct PaymentService {
    db: Database,
}

impl PaymentService {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// Records a `PENDING` payment for one of the subject's appointments,
    /// charging the doctor's current price.
    pub async fn create_payment(
        &self,
        subject_id: &str,
        request: CreatePaymentRequest,
    ) -> Result<PaymentView, PaymentError> {
        require_non_empty(&request.appointment_id, "Appointment").map_err(PaymentError::ValidationError)?;

        let payment_id = Uuid::new_v4().to_string();

        // One statement: the write lock is held before the price is read.
        let inserted = sqlx::query(
            "INSERT INTO payments (id, user_id, appointment_id, amount, method, status, created_at)
             SELECT ?, a.user_id, a.id, d.price, ?, ?, ?
             FROM appointments a
             JOIN doctors d ON d.id = a.doctor_id
             WHERE a.id = ? AND a.user_id = ?",
        )
        .bind(&payment_id)
        .bind(request.method)
        .bind(PaymentStatus::Pending)
        .bind(Utc::now())
        .bind(&request.appointment_id)
        .bind(subject_id)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!("Duplicate payment for appointment {}", request.appointment_id);
                PaymentError::AlreadyPaid
            } else {
                PaymentError::from(e)
            }
        })?;

        if inserted.rows_affected() == 0 {
            return Err(PaymentError::AppointmentNotFound);
        }

        info!(
            "Payment {} via {} recorded for appointment {}",
            payment_id, request.method, request.appointment_id
        );

        self.get_payment(subject_id, &payment_id).await
    }

    /// Newest first.
    pub async fn list_payments(&self, subject_id: &str) -> Result<Vec<PaymentView>, PaymentError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "{VIEW_QUERY} WHERE p.user_id = ? ORDER BY p.created_at DESC, p.rowid DESC"
        ))
        .bind(subject_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(PaymentView::from).collect())
    }

    pub async fn get_payment(&self, subject_id: &str, payment_id: &str) -> Result<PaymentView, PaymentError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!("{VIEW_QUERY} WHERE p.id = ? AND p.user_id = ?"))
            .bind(payment_id)
            .bind(subject_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(PaymentView::from).ok_or(PaymentError::NotFound)
    }
}
