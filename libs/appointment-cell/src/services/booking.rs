use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{is_unique_violation, Database};
use shared_utils::validation::{normalize_time, parse_date, require_non_empty};

use crate::models::{
    Appointment, AppointmentError, AppointmentRow, AppointmentStatus, AppointmentView,
    CreateAppointmentRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;

const VIEW_QUERY: &str = "SELECT a.id, a.user_id, a.doctor_id, a.slot_id, a.date, a.time, a.status,
        a.notes, a.created_at, a.updated_at,
        d.name AS doctor_name, d.specialty AS doctor_specialty, d.avatar AS doctor_avatar,
        d.bio AS doctor_bio, d.price AS doctor_price,
        p.id AS payment_id, p.status AS payment_status, p.method AS payment_method,
        p.amount AS payment_amount
    FROM appointments a
    JOIN doctors d ON d.id = a.doctor_id
    LEFT JOIN payments p ON p.appointment_id = a.id";

pub struct BookingService {
    db: Database,
    lifecycle: AppointmentLifecycleService,
}

impl BookingService {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    /// Claims the matching open slot and records a `PENDING` appointment for
    /// `subject_id`, both in one transaction.
    pub async fn create_appointment(
        &self,
        subject_id: &str,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentView, AppointmentError> {
        require_non_empty(&request.doctor_id, "Doctor").map_err(AppointmentError::ValidationError)?;
        let date = parse_date(&request.date).map_err(AppointmentError::ValidationError)?;
        let time = normalize_time(&request.time).map_err(AppointmentError::ValidationError)?;
        let notes = request
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let doctor: Option<String> = sqlx::query_scalar("SELECT id FROM doctors WHERE id = ?")
            .bind(&request.doctor_id)
            .fetch_optional(self.db.pool())
            .await?;
        if doctor.is_none() {
            return Err(AppointmentError::DoctorNotFound);
        }

        let mut tx = self.db.begin().await?;

        let slot_id: Option<String> = sqlx::query_scalar(
            "UPDATE doctor_slots SET available = 0
             WHERE doctor_id = ? AND date = ? AND time = ? AND available = 1
             RETURNING id",
        )
        .bind(&request.doctor_id)
        .bind(date)
        .bind(&time)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(slot_id) = slot_id else {
            debug!("No open slot for doctor {} at {} {}", request.doctor_id, date, time);
            return Err(AppointmentError::SlotUnavailable);
        };

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            user_id: subject_id.to_string(),
            doctor_id: request.doctor_id,
            slot_id: Some(slot_id),
            date,
            time,
            status: AppointmentStatus::Pending,
            notes,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO appointments (id, user_id, doctor_id, slot_id, date, time, status, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&appointment.id)
        .bind(&appointment.user_id)
        .bind(&appointment.doctor_id)
        .bind(&appointment.slot_id)
        .bind(appointment.date)
        .bind(&appointment.time)
        .bind(appointment.status)
        .bind(&appointment.notes)
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppointmentError::SlotUnavailable
            } else {
                AppointmentError::from(e)
            }
        })?;

        tx.commit().await?;

        info!(
            "Booked appointment {} with doctor {} on {} at {}",
            appointment.id, appointment.doctor_id, appointment.date, appointment.time
        );

        self.get_appointment(subject_id, &appointment.id).await
    }

    /// Cancels the appointment and reopens the slot it holds.
    pub async fn cancel_appointment(
        &self,
        subject_id: &str,
        appointment_id: &str,
    ) -> Result<(), AppointmentError> {
        let current = self.get_appointment(subject_id, appointment_id).await?;
        self.lifecycle
            .validate_status_transition(current.appointment.status, AppointmentStatus::Cancelled)?;

        let mut tx = self.db.begin().await?;

        let cancelled: Option<Option<String>> = sqlx::query_scalar(
            "UPDATE appointments SET status = 'CANCELLED', updated_at = ?
             WHERE id = ? AND user_id = ? AND status != 'CANCELLED'
             RETURNING slot_id",
        )
        .bind(Utc::now())
        .bind(appointment_id)
        .bind(subject_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(slot_id) = cancelled else {
            warn!("Appointment {} was cancelled concurrently", appointment_id);
            return Err(AppointmentError::InvalidStatusTransition(AppointmentStatus::Cancelled));
        };

        if let Some(slot_id) = slot_id {
            sqlx::query("UPDATE doctor_slots SET available = 1 WHERE id = ?")
                .bind(&slot_id)
                .execute(&mut *tx)
                .await?;
            debug!("Slot {} reopened", slot_id);
        }

        tx.commit().await?;

        info!("Cancelled appointment {}", appointment_id);
        Ok(())
    }

    /// Newest date first.
    pub async fn list_appointments(&self, subject_id: &str) -> Result<Vec<AppointmentView>, AppointmentError> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            "{VIEW_QUERY} WHERE a.user_id = ? ORDER BY a.date DESC, a.time DESC, a.created_at DESC"
        ))
        .bind(subject_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(AppointmentView::from).collect())
    }

    pub async fn get_appointment(
        &self,
        subject_id: &str,
        appointment_id: &str,
    ) -> Result<AppointmentView, AppointmentError> {
        let row: Option<AppointmentRow> = sqlx::query_as(&format!(
            "{VIEW_QUERY} WHERE a.id = ? AND a.user_id = ?"
        ))
        .bind(appointment_id)
        .bind(subject_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(AppointmentView::from).ok_or(AppointmentError::NotFound)
    }
}
