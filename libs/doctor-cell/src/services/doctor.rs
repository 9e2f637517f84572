use chrono::NaiveDate;
use tracing::debug;

use shared_database::Database;

use crate::models::{AvailableSlots, Doctor, DoctorError, DoctorSummary};

pub struct DoctorService {
    db: Database,
}

impl DoctorService {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// Best rated first.
    pub async fn list_doctors(&self) -> Result<Vec<DoctorSummary>, DoctorError> {
        let doctors = sqlx::query_as(
            "SELECT id, name, specialty, crm, avatar, rating, review_count, experience, price
             FROM doctors
             ORDER BY rating DESC, name ASC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        sqlx::query_as("SELECT * FROM doctors WHERE id = ?")
            .bind(doctor_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(DoctorError::NotFound)
    }

    /// Open times for one day, earliest first. An unknown doctor simply has none.
    pub async fn available_slots(
        &self,
        doctor_id: &str,
        date: NaiveDate,
    ) -> Result<AvailableSlots, DoctorError> {
        let times: Vec<String> = sqlx::query_scalar(
            "SELECT time FROM doctor_slots
             WHERE doctor_id = ? AND date = ? AND available = 1
             ORDER BY time ASC",
        )
        .bind(doctor_id)
        .bind(date)
        .fetch_all(self.db.pool())
        .await?;

        debug!("Doctor {} has {} open slots on {}", doctor_id, times.len(), date);

        Ok(AvailableSlots {
            doctor_id: doctor_id.to_string(),
            date,
            available_slots: times,
        })
    }
}
