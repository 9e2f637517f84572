use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::Database;
use shared_utils::validation::{parse_date, require_non_empty};

use crate::models::{NewRegimenEntry, RegimenEntry, RegimenKind, Treatment, TreatmentError, TreatmentView};

pub struct TreatmentService {
    db: Database,
}

impl TreatmentService {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    /// The subject's single treatment, created on first use.
    pub async fn ensure_treatment(&self, subject_id: &str) -> Result<Treatment, TreatmentError> {
        let now = Utc::now();
        let inserted = sqlx::query(
            "INSERT INTO treatments (id, user_id, created_at, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(subject_id)
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await?;

        if inserted.rows_affected() > 0 {
            debug!("Created treatment for {}", subject_id);
        }

        let treatment = sqlx::query_as("SELECT * FROM treatments WHERE user_id = ?")
            .bind(subject_id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(treatment)
    }

    pub async fn get_treatment(&self, subject_id: &str) -> Result<TreatmentView, TreatmentError> {
        let treatment = self.ensure_treatment(subject_id).await?;
        let medications = self.active_entries(RegimenKind::Medication, &treatment.id).await?;
        let supplements = self.active_entries(RegimenKind::Supplement, &treatment.id).await?;

        Ok(TreatmentView {
            treatment,
            medications,
            supplements,
        })
    }

    pub async fn add_medication(
        &self,
        subject_id: &str,
        entry: NewRegimenEntry,
    ) -> Result<RegimenEntry, TreatmentError> {
        self.add_entry(RegimenKind::Medication, subject_id, entry).await
    }

    pub async fn add_supplement(
        &self,
        subject_id: &str,
        entry: NewRegimenEntry,
    ) -> Result<RegimenEntry, TreatmentError> {
        self.add_entry(RegimenKind::Supplement, subject_id, entry).await
    }

    async fn add_entry(
        &self,
        kind: RegimenKind,
        subject_id: &str,
        entry: NewRegimenEntry,
    ) -> Result<RegimenEntry, TreatmentError> {
        let start_date = validate_entry(&entry)?;
        let treatment = self.ensure_treatment(subject_id).await?;

        let record = RegimenEntry {
            id: Uuid::new_v4().to_string(),
            treatment_id: treatment.id,
            name: entry.name.trim().to_string(),
            dosage: entry.dosage.trim().to_string(),
            frequency: entry.frequency.trim().to_string(),
            time: entry.time.trim().to_string(),
            duration: entry.duration.trim().to_string(),
            start_date,
            active: true,
            created_at: Utc::now(),
        };

        sqlx::query(&format!(
            "INSERT INTO {} (id, treatment_id, name, dosage, frequency, time, duration, start_date, active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            kind.table()
        ))
        .bind(&record.id)
        .bind(&record.treatment_id)
        .bind(&record.name)
        .bind(&record.dosage)
        .bind(&record.frequency)
        .bind(&record.time)
        .bind(&record.duration)
        .bind(record.start_date)
        .bind(record.active)
        .bind(record.created_at)
        .execute(self.db.pool())
        .await?;

        info!("Added {} {} to treatment {}", kind.table(), record.name, record.treatment_id);
        Ok(record)
    }

    async fn active_entries(
        &self,
        kind: RegimenKind,
        treatment_id: &str,
    ) -> Result<Vec<RegimenEntry>, TreatmentError> {
        let entries = sqlx::query_as(&format!(
            "SELECT * FROM {} WHERE treatment_id = ? AND active = 1 ORDER BY created_at DESC, rowid DESC",
            kind.table()
        ))
        .bind(treatment_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(entries)
    }
}

fn validate_entry(entry: &NewRegimenEntry) -> Result<chrono::NaiveDate, TreatmentError> {
    let fields = [
        (&entry.name, "Name"),
        (&entry.dosage, "Dosage"),
        (&entry.frequency, "Frequency"),
        (&entry.time, "Time"),
        (&entry.duration, "Duration"),
    ];
    for (value, field) in fields {
        require_non_empty(value, field).map_err(TreatmentError::ValidationError)?;
    }

    parse_date(&entry.start_date).map_err(TreatmentError::ValidationError)
}
