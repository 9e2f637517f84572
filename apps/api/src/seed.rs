use anyhow::{anyhow, Result};
use chrono::{Days, NaiveDate, Utc};
use sqlx::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use shared_database::Database;
use shared_models::user::{LinkStatus, UserType};
use shared_utils::password::hash_password_blocking;

const DEMO_PASSWORD: &str = "123456";
const DEMO_SHARE_CODE: &str = "ABCD-1234";
const SLOT_DAYS: u64 = 7;
const SLOT_TIMES: [&str; 8] = ["08:00", "09:00", "10:00", "11:00", "14:00", "15:00", "16:00", "17:00"];

struct DemoDoctor {
    name: &'static str,
    email: &'static str,
    specialty: &'static str,
    crm: &'static str,
    bio: &'static str,
    rating: f64,
    review_count: i64,
    experience: i64,
    price: f64,
}

const DOCTORS: [DemoDoctor; 3] = [
    DemoDoctor {
        name: "Dr. João Silva",
        email: "joao.silva@eros.com",
        specialty: "Cardiologia",
        crm: "12345-SP",
        bio: "Especialista em cardiologia com foco em prevenção e tratamento de doenças cardiovasculares.",
        rating: 4.8,
        review_count: 120,
        experience: 15,
        price: 250.0,
    },
    DemoDoctor {
        name: "Dra. Maria Santos",
        email: "maria.santos@eros.com",
        specialty: "Dermatologia",
        crm: "67890-SP",
        bio: "Dermatologista especializada em tratamentos estéticos e clínicos.",
        rating: 4.9,
        review_count: 98,
        experience: 12,
        price: 280.0,
    },
    DemoDoctor {
        name: "Dr. Carlos Oliveira",
        email: "carlos.oliveira@eros.com",
        specialty: "Ortopedia",
        crm: "11111-RJ",
        bio: "Ortopedista com vasta experiência em cirurgias e tratamentos ortopédicos.",
        rating: 4.7,
        review_count: 156,
        experience: 20,
        price: 300.0,
    },
];

/// Loads the demo dataset once. Skipped when the demo subject already exists.
pub async fn seed_demo_data(db: &Database) -> Result<()> {
    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE email = 'gestante@eros.com'")
        .fetch_optional(db.pool())
        .await?;
    if existing.is_some() {
        info!("Demo data already present, skipping seed");
        return Ok(());
    }

    let password_hash = hash_password_blocking(DEMO_PASSWORD.to_string())
        .await
        .map_err(|e| anyhow!(e))?;

    let mut tx = db.begin().await?;

    let pregnant_id = insert_user(
        &mut *tx,
        "gestante@eros.com",
        &password_hash,
        "Ana Paula Silva",
        "(11) 98888-7777",
        UserType::Pregnant,
        Some(DEMO_SHARE_CODE),
    )
    .await?;

    for (email, name, phone, relationship) in [
        ("mae@eros.com", "Maria Silva", "(11) 97777-6666", "Mãe"),
        ("companheiro@eros.com", "Carlos Silva", "(11) 96666-5555", "Companheiro"),
    ] {
        let support_id =
            insert_user(&mut *tx, email, &password_hash, name, phone, UserType::SupportNetwork, None).await?;
        insert_link(&mut *tx, &pregnant_id, &support_id, relationship).await?;
    }

    let today = Utc::now().date_naive();
    let mut doctor_ids = Vec::with_capacity(DOCTORS.len());
    for doctor in &DOCTORS {
        let doctor_id = insert_doctor(&mut *tx, doctor).await?;
        for offset in 0..SLOT_DAYS {
            let date = today
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| anyhow!("Slot date out of range"))?;
            for time in SLOT_TIMES {
                sqlx::query(
                    "INSERT OR IGNORE INTO doctor_slots (id, doctor_id, date, time, available) VALUES (?, ?, ?, ?, 1)",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&doctor_id)
                .bind(date)
                .bind(time)
                .execute(&mut *tx)
                .await?;
            }
        }
        doctor_ids.push(doctor_id);
    }

    seed_treatment(&mut *tx, &pregnant_id).await?;
    seed_paid_appointment(&mut *tx, &pregnant_id, &doctor_ids[0], DOCTORS[0].price).await?;

    tx.commit().await?;

    info!(
        "Seeded demo data: {} doctors, {} slots, share code {}",
        DOCTORS.len(),
        DOCTORS.len() * SLOT_DAYS as usize * SLOT_TIMES.len(),
        DEMO_SHARE_CODE
    );
    Ok(())
}

async fn insert_user(
    conn: &mut SqliteConnection,
    email: &str,
    password_hash: &str,
    name: &str,
    phone: &str,
    user_type: UserType,
    share_code: Option<&str>,
) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO users (id, email, password_hash, name, phone, user_type, share_code, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(phone)
    .bind(user_type)
    .bind(share_code)
    .bind(now)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(id)
}

async fn insert_link(conn: &mut SqliteConnection, pregnant_id: &str, support_id: &str, relationship: &str) -> Result<()> {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO support_links (id, pregnant_id, support_id, relationship, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(pregnant_id)
    .bind(support_id)
    .bind(relationship)
    .bind(LinkStatus::Active)
    .bind(now)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_doctor(conn: &mut SqliteConnection, doctor: &DemoDoctor) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO doctors (id, name, email, specialty, crm, avatar, bio, rating, review_count, experience, price, created_at)
         VALUES (?, ?, ?, ?, ?, 'https://placehold.co/400x400', ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(doctor.name)
    .bind(doctor.email)
    .bind(doctor.specialty)
    .bind(doctor.crm)
    .bind(doctor.bio)
    .bind(doctor.rating)
    .bind(doctor.review_count)
    .bind(doctor.experience)
    .bind(doctor.price)
    .bind(Utc::now())
    .execute(conn)
    .await?;
    Ok(id)
}

async fn seed_treatment(conn: &mut SqliteConnection, pregnant_id: &str) -> Result<()> {
    let treatment_id = Uuid::new_v4().to_string();
    let now = Utc::now();
    sqlx::query("INSERT INTO treatments (id, user_id, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&treatment_id)
        .bind(pregnant_id)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    let entries = [
        ("medications", "Losartana 50mg", "1 comprimido", "08:00", "Uso contínuo", "2025-01-01"),
        ("medications", "Atorvastatina 20mg", "1 comprimido", "22:00", "Uso contínuo", "2025-01-01"),
        ("supplements", "Vitamina D3", "2000 UI", "09:00", "3 meses", "2025-01-15"),
    ];
    for (table, name, dosage, time, duration, start_date) in entries {
        let start_date = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")?;
        sqlx::query(&format!(
            "INSERT INTO {table} (id, treatment_id, name, dosage, frequency, time, duration, start_date, active, created_at)
             VALUES (?, ?, ?, ?, '1x ao dia', ?, ?, ?, 1, ?)"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&treatment_id)
        .bind(name)
        .bind(dosage)
        .bind(time)
        .bind(duration)
        .bind(start_date)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn seed_paid_appointment(conn: &mut SqliteConnection, pregnant_id: &str, doctor_id: &str, price: f64) -> Result<()> {
    let appointment_id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let date = NaiveDate::from_ymd_opt(2025, 12, 5).ok_or_else(|| anyhow!("Invalid demo date"))?;

    sqlx::query(
        "INSERT INTO appointments (id, user_id, doctor_id, slot_id, date, time, status, notes, created_at, updated_at)
         VALUES (?, ?, ?, NULL, ?, '10:00', 'CONFIRMED', 'Consulta de rotina pré-natal', ?, ?)",
    )
    .bind(&appointment_id)
    .bind(pregnant_id)
    .bind(doctor_id)
    .bind(date)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "INSERT INTO payments (id, user_id, appointment_id, amount, method, status, created_at)
         VALUES (?, ?, ?, ?, 'CREDIT_CARD', 'COMPLETED', ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(pregnant_id)
    .bind(&appointment_id)
    .bind(price)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        seed_demo_data(&db).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(db.pool()).await.unwrap();
        assert_eq!(users, 3);

        let slots: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doctor_slots").fetch_one(db.pool()).await.unwrap();
        assert_eq!(slots, 3 * 7 * 8);

        let code: String = sqlx::query_scalar("SELECT share_code FROM users WHERE email = 'gestante@eros.com'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(code, DEMO_SHARE_CODE);
    }
}
