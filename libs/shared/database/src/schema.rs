//! Idempotent DDL applied at startup.
//!
//! Booking and payment invariants live here as indexes: a slot can back at
//! most one non-cancelled appointment, an appointment has at most one
//! payment, a subject has at most one treatment.

pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        name TEXT NOT NULL,
        phone TEXT,
        user_type TEXT NOT NULL CHECK (user_type IN ('PREGNANT', 'SUPPORT_NETWORK')),
        share_code TEXT UNIQUE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK ((user_type = 'PREGNANT') = (share_code IS NOT NULL))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS support_links (
        id TEXT PRIMARY KEY,
        pregnant_id TEXT NOT NULL REFERENCES users(id),
        support_id TEXT NOT NULL UNIQUE REFERENCES users(id),
        relationship TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'ACTIVE' CHECK (status IN ('ACTIVE', 'INACTIVE')),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_support_links_pregnant ON support_links(pregnant_id)",
    r#"
    CREATE TABLE IF NOT EXISTS doctors (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        specialty TEXT NOT NULL,
        crm TEXT NOT NULL UNIQUE,
        avatar TEXT,
        bio TEXT,
        rating REAL NOT NULL DEFAULT 0,
        review_count INTEGER NOT NULL DEFAULT 0,
        experience INTEGER NOT NULL DEFAULT 0,
        price REAL NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS doctor_slots (
        id TEXT PRIMARY KEY,
        doctor_id TEXT NOT NULL REFERENCES doctors(id),
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        available INTEGER NOT NULL DEFAULT 1,
        UNIQUE (doctor_id, date, time)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id),
        doctor_id TEXT NOT NULL REFERENCES doctors(id),
        slot_id TEXT REFERENCES doctor_slots(id),
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('PENDING', 'CONFIRMED', 'CANCELLED')),
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_appointments_user ON appointments(user_id)",
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_active_slot
        ON appointments(slot_id)
        WHERE slot_id IS NOT NULL AND status != 'CANCELLED'
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS payments (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id),
        appointment_id TEXT NOT NULL UNIQUE REFERENCES appointments(id),
        amount REAL NOT NULL,
        method TEXT NOT NULL CHECK (method IN ('CREDIT_CARD', 'DEBIT_CARD', 'PIX', 'CASH')),
        status TEXT NOT NULL CHECK (status IN ('PENDING', 'COMPLETED', 'FAILED')),
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_payments_user ON payments(user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS treatments (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE REFERENCES users(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS medications (
        id TEXT PRIMARY KEY,
        treatment_id TEXT NOT NULL REFERENCES treatments(id),
        name TEXT NOT NULL,
        dosage TEXT NOT NULL,
        frequency TEXT NOT NULL,
        time TEXT NOT NULL,
        duration TEXT NOT NULL,
        start_date TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS supplements (
        id TEXT PRIMARY KEY,
        treatment_id TEXT NOT NULL REFERENCES treatments(id),
        name TEXT NOT NULL,
        dosage TEXT NOT NULL,
        frequency TEXT NOT NULL,
        time TEXT NOT NULL,
        duration TEXT NOT NULL,
        start_date TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL
    )
    "#,
];
