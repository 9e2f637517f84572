use assert_matches::assert_matches;

use appointment_cell::{AppointmentError, AppointmentStatus, BookingService, CreateAppointmentRequest};
use shared_database::Database;
use shared_utils::test_utils::{TestConfig, TestFixtures, TestUser};

struct Booking {
    db: Database,
    subject_id: String,
    doctor_id: String,
    slot_id: String,
}

async fn setup() -> Booking {
    let state = TestConfig::default().to_state().await;
    let ana = TestUser::pregnant("ana@x.com").insert(&state.db).await;
    let doctor_id = TestFixtures::insert_doctor(&state.db, "Dra. Beatriz", 4.8, 250.0).await;
    let slot_id =
        TestFixtures::insert_slot(&state.db, &doctor_id, TestFixtures::date("2030-05-20"), "09:00", true).await;

    Booking {
        db: state.db,
        subject_id: ana.id,
        doctor_id,
        slot_id,
    }
}

fn request(doctor_id: &str, date: &str, time: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        doctor_id: doctor_id.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        notes: Some("Primeira consulta".to_string()),
    }
}

#[tokio::test]
async fn test_booking_claims_the_slot() {
    let b = setup().await;
    let service = BookingService::new(&b.db);

    let view = service
        .create_appointment(&b.subject_id, request(&b.doctor_id, "2030-05-20", "09:00"))
        .await
        .unwrap();

    assert_eq!(view.appointment.status, AppointmentStatus::Pending);
    assert_eq!(view.appointment.slot_id.as_deref(), Some(b.slot_id.as_str()));
    assert_eq!(view.doctor.name, "Dra. Beatriz");
    assert!(view.payment.is_none());
    assert!(!TestFixtures::slot_available(&b.db, &b.slot_id).await);

    assert_matches!(
        service
            .create_appointment(&b.subject_id, request(&b.doctor_id, "2030-05-20", "09:00"))
            .await,
        Err(AppointmentError::SlotUnavailable)
    );
}

#[tokio::test]
async fn test_booking_rejections() {
    let b = setup().await;
    let service = BookingService::new(&b.db);

    assert_matches!(
        service.create_appointment(&b.subject_id, request("ghost", "2030-05-20", "09:00")).await,
        Err(AppointmentError::DoctorNotFound)
    );
    assert_matches!(
        service.create_appointment(&b.subject_id, request(&b.doctor_id, "2030-05-20", "10:00")).await,
        Err(AppointmentError::SlotUnavailable)
    );
    assert_matches!(
        service.create_appointment(&b.subject_id, request(&b.doctor_id, "20/05/2030", "09:00")).await,
        Err(AppointmentError::ValidationError(_))
    );
    assert!(TestFixtures::slot_available(&b.db, &b.slot_id).await);
}

#[tokio::test]
async fn test_cancel_reopens_slot_and_is_terminal() {
    let b = setup().await;
    let service = BookingService::new(&b.db);
    let view = service
        .create_appointment(&b.subject_id, request(&b.doctor_id, "2030-05-20", "09:00"))
        .await
        .unwrap();
    let id = view.appointment.id;

    service.cancel_appointment(&b.subject_id, &id).await.unwrap();
    assert!(TestFixtures::slot_available(&b.db, &b.slot_id).await);

    let cancelled = service.get_appointment(&b.subject_id, &id).await.unwrap();
    assert_eq!(cancelled.appointment.status, AppointmentStatus::Cancelled);

    assert_matches!(
        service.cancel_appointment(&b.subject_id, &id).await,
        Err(AppointmentError::InvalidStatusTransition(AppointmentStatus::Cancelled))
    );

    // The reopened slot can be booked again.
    service
        .create_appointment(&b.subject_id, request(&b.doctor_id, "2030-05-20", "09:00"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_appointments_are_scoped_to_their_subject() {
    let b = setup().await;
    let other = TestUser::pregnant("bia@x.com").insert(&b.db).await;
    let service = BookingService::new(&b.db);
    let view = service
        .create_appointment(&b.subject_id, request(&b.doctor_id, "2030-05-20", "09:00"))
        .await
        .unwrap();

    assert_matches!(
        service.get_appointment(&other.id, &view.appointment.id).await,
        Err(AppointmentError::NotFound)
    );
    assert_matches!(
        service.cancel_appointment(&other.id, &view.appointment.id).await,
        Err(AppointmentError::NotFound)
    );
    assert!(service.list_appointments(&other.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_is_newest_date_first() {
    let b = setup().await;
    TestFixtures::insert_slot(&b.db, &b.doctor_id, TestFixtures::date("2030-06-01"), "08:00", true).await;
    let service = BookingService::new(&b.db);

    service
        .create_appointment(&b.subject_id, request(&b.doctor_id, "2030-05-20", "09:00"))
        .await
        .unwrap();
    service
        .create_appointment(&b.subject_id, request(&b.doctor_id, "2030-06-01", "08:00"))
        .await
        .unwrap();

    let dates: Vec<String> = service
        .list_appointments(&b.subject_id)
        .await
        .unwrap()
        .iter()
        .map(|v| v.appointment.date.to_string())
        .collect();
    assert_eq!(dates, vec!["2030-06-01", "2030-05-20"]);
}
