use assert_matches::assert_matches;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use shared_models::user::LinkStatus;
use shared_utils::test_utils::{TestConfig, TestFixtures, TestUser};
use shared_utils::AppState;
use treatment_cell::{treatment_routes, NewRegimenEntry, TreatmentError, TreatmentService};

fn entry(name: &str) -> NewRegimenEntry {
    NewRegimenEntry {
        name: name.to_string(),
        dosage: "1 comprimido".to_string(),
        frequency: "1x ao dia".to_string(),
        time: "08:00".to_string(),
        duration: "Toda a gestação".to_string(),
        start_date: "2025-01-10".to_string(),
    }
}

#[tokio::test]
async fn test_treatment_is_created_once() {
    let state = TestConfig::default().to_state().await;
    let ana = TestUser::pregnant("ana@x.com").insert(&state.db).await;
    let service = TreatmentService::new(&state.db);

    let first = service.get_treatment(&ana.id).await.unwrap();
    let second = service.get_treatment(&ana.id).await.unwrap();
    assert_eq!(first.treatment.id, second.treatment.id);
    assert!(first.medications.is_empty());
    assert!(first.supplements.is_empty());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM treatments WHERE user_id = ?")
        .bind(&ana.id)
        .fetch_one(state.db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_entries_are_active_and_newest_first() {
    let state = TestConfig::default().to_state().await;
    let ana = TestUser::pregnant("ana@x.com").insert(&state.db).await;
    let service = TreatmentService::new(&state.db);

    service.add_medication(&ana.id, entry("Ácido fólico")).await.unwrap();
    let stopped = service.add_medication(&ana.id, entry("Dipirona")).await.unwrap();
    service.add_medication(&ana.id, entry("Sulfato ferroso")).await.unwrap();
    service.add_supplement(&ana.id, entry("Ômega 3")).await.unwrap();

    sqlx::query("UPDATE medications SET active = 0 WHERE id = ?")
        .bind(&stopped.id)
        .execute(state.db.pool())
        .await
        .unwrap();

    let view = service.get_treatment(&ana.id).await.unwrap();
    let names: Vec<_> = view.medications.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Sulfato ferroso", "Ácido fólico"]);
    assert_eq!(view.supplements.len(), 1);
    assert_eq!(view.supplements[0].start_date.to_string(), "2025-01-10");
}

#[tokio::test]
async fn test_invalid_entries_are_rejected() {
    let state = TestConfig::default().to_state().await;
    let ana = TestUser::pregnant("ana@x.com").insert(&state.db).await;
    let service = TreatmentService::new(&state.db);

    let mut missing = entry("Ácido fólico");
    missing.frequency = String::new();
    assert_matches!(
        service.add_supplement(&ana.id, missing).await,
        Err(TreatmentError::ValidationError(msg)) if msg == "Frequency is required"
    );
}

async fn send(state: &AppState, method: &str, uri: &str, bearer: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer)
        .header("content-type", "application/json");
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);

    let response = treatment_routes(state.clone()).oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_support_member_manages_subject_treatment() {
    let state = TestConfig::default().to_state().await;
    let ana = TestUser::pregnant("ana@x.com").insert(&state.db).await;
    let mae = TestUser::support("mae@x.com").insert(&state.db).await;
    TestFixtures::link_support(&state.db, &ana.id, &mae.id, "Mãe", LinkStatus::Active).await;

    let medication = json!({
        "name": "Ácido fólico",
        "dosage": "5mg",
        "frequency": "1x ao dia",
        "time": "08:00",
        "duration": "12 semanas",
        "startDate": "2025-01-10"
    });
    let (status, created) = send(&state, "POST", "/medications", &mae.bearer(), Some(medication)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["active"], true);

    let (status, view) = send(&state, "GET", "/", &ana.bearer(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["data"]["userId"], ana.id.as_str());
    assert_eq!(view["data"]["medications"][0]["name"], "Ácido fólico");

    let (status, body) = send(&state, "POST", "/supplements", &ana.bearer(), Some(json!({ "name": "Ômega 3" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unlinked_member_is_forbidden() {
    let state = TestConfig::default().to_state().await;
    let solo = TestUser::support("solo@x.com").insert(&state.db).await;

    let (status, body) = send(&state, "GET", "/", &solo.bearer(), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");
}
