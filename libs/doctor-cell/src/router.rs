use axum::{routing::get, Router};

use shared_utils::AppState;

use crate::handlers;

/// Doctor directory. Public, no token needed.
pub fn doctor_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/slots", get(handlers::get_available_slots))
        .with_state(state)
}
