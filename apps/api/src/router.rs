use axum::{routing::get, Router};

use appointment_cell::appointment_routes;
use auth_cell::auth_routes;
use doctor_cell::doctor_routes;
use payment_cell::payment_routes;
use shared_utils::AppState;
use support_network_cell::support_network_routes;
use treatment_cell::treatment_routes;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Prenatal care API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/payments", payment_routes(state.clone()))
        .nest("/treatments", treatment_routes(state.clone()))
        .nest("/support-network", support_network_routes(state))
}
