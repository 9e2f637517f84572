use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn treatment_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::get_treatment))
        .route("/medications", post(handlers::add_medication))
        .route("/supplements", post(handlers::add_supplement))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
