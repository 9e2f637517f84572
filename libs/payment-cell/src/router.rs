use axum::{middleware, routing::get, Router};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn payment_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_payments).post(handlers::create_payment))
        .route("/{payment_id}", get(handlers::get_payment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
