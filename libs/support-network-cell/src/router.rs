use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn support_network_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::get_support_network))
        .route("/join", post(handlers::join_support_network))
        .route("/{link_id}", patch(handlers::update_link_status))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
