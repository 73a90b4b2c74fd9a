pub mod api;
pub mod health;
pub mod page;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Page
        .route("/", get(page::handle_page))
        .route("/objective", post(page::handle_objective))
        .route("/selection", post(page::handle_selection))
        .route("/generate", post(page::handle_generate))
        .route("/reload", post(page::handle_reload))
        // JSON / live output
        .route("/api/objectives", get(api::handle_objectives))
        .route("/api/frameworks", get(api::handle_frameworks))
        .route("/api/frameworks/:id", get(api::handle_framework))
        .route("/api/output", get(api::handle_output))
        .route("/api/output/events", get(api::handle_output_events))
        .with_state(state)
}
