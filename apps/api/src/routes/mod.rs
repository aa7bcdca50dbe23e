pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        // Job descriptions
        .route(
            "/api/v1/jds",
            post(handlers::handle_add_jd)
                .get(handlers::handle_list_jds)
                .delete(handlers::handle_clear_jds),
        )
        .route("/api/v1/jds/upload", post(handlers::handle_upload_jds))
        .route("/api/v1/extract", post(handlers::handle_extract))
        // Evaluation runs
        .route(
            "/api/v1/evaluations",
            post(handlers::handle_create_evaluation).get(handlers::handle_list_evaluations),
        )
        .route(
            "/api/v1/evaluations/skill-gaps",
            get(handlers::handle_skill_gaps),
        )
        .route("/api/v1/evaluations/export", get(handlers::handle_export))
        .route(
            "/api/v1/evaluations/:index",
            get(handlers::handle_get_evaluation),
        )
        .route(
            "/api/v1/evaluations/:index/sections",
            get(handlers::handle_sections),
        )
        .route(
            "/api/v1/evaluations/:index/simulate",
            post(handlers::handle_simulate),
        )
        .route(
            "/api/v1/evaluations/:index/feedback",
            post(handlers::handle_feedback),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
