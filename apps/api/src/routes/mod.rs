pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::review::handlers as review;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Manual review
        .route(
            "/api/v1/applications/:id/review",
            get(review::handle_get_review_state).post(review::handle_save_review),
        )
        .route(
            "/api/v1/jobs/:job_id/review-progress",
            get(review::handle_get_progress),
        )
        // AI suggestions
        .route(
            "/api/v1/applications/:id/ai-review",
            post(scoring::handle_run_ai_review),
        )
        .route(
            "/api/v1/applications/:id/ai-review/dispatch",
            post(scoring::handle_dispatch_ai_review),
        )
        .with_state(state)
}
