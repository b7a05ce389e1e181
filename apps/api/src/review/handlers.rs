//! Axum route handlers for the review UI.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::caller::Caller;
use crate::errors::AppError;
use crate::review::service::{
    get_progress, get_review_state, save_review, ProgressResponse, ReviewState,
    SaveReviewRequest, SaveReviewResponse,
};
use crate::state::AppState;

/// GET /api/v1/applications/:id/review
pub async fn handle_get_review_state(
    State(state): State<AppState>,
    caller: Caller,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ReviewState>, AppError> {
    let review_state = get_review_state(state.store.as_ref(), &caller, application_id).await?;
    Ok(Json(review_state))
}

/// POST /api/v1/applications/:id/review
pub async fn handle_save_review(
    State(state): State<AppState>,
    caller: Caller,
    Path(application_id): Path<Uuid>,
    Json(request): Json<SaveReviewRequest>,
) -> Result<Json<SaveReviewResponse>, AppError> {
    let response = save_review(state.store.as_ref(), &caller, application_id, request).await?;
    Ok(Json(response))
}

/// GET /api/v1/jobs/:job_id/review-progress
pub async fn handle_get_progress(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ProgressResponse>, AppError> {
    let progress = get_progress(state.store.as_ref(), &caller, job_id).await?;
    Ok(Json(progress))
}
