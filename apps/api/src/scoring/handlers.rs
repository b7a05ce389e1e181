//! Axum route handlers for AI suggestions.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::caller::Caller;
use crate::errors::AppError;
use crate::review::service::load_application_and_job;
use crate::scoring::pipeline::{dispatch_ai_review, run_ai_review, AiReviewOutcome};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AiReviewRequest {
    #[serde(default)]
    pub hints: Vec<String>,
}

impl AiReviewRequest {
    /// An absent or blank body means "no hints"; anything else must parse.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("invalid ai-review request body: {e}")))
    }
}

/// POST /api/v1/applications/:id/ai-review
///
/// On-demand regeneration. Runs inline; inference failures surface as 502.
pub async fn handle_run_ai_review(
    State(state): State<AppState>,
    caller: Caller,
    Path(application_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<AiReviewOutcome>, AppError> {
    let (_, job) = load_application_and_job(state.store.as_ref(), application_id).await?;
    caller.ensure_can_review(&job)?;
    let request = AiReviewRequest::from_body(&body)?;

    let outcome = run_ai_review(
        state.store.as_ref(),
        state.suggester.as_deref(),
        application_id,
        &request.hints,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/applications/:id/ai-review/dispatch
///
/// Called by the submission flow once an application is registered.
/// Returns immediately; the AI run happens in the background.
pub async fn handle_dispatch_ai_review(
    State(state): State<AppState>,
    caller: Caller,
    Path(application_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let (application, job) =
        load_application_and_job(state.store.as_ref(), application_id).await?;
    caller.ensure_can_trigger_ai(&job, &application)?;

    dispatch_ai_review(state.store.clone(), state.suggester.clone(), application_id);
    Ok(StatusCode::ACCEPTED)
}
