//! AI suggestion path.
//!
//! Flow: credential check → gather materials → text check → build prompt →
//!       suggest → upsert AI fields only.
//!
//! Independent of the manual review path: a failure here never touches manual
//! fields or application status.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::review::ReviewRow;
use crate::review::records::{record_ai_suggestion, AiSuggestion};
use crate::scoring::materials::gather_materials;
use crate::scoring::prompts::build_suggestion_prompt;
use crate::scoring::suggestion::Suggester;
use crate::store::ReviewStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingApiKey,
    NoTextAvailable,
}

/// Result of one AI run. `Skipped` is a decision, not a failure.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AiReviewOutcome {
    Completed { review: ReviewRow },
    Skipped { reason: SkipReason },
}

/// Runs the AI path inline and returns its outcome or error.
pub async fn run_ai_review(
    store: &dyn ReviewStore,
    suggester: Option<&dyn Suggester>,
    application_id: Uuid,
    hints: &[String],
) -> Result<AiReviewOutcome, AppError> {
    let Some(suggester) = suggester else {
        return Ok(AiReviewOutcome::Skipped {
            reason: SkipReason::MissingApiKey,
        });
    };

    let bundle = gather_materials(store, application_id).await?;
    if !bundle.has_candidate_text() {
        return Ok(AiReviewOutcome::Skipped {
            reason: SkipReason::NoTextAvailable,
        });
    }

    let prompt = build_suggestion_prompt(&bundle, hints);
    let suggestion = suggester.suggest(&prompt).await?;

    let review = record_ai_suggestion(
        store,
        application_id,
        AiSuggestion {
            rating: suggestion.rating,
            summary: suggestion.summary,
            model: Some(suggester.model_tag().to_string()),
        },
    )
    .await?;

    Ok(AiReviewOutcome::Completed { review })
}

/// Fire-and-forget trigger. The spawned task owns its failure channel:
/// outcomes and errors are logged, never returned to the triggering flow.
pub fn dispatch_ai_review(
    store: Arc<dyn ReviewStore>,
    suggester: Option<Arc<dyn Suggester>>,
    application_id: Uuid,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result =
            run_ai_review(store.as_ref(), suggester.as_deref(), application_id, &[]).await;
        match result {
            Ok(AiReviewOutcome::Completed { review }) => info!(
                "AI suggestion stored for application {application_id}: ai_rating={:?}",
                review.ai_rating
            ),
            Ok(AiReviewOutcome::Skipped { reason }) => {
                warn!("AI suggestion skipped for application {application_id}: {reason:?}")
            }
            Err(e) => error!("AI suggestion failed for application {application_id}: {e}"),
        }
    })
}
