//! Progress Tracker — per (job, business) resumable bookmark through the queue.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::QueueEntry;
use crate::models::review::ReviewProgressRow;
use crate::review::queue::{load_queue, locate, QueuePosition};
use crate::store::{ProgressUpdate, ReviewStore};

/// Reviewed count and reconciliation flag for the row about to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPlan {
    pub reviewed_count: usize,
    pub needs_reconciliation: bool,
}

/// Decides the reviewed count after a save.
///
/// Normally this is the saved application's position (or the queue size if it could
/// not be positioned). When the queue has shrunk since the stored row and the new
/// position falls below the stored count, the stored count is kept and the row is
/// flagged for reconciliation instead.
pub fn plan_progress(
    previous: Option<&ReviewProgressRow>,
    position: &QueuePosition,
) -> ProgressPlan {
    let computed = position.position.unwrap_or(position.total);

    if let Some(prev) = previous {
        let prev_reviewed = usize::try_from(prev.reviewed_count).unwrap_or(0);
        let prev_total = usize::try_from(prev.total_count).unwrap_or(0);
        if position.total < prev_total && computed < prev_reviewed {
            return ProgressPlan {
                reviewed_count: prev_reviewed,
                needs_reconciliation: true,
            };
        }
    }

    ProgressPlan {
        reviewed_count: computed,
        needs_reconciliation: false,
    }
}

/// Outcome of a progress update, including the queue snapshot it was computed from.
pub struct ProgressUpdateResult {
    pub progress: ReviewProgressRow,
    pub queue: Vec<QueueEntry>,
    pub position: QueuePosition,
}

/// Recomputes and upserts the progress row after `application_id` was saved.
pub async fn record_progress(
    store: &dyn ReviewStore,
    job_id: Uuid,
    business_id: Uuid,
    application_id: Uuid,
) -> Result<ProgressUpdateResult, AppError> {
    let queue = load_queue(store, job_id).await?;
    let position = locate(&queue, application_id);
    let previous = store.fetch_progress(job_id, business_id).await?;
    let plan = plan_progress(previous.as_ref(), &position);

    if plan.needs_reconciliation {
        warn!(
            "Queue for job {job_id} shrank below recorded progress ({} reviewed, {} remaining); \
             keeping last-known progress and flagging for reconciliation",
            plan.reviewed_count, position.total
        );
    }

    let progress = store
        .upsert_progress(&ProgressUpdate {
            job_id,
            business_id,
            last_reviewed_application: application_id,
            reviewed_count: to_count(plan.reviewed_count)?,
            total_count: to_count(position.total)?,
            needs_reconciliation: plan.needs_reconciliation,
            resumed_at: Utc::now(),
        })
        .await?;

    Ok(ProgressUpdateResult {
        progress,
        queue,
        position,
    })
}

pub async fn load_progress(
    store: &dyn ReviewStore,
    job_id: Uuid,
    business_id: Uuid,
) -> Result<Option<ReviewProgressRow>, AppError> {
    store.fetch_progress(job_id, business_id).await
}

fn to_count(n: usize) -> Result<i32, AppError> {
    i32::try_from(n)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("queue size {n} overflows i32")))
}
