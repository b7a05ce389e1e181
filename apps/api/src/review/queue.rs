//! Queue Navigator — positions an application within its job's applicant queue.
//!
//! The queue is a stable total order: creation timestamp ascending, ties broken by id.
//! It is recomputed on every request; nothing here is cached.

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, QueueEntry};
use crate::store::ReviewStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueuePosition {
    /// 1-based. `None` when the application is not in this job's queue.
    pub position: Option<usize>,
    pub total: usize,
    pub previous_application_id: Option<Uuid>,
    pub next_application_id: Option<Uuid>,
}

/// Sorts entries into queue order.
pub fn order_queue(mut entries: Vec<QueueEntry>) -> Vec<QueueEntry> {
    entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    entries
}

/// Loads a job's queue in order.
pub async fn load_queue(
    store: &dyn ReviewStore,
    job_id: Uuid,
) -> Result<Vec<QueueEntry>, AppError> {
    Ok(order_queue(store.job_queue(job_id).await?))
}

/// Finds `application_id` in an ordered queue and resolves its neighbours.
pub fn locate(queue: &[QueueEntry], application_id: Uuid) -> QueuePosition {
    let total = queue.len();
    match queue.iter().position(|e| e.id == application_id) {
        Some(index) => QueuePosition {
            position: Some(index + 1),
            total,
            previous_application_id: index.checked_sub(1).map(|i| queue[i].id),
            next_application_id: queue.get(index + 1).map(|e| e.id),
        },
        None => QueuePosition {
            position: None,
            total,
            previous_application_id: None,
            next_application_id: None,
        },
    }
}

/// Next pending application after `current`, wrapping to the start of the queue.
/// `current` itself is never returned.
pub fn next_unreviewed(queue: &[QueueEntry], current: Option<Uuid>) -> Option<Uuid> {
    let start = current
        .and_then(|id| queue.iter().position(|e| e.id == id))
        .map(|i| i + 1)
        .unwrap_or(0);

    queue[start..]
        .iter()
        .chain(queue[..start].iter())
        .find(|e| e.status == ApplicationStatus::Pending && Some(e.id) != current)
        .map(|e| e.id)
}
