//! Review orchestration behind the `review-state` and `save-review` operations.
//!
//! Flow (read):  application + job → ownership check → review row → queue position
//!               → progress.
//! Flow (write): ownership check → manual upsert → progress upsert → optional next pick.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::caller::Caller;
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, JobRow};
use crate::models::review::{ReviewProgressRow, ReviewRow};
use crate::review::progress::{load_progress, record_progress};
use crate::review::queue::{load_queue, locate, next_unreviewed, QueuePosition};
use crate::review::records::{
    ai_fields, load_review, project_legacy_notes, save_manual_review, AiFieldsView,
    ApplicationSummary,
};
use crate::store::ReviewStore;

#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewState {
    pub application: ApplicationSummary,
    pub job: JobSummary,
    pub review: Option<ReviewRow>,
    pub ai: Option<AiFieldsView>,
    pub queue: QueuePosition,
    pub progress: Option<ReviewProgressRow>,
}

#[derive(Debug, Deserialize)]
pub struct SaveReviewRequest {
    /// Kept as a float so non-integers reach validation instead of failing to parse.
    pub rating: Option<f64>,
    pub note: Option<String>,
    #[serde(default)]
    pub advance: bool,
}

#[derive(Debug, Serialize)]
pub struct SaveReviewResponse {
    pub review: ReviewRow,
    pub progress: ReviewProgressRow,
    pub queue: QueuePosition,
    /// Only populated when the request asked to advance.
    pub next_application_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub job_id: Uuid,
    pub progress: Option<ReviewProgressRow>,
    pub total: usize,
    pub next_unreviewed_application_id: Option<Uuid>,
}

/// Loads an application and its job, failing with `NotFound` if either is missing.
pub async fn load_application_and_job(
    store: &dyn ReviewStore,
    application_id: Uuid,
) -> Result<(ApplicationRow, JobRow), AppError> {
    let application = store
        .fetch_application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;
    let job = store.fetch_job(application.job_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Job {} for application {application_id} not found",
            application.job_id
        ))
    })?;
    Ok((application, job))
}

pub async fn get_review_state(
    store: &dyn ReviewStore,
    caller: &Caller,
    application_id: Uuid,
) -> Result<ReviewState, AppError> {
    let (application, job) = load_application_and_job(store, application_id).await?;
    caller.ensure_can_review(&job)?;

    let review = load_review(store, application_id).await?;
    let queue = load_queue(store, job.id).await?;
    let position = locate(&queue, application_id);
    let progress = load_progress(store, job.id, job.business_id).await?;

    Ok(ReviewState {
        application: project_legacy_notes(application, review.as_ref()),
        job: JobSummary {
            id: job.id,
            title: job.title,
        },
        ai: review.as_ref().and_then(ai_fields),
        review,
        queue: position,
        progress,
    })
}

pub async fn save_review(
    store: &dyn ReviewStore,
    caller: &Caller,
    application_id: Uuid,
    request: SaveReviewRequest,
) -> Result<SaveReviewResponse, AppError> {
    let (_, job) = load_application_and_job(store, application_id).await?;
    caller.ensure_can_review(&job)?;

    let review = save_manual_review(
        store,
        application_id,
        caller.user_id,
        request.rating,
        request.note,
    )
    .await?;

    let update = record_progress(store, job.id, job.business_id, application_id).await?;

    let next_application_id = if request.advance {
        next_unreviewed(&update.queue, Some(application_id))
    } else {
        None
    };

    info!(
        "Review saved for application {application_id} on job {}: {}/{} reviewed",
        job.id, update.progress.reviewed_count, update.progress.total_count
    );

    Ok(SaveReviewResponse {
        review,
        progress: update.progress,
        queue: update.position,
        next_application_id,
    })
}

pub async fn get_progress(
    store: &dyn ReviewStore,
    caller: &Caller,
    job_id: Uuid,
) -> Result<ProgressResponse, AppError> {
    let job = store
        .fetch_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    caller.ensure_can_review(&job)?;

    let progress = load_progress(store, job.id, job.business_id).await?;
    let queue = load_queue(store, job.id).await?;
    let resume_from = progress.as_ref().and_then(|p| p.last_reviewed_application);

    Ok(ProgressResponse {
        job_id,
        total: queue.len(),
        next_unreviewed_application_id: next_unreviewed(&queue, resume_from),
        progress,
    })
}
