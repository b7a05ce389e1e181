//! Storage seam for the review pipeline.
//!
//! Every read and write the pipeline performs goes through `ReviewStore`.
//! `PgReviewStore` is the production backend; tests run against `MemoryReviewStore`.
//! Uniqueness of reviews (per application) and progress rows (per job + business)
//! is enforced by the backend's upsert, never by application-level locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ExtractedDocumentRow, JobRow, QueueEntry};
use crate::models::review::{ReviewProgressRow, ReviewRow};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgReviewStore;

/// Manual reviewer judgment. `rating` is already validated into [1,5].
#[derive(Debug, Clone)]
pub struct ManualReview {
    pub application_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i16,
    pub note: Option<String>,
    pub saved_at: DateTime<Utc>,
}

/// AI-prefixed review fields. Any of them may be absent.
#[derive(Debug, Clone)]
pub struct AiReviewFields {
    pub application_id: Uuid,
    pub ai_rating: Option<i16>,
    pub ai_summary: Option<String>,
    pub ai_model: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub job_id: Uuid,
    pub business_id: Uuid,
    pub last_reviewed_application: Uuid,
    pub reviewed_count: i32,
    pub total_count: i32,
    pub needs_reconciliation: bool,
    pub resumed_at: DateTime<Utc>,
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn fetch_application(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError>;

    async fn fetch_job(&self, id: Uuid) -> Result<Option<JobRow>, AppError>;

    /// All extraction records for an application, oldest first.
    async fn documents_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ExtractedDocumentRow>, AppError>;

    /// Every application of a job. Order is not guaranteed; the queue navigator sorts.
    async fn job_queue(&self, job_id: Uuid) -> Result<Vec<QueueEntry>, AppError>;

    async fn fetch_review(&self, application_id: Uuid) -> Result<Option<ReviewRow>, AppError>;

    /// Upserts the manual fields of the review row and marks the application reviewed,
    /// atomically. AI fields are left untouched.
    async fn save_manual_review(&self, review: &ManualReview) -> Result<ReviewRow, AppError>;

    /// Upserts only the AI fields of the review row. Manual fields are left untouched.
    async fn save_ai_review(&self, fields: &AiReviewFields) -> Result<ReviewRow, AppError>;

    async fn fetch_progress(
        &self,
        job_id: Uuid,
        business_id: Uuid,
    ) -> Result<Option<ReviewProgressRow>, AppError>;

    async fn upsert_progress(&self, update: &ProgressUpdate)
        -> Result<ReviewProgressRow, AppError>;
}
