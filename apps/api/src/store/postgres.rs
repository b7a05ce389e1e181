use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ExtractedDocumentRow, JobRow, QueueEntry};
use crate::models::review::{ReviewProgressRow, ReviewRow};
use crate::store::{AiReviewFields, ManualReview, ProgressUpdate, ReviewStore};

/// Postgres-backed store. Related records are loaded with separate queries so callers
/// always get a plain `Option<JobRow>` / `Vec<ExtractedDocumentRow>`.
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn fetch_application(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, job_id, applicant_id, cover_letter, resume_url, status,
                   created_at, reviewed_at, reviewed_by
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn fetch_job(&self, id: Uuid) -> Result<Option<JobRow>, AppError> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, business_id, title, description, requirements, created_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn documents_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ExtractedDocumentRow>, AppError> {
        Ok(sqlx::query_as::<_, ExtractedDocumentRow>(
            r#"
            SELECT id, application_id, status, extracted_text, created_at
            FROM extracted_documents
            WHERE application_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn job_queue(&self, job_id: Uuid) -> Result<Vec<QueueEntry>, AppError> {
        Ok(sqlx::query_as::<_, QueueEntry>(
            r#"
            SELECT id, created_at, status
            FROM applications
            WHERE job_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn fetch_review(&self, application_id: Uuid) -> Result<Option<ReviewRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE application_id = $1")
                .bind(application_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn save_manual_review(&self, review: &ManualReview) -> Result<ReviewRow, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (application_id, rating, note, reviewer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (application_id) DO UPDATE SET
                rating = EXCLUDED.rating,
                note = EXCLUDED.note,
                reviewer_id = EXCLUDED.reviewer_id,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(review.application_id)
        .bind(review.rating)
        .bind(&review.note)
        .bind(review.reviewer_id)
        .bind(review.saved_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE applications
            SET status = 'reviewed', reviewed_at = $2, reviewed_by = $3
            WHERE id = $1
            "#,
        )
        .bind(review.application_id)
        .bind(review.saved_at)
        .bind(review.reviewer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn save_ai_review(&self, fields: &AiReviewFields) -> Result<ReviewRow, AppError> {
        Ok(sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews
                (application_id, ai_rating, ai_summary, ai_model, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (application_id) DO UPDATE SET
                ai_rating = EXCLUDED.ai_rating,
                ai_summary = EXCLUDED.ai_summary,
                ai_model = EXCLUDED.ai_model,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(fields.application_id)
        .bind(fields.ai_rating)
        .bind(&fields.ai_summary)
        .bind(&fields.ai_model)
        .bind(fields.saved_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn fetch_progress(
        &self,
        job_id: Uuid,
        business_id: Uuid,
    ) -> Result<Option<ReviewProgressRow>, AppError> {
        Ok(sqlx::query_as::<_, ReviewProgressRow>(
            "SELECT * FROM review_progress WHERE job_id = $1 AND business_id = $2",
        )
        .bind(job_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_progress(
        &self,
        update: &ProgressUpdate,
    ) -> Result<ReviewProgressRow, AppError> {
        Ok(sqlx::query_as::<_, ReviewProgressRow>(
            r#"
            INSERT INTO review_progress
                (job_id, business_id, last_reviewed_application, reviewed_count,
                 total_count, needs_reconciliation, resumed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (job_id, business_id) DO UPDATE SET
                last_reviewed_application = EXCLUDED.last_reviewed_application,
                reviewed_count = EXCLUDED.reviewed_count,
                total_count = EXCLUDED.total_count,
                needs_reconciliation = EXCLUDED.needs_reconciliation,
                resumed_at = EXCLUDED.resumed_at
            RETURNING *
            "#,
        )
        .bind(update.job_id)
        .bind(update.business_id)
        .bind(update.last_reviewed_application)
        .bind(update.reviewed_count)
        .bind(update.total_count)
        .bind(update.needs_reconciliation)
        .bind(update.resumed_at)
        .fetch_one(&self.pool)
        .await?)
    }
}
