//! In-memory `ReviewStore` with the same upsert semantics as the Postgres schema.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{
    ApplicationRow, ApplicationStatus, DocumentStatus, ExtractedDocumentRow, JobRow, QueueEntry,
};
use crate::models::review::{ReviewProgressRow, ReviewRow};
use crate::store::{AiReviewFields, ManualReview, ProgressUpdate, ReviewStore};

#[derive(Default)]
struct Tables {
    jobs: HashMap<Uuid, JobRow>,
    applications: HashMap<Uuid, ApplicationRow>,
    documents: Vec<ExtractedDocumentRow>,
    reviews: HashMap<Uuid, ReviewRow>,
    progress: HashMap<(Uuid, Uuid), ReviewProgressRow>,
}

#[derive(Default)]
pub struct MemoryReviewStore {
    tables: Mutex<Tables>,
}

impl MemoryReviewStore {
    pub fn insert_job(&self, business_id: Uuid, title: &str) -> JobRow {
        let job = JobRow {
            id: Uuid::new_v4(),
            business_id,
            title: title.to_string(),
            description: format!("{title} description"),
            requirements: None,
            created_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .jobs
            .insert(job.id, job.clone());
        job
    }

    pub fn insert_application(
        &self,
        job_id: Uuid,
        cover_letter: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> ApplicationRow {
        self.insert_application_with_id(Uuid::new_v4(), job_id, cover_letter, created_at)
    }

    pub fn insert_application_with_id(
        &self,
        id: Uuid,
        job_id: Uuid,
        cover_letter: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> ApplicationRow {
        let application = ApplicationRow {
            id,
            job_id,
            applicant_id: Uuid::new_v4(),
            cover_letter: cover_letter.map(String::from),
            resume_url: None,
            status: ApplicationStatus::Pending,
            created_at,
            reviewed_at: None,
            reviewed_by: None,
        };
        self.tables
            .lock()
            .unwrap()
            .applications
            .insert(id, application.clone());
        application
    }

    pub fn insert_document(
        &self,
        application_id: Uuid,
        status: DocumentStatus,
        text: Option<&str>,
        created_at: DateTime<Utc>,
    ) {
        self.tables
            .lock()
            .unwrap()
            .documents
            .push(ExtractedDocumentRow {
                id: Uuid::new_v4(),
                application_id,
                status,
                extracted_text: text.map(String::from),
                created_at,
            });
    }

    pub fn withdraw_application(&self, id: Uuid) {
        self.tables.lock().unwrap().applications.remove(&id);
    }

    pub fn application(&self, id: Uuid) -> Option<ApplicationRow> {
        self.tables.lock().unwrap().applications.get(&id).cloned()
    }

    pub fn review_count(&self) -> usize {
        self.tables.lock().unwrap().reviews.len()
    }

    pub fn progress_count(&self) -> usize {
        self.tables.lock().unwrap().progress.len()
    }
}

fn empty_review(application_id: Uuid, at: DateTime<Utc>) -> ReviewRow {
    ReviewRow {
        id: Uuid::new_v4(),
        application_id,
        rating: None,
        note: None,
        reviewer_id: None,
        ai_rating: None,
        ai_summary: None,
        ai_model: None,
        created_at: at,
        updated_at: at,
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn fetch_application(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        Ok(self.application(id))
    }

    async fn fetch_job(&self, id: Uuid) -> Result<Option<JobRow>, AppError> {
        Ok(self.tables.lock().unwrap().jobs.get(&id).cloned())
    }

    async fn documents_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ExtractedDocumentRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut documents: Vec<_> = tables
            .documents
            .iter()
            .filter(|d| d.application_id == application_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(documents)
    }

    async fn job_queue(&self, job_id: Uuid) -> Result<Vec<QueueEntry>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .values()
            .filter(|a| a.job_id == job_id)
            .map(|a| QueueEntry {
                id: a.id,
                created_at: a.created_at,
                status: a.status,
            })
            .collect())
    }

    async fn fetch_review(&self, application_id: Uuid) -> Result<Option<ReviewRow>, AppError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .reviews
            .get(&application_id)
            .cloned())
    }

    async fn save_manual_review(&self, review: &ManualReview) -> Result<ReviewRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .reviews
            .entry(review.application_id)
            .or_insert_with(|| empty_review(review.application_id, review.saved_at));
        row.rating = Some(review.rating);
        row.note = review.note.clone();
        row.reviewer_id = Some(review.reviewer_id);
        row.updated_at = review.saved_at;
        let row = row.clone();

        if let Some(application) = tables.applications.get_mut(&review.application_id) {
            application.status = ApplicationStatus::Reviewed;
            application.reviewed_at = Some(review.saved_at);
            application.reviewed_by = Some(review.reviewer_id);
        }
        Ok(row)
    }

    async fn save_ai_review(&self, fields: &AiReviewFields) -> Result<ReviewRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .reviews
            .entry(fields.application_id)
            .or_insert_with(|| empty_review(fields.application_id, fields.saved_at));
        row.ai_rating = fields.ai_rating;
        row.ai_summary = fields.ai_summary.clone();
        row.ai_model = fields.ai_model.clone();
        row.updated_at = fields.saved_at;
        Ok(row.clone())
    }

    async fn fetch_progress(
        &self,
        job_id: Uuid,
        business_id: Uuid,
    ) -> Result<Option<ReviewProgressRow>, AppError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .progress
            .get(&(job_id, business_id))
            .cloned())
    }

    async fn upsert_progress(
        &self,
        update: &ProgressUpdate,
    ) -> Result<ReviewProgressRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .progress
            .entry((update.job_id, update.business_id))
            .or_insert_with(|| ReviewProgressRow {
                id: Uuid::new_v4(),
                job_id: update.job_id,
                business_id: update.business_id,
                last_reviewed_application: None,
                reviewed_count: 0,
                total_count: 0,
                needs_reconciliation: false,
                resumed_at: update.resumed_at,
            });
        row.last_reviewed_application = Some(update.last_reviewed_application);
        row.reviewed_count = update.reviewed_count;
        row.total_count = update.total_count;
        row.needs_reconciliation = update.needs_reconciliation;
        row.resumed_at = update.resumed_at;
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_documents_with_equal_timestamps_are_ordered_by_id() {
        let store = MemoryReviewStore::default();
        let job = store.insert_job(Uuid::new_v4(), "Line cook");
        let app = store.insert_application(job.id, None, Utc::now());
        let at = Utc::now();
        for i in 0..8 {
            let text = format!("doc {i}");
            store.insert_document(app.id, DocumentStatus::Completed, Some(&text), at);
        }
        let earlier = at - Duration::seconds(1);
        store.insert_document(app.id, DocumentStatus::Completed, Some("earliest"), earlier);

        let documents = store.documents_for_application(app.id).await.unwrap();
        assert_eq!(documents.len(), 9);
        assert_eq!(documents[0].extracted_text.as_deref(), Some("earliest"));
        let tied: Vec<Uuid> = documents[1..].iter().map(|d| d.id).collect();
        let mut sorted = tied.clone();
        sorted.sort();
        assert_eq!(tied, sorted);
    }
}
