//! Materials Aggregator — job text, cover letter and extracted resume text for one application.

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{DocumentStatus, ExtractedDocumentRow};
use crate::review::service::load_application_and_job;
use crate::store::ReviewStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaterialsBundle {
    pub job_title: String,
    pub job_description: String,
    pub job_requirements: Option<String>,
    pub cover_letter: Option<String>,
    /// Completed documents, numbered in creation order.
    pub document_text: Option<String>,
}

impl MaterialsBundle {
    /// Whether there is any candidate-authored text to judge.
    pub fn has_candidate_text(&self) -> bool {
        self.cover_letter.is_some() || self.document_text.is_some()
    }
}

/// Builds the bundle for an application. Missing documents are not an error.
pub async fn gather_materials(
    store: &dyn ReviewStore,
    application_id: Uuid,
) -> Result<MaterialsBundle, AppError> {
    let (application, job) = load_application_and_job(store, application_id).await?;
    let documents = store.documents_for_application(application_id).await?;

    Ok(MaterialsBundle {
        job_title: job.title,
        job_description: job.description,
        job_requirements: non_blank(job.requirements),
        cover_letter: non_blank(application.cover_letter),
        document_text: combine_documents(&documents),
    })
}

/// Joins the text of completed, non-empty documents. Input must be in creation order.
pub fn combine_documents(documents: &[ExtractedDocumentRow]) -> Option<String> {
    let sections: Vec<String> = documents
        .iter()
        .filter(|d| d.status == DocumentStatus::Completed)
        .filter_map(|d| d.extracted_text.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(i, text)| format!("[Document {}]\n{}", i + 1, text))
        .collect();

    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n\n"))
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
