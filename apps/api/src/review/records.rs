//! Review Record Manager — owns the one-review-per-application row.
//!
//! Two write paths share the row: the manual path (rating, note, reviewer) and the
//! AI path (ai_rating, ai_summary, ai_model). Each path only ever writes its own
//! columns, so they can run in any order without clobbering each other.

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::review::ReviewRow;
use crate::store::{AiReviewFields, ManualReview, ReviewStore};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// A parsed and validated AI suggestion ready to be stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiSuggestion {
    pub rating: Option<i16>,
    pub summary: Option<String>,
    pub model: Option<String>,
}

/// AI-prefixed fields of a review, as exposed to the review UI.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AiFieldsView {
    pub rating: Option<i16>,
    pub summary: Option<String>,
    pub model: Option<String>,
}

/// Manual ratings must be whole numbers in [1,5].
pub fn validate_rating(rating: Option<f64>) -> Result<i16, AppError> {
    let rating = rating.ok_or_else(|| AppError::Validation("rating is required".to_string()))?;
    if !rating.is_finite() || rating.fract() != 0.0 {
        return Err(AppError::Validation(format!(
            "rating must be a whole number between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    if rating < f64::from(MIN_RATING) || rating > f64::from(MAX_RATING) {
        return Err(AppError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(rating as i16)
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Manual path: upserts rating/note/reviewer and marks the application reviewed.
pub async fn save_manual_review(
    store: &dyn ReviewStore,
    application_id: Uuid,
    reviewer_id: Uuid,
    rating: Option<f64>,
    note: Option<String>,
) -> Result<ReviewRow, AppError> {
    let rating = validate_rating(rating)?;

    let review = store
        .save_manual_review(&ManualReview {
            application_id,
            reviewer_id,
            rating,
            note: normalize_note(note),
            saved_at: Utc::now(),
        })
        .await?;

    info!("Saved manual review for application {application_id}: rating={rating}");
    Ok(review)
}

/// AI path: upserts only the AI fields, creating the row if needed.
pub async fn record_ai_suggestion(
    store: &dyn ReviewStore,
    application_id: Uuid,
    suggestion: AiSuggestion,
) -> Result<ReviewRow, AppError> {
    let review = store
        .save_ai_review(&AiReviewFields {
            application_id,
            ai_rating: suggestion
                .rating
                .map(|r| r.clamp(MIN_RATING, MAX_RATING)),
            ai_summary: suggestion.summary,
            ai_model: suggestion.model,
            saved_at: Utc::now(),
        })
        .await?;

    info!(
        "Recorded AI suggestion for application {application_id}: ai_rating={:?}",
        review.ai_rating
    );
    Ok(review)
}

/// Read path. `None` means "not yet reviewed", not an error.
pub async fn load_review(
    store: &dyn ReviewStore,
    application_id: Uuid,
) -> Result<Option<ReviewRow>, AppError> {
    store.fetch_review(application_id).await
}

/// AI fields of a review, or `None` when the AI path has not produced anything yet.
pub fn ai_fields(review: &ReviewRow) -> Option<AiFieldsView> {
    if review.ai_rating.is_none() && review.ai_summary.is_none() && review.ai_model.is_none() {
        return None;
    }
    Some(AiFieldsView {
        rating: review.ai_rating,
        summary: review.ai_summary.clone(),
        model: review.ai_model.clone(),
    })
}

/// Application as legacy readers expect it, with `notes` projected from the review.
/// The review row is the only stored copy of the note.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummary {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub notes: Option<String>,
}

pub fn project_legacy_notes(
    application: ApplicationRow,
    review: Option<&ReviewRow>,
) -> ApplicationSummary {
    ApplicationSummary {
        application,
        notes: review.and_then(|r| r.note.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use crate::store::memory::MemoryReviewStore;

    fn seeded() -> (MemoryReviewStore, Uuid) {
        let store = MemoryReviewStore::default();
        let job = store.insert_job(Uuid::new_v4(), "Line Cook");
        let app = store.insert_application(job.id, Some("I love kitchens"), Utc::now());
        (store, app.id)
    }

    #[test]
    fn test_whole_ratings_in_range_are_accepted() {
        for r in 1..=5 {
            assert_eq!(validate_rating(Some(f64::from(r))).unwrap(), r as i16);
        }
    }

    #[test]
    fn test_out_of_range_or_fractional_ratings_are_rejected() {
        for r in [0.0, 6.0, -1.0, 3.5, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(validate_rating(Some(r)), Err(AppError::Validation(_))),
                "rating {r} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_rating_is_rejected() {
        assert!(matches!(validate_rating(None), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_manual_save_marks_application_reviewed() {
        let (store, app_id) = seeded();
        let reviewer = Uuid::new_v4();
        save_manual_review(&store, app_id, reviewer, Some(4.0), Some("  solid  ".into()))
            .await
            .unwrap();

        let app = store.application(app_id).unwrap();
        assert_eq!(app.status, ApplicationStatus::Reviewed);
        assert_eq!(app.reviewed_by, Some(reviewer));
        assert!(app.reviewed_at.is_some());

        let review = load_review(&store, app_id).await.unwrap().unwrap();
        assert_eq!(review.note.as_deref(), Some("solid"));
    }

    #[tokio::test]
    async fn test_rejected_rating_writes_nothing() {
        let (store, app_id) = seeded();
        let result = save_manual_review(&store, app_id, Uuid::new_v4(), Some(6.0), None).await;
        assert!(result.is_err());
        assert_eq!(store.review_count(), 0);
        assert_eq!(
            store.application(app_id).unwrap().status,
            ApplicationStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_second_manual_save_replaces_first_in_place() {
        let (store, app_id) = seeded();
        let first =
            save_manual_review(&store, app_id, Uuid::new_v4(), Some(2.0), Some("meh".into()))
                .await
                .unwrap();
        let second_reviewer = Uuid::new_v4();
        let second = save_manual_review(&store, app_id, second_reviewer, Some(5.0), None)
            .await
            .unwrap();

        assert_eq!(store.review_count(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(second.rating, Some(5));
        assert_eq!(second.note, None);
        assert_eq!(second.reviewer_id, Some(second_reviewer));
    }

    #[tokio::test]
    async fn test_ai_path_preserves_manual_fields() {
        let (store, app_id) = seeded();
        save_manual_review(&store, app_id, Uuid::new_v4(), Some(3.0), Some("keep me".into()))
            .await
            .unwrap();

        let review = record_ai_suggestion(
            &store,
            app_id,
            AiSuggestion {
                rating: Some(5),
                summary: Some("Strong fit".into()),
                model: Some("test-model".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(store.review_count(), 1);
        assert_eq!(review.rating, Some(3));
        assert_eq!(review.note.as_deref(), Some("keep me"));
        assert_eq!(review.ai_rating, Some(5));
        assert_eq!(review.ai_summary.as_deref(), Some("Strong fit"));
    }

    #[tokio::test]
    async fn test_ai_path_creates_row_with_empty_manual_fields() {
        let (store, app_id) = seeded();
        let review = record_ai_suggestion(
            &store,
            app_id,
            AiSuggestion {
                rating: None,
                summary: Some("Too little information".into()),
                model: Some("test-model".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(review.rating, None);
        assert_eq!(review.note, None);
        assert_eq!(review.reviewer_id, None);
        assert_eq!(
            store.application(app_id).unwrap().status,
            ApplicationStatus::Pending
        );

        let view = ai_fields(&review).unwrap();
        assert_eq!(view.rating, None);
        assert_eq!(view.summary.as_deref(), Some("Too little information"));
    }

    #[tokio::test]
    async fn test_rerunning_ai_path_overwrites_only_ai_fields() {
        let (store, app_id) = seeded();
        let first = AiSuggestion {
            rating: Some(2),
            summary: Some("first".into()),
            model: Some("m1".into()),
        };
        record_ai_suggestion(&store, app_id, first).await.unwrap();
        let second = AiSuggestion {
            rating: Some(4),
            summary: None,
            model: Some("m2".into()),
        };
        let review = record_ai_suggestion(&store, app_id, second).await.unwrap();

        assert_eq!(store.review_count(), 1);
        assert_eq!(review.ai_rating, Some(4));
        assert_eq!(review.ai_summary, None);
        assert_eq!(review.ai_model.as_deref(), Some("m2"));
    }

    #[tokio::test]
    async fn test_unreviewed_application_reads_as_none() {
        let (store, app_id) = seeded();
        assert!(load_review(&store, app_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_legacy_notes_are_projected_from_review() {
        let (store, app_id) = seeded();
        let note = Some("call back".to_string());
        let review = save_manual_review(&store, app_id, Uuid::new_v4(), Some(4.0), note)
            .await
            .unwrap();
        let app = store.application(app_id).unwrap();

        let summary = project_legacy_notes(app.clone(), Some(&review));
        assert_eq!(summary.notes.as_deref(), Some("call back"));
        assert_eq!(project_legacy_notes(app, None).notes, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["notes"], "call back");
        assert_eq!(json["status"], "reviewed");
    }
}
