use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per application, shared by the manual and AI write paths.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub rating: Option<i16>,
    pub note: Option<String>,
    pub reviewer_id: Option<Uuid>,
    pub ai_rating: Option<i16>,
    pub ai_summary: Option<String>,
    pub ai_model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A business's resumable bookmark through one job's queue.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewProgressRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub business_id: Uuid,
    pub last_reviewed_application: Option<Uuid>,
    pub reviewed_count: i32,
    pub total_count: i32,
    pub needs_reconciliation: bool,
    pub resumed_at: DateTime<Utc>,
}
