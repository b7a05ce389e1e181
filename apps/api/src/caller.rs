//! Caller identity forwarded by the upstream authorization layer.
//!
//! The auth layer resolves the session and passes `x-user-id` / `x-user-type`;
//! this service trusts the pair and only checks ownership.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, JobRow};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_TYPE_HEADER: &str = "x-user-type";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Business,
    Candidate,
    Admin,
}

impl UserType {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "business" => Some(UserType::Business),
            "candidate" => Some(UserType::Candidate),
            "admin" => Some(UserType::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub user_type: UserType,
}

impl Caller {
    /// Businesses review their own jobs; admins may review any.
    pub fn ensure_can_review(&self, job: &JobRow) -> Result<(), AppError> {
        match self.user_type {
            UserType::Admin => Ok(()),
            UserType::Business if self.user_id == job.business_id => Ok(()),
            _ => Err(AppError::Forbidden),
        }
    }

    /// The AI trigger may also come from the candidate's own submission.
    pub fn ensure_can_trigger_ai(
        &self,
        job: &JobRow,
        application: &ApplicationRow,
    ) -> Result<(), AppError> {
        if self.user_type == UserType::Candidate && self.user_id == application.applicant_id {
            return Ok(());
        }
        self.ensure_can_review(job)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let user_id = header(USER_ID_HEADER)
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or(AppError::Unauthorized)?;
        let user_type = header(USER_TYPE_HEADER)
            .as_deref()
            .and_then(UserType::parse)
            .ok_or(AppError::Unauthorized)?;

        Ok(Caller { user_id, user_type })
    }
}
