//! Suggestion Client — calls the inference service and validates its two-key answer.
//!
//! A useless answer (non-numeric rating, blank summary) becomes `None` fields.
//! A failed call (non-2xx, unparseable body) is an `InferenceError`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{InferenceClient, InferenceError};
use crate::review::records::{MAX_RATING, MIN_RATING};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestion {
    pub rating: Option<i16>,
    pub summary: Option<String>,
}

/// Raw model output before validation. Either key may be missing or mistyped.
/// `rating` stays as JSON text so out-of-range numbers reach validation
/// instead of failing the whole decode.
#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    rating: Option<Box<RawValue>>,
    #[serde(default)]
    summary: Value,
}

/// Swappable suggestion backend. Carried in `AppState` as `Arc<dyn Suggester>`.
#[async_trait]
pub trait Suggester: Send + Sync {
    async fn suggest(&self, prompt: &str) -> Result<Suggestion, InferenceError>;

    /// Model/version tag stored alongside the AI fields.
    fn model_tag(&self) -> &str;
}

/// Production suggester backed by the inference client.
pub struct LlmSuggester(pub InferenceClient);

#[async_trait]
impl Suggester for LlmSuggester {
    async fn suggest(&self, prompt: &str) -> Result<Suggestion, InferenceError> {
        let raw: RawSuggestion = self.0.call_json(prompt, JSON_ONLY_SYSTEM).await?;
        Ok(Suggestion {
            rating: raw.rating.as_deref().and_then(|r| normalize_rating(r.get())),
            summary: normalize_summary(&raw.summary),
        })
    }

    fn model_tag(&self) -> &str {
        self.0.model()
    }
}

/// Takes the rating as raw JSON text. Numbers (or numeric strings) are rounded and
/// clamped into [1,5]; non-finite values and anything else are `None`.
pub fn normalize_rating(raw_json: &str) -> Option<i16> {
    let raw = raw_json.trim();
    let n = if raw.starts_with('"') {
        let text: String = serde_json::from_str(raw).ok()?;
        text.trim().parse::<f64>().ok()?
    } else {
        raw.parse::<f64>().ok()?
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(f64::from(MIN_RATING), f64::from(MAX_RATING)) as i16)
}

/// Trimmed summary; blank or non-string becomes `None`.
pub fn normalize_summary(raw: &Value) -> Option<String> {
    raw.as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
