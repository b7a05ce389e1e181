use std::sync::Arc;

use crate::config::Config;
use crate::scoring::suggestion::Suggester;
use crate::store::ReviewStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
    /// `None` when no inference credential is configured; the AI path then skips.
    pub suggester: Option<Arc<dyn Suggester>>,
    pub config: Config,
}
