mod caller;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod review;
mod routes;
mod scoring;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::InferenceClient;
use crate::routes::build_router;
use crate::scoring::suggestion::{LlmSuggester, Suggester};
use crate::state::AppState;
use crate::store::{PgReviewStore, ReviewStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Review API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    if config.run_migrations {
        run_migrations(&db).await?;
    }
    let store: Arc<dyn ReviewStore> = Arc::new(PgReviewStore::new(db));

    // Initialize inference client (optional: the AI path skips without a key)
    let suggester: Option<Arc<dyn Suggester>> = match &config.anthropic_api_key {
        Some(key) => {
            let client = InferenceClient::new(
                config.inference_api_url.clone(),
                key.clone(),
                config.inference_model.clone(),
                config.inference_temperature,
            );
            info!(
                "Inference client initialized (model: {}, temperature: {})",
                config.inference_model, config.inference_temperature
            );
            Some(Arc::new(LlmSuggester(client)) as Arc<dyn Suggester>)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; AI suggestions will be skipped");
            None
        }
    };

    // Build app state
    let state = AppState {
        store,
        suggester,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the review UI host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
