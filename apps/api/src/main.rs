mod catalog;
mod config;
mod db;
mod documents;
mod errors;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::PgCatalogStore;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::matching::{
    AttributeExtractor, ComparativeScorer, InMemoryResultCache, MatchPipeline, RedisResultCache,
    ResultCache,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lab Match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (catalog store)
    let db = create_pool(&config.database_url, config.db_acquire_timeout).await?;
    run_migrations(&db).await?;
    let catalog = Arc::new(PgCatalogStore::new(db));

    // Initialize session cache
    let cache: Arc<dyn ResultCache> = match &config.redis_url {
        Some(url) => {
            let redis = RedisResultCache::connect(url, config.session_cache_ttl_secs).await?;
            info!("Redis session cache initialized");
            Arc::new(redis)
        }
        None => {
            warn!("REDIS_URL not set; shortlists are cached in-process only");
            Arc::new(InMemoryResultCache::new(
                config.session_cache_capacity,
                Duration::from_secs(config.session_cache_ttl_secs),
            ))
        }
    };

    // Initialize LLM client (serves both document understanding and scoring)
    let llm = Arc::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_timeout,
    )?);
    info!(
        "LLM client initialized (model: {}, timeout: {:?})",
        llm_client::MODEL,
        config.llm_timeout
    );

    let pipeline = MatchPipeline::new(
        AttributeExtractor::new(llm.clone()),
        ComparativeScorer::new(llm),
        catalog.clone(),
        config.match_stage_timeout,
    );

    // Build app state
    let state = AppState {
        catalog,
        cache,
        pipeline: Arc::new(pipeline),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the frontend origin once it is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
