use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Unset means shortlists are cached in-process only.
    pub redis_url: Option<String>,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Per-request timeout on the HTTP client used for LLM calls.
    pub llm_timeout: Duration,
    /// Upper bound on each pipeline stage, retries included.
    pub match_stage_timeout: Duration,
    pub session_cache_ttl_secs: u64,
    /// Max sessions held by the in-process cache.
    pub session_cache_capacity: u64,
    /// How long a catalog query waits for a pooled connection.
    pub db_acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120)?),
            match_stage_timeout: Duration::from_secs(parse_env("MATCH_STAGE_TIMEOUT_SECS", 150)?),
            session_cache_ttl_secs: parse_env("SESSION_CACHE_TTL_SECS", 86_400)?,
            session_cache_capacity: parse_env("SESSION_CACHE_CAPACITY", 10_000)?,
            db_acquire_timeout: Duration::from_secs(parse_env("DB_ACQUIRE_TIMEOUT_SECS", 5)?),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
