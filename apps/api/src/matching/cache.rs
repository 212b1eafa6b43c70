//! Session Cache Adapter — keeps the last shortlist per client session.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::RankedResult;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A stored shortlist and when it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedShortlist {
    pub computed_at: DateTime<Utc>,
    pub results: Vec<RankedResult>,
}

impl CachedShortlist {
    fn now(results: &[RankedResult]) -> Self {
        Self {
            computed_at: Utc::now(),
            results: results.to_vec(),
        }
    }
}

/// `save` overwrites whatever the session had before.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn save(&self, session: Uuid, results: &[RankedResult]) -> Result<(), CacheError>;

    async fn load(&self, session: Uuid) -> Result<Option<CachedShortlist>, CacheError>;

    async fn clear(&self, session: Uuid) -> Result<(), CacheError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisResultCache {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl RedisResultCache {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, ttl_secs })
    }

    fn key(session: Uuid) -> String {
        format!("labmatch:shortlist:{session}")
    }
}

#[async_trait]
impl ResultCache for RedisResultCache {
    async fn save(&self, session: Uuid, results: &[RankedResult]) -> Result<(), CacheError> {
        let json = serde_json::to_string(&CachedShortlist::now(results))?;
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(Self::key(session))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        tracing::trace!("Cached {} results for session {session}", results.len());
        Ok(())
    }

    async fn load(&self, session: Uuid) -> Result<Option<CachedShortlist>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(Self::key(session))
            .query_async(&mut conn)
            .await?;
        value
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(CacheError::from)
    }

    async fn clear(&self, session: Uuid) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(Self::key(session))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process fallback (no REDIS_URL)
// ────────────────────────────────────────────────────────────────────────────

/// Used when Redis is not configured. Entries expire after the session TTL
/// and the least useful ones are evicted once `capacity` sessions are held.
pub struct InMemoryResultCache {
    entries: moka::future::Cache<Uuid, CachedShortlist>,
}

impl InMemoryResultCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let entries = moka::future::CacheBuilder::new(capacity)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn save(&self, session: Uuid, results: &[RankedResult]) -> Result<(), CacheError> {
        self.entries
            .insert(session, CachedShortlist::now(results))
            .await;
        Ok(())
    }

    async fn load(&self, session: Uuid) -> Result<Option<CachedShortlist>, CacheError> {
        Ok(self.entries.get(&session).await)
    }

    async fn clear(&self, session: Uuid) -> Result<(), CacheError> {
        self.entries.invalidate(&session).await;
        Ok(())
    }
}
