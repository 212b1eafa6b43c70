//! Catalog Store — read access to the lab listings.

pub mod handlers;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::models::LabRecord;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog query timed out")]
    TimedOut,

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => CatalogError::TimedOut,
            other => CatalogError::Database(other),
        }
    }
}

/// Source of lab listings. Ids are stable across calls.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every lab, in catalog order.
    async fn fetch_all(&self) -> Result<Vec<LabRecord>, CatalogError>;

    async fn fetch_one(&self, id: i64) -> Result<Option<LabRecord>, CatalogError>;
}

/// PostgreSQL-backed catalog. Catalog order is ascending id.
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const LAB_COLUMNS: &str =
    "id, department, professor, lab_name, major, how_to_apply, description, contact";

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn fetch_all(&self) -> Result<Vec<LabRecord>, CatalogError> {
        let labs = sqlx::query_as::<_, LabRecord>(&format!(
            "SELECT {LAB_COLUMNS} FROM labs ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        debug!("Fetched {} labs from catalog", labs.len());
        Ok(labs)
    }

    async fn fetch_one(&self, id: i64) -> Result<Option<LabRecord>, CatalogError> {
        let lab = sqlx::query_as::<_, LabRecord>(&format!(
            "SELECT {LAB_COLUMNS} FROM labs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lab)
    }
}
