//! Match Pipeline — orchestrates the full document-to-shortlist flow.
//!
//! Flow: extract profile → fetch catalog → score labs → merge → rank → shortlist.
//!
//! `merge_scores`, `rank` and `shortlist` are pure so each step can be checked
//! on its own. Dropping a run future cancels it at the current await point;
//! the session cache is only written after the run reaches `Done`.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{CatalogError, CatalogStore};
use crate::matching::cache::ResultCache;
use crate::matching::error::MatchError;
use crate::matching::extractor::AttributeExtractor;
use crate::matching::scorer::ComparativeScorer;
use crate::models::{LabRecord, RankedResult, ScoreRecord};

/// Minimum score a lab needs to make the shortlist.
pub const SHORTLIST_THRESHOLD: i32 = 4;

/// Reason attached to labs the scoring service said nothing about.
pub const NO_MATCH_DETAILS: &str = "No match details provided.";

/// Linear run state. A failure in any stage ends the run with that stage's error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Extracting,
    Fetching,
    Scoring,
    Merging,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Extracting => "extracting document attributes",
            PipelineStage::Fetching => "fetching the lab catalog",
            PipelineStage::Scoring => "scoring labs",
            PipelineStage::Merging => "merging scores",
            PipelineStage::Done => "done",
        };
        f.write_str(label)
    }
}

pub struct MatchPipeline {
    extractor: AttributeExtractor,
    scorer: ComparativeScorer,
    catalog: Arc<dyn CatalogStore>,
    /// Upper bound on each external call.
    stage_timeout: Duration,
}

impl MatchPipeline {
    pub fn new(
        extractor: AttributeExtractor,
        scorer: ComparativeScorer,
        catalog: Arc<dyn CatalogStore>,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            extractor,
            scorer,
            catalog,
            stage_timeout,
        }
    }

    /// Runs the pipeline and returns the shortlist. An empty shortlist is a
    /// successful run with no qualifying labs.
    pub async fn run(
        &self,
        document: &[u8],
        mime_type: &str,
    ) -> Result<Vec<RankedResult>, MatchError> {
        let mut stage = PipelineStage::Idle;
        let result = self.run_stages(document, mime_type, &mut stage).await;
        if let Err(e) = &result {
            warn!("Match pipeline failed while {stage}: {e}");
        }
        result
    }

    /// Runs the pipeline, then stores the shortlist for `session`. A cache
    /// failure is logged and does not fail the run.
    pub async fn run_for_session(
        &self,
        session: Uuid,
        cache: &dyn ResultCache,
        document: &[u8],
        mime_type: &str,
    ) -> Result<Vec<RankedResult>, MatchError> {
        let shortlist = self.run(document, mime_type).await?;
        if let Err(e) = cache.save(session, &shortlist).await {
            warn!("Failed to cache shortlist for session {session}: {e}");
        }
        Ok(shortlist)
    }

    async fn run_stages(
        &self,
        document: &[u8],
        mime_type: &str,
        stage: &mut PipelineStage,
    ) -> Result<Vec<RankedResult>, MatchError> {
        *stage = PipelineStage::Extracting;
        let profile = self
            .bounded(*stage, self.extractor.extract(document, mime_type))
            .await?;

        *stage = PipelineStage::Fetching;
        let catalog = self.bounded(*stage, self.fetch_catalog()).await?;

        *stage = PipelineStage::Scoring;
        let scores = self
            .bounded(*stage, self.scorer.score(&profile, &catalog))
            .await?;

        *stage = PipelineStage::Merging;
        let catalog_size = catalog.len();
        let shortlist = shortlist(rank(merge_scores(catalog, &scores)));

        *stage = PipelineStage::Done;
        info!(
            "Match run done: {} of {} labs scored >= {}",
            shortlist.len(),
            catalog_size,
            SHORTLIST_THRESHOLD
        );
        Ok(shortlist)
    }

    async fn fetch_catalog(&self) -> Result<Vec<LabRecord>, MatchError> {
        let labs = self.catalog.fetch_all().await.map_err(|e| match e {
            CatalogError::TimedOut => MatchError::Timeout(PipelineStage::Fetching),
            other => MatchError::CatalogUnavailable(other),
        })?;
        if labs.is_empty() {
            return Err(MatchError::EmptyCatalog);
        }
        debug!("Catalog has {} labs", labs.len());
        Ok(labs)
    }

    async fn bounded<T>(
        &self,
        stage: PipelineStage,
        step: impl Future<Output = Result<T, MatchError>>,
    ) -> Result<T, MatchError> {
        tokio::time::timeout(self.stage_timeout, step)
            .await
            .map_err(|_| MatchError::Timeout(stage))?
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Merge / rank / shortlist
// ────────────────────────────────────────────────────────────────────────────

/// Applies scores to the catalog, keeping catalog order. When the scoring
/// response has several blocks for one lab, the first one parsed wins.
pub fn merge_scores(catalog: Vec<LabRecord>, scores: &[ScoreRecord]) -> Vec<RankedResult> {
    let mut by_lab: HashMap<i64, &ScoreRecord> = HashMap::with_capacity(scores.len());
    for record in scores {
        by_lab.entry(record.lab_id).or_insert(record);
    }

    catalog
        .into_iter()
        .map(|lab| match by_lab.get(&lab.id) {
            Some(record) => RankedResult {
                lab,
                similarity_score: record.similarity_score,
                match_reason: record.match_reason.clone(),
            },
            None => RankedResult {
                lab,
                similarity_score: 0,
                match_reason: NO_MATCH_DETAILS.to_string(),
            },
        })
        .collect()
}

/// Highest score first. Stable, so equal scores keep catalog order.
pub fn rank(mut merged: Vec<RankedResult>) -> Vec<RankedResult> {
    merged.sort_by(|a, b| b.similarity_score.cmp(&a.similarity_score));
    merged
}

pub fn shortlist(ranked: Vec<RankedResult>) -> Vec<RankedResult> {
    ranked
        .into_iter()
        .filter(|r| r.similarity_score >= SHORTLIST_THRESHOLD)
        .collect()
}
