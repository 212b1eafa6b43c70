//! Comparative Scorer — asks the scoring service to rate every catalog lab against
//! the extracted profile, then parses its free-text blocks into `ScoreRecord`s.
//!
//! Parsing is best-effort: labs the service skipped, or blocks it garbled,
//! simply have no record. That is never an error.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::matching::error::MatchError;
use crate::matching::parser::parse_score_blocks;
use crate::matching::pipeline::PipelineStage;
use crate::matching::prompts::{SCORING_MAX_TOKENS, SCORING_PROMPT_TEMPLATE, SCORING_SYSTEM_TEMPLATE};
use crate::models::{ExtractedProfile, LabRecord, ScoreRecord};

/// The comparative-scoring collaborator. `catalog_json` is the catalog as the
/// service should see it.
#[async_trait]
pub trait ComparativeScoring: Send + Sync {
    async fn compare(
        &self,
        profile: &ExtractedProfile,
        catalog_json: &str,
    ) -> Result<Option<String>, LlmError>;
}

#[async_trait]
impl ComparativeScoring for LlmClient {
    async fn compare(
        &self,
        profile: &ExtractedProfile,
        catalog_json: &str,
    ) -> Result<Option<String>, LlmError> {
        let system = SCORING_SYSTEM_TEMPLATE
            .replace("{major}", &profile.major)
            .replace("{keywords}", &profile.keywords);
        let prompt = SCORING_PROMPT_TEMPLATE
            .replace("{major}", &profile.major)
            .replace("{keywords}", &profile.keywords)
            .replace("{catalog_json}", catalog_json);

        let response = self.call(&prompt, &system, SCORING_MAX_TOKENS).await?;
        Ok(response.text().map(str::to_owned))
    }
}

pub struct ComparativeScorer {
    service: Arc<dyn ComparativeScoring>,
}

impl ComparativeScorer {
    pub fn new(service: Arc<dyn ComparativeScoring>) -> Self {
        Self { service }
    }

    pub async fn score(
        &self,
        profile: &ExtractedProfile,
        catalog: &[LabRecord],
    ) -> Result<Vec<ScoreRecord>, MatchError> {
        if catalog.is_empty() {
            return Err(MatchError::EmptyCatalog);
        }

        let catalog_json = serde_json::to_string_pretty(catalog)?;
        let text = self
            .service
            .compare(profile, &catalog_json)
            .await
            .map_err(|e| {
                MatchError::from_service(PipelineStage::Scoring, e, MatchError::ScoringServiceError)
            })?;

        let Some(text) = text else {
            warn!("Scoring service returned no text; every lab gets the default score");
            return Ok(Vec::new());
        };

        let records = parse_score_blocks(&text);

        let known: HashSet<i64> = catalog.iter().map(|lab| lab.id).collect();
        let unknown = records.iter().filter(|r| !known.contains(&r.lab_id)).count();
        if unknown > 0 {
            debug!("{unknown} score blocks reference labs outside the catalog");
        }
        info!(
            "Parsed {} score blocks for {} catalog labs",
            records.len(),
            catalog.len()
        );

        Ok(records)
    }
}
