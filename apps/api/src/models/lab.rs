use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A research lab listing as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LabRecord {
    pub id: i64,
    pub department: String,
    pub professor: String,
    pub lab_name: String,
    pub major: String,
    pub how_to_apply: String,
    pub description: String,
    pub contact: Option<String>,
}

/// Structured attributes pulled out of a student's résumé or transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    pub major: String,
    /// Comma-separated free text, kept as the service returned it.
    pub keywords: String,
}

/// One parsed scoring block. `lab_id` is whatever the scoring service wrote
/// and may not exist in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub lab_id: i64,
    pub similarity_score: i32,
    pub match_reason: String,
}

/// A catalog lab with its score applied. This is what callers see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub lab: LabRecord,
    pub similarity_score: i32,
    pub match_reason: String,
}
