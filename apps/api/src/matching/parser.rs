//! Response Parser — turns the free-text output of the two LLM calls into typed records.
//!
//! Nothing here fails hard. `parse_profile` reports absence with `None`, and
//! `parse_score_blocks` drops any block it cannot read completely.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ExtractedProfile, ScoreRecord};

/// Literal line the scoring prompt asks the model to put after every block.
pub const BLOCK_SEPARATOR: &str = "---";

static MAJOR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bmajor[ \t*_]*:(.*)").expect("valid major regex"));
static KEYWORDS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bkeywords[ \t*_]*:(.*)").expect("valid keywords regex"));

static LAB_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)lab\s*id[*_]*\s*:[*_\s]*(\d+)").expect("valid lab id regex"));
static SIMILARITY_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)similarity\s*score[*_]*\s*:[*_\s]*(\d+)").expect("valid score regex")
});
static MATCH_REASON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)match\s*reason[*_]*\s*:(.+)").expect("valid reason regex"));

/// Reads the `Major:` and `Keywords:` lines out of an extraction response.
/// Line order and label case do not matter. Returns `None` when either label
/// is missing or has nothing after it.
pub fn parse_profile(text: &str) -> Option<ExtractedProfile> {
    let major = capture_value(&MAJOR_LINE, text)?;
    let keywords = capture_value(&KEYWORDS_LINE, text)?;
    Some(ExtractedProfile { major, keywords })
}

/// Splits a scoring response on `---` and parses each block independently.
/// Output keeps the order in which blocks appear in `text`.
pub fn parse_score_blocks(text: &str) -> Vec<ScoreRecord> {
    text.split(BLOCK_SEPARATOR).filter_map(parse_block).collect()
}

fn parse_block(block: &str) -> Option<ScoreRecord> {
    let lab_id = LAB_ID.captures(block)?[1].parse::<i64>().ok()?;
    let similarity_score = SIMILARITY_SCORE.captures(block)?[1].parse::<i32>().ok()?;
    let match_reason = capture_value(&MATCH_REASON, block)?;
    Some(ScoreRecord {
        lab_id,
        similarity_score,
        match_reason,
    })
}

fn capture_value(pattern: &Regex, text: &str) -> Option<String> {
    let caps = pattern.captures(text)?;
    let value = clean_value(caps.get(1)?.as_str());
    (!value.is_empty()).then(|| value.to_string())
}

/// Strips whitespace and markdown emphasis left around a value.
fn clean_value(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '_')
}
