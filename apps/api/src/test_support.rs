//! In-process fakes for the external collaborators, shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::{CatalogError, CatalogStore};
use crate::llm_client::LlmError;
use crate::matching::cache::InMemoryResultCache;
use crate::matching::extractor::{AttributeExtractor, DocumentKind, DocumentUnderstanding};
use crate::matching::pipeline::{MatchPipeline, NO_MATCH_DETAILS};
use crate::matching::scorer::{ComparativeScorer, ComparativeScoring};
use crate::models::{ExtractedProfile, LabRecord, RankedResult, ScoreRecord};

pub const TEST_STAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Canned behaviour of a fake LLM-backed service.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Empty,
    Timeout,
    Fail,
    Hang,
}

impl Reply {
    pub fn text(s: &str) -> Self {
        Reply::Text(s.to_string())
    }

    async fn resolve(&self) -> Result<Option<String>, LlmError> {
        match self {
            Reply::Text(t) => Ok(Some(t.clone())),
            Reply::Empty => Ok(None),
            Reply::Timeout => Err(LlmError::Timeout),
            Reply::Fail => Err(LlmError::Api {
                status: 401,
                message: "invalid x-api-key".to_string(),
            }),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Stands in for either LLM collaborator and records what it was sent.
pub struct FakeService {
    reply: Reply,
    calls: AtomicUsize,
    last_kind: Mutex<Option<DocumentKind>>,
    last_input: Mutex<Option<String>>,
}

impl FakeService {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_kind: Mutex::new(None),
            last_input: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_kind(&self) -> Option<DocumentKind> {
        *self.last_kind.lock().unwrap()
    }

    /// The base64 document or the catalog JSON from the latest call.
    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().unwrap().clone()
    }

    fn record(&self, input: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(input.to_string());
    }
}

#[async_trait]
impl DocumentUnderstanding for FakeService {
    async fn describe(
        &self,
        kind: DocumentKind,
        document_base64: &str,
    ) -> Result<Option<String>, LlmError> {
        self.record(document_base64);
        *self.last_kind.lock().unwrap() = Some(kind);
        self.reply.resolve().await
    }
}

#[async_trait]
impl ComparativeScoring for FakeService {
    async fn compare(
        &self,
        _profile: &ExtractedProfile,
        catalog_json: &str,
    ) -> Result<Option<String>, LlmError> {
        self.record(catalog_json);
        self.reply.resolve().await
    }
}

pub enum CatalogReply {
    Labs(Vec<LabRecord>),
    TimedOut,
    Down,
}

pub struct FakeCatalog {
    reply: CatalogReply,
    calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(reply: CatalogReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for FakeCatalog {
    async fn fetch_all(&self) -> Result<Vec<LabRecord>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            CatalogReply::Labs(labs) => Ok(labs.clone()),
            CatalogReply::TimedOut => Err(CatalogError::TimedOut),
            CatalogReply::Down => Err(CatalogError::Database(sqlx::Error::PoolClosed)),
        }
    }

    async fn fetch_one(&self, id: i64) -> Result<Option<LabRecord>, CatalogError> {
        let labs = self.fetch_all().await?;
        Ok(labs.into_iter().find(|l| l.id == id))
    }
}

pub struct Services {
    pub document: Arc<FakeService>,
    pub scoring: Arc<FakeService>,
    pub catalog: Arc<FakeCatalog>,
}

pub fn pipeline(document: Reply, scoring: Reply, catalog: CatalogReply) -> (MatchPipeline, Services) {
    let services = Services {
        document: Arc::new(FakeService::new(document)),
        scoring: Arc::new(FakeService::new(scoring)),
        catalog: Arc::new(FakeCatalog::new(catalog)),
    };
    let pipeline = MatchPipeline::new(
        AttributeExtractor::new(services.document.clone()),
        ComparativeScorer::new(services.scoring.clone()),
        services.catalog.clone(),
        TEST_STAGE_TIMEOUT,
    );
    (pipeline, services)
}

pub fn memory_cache() -> InMemoryResultCache {
    InMemoryResultCache::new(1_000, Duration::from_secs(3600))
}

pub fn lab(id: i64, name: &str) -> LabRecord {
    LabRecord {
        id,
        department: "Engineering".to_string(),
        professor: format!("Prof. {id}"),
        lab_name: name.to_string(),
        major: "Computer Science".to_string(),
        how_to_apply: "Email the PI".to_string(),
        description: format!("{name} does research."),
        contact: None,
    }
}

pub fn score(lab_id: i64, similarity_score: i32, reason: &str) -> ScoreRecord {
    ScoreRecord {
        lab_id,
        similarity_score,
        match_reason: reason.to_string(),
    }
}

pub fn ranked(id: i64, similarity_score: i32) -> RankedResult {
    RankedResult {
        lab: lab(id, &format!("Lab {id}")),
        similarity_score,
        match_reason: if similarity_score == 0 {
            NO_MATCH_DETAILS.to_string()
        } else {
            "Strong overlap".to_string()
        },
    }
}

pub fn profile() -> ExtractedProfile {
    ExtractedProfile {
        major: "Computer Science".to_string(),
        keywords: "robotics, computer vision".to_string(),
    }
}
