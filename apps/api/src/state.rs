use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::matching::{MatchPipeline, ResultCache};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    /// Last shortlist per session. Redis when configured, in-process otherwise.
    pub cache: Arc<dyn ResultCache>,
    pub pipeline: Arc<MatchPipeline>,
}
