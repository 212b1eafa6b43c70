// Lab matching: document → profile → scored catalog → shortlist.
// All LLM calls go through llm_client via the collaborator traits below.

pub mod cache;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod scorer;
pub mod session;

pub use cache::{InMemoryResultCache, RedisResultCache, ResultCache};
pub use error::MatchError;
pub use extractor::AttributeExtractor;
pub use pipeline::MatchPipeline;
pub use scorer::ComparativeScorer;
