//! Primary/secondary backend chaining.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::{SearchHit, SearchOptions, Searcher};
use crate::error::Result;
use crate::url_utils::is_search_engine_link;

/// Queries `primary`, and `secondary` when the primary fails, finds
/// nothing, or only returns links back into search engines.
pub struct FallbackSearcher {
    primary: Arc<dyn Searcher>,
    secondary: Arc<dyn Searcher>,
}

impl FallbackSearcher {
    #[must_use]
    pub fn new(primary: Arc<dyn Searcher>, secondary: Arc<dyn Searcher>) -> Self {
        Self { primary, secondary }
    }
}

/// True when no hit leads anywhere outside a search engine.
#[must_use]
pub fn only_self_links(hits: &[SearchHit]) -> bool {
    hits.iter().all(|hit| is_search_engine_link(&hit.url))
}

#[async_trait]
impl Searcher for FallbackSearcher {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        match self.primary.search(query, options).await {
            Ok(hits) if !only_self_links(&hits) => return Ok(hits),
            Ok(hits) => warn!(
                primary = self.primary.name(),
                secondary = self.secondary.name(),
                hits = hits.len(),
                "primary search returned no usable links"
            ),
            Err(err) => warn!(
                primary = self.primary.name(),
                secondary = self.secondary.name(),
                error = %err,
                "primary search failed"
            ),
        }
        self.secondary.search(query, options).await
    }
}
