//! Web search backends.
//!
//! Two HTML-scraping backends (DuckDuckGo and Google) behind one
//! [`Searcher`] trait, plus [`FallbackSearcher`] which switches to a second
//! backend when the first one comes back empty-handed.

mod duckduckgo;
mod fallback;
mod google;

pub use duckduckgo::DuckDuckGoSearcher;
pub use fallback::{only_self_links, FallbackSearcher};
pub use google::{timeframe_param, GoogleSearcher};

use std::collections::HashSet;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::DelayRange;
use crate::retry;
use crate::url_utils::dedup_key;

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub description: String,
}

/// Query settings shared by every backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum hits returned.
    ///
    /// Default: `5`
    pub num_results: usize,

    /// Drop repeated URLs, keeping the first occurrence.
    ///
    /// Default: `true`
    pub unique: bool,

    /// Per-request timeout in milliseconds.
    ///
    /// Default: `5000`
    pub timeout_ms: u64,

    /// Base pause before each result-page request; the actual pause is
    /// between one and two times this.
    ///
    /// Default: `1000`
    pub sleep_interval_ms: u64,

    /// Country code for regional results.
    ///
    /// Default: `"in"`
    pub region: String,

    /// Interface language.
    ///
    /// Default: `"en"`
    pub language: String,

    /// Recency filter such as `"1 month"`, `"3d"` or `"h"`. Google only.
    ///
    /// Default: `Some("1 month")`
    pub timeframe: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_results: 5,
            unique: true,
            timeout_ms: 5_000,
            sleep_interval_ms: 1_000,
            region: "in".to_string(),
            language: "en".to_string(),
            timeframe: Some("1 month".to_string()),
        }
    }
}

/// A search backend.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Ranked hits for `query`.
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>>;
}

/// Apply `unique` and `num_results` to raw hits.
#[must_use]
pub fn finalize_hits(hits: Vec<SearchHit>, options: &SearchOptions) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| !options.unique || seen.insert(dedup_key(&hit.url)))
        .take(options.num_results)
        .collect()
}

/// Rate-limit pause before a result-page request.
pub(crate) async fn pace(options: &SearchOptions) {
    let base = options.sleep_interval_ms;
    retry::pause(DelayRange::new(base, base.saturating_mul(2)), 0).await;
}

/// A plausible desktop browser user agent with randomized versions.
pub(crate) fn random_desktop_user_agent() -> String {
    let mut rng = rand::thread_rng();
    match rng.gen_range(0..3) {
        0 => format!(
            "Mozilla/5.0 (Windows NT {}.0; Win64; x64) AppleWebKit/{}.0 (KHTML, like Gecko) Chrome/{}.0.{}.100 Safari/{}.0",
            rng.gen_range(6..=10),
            rng.gen_range(500..=600),
            rng.gen_range(70..=90),
            rng.gen_range(3000..=4000),
            rng.gen_range(500..=600),
        ),
        1 => format!(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/{}.0 (KHTML, like Gecko) Firefox/{}.0",
            rng.gen_range(500..=600),
            rng.gen_range(60..=90),
        ),
        _ => format!(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_{}_{}) AppleWebKit/{}.0 (KHTML, like Gecko) Safari/{}.0",
            rng.gen_range(12..=15),
            rng.gen_range(0..=5),
            rng.gen_range(500..=600),
            rng.gen_range(500..=600),
        ),
    }
}
