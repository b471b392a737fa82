//! Google basic-HTML backend.
//!
//! Requests are sent with a text-browser user agent so Google serves its
//! lightweight result markup.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use rand::Rng;
use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use super::{finalize_hits, pace, SearchHit, SearchOptions, Searcher};
use crate::dom;
use crate::error::{Error, Result};
use crate::text::single_line;
use crate::url_utils::unwrap_google_redirect;

const ENDPOINT: &str = "https://www.google.com/search";
const PER_PAGE: usize = 10;
const CONSENT_COOKIE: &str = "CONSENT=PENDING+987; SOCS=CAESHAgBEhIaAB";

/// `h`, `3d`, `2w` ...
#[allow(clippy::expect_used)]
static SHORT_TIMEFRAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)?([hdwmy])$").expect("valid regex"));

/// `1 month`, `12 hours` ...
#[allow(clippy::expect_used)]
static LONG_TIMEFRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(hour|hours|day|days|week|weeks|month|months|year|years)$")
        .expect("valid regex")
});

/// Google `tbs` recency value for a timeframe, e.g. `"1 month"` -> `qdr:m1`.
///
/// ```
/// use crease::search::timeframe_param;
///
/// assert_eq!(timeframe_param("3d").as_deref(), Some("qdr:d3"));
/// assert_eq!(timeframe_param("2 weeks").as_deref(), Some("qdr:w2"));
/// assert_eq!(timeframe_param("soon"), None);
/// ```
#[must_use]
pub fn timeframe_param(timeframe: &str) -> Option<String> {
    let cleaned = timeframe.trim().to_lowercase();

    if let Some(caps) = SHORT_TIMEFRAME.captures(&cleaned) {
        let amount = caps.get(1).map_or("", |m| m.as_str());
        return Some(format!("qdr:{}{amount}", &caps[2]));
    }

    let caps = LONG_TIMEFRAME.captures(&cleaned)?;
    let unit = match &caps[2] {
        u if u.starts_with("hour") => 'h',
        u if u.starts_with("day") => 'd',
        u if u.starts_with("week") => 'w',
        u if u.starts_with("month") => 'm',
        _ => 'y',
    };
    Some(format!("qdr:{unit}{}", &caps[1]))
}

/// Scrapes `google.com/search`.
pub struct GoogleSearcher {
    client: Client,
    endpoint: String,
}

impl GoogleSearcher {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .build()
            .map_err(|err| Error::Config(format!("search client: {err}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn fetch_page(&self, query: &str, start: usize, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        pace(options).await;

        let mut params = vec![
            ("q", query.to_string()),
            ("num", (PER_PAGE + 2).to_string()),
            ("hl", options.language.clone()),
            ("start", start.to_string()),
            ("safe", "active".to_string()),
            ("gl", options.region.clone()),
        ];
        if let Some(tbs) = options.timeframe.as_deref().and_then(timeframe_param) {
            params.push(("tbs", tbs));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .header(USER_AGENT, text_browser_user_agent())
            .header(ACCEPT, "*/*")
            .header(ACCEPT_LANGUAGE, "en-IN,en;q=0.9")
            .header(REFERER, "https://www.google.com/")
            .header(COOKIE, CONSENT_COOKIE)
            .timeout(Duration::from_millis(options.timeout_ms))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| Error::Search(format!("google: {err}")))?;

        let body = response
            .text()
            .await
            .map_err(|err| Error::Search(format!("google: {err}")))?;
        parse_results(&body)
    }
}

#[async_trait]
impl Searcher for GoogleSearcher {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(Error::Search("empty query".to_string()));
        }

        let starts = (0..options.num_results.max(1)).step_by(PER_PAGE);
        let pages = try_join_all(starts.map(|start| self.fetch_page(query, start, options))).await?;
        let hits = finalize_hits(pages.into_iter().flatten().collect(), options);
        debug!(query = %query, hits = hits.len(), "google search complete");
        Ok(hits)
    }
}

/// Hits from one basic-HTML result page. Blocks missing a title or
/// description span are skipped.
pub(super) fn parse_results(html: &str) -> Result<Vec<SearchHit>> {
    let doc = dom::parse(html);
    let mut hits = Vec::new();

    for block in dom::query_all(&doc, "div.ezO2md")? {
        let Some(link) = dom::query_within(&block, "a[href]")?.into_iter().next() else {
            continue;
        };
        let Some(title) = dom::query_within(&link, "span.CVA68e")?.into_iter().next() else {
            continue;
        };
        let Some(description) = dom::query_within(&block, "span.FrIlee")?.into_iter().next() else {
            continue;
        };
        let Some(href) = dom::attribute(&link, "href") else {
            continue;
        };

        hits.push(SearchHit {
            url: unwrap_google_redirect(&href),
            title: single_line(&dom::text_content(&title)),
            description: single_line(&dom::text_content(&description)),
        });
    }

    Ok(hits)
}

fn text_browser_user_agent() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "Lynx/{}.{}.{} libwww-FM/{}.{} SSL-MM/{}.{} OpenSSL/{}.{}.{}",
        rng.gen_range(2..=3),
        rng.gen_range(8..=9),
        rng.gen_range(0..=2),
        rng.gen_range(2..=3),
        rng.gen_range(13..=15),
        rng.gen_range(1..=2),
        rng.gen_range(3..=5),
        rng.gen_range(1..=3),
        rng.gen_range(0..=4),
        rng.gen_range(0..=9),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframes_map_to_qdr() {
        assert_eq!(timeframe_param("1 month").as_deref(), Some("qdr:m1"));
        assert_eq!(timeframe_param(" 12 Hours ").as_deref(), Some("qdr:h12"));
        assert_eq!(timeframe_param("h").as_deref(), Some("qdr:h"));
        assert_eq!(timeframe_param("1 year").as_deref(), Some("qdr:y1"));
        assert_eq!(timeframe_param(""), None);
        assert_eq!(timeframe_param("last season"), None);
    }

    #[test]
    fn parses_basic_html_blocks() {
        let page = r#"
            <div class="ezO2md">
              <a href="/url?q=https://www.espncricinfo.com/series/ipl-2024&amp;sa=U&amp;ved=abc">
                <span class="CVA68e">IPL 2024 | ESPNcricinfo</span></a>
              <span class="FrIlee">Fixtures, results and points table.</span>
            </div>
            <div class="ezO2md"><a href="/url?q=https://x.com"><span class="CVA68e">No desc</span></a></div>
            <div class="other"><a href="https://ignored.com">x</a></div>"#;
        let hits = parse_results(page).unwrap_or_default();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://www.espncricinfo.com/series/ipl-2024");
        assert_eq!(hits[0].title, "IPL 2024 | ESPNcricinfo");
        assert_eq!(hits[0].description, "Fixtures, results and points table.");
    }

    #[test]
    fn text_browser_agent_is_lynx() {
        assert!(text_browser_user_agent().starts_with("Lynx/"));
    }
}
