//! DuckDuckGo HTML endpoint backend.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use super::{finalize_hits, pace, random_desktop_user_agent, SearchHit, SearchOptions, Searcher};
use crate::dom;
use crate::error::{Error, Result};
use crate::text::single_line;
use crate::url_utils::unwrap_duckduckgo_redirect;

const ENDPOINT: &str = "https://duckduckgo.com/html";
const PER_PAGE: usize = 20;

/// Scrapes `duckduckgo.com/html`.
pub struct DuckDuckGoSearcher {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearcher {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(ENDPOINT)
    }

    /// Backend pointed at a different endpoint (a mirror or a local server).
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

    async fn fetch_page(&self, query: &str, offset: usize, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        pace(options).await;

        let offset = offset.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("s", offset.as_str())])
            .header(USER_AGENT, random_desktop_user_agent())
            .header(ACCEPT, "text/html")
            .header(ACCEPT_LANGUAGE, "en-IN,en;q=0.9")
            .header(REFERER, "https://duckduckgo.com/")
            .timeout(Duration::from_millis(options.timeout_ms))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| Error::Search(format!("duckduckgo: {err}")))?;

        let body = response
            .text()
            .await
            .map_err(|err| Error::Search(format!("duckduckgo: {err}")))?;
        parse_results(&body)
    }
}

#[async_trait]
impl Searcher for DuckDuckGoSearcher {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(Error::Search("empty query".to_string()));
        }

        let offsets = (0..options.num_results.max(1)).step_by(PER_PAGE);
        let pages = try_join_all(offsets.map(|offset| self.fetch_page(query, offset, options))).await?;
        let hits = finalize_hits(pages.into_iter().flatten().collect(), options);
        debug!(query = %query, hits = hits.len(), "duckduckgo search complete");
        Ok(hits)
    }
}

/// Hits from one DuckDuckGo HTML result page.
pub(super) fn parse_results(html: &str) -> Result<Vec<SearchHit>> {
    let doc = dom::parse(html);
    let mut hits = Vec::new();

    for result in dom::query_all(&doc, "div.result")? {
        let Some(link) = dom::query_within(&result, "a.result__a")?.into_iter().next() else {
            continue;
        };
        let Some(href) = dom::attribute(&link, "href") else {
            continue;
        };
        let description = dom::query_within(&result, ".result__snippet")?
            .first()
            .map(|snippet| single_line(&dom::text_content(snippet)))
            .unwrap_or_default();

        hits.push(SearchHit {
            url: unwrap_duckduckgo_redirect(&href),
            title: single_line(&dom::text_content(&link)),
            description,
        });
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <div class="results">
          <div class="result results_links web-result">
            <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.iplt20.com%2Fpoints-table&amp;rut=x">IPL  Points
               Table</a></h2>
            <a class="result__snippet" href="#">Latest standings after match 42.</a>
          </div>
          <div class="result"><span>ad slot without link</span></div>
          <div class="result">
            <a class="result__a" href="https://www.cricbuzz.com/live">Live Scores</a>
          </div>
        </div>"##;

    #[test]
    fn parses_links_titles_and_snippets() {
        let hits = parse_results(PAGE).unwrap_or_default();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://www.iplt20.com/points-table");
        assert_eq!(hits[0].title, "IPL Points Table");
        assert_eq!(hits[0].description, "Latest standings after match 42.");
        assert_eq!(hits[1].url, "https://www.cricbuzz.com/live");
        assert_eq!(hits[1].description, "");
    }

    #[test]
    fn page_without_results_is_empty() {
        assert!(parse_results("<html><body>No results.</body></html>")
            .unwrap_or_default()
            .is_empty());
    }
}
