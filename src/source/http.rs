//! Plain HTTP fetcher.
//!
//! A GET with browser-like headers and no script execution. Used only after
//! the renderer has given up on a URL.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::info;

use super::{stealth, PageSource};
use crate::encoding::decode_body;
use crate::error::{Error, Result};
use crate::options::ExtractionOptions;
use crate::retry::{self, RetryPolicy};

/// Lightweight fallback page source.
pub struct SimpleFetcher {
    options: Arc<ExtractionOptions>,
    client: Client,
}

impl SimpleFetcher {
    /// Build the HTTP client from `options` (user agent, timeout, headers).
    pub fn new(options: Arc<ExtractionOptions>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .default_headers(stealth::fetch_headers())
            .timeout(options.timeout())
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|err| Error::Config(format!("http client: {err}")))?;

        Ok(Self { options, client })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let fetch_error = |message: String| Error::Fetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| fetch_error(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|err| fetch_error(format!("read body: {err}")))?;

        let html = decode_body(&body, content_type.as_deref());
        info!(url = %url, bytes = html.len(), "page fetched");
        Ok(html)
    }
}

#[async_trait]
impl PageSource for SimpleFetcher {
    fn name(&self) -> &'static str {
        "fetcher"
    }

    async fn load(&self, url: &str) -> Result<String> {
        let policy = RetryPolicy::new(
            self.options.max_retries,
            self.options.fetch_backoff,
            self.options.jitter_ms,
        );
        retry::retry(&policy, self.name(), url, |_| self.fetch_once(url)).await
    }
}
