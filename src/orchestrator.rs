//! Extraction orchestrator.
//!
//! Sequences one URL through render -> fetch fallback -> reduction ->
//! structured enrichment, and runs batches in fixed-size concurrent chunks.
//! Per-URL failures become [`ExtractionResult::Failure`]; nothing here aborts
//! a batch.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::options::ExtractionOptions;
use crate::reducer;
use crate::result::{ExtractedPage, ExtractionResult};
use crate::retry;
use crate::source::{PageSource, Renderer, SimpleFetcher};
use crate::structured::{extract_sections, extract_tables};
use crate::url_utils::validate_http_url;

/// Reduce already-loaded HTML and attach its sections and tables.
///
/// Sections and tables are read from the reduced article fragment. When the
/// fragment has no tables left, the raw HTML is searched again.
pub fn extract_from_html(html: &str, url: &str) -> Result<ExtractedPage> {
    let article = reducer::reduce(html, url)?;

    let sections = extract_sections(&article.html_fragment);
    let mut tables = extract_tables(&article.html_fragment);
    if tables.is_empty() {
        tables = extract_tables(html);
        if !tables.is_empty() {
            debug!(url = %url, tables = tables.len(), "tables recovered from raw html");
        }
    }

    info!(
        url = %url,
        title = %article.title,
        length = article.length,
        sections = sections.len(),
        tables = tables.len(),
        "extraction succeeded"
    );
    Ok(ExtractedPage::new(url, article, sections, tables))
}

/// Owns the page sources and runs extractions.
///
/// The renderer's browser session is shared by every extraction and lives
/// until [`Extractor::close`]. Callers must close the extractor when done.
///
/// # Example
///
/// ```rust,no_run
/// use crease::{ExtractionOptions, Extractor};
///
/// # async fn run() -> crease::Result<()> {
/// let extractor = Extractor::new(ExtractionOptions::default())?;
/// let result = extractor.extract_single("https://www.espncricinfo.com/").await;
/// if let Some(page) = result.data() {
///     println!("{}", page.metadata.title);
/// }
/// extractor.close().await;
/// # Ok(())
/// # }
/// ```
pub struct Extractor {
    options: Arc<ExtractionOptions>,
    primary: Arc<dyn PageSource>,
    fallback: Arc<dyn PageSource>,
}

impl Extractor {
    /// Extractor backed by the headless renderer with the HTTP fetcher as
    /// fallback.
    pub fn new(options: ExtractionOptions) -> Result<Self> {
        options.validate()?;
        let options = Arc::new(options);
        let primary = Arc::new(Renderer::new(Arc::clone(&options)));
        let fallback = Arc::new(SimpleFetcher::new(Arc::clone(&options))?);
        Ok(Self {
            options,
            primary,
            fallback,
        })
    }

    /// Extractor over arbitrary page sources.
    pub fn with_sources(
        options: ExtractionOptions,
        primary: Arc<dyn PageSource>,
        fallback: Arc<dyn PageSource>,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options: Arc::new(options),
            primary,
            fallback,
        })
    }

    #[must_use]
    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Extract one URL. Never fails; errors are folded into the result.
    pub async fn extract_single(&self, url: &str) -> ExtractionResult {
        match self.try_extract(url).await {
            Ok(data) => ExtractionResult::Success {
                url: url.to_string(),
                data,
            },
            Err(err) => {
                error!(url = %url, error = %err, "extraction failed");
                ExtractionResult::Failure {
                    url: url.to_string(),
                    error: err.to_string(),
                }
            }
        }
    }

    async fn try_extract(&self, url: &str) -> Result<ExtractedPage> {
        validate_http_url(url)?;

        let html = match self.primary.load(url).await {
            Ok(html) => html,
            Err(err) => {
                warn!(
                    url = %url,
                    error = %err,
                    fallback = self.fallback.name(),
                    "primary source failed, falling back"
                );
                self.fallback.load(url).await?
            }
        };

        // Parsing and reduction are CPU-bound; keep them off the async workers
        // so the rest of the chunk keeps loading.
        let owned_url = url.to_string();
        tokio::task::spawn_blocking(move || extract_from_html(&html, &owned_url))
            .await
            .map_err(|err| Error::Reduction {
                url: url.to_string(),
                message: format!("processing task failed: {err}"),
            })?
    }

    /// Extract many URLs, `max_concurrent` at a time.
    ///
    /// Results come back in input order. Chunks run one after another with a
    /// randomized pause between consecutive chunks, none after the last.
    pub async fn extract_multiple<S: AsRef<str>>(&self, urls: &[S]) -> Vec<ExtractionResult> {
        let chunk_size = self.options.max_concurrent.max(1);
        let chunk_count = urls.len().div_ceil(chunk_size);
        let mut results = Vec::with_capacity(urls.len());

        for (index, chunk) in urls.chunks(chunk_size).enumerate() {
            debug!(chunk = index + 1, of = chunk_count, size = chunk.len(), "extracting chunk");

            let settled = join_all(chunk.iter().map(|url| {
                let url = url.as_ref();
                AssertUnwindSafe(self.extract_single(url))
                    .catch_unwind()
                    .map(move |outcome| {
                        outcome.unwrap_or_else(|_| {
                            error!(url = %url, "extraction panicked");
                            ExtractionResult::Failure {
                                url: url.to_string(),
                                error: "extraction panicked".to_string(),
                            }
                        })
                    })
            }))
            .await;
            results.extend(settled);

            if index + 1 < chunk_count {
                retry::pause(self.options.chunk_delay, self.options.jitter_ms).await;
            }
        }

        results
    }

    /// Release the browser session and any other source resources.
    ///
    /// Safe to call more than once, and before any extraction ran.
    pub async fn close(&self) {
        self.primary.shutdown().await;
        self.fallback.shutdown().await;
        debug!("extractor closed");
    }
}
