//! Error types for crease.
//!
//! Every stage of the extraction pipeline reports failures through this one
//! enum. Per-URL failures are folded into `ExtractionResult::Failure` by the
//! orchestrator, so callers of the batch API never see these directly.

/// Error type for extraction, search and answer generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Headless rendering failed after all retries (navigation error,
    /// timeout, non-success status, or browser launch failure).
    #[error("render failed for {url}: {message}")]
    Render { url: String, message: String },

    /// Plain HTTP fetch failed after all retries.
    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Readability found no parseable main content.
    #[error("readability could not parse {url}: {message}")]
    Reduction { url: String, message: String },

    /// Section or table extraction hit an internal error.
    ///
    /// Only ever logged; structured extraction degrades to "no enrichment".
    #[error("structured extraction failed: {0}")]
    StructuredExtraction(String),

    /// Browser session could not be launched or torn down.
    #[error("browser session error: {0}")]
    Browser(String),

    /// URL is not an absolute http(s) URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Option values violate their documented ranges.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Configuration could not be loaded from the environment.
    #[error("configuration error: {0}")]
    Config(String),

    /// A search backend failed.
    #[error("search failed: {0}")]
    Search(String),

    /// The generative-text backend failed or returned nothing.
    #[error("text generation failed: {0}")]
    Generation(String),

    /// The question to answer was blank.
    #[error("question is empty")]
    EmptyQuestion,

    /// Search returned no candidate URLs.
    #[error("no search results for query: {0}")]
    NoSearchResults(String),

    /// Every candidate URL failed extraction.
    #[error("no information found for: {0}")]
    NoInformationFound(String),
}

/// Result type alias for crease operations.
pub type Result<T> = std::result::Result<T, Error>;
