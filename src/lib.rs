//! # crease
//!
//! Content extraction for cricket question answering.
//!
//! Pages are loaded with a headless browser (falling back to a plain HTTP
//! fetch), reduced to their main article with Readability, and enriched with
//! heading-delimited sections and fully reconstructed tables.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crease::{ExtractionOptions, Extractor};
//!
//! # async fn run() -> crease::Result<()> {
//! let extractor = Extractor::new(ExtractionOptions::default())?;
//! let results = extractor
//!     .extract_multiple(&["https://www.iplt20.com/points-table/men", "https://www.cricbuzz.com/"])
//!     .await;
//! for result in &results {
//!     match result.data() {
//!         Some(page) => println!("{}: {} tables", result.url(), page.table_count()),
//!         None => println!("{}: {}", result.url(), result.error().unwrap_or_default()),
//!     }
//! }
//! extractor.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! Already-fetched HTML can be processed without any network access:
//!
//! ```rust
//! use crease::structured::extract_tables;
//!
//! let html = "<table><tr><th>Team</th><th>Pts</th></tr><tr><td>RCB</td><td>14</td></tr></table>";
//! let tables = extract_tables(html);
//! assert_eq!(tables[0].rows, vec![vec!["RCB", "14"]]);
//! ```
//!
//! ## Features
//!
//! - **Rendering**: Chrome via CDP with fingerprint masking and lazy-load scrolling
//! - **Fallback fetch**: browser-like HTTP GET with charset detection
//! - **Structured content**: sections and tables recovered independently of reduction
//! - **Batching**: chunked concurrency with order-preserving results
//! - **Question answering**: search, extraction and Gemini composed in [`assistant`]

mod error;
mod options;
mod orchestrator;
mod patterns;
mod result;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Text normalization.
pub mod text;

/// Character encoding detection and transcoding.
pub mod encoding;

/// URL validation and search-link helpers.
pub mod url_utils;

/// Bounded retries and jittered pauses.
pub mod retry;

/// Readability reduction of full pages to articles.
pub mod reducer;

/// Section and table extraction.
pub mod structured;

/// Page sources: headless renderer and plain HTTP fetcher.
pub mod source;

/// Web search backends.
pub mod search;

/// Generative-text backends.
pub mod llm;

/// Question answering over extracted pages.
pub mod assistant;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::{DelayRange, ExtractionOptions, Viewport, DEFAULT_USER_AGENT};
pub use orchestrator::{extract_from_html, Extractor};
pub use result::{
    Article, ExtractedPage, ExtractionResult, PageContent, PageMetadata, Section, Table,
};
pub use text::clean_text;
