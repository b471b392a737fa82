//! Result types for extraction output.
//!
//! This module defines what the pipeline produces for one URL: the reduced
//! article, its headed sections and tables, and the tagged success/failure
//! wrapper returned by the orchestrator.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Main-content article produced by the readability reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article title.
    pub title: String,

    /// Normalized plain text of the main content.
    pub text: String,

    /// Cleaned HTML of the main content.
    pub html_fragment: String,

    /// Short summary (meta description or first paragraph).
    pub excerpt: String,

    /// Author line, if one was detected.
    pub byline: String,

    /// Publisher / site name.
    pub site_name: String,

    /// Character count of `text`.
    pub length: usize,
}

/// A heading and the text that follows it up to the next heading of
/// equal-or-shallower rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading rank, 1 through 6.
    pub level: u8,
    pub title: String,
    pub content: String,
}

/// A table recovered from the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Position among all `<table>` elements of the parsed document,
    /// including tables that were discarded.
    pub index: usize,
    pub caption: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
    /// `max(headers.len(), longest row)`.
    pub column_count: usize,
    /// One header -> cell mapping per row. Present only when both headers
    /// and rows are non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_rows: Option<Vec<IndexMap<String, String>>>,
    /// Pipe-delimited rendering for consumers that only read text.
    pub text_representation: String,
}

/// Metadata about an extracted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub url: String,
    pub title: String,
    pub site_name: String,
    pub byline: String,
    /// Character count of the article text.
    pub length: usize,
    pub extracted_at: DateTime<Utc>,
}

/// Textual content of an extracted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub text: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
}

/// Everything extracted from one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub metadata: PageMetadata,
    pub content: PageContent,
}

impl ExtractedPage {
    /// Assemble a page from its article and structured enrichment.
    ///
    /// Empty section or table lists become `None`.
    #[must_use]
    pub fn new(url: &str, article: Article, sections: Vec<Section>, tables: Vec<Table>) -> Self {
        Self {
            metadata: PageMetadata {
                url: url.to_string(),
                title: article.title,
                site_name: article.site_name,
                byline: article.byline,
                length: article.length,
                extracted_at: Utc::now(),
            },
            content: PageContent {
                text: article.text,
                excerpt: article.excerpt,
                sections: (!sections.is_empty()).then_some(sections),
                tables: (!tables.is_empty()).then_some(tables),
            },
        }
    }

    /// Number of tables attached to the page.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.content.tables.as_ref().map_or(0, Vec::len)
    }
}

/// Outcome of extracting one URL.
///
/// Exactly one of `data` / `error` exists. Serializes as
/// `{"success": true, "url": .., "data": ..}` or
/// `{"success": false, "url": .., "error": ..}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success { url: String, data: ExtractedPage },
    Failure { url: String, error: String },
}

impl ExtractionResult {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::Failure { url, .. } => url,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Extracted page, if the extraction succeeded.
    #[must_use]
    pub const fn data(&self) -> Option<&ExtractedPage> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Failure message, if the extraction failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireResult<'a> {
    Success {
        success: bool,
        url: &'a str,
        data: &'a ExtractedPage,
    },
    Failure {
        success: bool,
        url: &'a str,
        error: &'a str,
    },
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Success { url, data } => WireResult::Success {
                success: true,
                url,
                data,
            },
            Self::Failure { url, error } => WireResult::Failure {
                success: false,
                url,
                error,
            },
        };
        wire.serialize(serializer)
    }
}
