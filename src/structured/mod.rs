//! Structured-content extraction.
//!
//! Walks the HTML independently of the readability reducer to recover
//! heading-delimited [`Section`]s and full [`Table`] structures. Both entry
//! points are best-effort: an internal failure is logged and yields an empty
//! list, never an error.

mod sections;
mod tables;

pub use tables::table_to_text;

use tracing::warn;

use crate::dom;
use crate::result::{Section, Table};

/// Heading-delimited sections in document order.
///
/// # Example
///
/// ```rust
/// use crease::structured::extract_sections;
///
/// let sections = extract_sections("<h2>Toss</h2><p>India elected to bat.</p>");
/// assert_eq!(sections[0].title, "Toss");
/// assert_eq!(sections[0].content, "India elected to bat.");
/// ```
#[must_use]
pub fn extract_sections(html: &str) -> Vec<Section> {
    if html.trim().is_empty() {
        return Vec::new();
    }
    let doc = dom::parse(html);
    sections::sections_from(&doc).unwrap_or_else(|err| {
        warn!(error = %err, "section extraction failed");
        Vec::new()
    })
}

/// Tables in document order. Tables with no headers and no non-blank rows are
/// left out.
///
/// # Example
///
/// ```rust
/// use crease::structured::extract_tables;
///
/// let tables = extract_tables(
///     "<table><tr><th>Player</th><th>Runs</th></tr><tr><td>Kohli</td><td>45</td></tr></table>",
/// );
/// assert_eq!(tables[0].text_representation, "Player | Runs\n--- | ---\nKohli | 45");
/// ```
#[must_use]
pub fn extract_tables(html: &str) -> Vec<Table> {
    if html.trim().is_empty() {
        return Vec::new();
    }
    let doc = dom::parse(html);
    tables::tables_from(&doc).unwrap_or_else(|err| {
        warn!(error = %err, "table extraction failed");
        Vec::new()
    })
}

/// Assemble a table from already-extracted parts, computing the derived
/// fields (`row_count`, `column_count`, `structured_rows`,
/// `text_representation`).
#[must_use]
pub fn build_table(
    index: usize,
    caption: impl Into<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> Table {
    tables::build_table(index, caption.into(), headers, rows)
}
