//! Readability reduction.
//!
//! Collapses a full page down to its main article with `dom_smoothie`'s
//! Readability port. Script, style and social-share widgets are detached
//! first so they never leak into the article text.

use dom_smoothie::Readability;
use tracing::debug;

use crate::dom;
use crate::error::{Error, Result};
use crate::patterns::PRE_REDUCTION_DISCARD_SELECTOR;
use crate::result::Article;
use crate::text::{clean_text, single_line};

/// Reduce raw page HTML to its main-content article.
///
/// Fails with [`Error::Reduction`] when no main content with non-blank text
/// can be identified.
pub fn reduce(html: &str, url: &str) -> Result<Article> {
    let reduction_error = |message: String| Error::Reduction {
        url: url.to_string(),
        message,
    };

    if html.trim().is_empty() {
        return Err(reduction_error("empty document".to_string()));
    }

    let doc = dom::parse(html);
    let removed = dom::remove_matching(&doc, PRE_REDUCTION_DISCARD_SELECTOR)?;
    debug!(url = %url, removed, "pre-reduction cleanup");

    let mut reader = Readability::with_document(doc, Some(url), None)
        .map_err(|err| reduction_error(err.to_string()))?;
    let parsed = reader
        .parse()
        .map_err(|err| reduction_error(err.to_string()))?;

    let text = clean_text(&parsed.text_content);
    if text.is_empty() {
        return Err(reduction_error("no readable main content".to_string()));
    }

    Ok(Article {
        title: single_line(&parsed.title),
        length: text.chars().count(),
        text,
        html_fragment: parsed.content.to_string(),
        excerpt: parsed
            .excerpt
            .map(|s| single_line(&s))
            .unwrap_or_default(),
        byline: parsed.byline.map(|s| single_line(&s)).unwrap_or_default(),
        site_name: parsed
            .site_name
            .map(|s| single_line(&s))
            .unwrap_or_default(),
    })
}
