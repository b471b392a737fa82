//! DOM Operations Adapter
//!
//! The extraction logic only needs a handful of capabilities from an HTML
//! engine: parse a document, query elements by selector, read text, and walk
//! parent/child/sibling links. They are gathered here over `dom_query` so the
//! engine can be swapped without touching `structured` or `reducer`.

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

use dom_query::Matcher;

use crate::error::{Error, Result};
use crate::patterns::HEADING_TAG;

// === Parsing ===

/// Parse an HTML string (document or fragment) into a navigable document.
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Querying ===

/// Compile a CSS selector, reporting invalid syntax as an error instead of
/// panicking.
pub fn compile(selector: &str) -> Result<Matcher> {
    Matcher::new(selector)
        .map_err(|err| Error::StructuredExtraction(format!("invalid selector {selector:?}: {err:?}")))
}

/// All elements matching `selector`, in document order.
pub fn query_all<'a>(doc: &'a Document, selector: &str) -> Result<Vec<NodeRef<'a>>> {
    let matcher = compile(selector)?;
    Ok(doc.select_matcher(&matcher).nodes().to_vec())
}

/// Elements under `node` matching `selector`, in document order.
pub fn query_within<'a>(node: &NodeRef<'a>, selector: &str) -> Result<Vec<NodeRef<'a>>> {
    let matcher = compile(selector)?;
    Ok(Selection::from(*node).select_matcher(&matcher).nodes().to_vec())
}

// === Tree Modification ===

/// Detach every element matching `selector`. Returns how many were removed.
pub fn remove_matching(doc: &Document, selector: &str) -> Result<usize> {
    let matcher = compile(selector)?;
    let matched = doc.select_matcher(&matcher);
    let count = matched.length();
    matched.remove();
    Ok(count)
}

/// Replace every element matching `selector` with `html`. Returns how many
/// were replaced.
pub fn replace_matching(doc: &Document, selector: &str, html: &str) -> Result<usize> {
    let matcher = compile(selector)?;
    let matched = doc.select_matcher(&matcher);
    let count = matched.length();
    matched.replace_with_html(html);
    Ok(count)
}

// === Tag/Node Information ===

/// Lowercase tag name, `None` for text/comment nodes.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Attribute value, if present.
#[must_use]
pub fn attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|value| value.to_string())
}

/// Heading rank (1-6) if `node` is an `h1`..`h6` element.
#[must_use]
pub fn heading_rank(node: &NodeRef) -> Option<u8> {
    let tag = tag_name(node)?;
    HEADING_TAG
        .captures(&tag)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether two handles point at the same node.
#[must_use]
pub fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    a.id == b.id
}

// === Text Content ===

/// All text content of the node and its descendants.
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

// === Tree Navigation ===

/// Next sibling that is an element (skipping text and comment nodes).
#[must_use]
pub fn next_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.next_sibling();
    }
    None
}

/// Direct element children, in order.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children().into_iter().filter(NodeRef::is_element).collect()
}

/// Tag name of the parent element.
#[must_use]
pub fn parent_tag(node: &NodeRef) -> Option<String> {
    node.parent().as_ref().and_then(tag_name)
}

/// Nearest ancestor (excluding `node` itself) with the given tag.
#[must_use]
pub fn closest_ancestor<'a>(node: &NodeRef<'a>, tag: &str) -> Option<NodeRef<'a>> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if tag_name(&ancestor).as_deref() == Some(tag) {
            return Some(ancestor);
        }
        current = ancestor.parent();
    }
    None
}
