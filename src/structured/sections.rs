//! Heading-delimited section recovery.
//!
//! A section is a heading plus the text of the element siblings after it, up
//! to (not including) the next heading of equal or shallower rank. Deeper
//! headings are part of the enclosing section's text and also start their own
//! section.

use crate::dom::{self, Document, NodeRef};
use crate::error::Result;
use crate::patterns::HEADING_SELECTOR;
use crate::result::Section;
use crate::text::{clean_text, single_line};

pub(super) fn sections_from(doc: &Document) -> Result<Vec<Section>> {
    let mut sections = Vec::new();

    for heading in dom::query_all(doc, HEADING_SELECTOR)? {
        let Some(level) = dom::heading_rank(&heading) else {
            continue;
        };
        let title = single_line(&dom::text_content(&heading));
        if title.is_empty() {
            continue;
        }

        let content = section_body(&heading, level)?;
        sections.push(Section {
            level,
            title,
            content,
        });
    }

    Ok(sections)
}

/// Text of the siblings following `heading`, stopping at a boundary.
fn section_body(heading: &NodeRef, level: u8) -> Result<String> {
    let mut content = String::new();
    let mut next = dom::next_element_sibling(heading);

    while let Some(sibling) = next {
        if is_boundary(&sibling, level)? {
            break;
        }
        content.push_str(&dom::text_content(&sibling));
        content.push(' ');
        next = dom::next_element_sibling(&sibling);
    }

    Ok(clean_text(&content))
}

/// A sibling ends the section if it is, or contains, a heading of rank <= `level`.
fn is_boundary(node: &NodeRef, level: u8) -> Result<bool> {
    if let Some(rank) = dom::heading_rank(node) {
        return Ok(rank <= level);
    }
    let nested = dom::query_within(node, HEADING_SELECTOR)?;
    Ok(nested
        .iter()
        .filter_map(dom::heading_rank)
        .any(|rank| rank <= level))
}
