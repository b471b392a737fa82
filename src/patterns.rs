//! Compiled regex patterns for text normalization.
//!
//! All patterns are compiled once at first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches `\r\n` and lone `\r` line endings.
pub static LINE_ENDINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n?").expect("LINE_ENDINGS regex")
});

/// Matches non-printable control characters except `\t`, `\n` and `\r`.
pub static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("CONTROL_CHARS regex")
});

/// Matches runs of whitespace other than newlines.
pub static HORIZONTAL_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\S\n]+").expect("HORIZONTAL_WHITESPACE regex")
});

/// Matches a newline together with the spaces around it.
pub static PADDED_NEWLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" ?\n ?").expect("PADDED_NEWLINE regex")
});

/// Matches two or more consecutive blank lines.
pub static MULTIPLE_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("MULTIPLE_BLANK_LINES regex")
});

// =============================================================================
// Markup Patterns
// =============================================================================

/// Matches heading tag names and captures the rank digit.
pub static HEADING_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^h([1-6])$").expect("HEADING_TAG regex")
});

// =============================================================================
// CSS Selectors
// =============================================================================

/// All heading elements, in document order when selected.
pub const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Table elements.
pub const TABLE_SELECTOR: &str = "table";

/// Table rows.
pub const ROW_SELECTOR: &str = "tr";

/// Line breaks, which carry no text of their own.
pub const LINE_BREAK_SELECTOR: &str = "br";

/// Elements dropped before readability runs: scripts and social-share widgets
/// that plugins inject into article bodies.
pub const PRE_REDUCTION_DISCARD_SELECTOR: &str = "script, style, noscript, template, [class*=\"dpsp-\"], [class*=\"wabtn\"], [class*=\"addtoany\"], [class*=\"shareaholic\"], [class*=\"share-wrapper\"], [class*=\"social-share\"], [class*=\"share-buttons\"], [id*=\"share-buttons\"], [class*=\"post-share\"], [class*=\"entry-share\"]";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_whitespace_keeps_newlines() {
        let result = HORIZONTAL_WHITESPACE.replace_all("a \t b\n\nc", " ");
        assert_eq!(result, "a b\n\nc");
    }

    #[test]
    fn control_chars_spare_newlines_and_tabs() {
        assert!(CONTROL_CHARS.is_match("\u{0007}"));
        assert!(CONTROL_CHARS.is_match("\u{007F}"));
        assert!(!CONTROL_CHARS.is_match("\n"));
        assert!(!CONTROL_CHARS.is_match("\t"));
    }

    #[test]
    fn heading_tag_captures_rank() {
        let caps = HEADING_TAG.captures("h3").map(|c| c[1].to_string());
        assert_eq!(caps.as_deref(), Some("3"));
        assert!(!HEADING_TAG.is_match("h7"));
        assert!(!HEADING_TAG.is_match("header"));
        assert!(!HEADING_TAG.is_match("hr"));
    }
}
