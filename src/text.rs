//! Text normalization shared by the reducer and the structured extractor.

use crate::patterns::{
    CONTROL_CHARS, HORIZONTAL_WHITESPACE, LINE_ENDINGS, MULTIPLE_BLANK_LINES, PADDED_NEWLINE,
};

/// Normalize extracted text.
///
/// - line endings become `\n`
/// - control characters are removed (newlines survive)
/// - runs of other whitespace collapse to one space
/// - spaces around newlines are dropped
/// - two or more blank lines collapse to exactly one
/// - leading/trailing whitespace is trimmed
///
/// `clean_text(&clean_text(s)) == clean_text(s)` for every input.
///
/// ```
/// use crease::text::clean_text;
///
/// assert_eq!(clean_text("  Kohli \t 45*\n\n\n\nnot out \u{0007}"), "Kohli 45*\n\nnot out");
/// ```
#[must_use]
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = LINE_ENDINGS.replace_all(text, "\n");
    let text = CONTROL_CHARS.replace_all(&text, "");
    let text = HORIZONTAL_WHITESPACE.replace_all(&text, " ");
    let text = PADDED_NEWLINE.replace_all(&text, "\n");
    let text = MULTIPLE_BLANK_LINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Collapse all whitespace, newlines included, to single spaces.
///
/// Used for headings, captions and table cells, which render on one line.
#[must_use]
pub fn single_line(text: &str) -> String {
    let cleaned = CONTROL_CHARS.replace_all(text, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `text`, never splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn collapses_horizontal_whitespace() {
        assert_eq!(clean_text("Rohit   Sharma\t\tscored"), "Rohit Sharma scored");
    }

    #[test]
    fn keeps_single_blank_line() {
        assert_eq!(clean_text("Innings one\n\nInnings two"), "Innings one\n\nInnings two");
    }

    #[test]
    fn collapses_many_blank_lines_to_one() {
        assert_eq!(clean_text("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean_text("a\n  \n \n\t\nb"), "a\n\nb");
    }

    #[test]
    fn strips_control_characters_but_not_newlines() {
        assert_eq!(clean_text("over\u{0000}s\n\u{001B}maiden"), "overs\nmaiden");
    }

    #[test]
    fn normalizes_carriage_returns() {
        assert_eq!(clean_text("line one\r\nline two\rline three"), "line one\nline two\nline three");
    }

    #[test]
    fn non_breaking_spaces_become_spaces() {
        assert_eq!(clean_text("45\u{00A0}runs"), "45 runs");
    }

    #[test]
    fn empty_and_blank_inputs() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n\t \r\n "), "");
    }

    #[test]
    fn single_line_joins_lines() {
        assert_eq!(single_line("\n  Points\n   Table "), "Points Table");
        assert_eq!(single_line("Sharma\u{0007}"), "Sharma");
        assert_eq!(single_line("   "), "");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    proptest! {
        #[test]
        fn clean_text_is_idempotent(input in "\\PC*|[ \\t\\r\\n\\x00-\\x1F\\xA0a-z]*") {
            let once = clean_text(&input);
            let twice = clean_text(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn clean_text_output_is_trimmed(input in "[ \\t\\r\\na-z\\x07]*") {
            let out = clean_text(&input);
            prop_assert_eq!(out.trim(), out.as_str());
            prop_assert!(!out.contains("\n\n\n"));
            prop_assert!(!out.contains("  "));
        }
    }
}
