//! Character encoding detection for fetched pages.
//!
//! The fallback fetcher receives raw bytes. The charset is taken from the
//! `Content-Type` response header first, then from `<meta>` declarations in
//! the document head, and defaults to UTF-8.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Match `charset=...` inside a header value or `<meta>` tag
#[allow(clippy::expect_used)]
static CHARSET_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;>]+)"#).expect("valid regex")
});

/// Match a `<meta ...charset...>` tag
#[allow(clippy::expect_used)]
static META_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset[^>]*>"#).expect("valid regex")
});

/// Only the head of a document is searched for `<meta>` charsets.
const META_SCAN_BYTES: usize = 1024;

/// Encoding named by a `Content-Type` header value, if recognized.
#[must_use]
pub fn encoding_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    CHARSET_PARAM_RE
        .captures(content_type)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
}

/// Encoding declared by `<meta charset>` or `<meta http-equiv>` in the first
/// kilobyte of the document.
#[must_use]
pub fn encoding_from_meta(html: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&html[..html.len().min(META_SCAN_BYTES)]);
    let tag = META_TAG_RE.find(&head)?;
    CHARSET_PARAM_RE
        .captures(tag.as_str())
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
}

/// Decode a response body to UTF-8.
///
/// Invalid sequences become U+FFFD rather than errors.
///
/// ```
/// use crease::encoding::decode_body;
///
/// let body = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
/// assert!(decode_body(body, None).contains("Café"));
/// ```
#[must_use]
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(encoding_from_content_type)
        .or_else(|| encoding_from_meta(body))
        .unwrap_or(UTF_8);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }

    let (decoded, _encoding_used, _had_errors) = encoding.decode(body);
    decoded.into_owned()
}
