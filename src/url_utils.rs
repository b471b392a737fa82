//! URL Utility Functions
//!
//! Validation of candidate URLs before extraction, and the link checks the
//! search layer uses to unwrap redirect links and spot results that only
//! point back at a search engine.

use url::Url;

use crate::error::{Error, Result};

/// Hosts whose links are search-engine self-references, not real results.
const SEARCH_ENGINE_HOSTS: &[&str] = &[
    "duckduckgo.com",
    "google.com",
    "bing.com",
    "yahoo.com",
    "yandex.com",
    "yandex.ru",
    "baidu.com",
];

/// Parse `url_str` and require an absolute http(s) URL with a host.
pub fn validate_http_url(url_str: &str) -> Result<Url> {
    let trimmed = url_str.trim();
    let url = Url::parse(trimmed).map_err(|err| Error::InvalidUrl(format!("{trimmed}: {err}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "{trimmed}: unsupported scheme {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::InvalidUrl(format!("{trimmed}: missing host")));
    }

    Ok(url)
}

/// Hostname without a leading `www.`, lowercased.
#[must_use]
pub fn extract_hostname(url_str: &str) -> Option<String> {
    let url = Url::parse(url_str.trim()).ok()?;
    let host = url.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    Some(host.strip_prefix("www.").map_or_else(|| host.clone(), str::to_string))
}

/// Whether a result link points at a search engine rather than a destination.
///
/// Relative links (`/l/?...`, `/url?q=...`) and anything that fails to parse
/// count as self-links: they only make sense on the engine's own pages.
#[must_use]
pub fn is_search_engine_link(url_str: &str) -> bool {
    let Some(host) = extract_hostname(url_str) else {
        return true;
    };
    SEARCH_ENGINE_HOSTS
        .iter()
        .any(|engine| host == *engine || host.ends_with(&format!(".{engine}")))
}

/// Unwrap a DuckDuckGo redirect (`//duckduckgo.com/l/?uddg=<target>`).
///
/// Returns the input unchanged when it is not a redirect link.
#[must_use]
pub fn unwrap_duckduckgo_redirect(href: &str) -> String {
    let href = href.trim();
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{href}")
    } else {
        href.to_string()
    };

    let Ok(url) = Url::parse(&absolute) else {
        return href.to_string();
    };
    if url.path() != "/l/" && url.path() != "/l" {
        return href.to_string();
    }
    url.query_pairs()
        .find(|(key, _)| key == "uddg")
        .map_or_else(|| href.to_string(), |(_, target)| target.into_owned())
}

/// Unwrap a Google result link (`/url?q=<target>&sa=...`).
#[must_use]
pub fn unwrap_google_redirect(href: &str) -> String {
    let href = href.trim();
    if !href.starts_with("/url?") {
        return href.to_string();
    }
    let Ok(url) = Url::parse(&format!("https://www.google.com{href}")) else {
        return href.to_string();
    };
    url.query_pairs()
        .find(|(key, _)| key == "q" || key == "url")
        .map_or_else(|| href.to_string(), |(_, target)| target.into_owned())
}

/// Normalize a URL for de-duplication: drop the fragment.
#[must_use]
pub fn dedup_key(url_str: &str) -> String {
    match Url::parse(url_str.trim()) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => url_str.trim().to_string(),
    }
}
