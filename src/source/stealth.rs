//! Bot-evasion material shared by the renderer and the fetcher.
//!
//! Launch flags, request headers and the fingerprint script that makes an
//! automated Chrome read like a person's desktop browser.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};

use crate::options::ExtractionOptions;

/// Chrome flags for headless stability and fewer automation tells.
pub const LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--disable-gpu",
    "--disable-extensions",
    "--disable-sync",
    "--disable-default-apps",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
    "--disable-client-side-phishing-detection",
    "--disable-ipc-flooding-protection",
    "--disable-features=TranslateUI",
    "--disable-blink-features=AutomationControlled",
    "--metrics-recording-only",
    "--mute-audio",
    "--no-first-run",
    "--no-default-browser-check",
    "--hide-scrollbars",
    "--force-color-profile=srgb",
    "--autoplay-policy=user-gesture-required",
];

/// Evaluated before any page script on every new document.
pub const FINGERPRINT_SCRIPT: &str = r"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
if (window.navigator.permissions && window.navigator.permissions.query) {
    const originalQuery = window.navigator.permissions.query.bind(window.navigator.permissions);
    window.navigator.permissions.query = (parameters) => (
        parameters && parameters.name === 'notifications'
            ? Promise.resolve({ state: Notification.permission })
            : originalQuery(parameters)
    );
}
window.chrome = window.chrome || {};
window.chrome.runtime = window.chrome.runtime || {};
";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Full Chrome launch argument list for `options`.
#[must_use]
pub fn launch_args(options: &ExtractionOptions) -> Vec<String> {
    LAUNCH_ARGS
        .iter()
        .map(|arg| (*arg).to_string())
        .chain([
            format!("--user-agent={}", options.user_agent),
            format!(
                "--window-size={},{}",
                options.viewport.width, options.viewport.height
            ),
        ])
        .collect()
}

/// Extra headers for rendered page requests, including client hints.
#[must_use]
pub fn browser_headers() -> Value {
    json!({
        "Accept": ACCEPT,
        "Accept-Language": ACCEPT_LANGUAGE,
        "Cache-Control": "max-age=0",
        "Sec-Fetch-Dest": "document",
        "Sec-Fetch-Mode": "navigate",
        "Sec-Fetch-Site": "none",
        "Sec-Fetch-User": "?1",
        "Upgrade-Insecure-Requests": "1",
        "sec-ch-ua": "\"Not_A Brand\";v=\"99\", \"Google Chrome\";v=\"120\", \"Chromium\";v=\"120\"",
        "sec-ch-ua-mobile": "?0",
        "sec-ch-ua-platform": "\"Windows\"",
    })
}

/// Default headers for the plain HTTP fetcher.
///
/// `Accept-Encoding` is left to reqwest so it can decompress the body.
#[must_use]
pub fn fetch_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in [
        ("accept", ACCEPT),
        ("accept-language", ACCEPT_LANGUAGE),
        ("cache-control", "max-age=0"),
        ("dnt", "1"),
        ("upgrade-insecure-requests", "1"),
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
    ] {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}
