//! Headless Chrome renderer.
//!
//! One browser session per [`Renderer`], launched lazily on first use and
//! shared by every extraction. Each URL gets its own page, which is closed
//! after the attempt whatever the outcome. The session lives until
//! [`PageSource::shutdown`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport as CdpViewport;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{stealth, PageSource};
use crate::error::{Error, Result};
use crate::options::{DelayRange, ExtractionOptions};
use crate::retry::{self, RetryPolicy};

const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const SCROLL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_SCROLL_STEPS: usize = 400;

const LOAD_STATE_JS: &str = "({ state: document.readyState, \
     resources: performance.getEntriesByType('resource').length })";

const SCROLL_STEP_JS: &str = "(() => { const before = window.scrollY; window.scrollBy(0, 100); \
     return { before, after: window.scrollY }; })()";

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct LoadState {
    state: String,
    resources: u64,
}

#[derive(Debug, Deserialize)]
struct ScrollStep {
    before: f64,
    after: f64,
}

impl ScrollStep {
    /// Keep going while the viewport still moves; lazy content that grows the
    /// page after a step shows up as further movement on the next one.
    fn advanced(&self) -> bool {
        self.after > self.before
    }
}

/// Lazily launched shared value with a single launch in flight.
///
/// The lock is held across the launch so concurrent first callers wait for
/// one launch instead of starting their own. A failed launch leaves the slot
/// empty for the next caller to retry.
struct SessionSlot<S> {
    slot: Mutex<Option<Arc<S>>>,
}

impl<S> SessionSlot<S> {
    fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    async fn get_or_launch<F, Fut>(&self, launch: F) -> Result<Arc<S>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<S>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(session) = slot.as_ref() {
            return Ok(Arc::clone(session));
        }

        let session = Arc::new(launch().await?);
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    async fn take(&self) -> Option<Arc<S>> {
        self.slot.lock().await.take()
    }
}

/// A launched browser and the task draining its CDP event stream.
struct BrowserSession {
    browser: RwLock<Browser>,
    handler: JoinHandle<()>,
}

/// Full-JavaScript page loader with bot-evasion measures.
pub struct Renderer {
    options: Arc<ExtractionOptions>,
    session: SessionSlot<BrowserSession>,
}

impl Renderer {
    #[must_use]
    pub fn new(options: Arc<ExtractionOptions>) -> Self {
        Self {
            options,
            session: SessionSlot::new(),
        }
    }

    /// The shared session, launching it if needed.
    async fn session(&self) -> Result<Arc<BrowserSession>> {
        self.session.get_or_launch(|| launch(&self.options)).await
    }

    /// One render attempt on a fresh page; the page is always closed.
    async fn render_once(&self, session: &BrowserSession, url: &str) -> Result<String> {
        let page = session
            .browser
            .read()
            .await
            .new_page("about:blank")
            .await
            .map_err(|err| render_error(url, format!("could not open page: {err}")))?;
        debug!(url = %url, "page opened");

        let outcome = self.drive(&page, url).await;

        if let Err(err) = page.close().await {
            debug!(url = %url, error = %err, "page close failed");
        } else {
            debug!(url = %url, "page closed");
        }
        outcome
    }

    async fn drive(&self, page: &Page, url: &str) -> Result<String> {
        let step_delay = DelayRange::new(
            self.options.inter_action_delay_ms,
            self.options.inter_action_delay_ms,
        );

        page.set_user_agent(self.options.user_agent.as_str())
            .await
            .map_err(|err| render_error(url, format!("set user agent: {err}")))?;
        retry::pause(step_delay, 0).await;

        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            stealth::browser_headers(),
        )))
        .await
        .map_err(|err| render_error(url, format!("set headers: {err}")))?;
        retry::pause(step_delay, 0).await;

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            stealth::FINGERPRINT_SCRIPT,
        ))
        .await
        .map_err(|err| render_error(url, format!("install fingerprint script: {err}")))?;
        retry::pause(step_delay, 0).await;

        let timeout = self.options.timeout();
        tokio::time::timeout(timeout, page.goto(url))
            .await
            .map_err(|_| render_error(url, format!("navigation timed out after {timeout:?}")))?
            .map_err(|err| render_error(url, format!("navigation failed: {err}")))?;

        let request = tokio::time::timeout(timeout, page.wait_for_navigation_response())
            .await
            .map_err(|_| render_error(url, "timed out waiting for the document response"))?
            .map_err(|err| render_error(url, format!("navigation response: {err}")))?;
        let status = request
            .as_ref()
            .and_then(|request| request.response.as_ref())
            .map(|response| response.status);
        check_document_status(url, status)?;

        wait_for_network_settled(page, timeout).await;
        retry::pause(self.options.settle_delay, self.options.jitter_ms).await;
        scroll_to_bottom(page).await;

        let html = page
            .content()
            .await
            .map_err(|err| render_error(url, format!("read content: {err}")))?;
        info!(url = %url, bytes = html.len(), "page rendered");
        Ok(html)
    }
}

#[async_trait]
impl PageSource for Renderer {
    fn name(&self) -> &'static str {
        "renderer"
    }

    async fn load(&self, url: &str) -> Result<String> {
        // No retries for a launch failure; the fallback fetcher takes over.
        let session = self
            .session()
            .await
            .map_err(|err| render_error(url, format!("browser launch failed: {err}")))?;

        let policy = RetryPolicy::new(
            self.options.max_retries,
            self.options.render_backoff,
            self.options.jitter_ms,
        );
        retry::retry(&policy, self.name(), url, |_| self.render_once(&session, url)).await
    }

    async fn shutdown(&self) {
        let Some(session) = self.session.take().await else {
            return;
        };

        let mut browser = session.browser.write().await;
        if let Err(err) = browser.close().await {
            warn!(error = %err, "browser close failed");
        }
        if let Err(err) = browser.wait().await {
            debug!(error = %err, "browser process wait failed");
        }
        session.handler.abort();
        debug!("browser session closed");
    }
}

async fn launch(options: &ExtractionOptions) -> Result<BrowserSession> {
    let mut builder = BrowserConfig::builder()
        .viewport(Some(CdpViewport {
            width: options.viewport.width,
            height: options.viewport.height,
            device_scale_factor: Some(1.0),
            ..Default::default()
        }))
        .request_timeout(options.timeout())
        .args(stealth::launch_args(options));
    if !options.headless {
        builder = builder.with_head();
    }
    if let Some(path) = &options.chrome_executable {
        builder = builder.chrome_executable(path);
    }
    let config = builder.build().map_err(Error::Browser)?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|err| Error::Browser(err.to_string()))?;
    let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

    debug!(headless = options.headless, "browser session launched");
    Ok(BrowserSession {
        browser: RwLock::new(browser),
        handler,
    })
}

/// Poll until the document is complete and no new resources appeared
/// between two polls, or until `limit` elapses.
async fn wait_for_network_settled(page: &Page, limit: Duration) {
    let deadline = tokio::time::Instant::now() + limit;
    let mut previous: Option<LoadState> = None;

    while tokio::time::Instant::now() < deadline {
        let state = match page.evaluate(LOAD_STATE_JS).await {
            Ok(value) => value.into_value::<LoadState>().ok(),
            Err(_) => None,
        };
        if let Some(state) = state {
            if state.state == "complete" && previous.as_ref() == Some(&state) {
                return;
            }
            previous = Some(state);
        }
        tokio::time::sleep(SETTLE_POLL_INTERVAL).await;
    }
    debug!("network did not settle before timeout");
}

/// Scroll in small steps until the page stops moving.
async fn scroll_to_bottom(page: &Page) {
    for _ in 0..MAX_SCROLL_STEPS {
        let step = match page.evaluate(SCROLL_STEP_JS).await {
            Ok(value) => match value.into_value::<ScrollStep>() {
                Ok(step) => step,
                Err(_) => return,
            },
            Err(_) => return,
        };
        if !step.advanced() {
            return;
        }
        tokio::time::sleep(SCROLL_INTERVAL).await;
    }
}

/// The main document must have answered with a 2xx or 3xx status. No
/// response at all (blocked, aborted, served from nowhere) is a failure too.
fn check_document_status(url: &str, status: Option<i64>) -> Result<()> {
    match status {
        Some(status) if (200..400).contains(&status) => Ok(()),
        Some(status) => Err(render_error(url, format!("HTTP {status}"))),
        None => Err(render_error(url, "no response for the main document")),
    }
}

fn render_error(url: &str, message: impl Into<String>) -> Error {
    Error::Render {
        url: url.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_state_compares_ready_state_and_count() {
        let a: LoadState = serde_json::from_str(r#"{"state":"complete","resources":12}"#)
            .unwrap_or(LoadState { state: String::new(), resources: 0 });
        let b = LoadState { state: "complete".to_string(), resources: 12 };
        assert_eq!(a, b);
    }

    #[test]
    fn scroll_step_parses_browser_numbers() {
        let step: Option<ScrollStep> = serde_json::from_str(r#"{"before":0,"after":100.5}"#).ok();
        assert!(step.is_some_and(|s| s.advanced()));
    }

    #[test]
    fn scrolling_continues_while_the_viewport_moves() {
        // Reaching the bottom in a step that still moved is not the end: the
        // page may grow before the next step.
        let last_visible = ScrollStep { before: 1_900.0, after: 1_980.0 };
        assert!(last_visible.advanced());

        let stuck = ScrollStep { before: 1_980.0, after: 1_980.0 };
        assert!(!stuck.advanced());
    }

    #[test]
    fn document_status_must_be_success_or_redirect() {
        let url = "https://example.com/";
        assert!(check_document_status(url, Some(200)).is_ok());
        assert!(check_document_status(url, Some(304)).is_ok());

        match check_document_status(url, Some(403)) {
            Err(Error::Render { message, .. }) => assert_eq!(message, "HTTP 403"),
            other => panic!("expected render error, got {other:?}"),
        }
        assert!(matches!(
            check_document_status(url, Some(500)),
            Err(Error::Render { .. })
        ));
    }

    #[test]
    fn missing_document_response_fails_the_attempt() {
        match check_document_status("https://example.com/", None) {
            Err(Error::Render { message, .. }) => assert!(message.contains("no response")),
            other => panic!("expected render error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_first_use_launches_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let slot: SessionSlot<usize> = SessionSlot::new();
        let launches = AtomicUsize::new(0);
        let counter = &launches;
        let launch = move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(250)).await;
            Ok::<_, Error>(n)
        };

        let sessions = futures::future::join_all((0..8).map(|_| slot.get_or_launch(launch))).await;

        assert_eq!(launches.load(Ordering::SeqCst), 1);
        let sessions: Vec<Arc<usize>> = sessions.into_iter().filter_map(Result::ok).collect();
        assert_eq!(sessions.len(), 8);
        assert!(sessions.iter().all(|s| Arc::ptr_eq(s, &sessions[0])));
    }

    #[tokio::test]
    async fn failed_launch_leaves_slot_empty_for_the_next_caller() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let slot: SessionSlot<&'static str> = SessionSlot::new();
        let attempts = AtomicUsize::new(0);
        let counter = &attempts;

        let first = slot
            .get_or_launch(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<&'static str, _>(Error::Browser("no chrome".to_string()))
            })
            .await;
        assert!(first.is_err());

        let second = slot
            .get_or_launch(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>("session")
            })
            .await;
        assert_eq!(second.ok().as_deref(), Some(&"session"));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        assert!(slot.take().await.is_some());
        assert!(slot.take().await.is_none());
    }

    #[tokio::test]
    async fn launch_failure_is_a_render_error() {
        let options = ExtractionOptions {
            chrome_executable: Some("/nonexistent/chrome-binary".into()),
            max_retries: 3,
            ..ExtractionOptions::default().without_delays()
        };
        let renderer = Renderer::new(Arc::new(options));
        match renderer.load("https://example.com/").await {
            Err(Error::Render { message, .. }) => assert!(message.contains("launch")),
            other => panic!("expected render error, got {other:?}"),
        }
        // Nothing was launched, so shutdown has nothing to do.
        renderer.shutdown().await;
        renderer.shutdown().await;
    }
}
