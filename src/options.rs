//! Configuration options for the extraction pipeline.
//!
//! `ExtractionOptions` controls the renderer, the fallback fetcher and the
//! batch scheduler. All fields are public; start from `Default::default()`
//! or load overrides from the environment with [`ExtractionOptions::from_env`].

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Desktop Chrome 120 on Windows.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Browser viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Inclusive range for a randomized pause, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    #[must_use]
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that never pauses.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }
}

/// Configuration options for content extraction.
///
/// # Example
///
/// ```rust
/// use crease::ExtractionOptions;
///
/// let options = ExtractionOptions {
///     max_concurrent: 2,
///     headless: false,
///     ..ExtractionOptions::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// URLs extracted concurrently inside one batch chunk.
    ///
    /// Default: `3`
    pub max_concurrent: usize,

    /// Navigation / request timeout in milliseconds.
    ///
    /// Default: `45000`
    pub timeout_ms: u64,

    /// Retries after the first attempt, for both renderer and fetcher.
    /// A single URL is attempted at most `max_retries + 1` times per source.
    ///
    /// Default: `2`
    pub max_retries: u32,

    /// Run Chrome without a window.
    ///
    /// Default: `true`
    pub headless: bool,

    /// User agent sent by both the renderer and the fetcher.
    pub user_agent: String,

    /// Viewport of every rendered page.
    ///
    /// Default: 1920x1080
    pub viewport: Viewport,

    /// Pause between page-setup actions in the renderer.
    ///
    /// Default: `100`
    pub inter_action_delay_ms: u64,

    /// Wait after navigation before scrolling.
    ///
    /// Default: 2000..=4000 ms
    pub settle_delay: DelayRange,

    /// Backoff between render attempts.
    ///
    /// Default: 3000..=6000 ms
    pub render_backoff: DelayRange,

    /// Backoff between fetch attempts.
    ///
    /// Default: 1000..=3000 ms
    pub fetch_backoff: DelayRange,

    /// Pause between batch chunks.
    ///
    /// Default: 2000..=5000 ms
    pub chunk_delay: DelayRange,

    /// Extra random jitter added to every randomized pause.
    ///
    /// Default: `500`
    pub jitter_ms: u64,

    /// Chrome binary to launch. `None` lets chromiumoxide locate one.
    ///
    /// Default: `None`
    pub chrome_executable: Option<PathBuf>,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 3,
            timeout_ms: 45_000,
            max_retries: 2,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport: Viewport::default(),
            inter_action_delay_ms: 100,
            settle_delay: DelayRange::new(2_000, 4_000),
            render_backoff: DelayRange::new(3_000, 6_000),
            fetch_backoff: DelayRange::new(1_000, 3_000),
            chunk_delay: DelayRange::new(2_000, 5_000),
            jitter_ms: 500,
            chrome_executable: None,
        }
    }
}

impl ExtractionOptions {
    /// Options with every artificial pause disabled.
    ///
    /// Useful for tests and for callers that pace requests themselves.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.inter_action_delay_ms = 0;
        self.settle_delay = DelayRange::zero();
        self.render_backoff = DelayRange::zero();
        self.fetch_backoff = DelayRange::zero();
        self.chunk_delay = DelayRange::zero();
        self.jitter_ms = 0;
        self
    }

    /// Navigation / request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            return Err(Error::InvalidOptions(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(Error::InvalidOptions(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        for (name, range) in [
            ("settle_delay", self.settle_delay),
            ("render_backoff", self.render_backoff),
            ("fetch_backoff", self.fetch_backoff),
            ("chunk_delay", self.chunk_delay),
        ] {
            if range.min_ms > range.max_ms {
                return Err(Error::InvalidOptions(format!(
                    "{name}: min {} exceeds max {}",
                    range.min_ms, range.max_ms
                )));
            }
        }
        Ok(())
    }

    /// Load options from the process environment (and `.env` if present).
    ///
    /// Recognized keys: `MAX_CONCURRENT_EXTRACTIONS`, `EXTRACTION_TIMEOUT`,
    /// `EXTRACTION_RETRIES`, `EXTRACTION_HEADLESS`, `USER_AGENT`, `CHROME_PATH`.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load options through an arbitrary key lookup. Unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(value) = lookup("MAX_CONCURRENT_EXTRACTIONS") {
            options.max_concurrent = parse_value("MAX_CONCURRENT_EXTRACTIONS", &value)?;
        }
        if let Some(value) = lookup("EXTRACTION_TIMEOUT") {
            options.timeout_ms = parse_value("EXTRACTION_TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("EXTRACTION_RETRIES") {
            options.max_retries = parse_value("EXTRACTION_RETRIES", &value)?;
        }
        if let Some(value) = lookup("EXTRACTION_HEADLESS") {
            options.headless = parse_value("EXTRACTION_HEADLESS", &value)?;
        }
        if let Some(value) = lookup("USER_AGENT") {
            if !value.trim().is_empty() {
                options.user_agent = value;
            }
        }
        if let Some(value) = lookup("CHROME_PATH") {
            if !value.trim().is_empty() {
                options.chrome_executable = Some(PathBuf::from(value));
            }
        }

        options.validate()?;
        Ok(options)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} has an invalid value: {value:?}")))
}
