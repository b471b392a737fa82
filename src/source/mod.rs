//! Page sources: where raw HTML comes from.
//!
//! - `browser`: headless Chrome renderer (primary)
//! - `http`: plain HTTP fetcher (fallback)
//! - `stealth`: headers, launch flags and fingerprint masking shared by both

pub mod browser;
pub mod http;
pub mod stealth;

pub use browser::Renderer;
pub use http::SimpleFetcher;

use async_trait::async_trait;

use crate::error::Result;

/// Something that turns a URL into HTML.
///
/// Implementations own their retry policy and timeout; a returned error
/// means every allowed attempt has failed.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Load `url` and return its HTML.
    async fn load(&self, url: &str) -> Result<String>;

    /// Release long-lived resources. Must be safe to call repeatedly.
    async fn shutdown(&self) {}
}
