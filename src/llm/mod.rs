//! Generative-text backends.

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_MODEL};

use async_trait::async_trait;

use crate::error::Result;

/// Prompt in, completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt`, returning trimmed text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
