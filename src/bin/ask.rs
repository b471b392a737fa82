//! Answer one cricket question end to end.
//!
//! Usage: `ask "who topped the IPL points table?"`
//!
//! Needs `GEMINI_API_KEY`; extraction options come from the environment.

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use crease::assistant::Assistant;
use crease::llm::{GeminiClient, GeminiConfig};
use crease::search::{DuckDuckGoSearcher, FallbackSearcher, GoogleSearcher};
use crease::{Error, ExtractionOptions, Extractor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crease=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let question = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if question.trim().is_empty() {
        bail!("usage: ask \"<question>\"");
    }

    let generator = Arc::new(GeminiClient::new(
        GeminiConfig::from_env().context("loading Gemini config")?,
    )?);
    let searcher = Arc::new(FallbackSearcher::new(
        Arc::new(DuckDuckGoSearcher::new()?),
        Arc::new(GoogleSearcher::new()?),
    ));
    let extractor = Extractor::new(ExtractionOptions::from_env().context("loading extraction options")?)?;

    let outcome = Assistant::new(&extractor, searcher, generator)
        .answer(&question, &[])
        .await;
    extractor.close().await;

    match outcome {
        Ok(answer) => {
            println!("{}", answer.reply);
            eprintln!("\nsource: {}", answer.source_url);
            Ok(())
        }
        Err(Error::NoSearchResults(_) | Error::NoInformationFound(_)) => {
            println!("Sorry, I couldn't find current information about that. Try rephrasing the question.");
            Ok(())
        }
        Err(err) => Err(err).context("answering question"),
    }
}
