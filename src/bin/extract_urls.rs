//! Extract a batch of URLs and print the results as a JSON array.
//!
//! Usage: `extract_urls [--file urls.txt] <url>...`
//!
//! Options come from the environment (`MAX_CONCURRENT_EXTRACTIONS`,
//! `EXTRACTION_TIMEOUT`, ...). Logs go to stderr so stdout stays valid JSON.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::io::{self, BufWriter, Write};

use anyhow::{bail, Context, Result};
use crease::{ExtractionOptions, Extractor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Trim quotes and trailing punctuation that ride along with pasted URLs.
fn normalize_url_candidate(raw: &str) -> Option<String> {
    let mut s = raw.trim().to_string();

    while s.ends_with(['"', '\'', ')', ']', '}', '>', ',', '.', ';']) {
        s.pop();
    }
    while s.starts_with(['"', '\'', '<']) {
        s.remove(0);
    }

    let url = Url::parse(&s).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(url.to_string())
}

fn collect_urls(mut args: impl Iterator<Item = String>) -> Result<Vec<String>> {
    let mut raw = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--file" {
            let Some(path) = args.next() else {
                bail!("--file needs a path");
            };
            let content = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            raw.extend(
                content
                    .lines()
                    .filter(|line| !line.trim_start().starts_with('#'))
                    .map(str::to_string),
            );
        } else {
            raw.push(arg);
        }
    }

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for candidate in raw.iter().filter(|line| !line.trim().is_empty()) {
        match normalize_url_candidate(candidate) {
            Some(url) if seen.insert(url.clone()) => urls.push(url),
            Some(_) => {}
            None => tracing::warn!(input = %candidate, "skipping invalid URL"),
        }
    }
    Ok(urls)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crease=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let urls = collect_urls(env::args().skip(1))?;
    if urls.is_empty() {
        bail!("usage: extract_urls [--file urls.txt] <url>...");
    }

    let options = ExtractionOptions::from_env().context("loading extraction options")?;
    let extractor = Extractor::new(options).context("building extractor")?;

    tracing::info!(count = urls.len(), "extracting");
    let results = extractor.extract_multiple(&urls).await;
    extractor.close().await;

    let succeeded = results.iter().filter(|r| r.is_success()).count();
    tracing::info!(succeeded, failed = results.len() - succeeded, "done");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    serde_json::to_writer_pretty(&mut out, &results).context("writing results")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
