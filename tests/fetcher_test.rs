//! Plain HTTP fetcher tests against a throwaway local server.

#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use crease::source::{PageSource, SimpleFetcher};
use crease::{Error, ExtractionOptions, Extractor, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve every connection the same canned response; return the base URL and
/// a counter of accepted connections.
async fn serve(status: &'static str, content_type: &'static str, body: Vec<u8>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let body = body.clone();
            tokio::spawn(async move {
                let mut buf = [0_u8; 4096];
                let _ = socket.read(&mut buf).await;
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), hits)
}

fn fetcher(max_retries: u32) -> SimpleFetcher {
    let options = ExtractionOptions {
        max_retries,
        timeout_ms: 5_000,
        ..ExtractionOptions::default().without_delays()
    };
    SimpleFetcher::new(Arc::new(options)).expect("http client")
}

fn article_body(marker: &str) -> String {
    let paragraph = "Sunrisers Hyderabad chased down 166 with more than ten overs to spare, \
        the fastest successful chase of that size in the history of the tournament, after \
        their openers took the attack apart from the very first ball of the innings.";
    format!(
        "<html><head><title>Chase report</title></head><body><article>\
         <h2>Chase</h2><p>{paragraph}</p><p>{paragraph}</p><p>{paragraph} {marker}</p>\
         </article></body></html>"
    )
}

#[tokio::test]
async fn decodes_declared_latin1_charset() {
    // "Müller" in ISO-8859-1
    let mut body = b"<html><body><p>M".to_vec();
    body.push(0xFC);
    body.extend_from_slice(b"ller</p></body></html>");
    let (base, _) = serve("200 OK", "text/html; charset=ISO-8859-1", body).await;

    let html = fetcher(0).load(&format!("{base}/player")).await.expect("fetch");

    assert!(html.contains("Müller"), "got {html}");
}

#[tokio::test]
async fn server_errors_are_retried_then_reported() {
    let (base, hits) = serve("500 Internal Server Error", "text/html", b"oops".to_vec()).await;

    let result = fetcher(2).load(&format!("{base}/broken")).await;

    match result {
        Err(Error::Fetch { message, .. }) => assert!(message.contains("500"), "got {message}"),
        other => panic!("expected fetch error, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn no_retries_means_one_attempt() {
    let (base, hits) = serve("404 Not Found", "text/html", Vec::new()).await;

    assert!(fetcher(0).load(&format!("{base}/missing")).await.is_err());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

struct Unavailable;

#[async_trait]
impl PageSource for Unavailable {
    fn name(&self) -> &'static str {
        "renderer"
    }

    async fn load(&self, url: &str) -> Result<String> {
        Err(Error::Render {
            url: url.to_string(),
            message: "no browser here".to_string(),
        })
    }
}

#[tokio::test]
async fn extractor_falls_back_to_real_fetch() {
    let (base, _) = serve(
        "200 OK",
        "text/html; charset=utf-8",
        article_body("fallback-marker").into_bytes(),
    )
    .await;

    let options = ExtractionOptions::default().without_delays();
    let fetcher = Arc::new(SimpleFetcher::new(Arc::new(options.clone())).expect("http client"));
    let extractor =
        Extractor::with_sources(options, Arc::new(Unavailable), fetcher).expect("valid options");

    let result = extractor.extract_single(&format!("{base}/chase")).await;

    match result.data() {
        Some(page) => assert!(page.content.text.contains("fallback-marker")),
        None => panic!("expected success, got {:?}", result.error()),
    }
    extractor.close().await;
}
