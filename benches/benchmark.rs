//! Performance benchmarks for the offline stages of crease.
//!
//! Run with: `cargo bench`
//!
//! Covers text cleaning, section/table recovery and full HTML processing
//! (reduction plus enrichment) on synthetic scorecard pages of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crease::structured::{extract_sections, extract_tables};
use crease::{clean_text, extract_from_html};

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Chennai Super Kings vs Mumbai Indians, Match 29</title>
    <meta property="og:site_name" content="Cricket Daily">
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/scores">Live Scores</a>
    </nav>
    <article>
        <h1>Chennai Super Kings vs Mumbai Indians</h1>
        <p>Chennai posted 206 for 4 after being put in, with a brisk opening stand
        setting the platform and a late flourish taking them past 200.</p>
        <h2>First innings</h2>
        <p>The openers added 52 inside the powerplay before spin slowed things down.</p>
        <table>
            <caption>Batting</caption>
            <thead><tr><th>Batter</th><th>R</th><th>B</th><th>4s</th><th>6s</th></tr></thead>
            <tbody>
                <tr><td>Gaikwad</td><td>69</td><td>40</td><td>5</td><td>5</td></tr>
                <tr><td>Rachin</td><td>21</td><td>16</td><td>2</td><td>1</td></tr>
                <tr><td>Dube</td><td>66</td><td>38</td><td>10</td><td>2</td></tr>
                <tr><td>Dhoni</td><td>20</td><td>4</td><td>0</td><td>3</td></tr>
            </tbody>
        </table>
        <h3>Fall of wickets</h3>
        <p>1-8, 2-60, 3-150, 4-186</p>
        <h2>Second innings</h2>
        <p>Mumbai fell 20 runs short despite an unbeaten hundred at the top.</p>
    </article>
    <footer><p>Copyright 2024</p></footer>
</body>
</html>
"#;

fn scaled_html(repeats: usize) -> String {
    let body = SAMPLE_HTML
        .split_once("<article>")
        .and_then(|(_, rest)| rest.split_once("</article>"))
        .map_or("", |(inner, _)| inner);
    format!(
        "<html><head><title>Scorecard</title></head><body><article>{}</article></body></html>",
        body.repeat(repeats)
    )
}

fn bench_clean_text(c: &mut Criterion) {
    let messy = "  Chennai\t\tposted   206\r\n\r\n\r\n\r\nfor 4 \x07 after being put in.  ".repeat(200);
    c.bench_function("clean_text", |b| {
        b.iter(|| clean_text(black_box(&messy)));
    });
}

fn bench_structured(c: &mut Criterion) {
    c.bench_function("extract_sections", |b| {
        b.iter(|| extract_sections(black_box(SAMPLE_HTML)));
    });
    c.bench_function("extract_tables", |b| {
        b.iter(|| extract_tables(black_box(SAMPLE_HTML)));
    });
}

fn bench_extract_from_html(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_from_html");

    for repeats in [1, 10, 50] {
        let html = scaled_html(repeats);
        let size_kb = html.len() / 1024;
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("scorecard", format!("x{repeats} ({size_kb}KB)")),
            &html,
            |b, html| {
                b.iter(|| extract_from_html(black_box(html), "https://example.com/match"));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_clean_text,
    bench_structured,
    bench_extract_from_html
);
criterion_main!(benches);
