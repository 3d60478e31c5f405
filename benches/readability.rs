use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use readabilityrs::{is_probably_readerable, Document, Readability};
use std::fs;
use std::path::Path;

fn load_test_case(name: &str) -> Option<String> {
    let path = Path::new("tests/test-pages").join(name).join("source.html");
    fs::read_to_string(&path).ok()
}

/// A news-like page with navigation, a sidebar and `paragraphs` paragraphs
/// of article text.
fn synthetic_page(paragraphs: usize) -> String {
    let mut body = String::from(
        r#"<div class="nav"><ul><li><a href="/">Home</a></li><li><a href="/world">World</a></li></ul></div>"#,
    );
    body.push_str(r#"<div class="article-body"><h1>Synthetic story</h1>"#);
    for i in 0..paragraphs {
        body.push_str(&format!(
            "<p>Paragraph {i} reports on the meeting, the vote, and the budget that followed, \
             with <a href=\"/ref/{i}\">a reference</a> and some <em>emphasis</em>.</p>"
        ));
    }
    body.push_str("</div>");
    body.push_str(r#"<div class="sidebar"><p>Related: <a href="/x">x</a>, <a href="/y">y</a></p></div>"#);
    format!(
        "<html><head><title>Synthetic story - Example</title></head><body>{body}</body></html>"
    )
}

fn inputs() -> Vec<(String, String)> {
    let mut inputs: Vec<(String, String)> = [("small", 10), ("medium", 100), ("large", 1000)]
        .into_iter()
        .map(|(name, paragraphs)| (name.to_string(), synthetic_page(paragraphs)))
        .collect();
    for name in ["news-article", "json-ld-rtl"] {
        if let Some(html) = load_test_case(name) {
            inputs.push((name.to_string(), html));
        }
    }
    inputs
}

fn bench_dom_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("dom_parse");

    for (name, html) in inputs() {
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("doc", &name), &html, |b, html| {
            b.iter(|| std::hint::black_box(Document::parse(std::hint::black_box(html))));
        });
    }

    group.finish();
}

fn bench_parse_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, html) in inputs() {
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("doc", &name), &html, |b, html| {
            b.iter(|| {
                let readability = Readability::new(std::hint::black_box(html), None, None).unwrap();
                std::hint::black_box(readability.parse())
            });
        });
    }

    group.finish();
}

fn bench_readerable_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("readerable");

    for (name, html) in inputs() {
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("check", &name), &html, |b, html| {
            b.iter(|| {
                std::hint::black_box(is_probably_readerable(std::hint::black_box(html), None))
            });
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let docs: Vec<String> = (1..=6).map(|n| synthetic_page(n * 20)).collect();
    let total_bytes: usize = docs.iter().map(|d| d.len()).sum();

    let mut group = c.benchmark_group("batch");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.bench_function("6_documents", |b| {
        b.iter(|| {
            for html in &docs {
                let readability = Readability::new(std::hint::black_box(html), None, None).unwrap();
                std::hint::black_box(readability.parse()).ok();
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_dom_parse,
    bench_parse_by_size,
    bench_readerable_check,
    bench_batch
);
criterion_main!(benches);
