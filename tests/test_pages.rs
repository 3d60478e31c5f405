//! Fixture-driven extraction tests.
//!
//! Each directory under `tests/test-pages/` holds a `source.html` and an
//! `expected-metadata.json` describing the article that should come out of
//! it: metadata, whether it is readerable, and fragments of the content
//! HTML that must or must not appear.

use readabilityrs::{is_probably_readerable, Readability};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_true() -> bool {
    true
}

/// Expected results for one test page
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpectedMetadata {
    title: Option<String>,
    #[serde(default)]
    byline: Option<String>,
    #[serde(default)]
    dir: Option<String>,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    site_name: Option<String>,
    #[serde(default)]
    published_time: Option<String>,
    #[serde(default)]
    readerable: bool,
    /// Whether extraction should find an article at all
    #[serde(default = "default_true")]
    article: bool,
    /// URL the page is parsed as coming from
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    contains: Vec<String>,
    #[serde(default)]
    absent: Vec<String>,
}

struct TestCase {
    name: String,
    source_html: String,
    expected: ExpectedMetadata,
}

impl TestCase {
    fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("Invalid test case name")?
            .to_string();
        let source_html = fs::read_to_string(path.join("source.html"))?;
        let expected =
            serde_json::from_str(&fs::read_to_string(path.join("expected-metadata.json"))?)?;

        Ok(TestCase {
            name,
            source_html,
            expected,
        })
    }
}

fn load_test_cases() -> Vec<TestCase> {
    let test_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-pages");
    let mut test_cases: Vec<TestCase> = fs::read_dir(&test_dir)
        .expect("test-pages directory")
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| TestCase::load(&entry.path()).expect("loadable test case"))
        .collect();
    test_cases.sort_by(|a, b| a.name.cmp(&b.name));
    test_cases
}

/// Compare ignoring whitespace differences
fn strings_match(actual: &Option<String>, expected: &Option<String>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(a), Some(e)) => {
            a.split_whitespace().collect::<Vec<_>>() == e.split_whitespace().collect::<Vec<_>>()
        }
        _ => false,
    }
}

fn check_case(case: &TestCase) -> Vec<String> {
    let mut mismatches = Vec::new();
    let expected = &case.expected;

    let readerable = is_probably_readerable(&case.source_html, None);
    if readerable != expected.readerable {
        mismatches.push(format!(
            "readerable: expected {}, got {readerable}",
            expected.readerable
        ));
    }

    let article = Readability::new(&case.source_html, expected.url.as_deref(), None)
        .expect("valid input")
        .parse()
        .expect("parse succeeds");

    let Some(article) = article else {
        if expected.article {
            mismatches.push("expected an article, got none".to_string());
        }
        return mismatches;
    };
    if !expected.article {
        mismatches.push("expected no article".to_string());
        return mismatches;
    }

    let fields = [
        ("title", &article.title, &expected.title),
        ("byline", &article.byline, &expected.byline),
        ("dir", &article.dir, &expected.dir),
        ("lang", &article.lang, &expected.lang),
        ("excerpt", &article.excerpt, &expected.excerpt),
        ("site_name", &article.site_name, &expected.site_name),
        ("published_time", &article.published_time, &expected.published_time),
    ];
    for (field, actual, wanted) in fields {
        if !strings_match(actual, wanted) {
            mismatches.push(format!("{field}: expected {wanted:?}, got {actual:?}"));
        }
    }

    let content = article.content.unwrap_or_default();
    for fragment in &expected.contains {
        if !content.contains(fragment.as_str()) {
            mismatches.push(format!("content is missing {fragment:?}"));
        }
    }
    for fragment in &expected.absent {
        if content.contains(fragment.as_str()) {
            mismatches.push(format!("content unexpectedly contains {fragment:?}"));
        }
    }

    mismatches
}

#[test]
fn test_pages() {
    let test_cases = load_test_cases();
    assert!(!test_cases.is_empty());

    let mut failures = Vec::new();
    for case in &test_cases {
        let mismatches = check_case(case);
        if !mismatches.is_empty() {
            failures.push(format!("{}:\n  - {}", case.name, mismatches.join("\n  - ")));
        }
    }

    assert!(failures.is_empty(), "failing pages:\n{}", failures.join("\n"));
}

#[test]
#[ignore]
fn test_single_case_debug() {
    let test_name = std::env::var("READABILITY_TEST").unwrap_or_else(|_| "news-article".to_string());
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test-pages")
        .join(&test_name);
    let case = TestCase::load(&path).expect("Failed to load test case");

    println!("\n=== Debugging Test Case: {} ===\n", case.name);
    println!("{:#?}\n", case.expected);

    let article = Readability::new(&case.source_html, case.expected.url.as_deref(), None)
        .expect("valid input")
        .parse()
        .expect("parse succeeds");
    match article {
        Some(article) => {
            println!("Title: {:?}", article.title);
            println!("Byline: {:?}", article.byline);
            println!("Excerpt: {:?}", article.excerpt);
            println!("Length: {}", article.length);
            println!("\n{}", article.content.unwrap_or_default());
        }
        None => println!("No article extracted"),
    }
    for mismatch in check_case(&case) {
        println!("mismatch: {mismatch}");
    }
}
