//! Metadata extraction from HTML documents (JSON-LD, meta tags, title).

use crate::constants::REGEXPS;
use crate::dom::Document;
use crate::dom_utils::get_inner_text;
use crate::entities::decode_html;
use crate::utils::{char_len, is_url, normalize_spaces, word_count};
use serde_json::Value;
use std::collections::HashMap;

/// Metadata extracted from the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub published_time: Option<String>,
    pub lang: Option<String>,
}

/// Extract JSON-LD structured data from document
///
/// Reads `<script type="application/ld+json">` blocks; the first one
/// holding a schema.org article object supplies the metadata.
pub fn get_json_ld(document: &Document) -> Metadata {
    for script in document.get_elements_by_tag_name(document.root(), "script") {
        if document.get_attribute(script, "type") != Some("application/ld+json") {
            continue;
        }

        let content = document.text_content(script);
        let content = REGEXPS.cdata_wrapper.replace_all(&content, "");
        let Ok(parsed) = serde_json::from_str::<Value>(&content) else {
            continue;
        };
        let Some(article) = find_article(&parsed) else {
            continue;
        };
        return json_ld_metadata(article);
    }

    Metadata::default()
}

fn is_article_type(value: &Value) -> bool {
    value
        .get("@type")
        .and_then(Value::as_str)
        .is_some_and(|kind| REGEXPS.json_ld_article_types.is_match(kind))
}

fn has_schema_context(value: &Value) -> bool {
    match value.get("@context") {
        Some(Value::String(context)) => REGEXPS.schema_dot_org.is_match(context),
        Some(Value::Object(context)) => context
            .get("@vocab")
            .and_then(Value::as_str)
            .is_some_and(|vocab| REGEXPS.schema_dot_org.is_match(vocab)),
        _ => false,
    }
}

/// The schema.org article object in a parsed JSON-LD block, looking
/// through a top-level array and an `@graph` list.
fn find_article(parsed: &Value) -> Option<&Value> {
    let mut candidate = match parsed {
        Value::Array(items) => items.iter().find(|item| is_article_type(item))?,
        other => other,
    };

    if !has_schema_context(candidate) {
        return None;
    }

    if candidate.get("@type").is_none() {
        if let Some(graph) = candidate.get("@graph").and_then(Value::as_array) {
            if let Some(item) = graph.iter().find(|item| is_article_type(item)) {
                candidate = item;
            }
        }
    }

    is_article_type(candidate).then_some(candidate)
}

fn trimmed_str<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value.get(key).and_then(Value::as_str).map(str::trim)
}

fn json_ld_metadata(article: &Value) -> Metadata {
    let publisher_name = article
        .get("publisher")
        .and_then(|publisher| trimmed_str(publisher, "name"));

    // `name` sometimes holds the publisher's name rather than the
    // article's; prefer `headline` then.
    let name = trimmed_str(article, "name");
    let headline = trimmed_str(article, "headline");
    let title = match (name, headline) {
        (Some(name), Some(headline)) if Some(name) == publisher_name => Some(headline),
        (Some(name), _) => Some(name),
        (None, headline) => headline,
    };

    let byline = match article.get("author") {
        Some(Value::Array(authors)) => {
            let names: Vec<&str> = authors
                .iter()
                .filter_map(|author| trimmed_str(author, "name"))
                .collect();
            (!names.is_empty()).then(|| names.join(", "))
        }
        Some(author) => trimmed_str(author, "name").map(str::to_string),
        None => None,
    };

    Metadata {
        title: title.map(str::to_string),
        byline,
        excerpt: trimmed_str(article, "description").map(str::to_string),
        site_name: publisher_name.map(str::to_string),
        published_time: trimmed_str(article, "datePublished").map(str::to_string),
        lang: None,
    }
}

/// `<meta>` values keyed by normalized property or name, e.g.
/// `og:title` or `parsely-author`.
fn collect_meta_values(document: &Document) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for meta in document.get_elements_by_tag_name(document.root(), "meta") {
        let Some(content) = document.get_attribute(meta, "content").filter(|c| !c.is_empty())
        else {
            continue;
        };

        let property_match = document
            .get_attribute(meta, "property")
            .and_then(|property| REGEXPS.meta_property.find(property));
        if let Some(found) = property_match {
            let key: String = found
                .as_str()
                .to_lowercase()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            values.insert(key, content.trim().to_string());
            continue;
        }

        if let Some(name) = document.get_attribute(meta, "name") {
            if REGEXPS.meta_name.is_match(name) {
                let key: String = name
                    .to_lowercase()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| if c == '.' { ':' } else { c })
                    .collect();
                values.insert(key, content.trim().to_string());
            }
        }
    }

    values
}

fn first_value(values: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| values.get(*key)).cloned()
}

fn unescape(value: Option<String>) -> Option<String> {
    value.map(|v| decode_html(&v).into_owned())
}

/// Extract article metadata from meta tags, falling back to the title
/// heuristic. JSON-LD values in `json_ld` take precedence.
pub fn get_article_metadata(document: &Document, json_ld: Metadata) -> Metadata {
    let values = collect_meta_values(document);

    let title = json_ld
        .title
        .or_else(|| {
            first_value(
                &values,
                &[
                    "dc:title",
                    "dcterm:title",
                    "og:title",
                    "weibo:article:title",
                    "weibo:webpage:title",
                    "title",
                    "twitter:title",
                    "parsely-title",
                ],
            )
        })
        .unwrap_or_else(|| get_article_title(document));

    let article_author = values
        .get("article:author")
        .filter(|author| !is_url(author))
        .cloned();
    let byline = json_ld
        .byline
        .or_else(|| {
            first_value(
                &values,
                &["dc:creator", "dcterm:creator", "author", "parsely-author"],
            )
        })
        .or(article_author);

    let excerpt = json_ld.excerpt.or_else(|| {
        first_value(
            &values,
            &[
                "dc:description",
                "dcterm:description",
                "description",
                "og:description",
                "weibo:article:description",
                "weibo:webpage:description",
                "twitter:description",
            ],
        )
    });

    let site_name = json_ld
        .site_name
        .or_else(|| values.get("og:site_name").cloned());

    let published_time = json_ld.published_time.or_else(|| {
        first_value(&values, &["article:published_time", "parsely-pub-date"])
    });

    Metadata {
        title: unescape(Some(title)),
        byline: unescape(byline),
        excerpt: unescape(excerpt),
        site_name: unescape(site_name),
        published_time: unescape(published_time),
        lang: document_language(document),
    }
}

/// `lang` of the root `<html>` element.
fn document_language(document: &Document) -> Option<String> {
    let html = document.document_element()?;
    document
        .get_attribute(html, "lang")
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// The document `<title>` with site names and section prefixes removed.
pub fn get_article_title(document: &Document) -> String {
    let orig_title = document.title().trim().to_string();
    let mut cur_title = orig_title.clone();
    let mut had_hierarchical_separators = false;

    if let Some(last_separator) = REGEXPS.title_separator.find_iter(&orig_title).last() {
        had_hierarchical_separators = REGEXPS.title_hierarchical_separator.is_match(&orig_title);
        cur_title = orig_title[..last_separator.start()].to_string();
        if word_count(&cur_title) < 3 {
            cur_title = REGEXPS
                .title_leading_part
                .replace(&orig_title, "")
                .into_owned();
        }
    } else if cur_title.contains(": ") {
        let heading_matches = document
            .get_elements_by_tag_names(document.root(), &["h1", "h2"])
            .into_iter()
            .any(|heading| document.text_content(heading).trim() == orig_title);
        if !heading_matches {
            cur_title = after_colon(&orig_title);
        }
    } else if char_len(&cur_title) > 150 || char_len(&cur_title) < 15 {
        if let [h1] = document.get_elements_by_tag_name(document.root(), "h1")[..] {
            cur_title = get_inner_text(document, h1, true);
        }
    }

    let cur_title = normalize_spaces(cur_title.trim()).into_owned();
    let cur_words = word_count(&cur_title);
    // Very short results are only kept when a hierarchical separator
    // removed exactly one word's worth of site name.
    if cur_words <= 4 {
        let orig_without_separators: String = orig_title
            .chars()
            .filter(|c| !matches!(c, '|' | '-' | '–' | '—' | '\\' | '/' | '>' | '»'))
            .collect();
        if !had_hierarchical_separators || cur_words + 1 != word_count(&orig_without_separators) {
            return orig_title;
        }
    }

    cur_title
}

/// Text after the last `:`, or after the first one when that leaves too
/// few words. Long prefixes mean the colon is part of the title.
fn after_colon(title: &str) -> String {
    let (Some(first), Some(last)) = (title.find(':'), title.rfind(':')) else {
        return title.to_string();
    };
    let after_last = &title[last + 1..];
    if word_count(after_last) < 3 {
        title[first + 1..].to_string()
    } else if word_count(&title[..first]) > 5 {
        title.to_string()
    } else {
        after_last.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(html: &str) -> String {
        get_article_title(&Document::parse(html))
    }

    #[test]
    fn test_json_ld_extraction() {
        let html = r#"
            <html>
                <head>
                    <script type="application/ld+json">
                    {
                        "@context": "https://schema.org",
                        "@type": "NewsArticle",
                        "headline": "Test Article",
                        "author": {"name": "John Doe"},
                        "description": "Test description",
                        "datePublished": "2024-01-02"
                    }
                    </script>
                </head>
            </html>
        "#;

        let metadata = get_json_ld(&Document::parse(html));
        assert_eq!(metadata.title.as_deref(), Some("Test Article"));
        assert_eq!(metadata.byline.as_deref(), Some("John Doe"));
        assert_eq!(metadata.excerpt.as_deref(), Some("Test description"));
        assert_eq!(metadata.published_time.as_deref(), Some("2024-01-02"));
    }

    #[test]
    fn test_json_ld_graph_and_publisher_name() {
        let html = r#"<script type="application/ld+json"><![CDATA[
            {"@context": {"@vocab": "http://schema.org/"}, "@graph": [
                {"@type": "WebSite", "name": "Ignored"},
                {"@type": "BlogPosting", "name": "Daily Planet", "headline": "Real Headline",
                 "publisher": {"name": "Daily Planet"},
                 "author": [{"name": "Lois Lane"}, {"name": "Clark Kent"}]}
            ]}
        ]]></script>"#;

        let metadata = get_json_ld(&Document::parse(html));
        assert_eq!(metadata.title.as_deref(), Some("Real Headline"));
        assert_eq!(metadata.site_name.as_deref(), Some("Daily Planet"));
        assert_eq!(metadata.byline.as_deref(), Some("Lois Lane, Clark Kent"));
    }

    #[test]
    fn test_json_ld_requires_schema_context() {
        let html = r#"<script type="application/ld+json">{"@context": "https://example.com", "@type": "Article", "headline": "Nope"}</script>"#;
        assert_eq!(get_json_ld(&Document::parse(html)), Metadata::default());
    }

    #[test]
    fn test_meta_tag_extraction() {
        let html = r#"
            <html lang="en-GB">
                <head>
                    <title>Fallback</title>
                    <meta property="og:title" content="OG Title" />
                    <meta name="author" content="Jane Smith" />
                    <meta property="og:description" content="OG Description" />
                    <meta name="description" content="Plain &amp; simple" />
                    <meta property="og:site_name" content="Example" />
                    <meta property="article:published_time" content="2020-05-01" />
                </head>
            </html>
        "#;

        let metadata = get_article_metadata(&Document::parse(html), Metadata::default());
        assert_eq!(metadata.title.as_deref(), Some("OG Title"));
        assert_eq!(metadata.byline.as_deref(), Some("Jane Smith"));
        assert_eq!(metadata.excerpt.as_deref(), Some("Plain & simple"));
        assert_eq!(metadata.site_name.as_deref(), Some("Example"));
        assert_eq!(metadata.published_time.as_deref(), Some("2020-05-01"));
        assert_eq!(metadata.lang.as_deref(), Some("en-GB"));
    }

    #[test]
    fn test_article_author_url_ignored() {
        let html = r#"<meta property="article:author" content="https://facebook.com/someone">"#;
        let metadata = get_article_metadata(&Document::parse(html), Metadata::default());
        assert_eq!(metadata.byline, None);
    }

    #[test]
    fn test_json_ld_wins_over_meta() {
        let json_ld = Metadata {
            title: Some("From JSON-LD".to_string()),
            ..Metadata::default()
        };
        let html = r#"<meta property="og:title" content="From OG">"#;
        let metadata = get_article_metadata(&Document::parse(html), json_ld);
        assert_eq!(metadata.title.as_deref(), Some("From JSON-LD"));
    }

    #[test]
    fn test_title_drops_site_name() {
        assert_eq!(
            title_of("<title>How the river changed the valley | Local News</title>"),
            "How the river changed the valley"
        );
    }

    #[test]
    fn test_title_drops_section_prefix_when_too_short() {
        assert_eq!(
            title_of("<title>News - How the river changed the valley forever</title>"),
            "How the river changed the valley forever"
        );
        assert_eq!(
            title_of("<title>Why disks fail in the dead of night &raquo; Tech</title>"),
            "Why disks fail in the dead of night"
        );
    }

    #[test]
    fn test_title_colon() {
        assert_eq!(
            title_of("<title>Site: How the river changed the valley</title>"),
            "How the river changed the valley"
        );
        assert_eq!(
            title_of(
                "<title>Site: How the river changed the valley</title><h1>Site: How the river changed the valley</h1>"
            ),
            "Site: How the river changed the valley"
        );
    }

    #[test]
    fn test_title_short_uses_single_h1() {
        assert_eq!(
            title_of("<title>Home</title><h1>A much better headline for this page</h1>"),
            "A much better headline for this page"
        );
        assert_eq!(title_of("<title>Home</title><h1>One</h1><h1>Two</h1>"), "Home");
    }
}
