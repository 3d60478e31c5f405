//! Permissive single-pass HTML parser.
//!
//! The parser builds a [`Document`] straight from the input string with a
//! recursive descent over elements. It does not implement the HTML5 tree
//! construction algorithm: malformed nesting truncates the affected subtree
//! and records a diagnostic in [`Document::parse_errors`], but parsing of the
//! surrounding content carries on.
//!
//! Known limitations:
//! - Tag names are namespace-stripped (`<svg:rect>` becomes `rect`); no
//!   foreign-content handling. Close tags still have to repeat the prefix:
//!   `</div>` does not close `<a0:div>`.
//! - Only `<script>` is raw text. `<style>`, `<textarea>` and friends are
//!   parsed as ordinary markup.
//! - Comments, doctypes and processing instructions are discarded.

use crate::dom::{is_void_element, Document, NodeId};
use std::collections::{HashMap, HashSet};

const LOG_TARGET: &str = "readabilityrs::parser";

/// Elements nested deeper than this are dropped with a diagnostic.
const MAX_NESTING_DEPTH: usize = 512;

enum Token {
    Node(NodeId),
    Comment,
}

/// Builder for a parsed [`Document`].
///
/// ```rust
/// use readabilityrs::HtmlParser;
///
/// let doc = HtmlParser::new("<html><head><base href='/a/'></head><body></body></html>")
///     .with_url("http://example.com/x/y")
///     .parse();
/// assert_eq!(doc.base_uri(), Some("http://example.com/a/"));
/// ```
pub struct HtmlParser<'a> {
    html: &'a str,
    pos: usize,
    doc: Document,
    depth: usize,
    /// Lower-cased copy of the input for close-tag lookahead; built on first
    /// use.
    lowered: Option<String>,
    /// Last offset of `</name` in the input, per lower-cased tag name.
    last_close_tag: HashMap<String, Option<usize>>,
    /// Input offsets (just past the start tag) of void elements whose
    /// delayed close tag turned out not to match.
    failed_delayed_close: HashSet<usize>,
    speculating: bool,
}

impl<'a> HtmlParser<'a> {
    pub fn new(html: &'a str) -> Self {
        Self {
            html,
            pos: 0,
            doc: Document::new(),
            depth: 0,
            lowered: None,
            last_close_tag: HashMap::new(),
            failed_delayed_close: HashSet::new(),
            speculating: false,
        }
    }

    /// Record the URI the markup was fetched from.
    pub fn with_url(mut self, url: &str) -> Self {
        self.doc.set_document_uri(url);
        self
    }

    pub fn parse(mut self) -> Document {
        let root = self.doc.root();
        loop {
            self.read_children(root);
            if self.at_end() {
                break;
            }
            // A closing tag with nothing open, or the remains of a subtree
            // that failed to parse: skip it.
            let skipped = self.skip_tag();
            self.error(format!("skipping unmatched markup {skipped}"));
        }

        if let Some(html) = self.doc.parsed_root_element() {
            let extra: Vec<NodeId> = self
                .doc
                .children(root)
                .iter()
                .copied()
                .filter(|&child| child != html)
                .collect();
            for child in extra {
                self.doc.remove(child);
            }
        }
        self.doc
    }

    fn rest(&self) -> &'a str {
        &self.html[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.html.len()
    }

    fn peek(&self) -> Option<u8> {
        self.html.as_bytes().get(self.pos).copied()
    }

    fn error(&mut self, message: String) {
        log::warn!(target: LOG_TARGET, "{message}");
        self.doc.push_parse_error(message);
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consume through the next `>` and return what was skipped.
    fn skip_tag(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest.find('>').map_or(rest.len(), |i| i + 1);
        self.pos += end;
        &rest[..end]
    }

    fn read_children(&mut self, parent: NodeId) {
        while let Some(token) = self.read_node() {
            if let Token::Node(child) = token {
                self.doc.push_child(parent, child);
            }
        }
    }

    /// Read one node. `None` means a closing tag (left unconsumed), end of
    /// input, or a subtree that failed to parse.
    fn read_node(&mut self) -> Option<Token> {
        let bytes = self.rest().as_bytes();
        if bytes.is_empty() {
            return None;
        }
        if !starts_markup(bytes) {
            return Some(Token::Node(self.read_text()));
        }
        match bytes[1] {
            b'!' | b'?' => {
                self.pos += 2;
                self.discard_comment();
                Some(Token::Comment)
            }
            b'/' => None,
            _ => self.read_element().map(Token::Node),
        }
    }

    /// Text up to the next `<` that begins markup.
    fn read_text(&mut self) -> NodeId {
        let html = self.html;
        let bytes = html.as_bytes();
        let start = self.pos;
        let mut end = start + 1;
        loop {
            match bytes[end.min(bytes.len())..].iter().position(|&b| b == b'<') {
                None => {
                    end = bytes.len();
                    break;
                }
                Some(offset) => {
                    let lt = end + offset;
                    if starts_markup(&bytes[lt..]) {
                        end = lt;
                        break;
                    }
                    end = lt + 1;
                }
            }
        }
        self.pos = end;
        self.doc.create_text_from_html(&html[start..end])
    }

    /// Skip a comment, doctype or processing instruction. The leading `<!`
    /// or `<?` has been consumed.
    fn discard_comment(&mut self) {
        if self.rest().starts_with("--") {
            match self.rest()[2..].find("-->") {
                Some(end) => self.pos += 2 + end + 3,
                None => {
                    self.pos = self.html.len();
                    self.error("unterminated comment".to_string());
                }
            }
            return;
        }

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'>' => return,
                b'"' | b'\'' => {
                    if !self.skip_past(b) {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    /// Move past the next `quote` byte. Returns false at end of input.
    fn skip_past(&mut self, quote: u8) -> bool {
        match self.rest().bytes().position(|b| b == quote) {
            Some(i) => {
                self.pos += i + 1;
                true
            }
            None => {
                self.pos = self.html.len();
                false
            }
        }
    }

    fn read_element(&mut self) -> Option<NodeId> {
        let html = self.html;
        self.pos += 1;
        let name_start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !b.is_ascii_whitespace() && b != b'/' && b != b'>')
        {
            self.pos += 1;
        }
        let raw_tag = &html[name_start..self.pos];
        let element = self.doc.create_element(raw_tag);
        let local_name = self.doc.local_name(element).to_string();

        let explicitly_closed = self.read_attributes(element, raw_tag)?;
        if explicitly_closed {
            self.doc.set_self_closing(element, true);
        } else if is_void_element(&local_name) {
            self.try_delayed_close(element, raw_tag);
        } else {
            if self.depth >= MAX_NESTING_DEPTH {
                self.error(format!("<{raw_tag}> nested deeper than {MAX_NESTING_DEPTH} levels"));
                return None;
            }
            self.depth += 1;
            if local_name == "script" {
                self.read_script(element);
            } else {
                self.read_children(element);
            }
            self.depth -= 1;

            if !self.eat_close_tag(raw_tag) {
                let found = if self.at_end() {
                    "end of input".to_string()
                } else {
                    self.rest().chars().take(raw_tag.len() + 3).collect()
                };
                self.error(format!("expected </{raw_tag}> but found {found}"));
                return None;
            }
        }

        self.doc.record_landmark(element);
        Some(element)
    }

    /// Read attributes up to the end of the start tag. Returns whether the
    /// tag ended with `/>`, or `None` when the input ran out first.
    fn read_attributes(&mut self, element: NodeId, raw_tag: &str) -> Option<bool> {
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                self.error(format!("unexpected end of input inside <{raw_tag}>"));
                return None;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                return Some(true);
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Some(false);
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let name_start = self.pos;
            while self.peek().is_some_and(|b| {
                !b.is_ascii_whitespace() && b != b'=' && b != b'>' && b != b'/'
            }) {
                self.pos += 1;
            }
            if self.pos == name_start {
                // A lone `=`; drop it.
                self.pos += 1;
                continue;
            }
            let name = self.html[name_start..self.pos].to_ascii_lowercase();

            self.skip_whitespace();
            let value = if self.peek() == Some(b'=') {
                self.pos += 1;
                self.skip_whitespace();
                match self.read_attribute_value() {
                    Some(value) => value,
                    None => {
                        self.error(format!("unterminated value for attribute {name} in <{raw_tag}>"));
                        return None;
                    }
                }
            } else {
                ""
            };
            self.doc.set_raw_attribute(element, &name, value.to_string());
        }
    }

    fn read_attribute_value(&mut self) -> Option<&'a str> {
        let html = self.html;
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let start = self.pos;
                let len = self.rest().bytes().position(|b| b == quote)?;
                self.pos += len + 1;
                Some(&html[start..start + len])
            }
            _ => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
                {
                    self.pos += 1;
                }
                Some(&html[start..self.pos])
            }
        }
    }

    /// A void element without `/>` may still be followed by children and a
    /// matching close tag (`<input><p>..</p></input>`). When such a close tag
    /// exists later in the input, read children speculatively and roll back
    /// if they are not closed by it.
    fn try_delayed_close(&mut self, element: NodeId, raw_tag: &str) {
        if self.speculating
            || self.failed_delayed_close.contains(&self.pos)
            || !self.close_tag_ahead(raw_tag)
        {
            return;
        }

        let checkpoint = self.doc.checkpoint();
        let start = self.pos;
        self.speculating = true;
        self.read_children(element);
        self.speculating = false;

        if !self.eat_close_tag(raw_tag) {
            self.doc.rollback(checkpoint, element);
            self.pos = start;
            self.failed_delayed_close.insert(start);
        }
    }

    fn close_tag_ahead(&mut self, raw_tag: &str) -> bool {
        let key = raw_tag.to_ascii_lowercase();
        if !self.last_close_tag.contains_key(&key) {
            let lowered = self
                .lowered
                .get_or_insert_with(|| self.html.to_ascii_lowercase());
            let last = lowered.rfind(&format!("</{key}"));
            self.last_close_tag.insert(key.clone(), last);
        }
        matches!(self.last_close_tag.get(&key), Some(Some(last)) if *last >= self.pos)
    }

    /// Consume `</name>` if it closes this element. The name is compared
    /// case-insensitively against the tag as written, prefix included, and
    /// whitespace is allowed before `>`.
    fn eat_close_tag(&mut self, raw_tag: &str) -> bool {
        let Some(after) = self.rest().strip_prefix("</") else {
            return false;
        };
        let name_len = after
            .bytes()
            .position(|b| b.is_ascii_whitespace() || b == b'>')
            .unwrap_or(after.len());
        let name = &after[..name_len];
        if !name.eq_ignore_ascii_case(raw_tag) {
            return false;
        }
        let tail = &after[name_len..];
        let trimmed = tail.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if !trimmed.starts_with('>') {
            return false;
        }
        self.pos += 2 + name_len + (tail.len() - trimmed.len()) + 1;
        true
    }

    /// Script bodies are raw text. Comments inside are dropped and the text
    /// around them is merged into one text node.
    fn read_script(&mut self, script: NodeId) {
        let html = self.html;
        let bytes = html.as_bytes();
        while !self.at_end() {
            if bytes[self.pos] == b'<' {
                match bytes.get(self.pos + 1) {
                    // CDATA sections stay part of the script text.
                    Some(b'!') if bytes[self.pos..].starts_with(b"<![CDATA[") => {}
                    Some(b'!') | Some(b'?') => {
                        self.pos += 2;
                        self.discard_comment();
                        continue;
                    }
                    Some(b'/') if is_script_close(&bytes[self.pos..]) => return,
                    _ => {}
                }
            }

            let start = self.pos;
            let end = bytes[start + 1..]
                .iter()
                .position(|&b| b == b'<')
                .map_or(bytes.len(), |i| start + 1 + i);
            self.pos = end;
            let text = &html[start..end];
            match self.doc.last_child(script) {
                Some(last) if self.doc.is_text(last) => self.doc.append_text_html(last, text),
                _ => {
                    let node = self.doc.create_text_from_html(text);
                    self.doc.push_child(script, node);
                }
            }
        }
    }
}

/// `bytes` starts with `<` followed by a tag name start, `!`, `?`, or a
/// closing tag.
fn starts_markup(bytes: &[u8]) -> bool {
    if bytes.first() != Some(&b'<') {
        return false;
    }
    match bytes.get(1) {
        Some(b) if b.is_ascii_alphabetic() => true,
        Some(b'!') | Some(b'?') => true,
        Some(b'/') => bytes.get(2).is_some_and(|b| b.is_ascii_alphabetic()),
        _ => false,
    }
}

fn is_script_close(bytes: &[u8]) -> bool {
    const CLOSE: &[u8] = b"</script";
    bytes.len() >= CLOSE.len()
        && bytes[..CLOSE.len()].eq_ignore_ascii_case(CLOSE)
        && bytes
            .get(CLOSE.len())
            .map_or(true, |&b| b == b'>' || b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeType;

    const BASE: &str = concat!(
        r##"<html><body><p>Some text and <a class="someclass" href="#">a link</a></p>"##,
        r#"<div id="foo">With a <script>With &lt; fancy " characters in it because"#,
        r#"</script> that is fun.<span>And another node to make it harder</span></div>"#,
        r#"<form><input type="text"/><input type="number"/>Here's a form</form></body></html>"#,
    );

    fn first(doc: &Document, tag: &str) -> NodeId {
        doc.get_elements_by_tag_name(doc.root(), tag)[0]
    }

    #[test]
    fn test_basic_structure() {
        let doc = Document::parse_with_url(BASE, "http://fakehost/");
        assert_eq!(doc.children(doc.root()).len(), 1);
        assert_eq!(doc.get_elements_by_tag_name(doc.root(), "*").len(), 10);

        let foo = doc.get_element_by_id("foo").unwrap();
        let body = doc.body().unwrap();
        assert_eq!(doc.parent(foo), Some(body));
        assert_eq!(doc.parent(body), doc.document_element());
        assert_eq!(doc.children(body).len(), 3);
        assert_eq!(
            doc.inner_html(first(&doc, "p")),
            r##"Some text and <a class="someclass" href="#">a link</a>"##
        );
        assert_eq!(doc.base_uri(), Some("http://fakehost/"));
        assert!(doc.parse_errors().is_empty());
    }

    #[test]
    fn test_script_keeps_encoded_text() {
        let doc = Document::parse(BASE);
        let script = first(&doc, "script");
        assert_eq!(doc.inner_html(script), r#"With &lt; fancy " characters in it because"#);
        assert_eq!(doc.text_content(script), r#"With < fancy " characters in it because"#);
    }

    #[test]
    fn test_script_drops_comments() {
        for html in [
            r#"<script><?Silly test <img src="test"></script>"#,
            r#"<script><!--Silly test > <script src="foo.js"></script>--></script>"#,
        ] {
            let doc = Document::parse(html);
            let script = doc.first_child(doc.root()).unwrap();
            assert_eq!(doc.tag_name(script), "SCRIPT");
            assert_eq!(doc.text_content(script), "");
            assert!(doc.children(script).is_empty());
        }
    }

    #[test]
    fn test_script_is_not_tree_parsed() {
        let cases = [
            (
                "<script>&lt;div>Hello, I'm not really in a &lt;/div></script>",
                "<div>Hello, I'm not really in a </div>",
            ),
            (
                r#"<script>&lt;script src="foo.js">&lt;/script></script>"#,
                r#"<script src="foo.js"></script>"#,
            ),
            (
                "<script>var x = '&lt;script>Hi&lt;' + '/script>';</script>",
                "var x = '<script>Hi<' + '/script>';",
            ),
            (
                "<script>var x = '<script>Hi<' + '/script>';</script>",
                "var x = '<script>Hi<' + '/script>';",
            ),
        ];
        for (html, text) in cases {
            let doc = Document::parse(html);
            let script = doc.first_child(doc.root()).unwrap();
            assert_eq!(doc.tag_name(script), "SCRIPT");
            assert_eq!(doc.text_content(script), text);
            assert!(doc.element_children(script).is_empty());
            assert_eq!(doc.children(script).len(), 1);
        }
    }

    #[test]
    fn test_script_text_around_comment_is_coalesced() {
        let doc = Document::parse("<script>a<!-- b -->c</script>");
        let script = first(&doc, "script");
        assert_eq!(doc.children(script).len(), 1);
        assert_eq!(doc.text_content(script), "ac");
    }

    #[test]
    fn test_script_keeps_cdata_sections() {
        let doc = Document::parse(
            r#"<script type="application/ld+json"><![CDATA[ {"a": "<b>"} ]]></script><p>after</p>"#,
        );
        let script = first(&doc, "script");
        assert_eq!(doc.children(script).len(), 1);
        assert_eq!(doc.text_content(script), r#"<![CDATA[ {"a": "<b>"} ]]>"#);
        assert_eq!(doc.text_content(first(&doc, "p")), "after");
    }

    #[test]
    fn test_tag_names_are_case_normalized() {
        let doc = Document::parse("<DIV><svG><clippath/></svG></DIV>");
        let div = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.tag_name(div), "DIV");
        assert_eq!(doc.local_name(div), "div");
        let svg = doc.first_child(div).unwrap();
        assert_eq!(doc.tag_name(svg), "SVG");
        let clip = doc.first_child(svg).unwrap();
        assert_eq!(doc.tag_name(clip), "CLIPPATH");
        assert_eq!(doc.local_name(clip), "clippath");
    }

    #[test]
    fn test_namespace_prefixes_are_stripped() {
        let doc = Document::parse(
            "<a0:html><a0:body><a0:DIV><a0:svG><a0:clippath/></a0:svG></a0:DIV></a0:body></a0:html>",
        );
        let div = first(&doc, "div");
        assert_eq!(doc.tag_name(div), "DIV");
        let svg = doc.first_child(div).unwrap();
        assert_eq!(doc.local_name(svg), "svg");
        assert_eq!(doc.local_name(doc.first_child(svg).unwrap()), "clippath");
        assert_eq!(doc.document_element(), doc.first_child(doc.root()));
        let html = doc.document_element().unwrap();
        assert_eq!(doc.body(), doc.first_child(html));
    }

    #[test]
    fn test_delayed_closing_of_void_element() {
        let doc = Document::parse("<div><input><p>I'm in an input</p></input></div>");
        let div = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.children(div).len(), 1);
        let input = doc.first_child(div).unwrap();
        assert_eq!(doc.local_name(input), "input");
        assert_eq!(doc.children(input).len(), 1);
        assert_eq!(doc.local_name(doc.first_child(input).unwrap()), "p");
    }

    #[test]
    fn test_failed_delayed_close_does_not_affect_later_elements() {
        let doc = Document::parse("<div><input><p>x</p></div><form><input></input></form>");
        assert!(doc.parse_errors().is_empty(), "{:?}", doc.parse_errors());

        let div = first(&doc, "div");
        let names: Vec<&str> = doc
            .children(div)
            .iter()
            .map(|&child| doc.local_name(child))
            .collect();
        assert_eq!(names, ["input", "p"]);
        assert!(doc.children(doc.children(div)[0]).is_empty());

        let form = first(&doc, "form");
        assert_eq!(doc.parent(form), Some(doc.root()));
        assert_eq!(doc.children(form).len(), 1);
        assert_eq!(doc.local_name(doc.children(form)[0]), "input");
    }

    #[test]
    fn test_close_tag_must_match_name_as_written() {
        let doc = Document::parse("<a0:div>x</div><p>y</p>");
        assert!(doc
            .parse_errors()
            .iter()
            .any(|e| e.contains("</div>")), "{:?}", doc.parse_errors());
        assert!(doc.get_elements_by_tag_name(doc.root(), "div").is_empty());
    }

    #[test]
    fn test_void_element_without_close_tag_stays_empty() {
        let doc = Document::parse("<p>a<br>b<br>c</p><div></br></div>");
        let p = first(&doc, "p");
        assert_eq!(doc.children(p).len(), 5);
        assert_eq!(doc.text_content(p), "abc");
        for br in doc.get_elements_by_tag_name(p, "br") {
            assert!(doc.children(br).is_empty());
        }
    }

    #[test]
    fn test_base_uri_resolution() {
        let cases = [
            ("relative/path", "http://fakehost/some/dir/relative/path"),
            ("/path", "http://fakehost/path"),
            ("http://absolute/", "http://absolute/"),
            ("//absolute/path", "http://absolute/path"),
        ];
        for (base, expected) in cases {
            let html = format!("<html><head><base href='{base}'></base></head><body/></html>");
            let doc = Document::parse_with_url(&html, "http://fakehost/some/dir/");
            assert_eq!(doc.base_uri(), Some(expected));
        }
    }

    #[test]
    fn test_entities_round_trip_through_text() {
        let html = "<p>Hello, everyone &amp; all their friends, &lt;this&gt; is a &quot; test with &apos; quotes.</p>";
        let doc = Document::parse(html);
        let p = first(&doc, "p");
        assert_eq!(doc.outer_html(p), html);
        assert_eq!(
            doc.text_content(p),
            "Hello, everyone & all their friends, <this> is a \" test with ' quotes."
        );

        let mut doc = doc;
        let text = doc.first_child(p).unwrap();
        let updated = format!("{} ", doc.text_content(text));
        doc.set_text_content(text, updated.trim());
        assert_eq!(
            doc.inner_html(p),
            "Hello, everyone &amp; all their friends, &lt;this&gt; is a \" test with ' quotes."
        );
    }

    #[test]
    fn test_numeric_references() {
        let doc = Document::parse("<p>&#32;&#x20;</p>");
        assert_eq!(doc.text_content(first(&doc, "p")), "  ");
    }

    #[test]
    fn test_attribute_forms() {
        let doc = Document::parse(
            r#"<input type=checkbox CHECKED value='a "b"' data-x = "1" data-x="2">"#,
        );
        let input = first(&doc, "input");
        assert_eq!(doc.get_attribute(input, "type"), Some("checkbox"));
        assert_eq!(doc.get_attribute(input, "checked"), Some(""));
        assert_eq!(doc.get_attribute(input, "value"), Some("a \"b\""));
        assert_eq!(doc.get_attribute(input, "data-x"), Some("2"));
        assert_eq!(doc.attributes(input).len(), 4);
    }

    #[test]
    fn test_first_title_wins() {
        let doc = Document::parse(
            "<html><head><title> Real title </title></head><body><svg><title>icon</title></svg></body></html>",
        );
        assert_eq!(doc.title(), "Real title");
        assert!(doc.head().is_some());
    }

    #[test]
    fn test_mismatched_close_tag_truncates_subtree() {
        let doc = Document::parse("<div><span>lost</div><p>kept</p>");
        let div = first(&doc, "div");
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.text_content(first(&doc, "p")), "kept");
        assert_eq!(doc.parse_errors().len(), 1);
    }

    #[test]
    fn test_unexpected_eof_is_logged() {
        let doc = Document::parse("<div><p>never closed");
        assert!(doc.children(doc.root()).is_empty());
        assert!(!doc.parse_errors().is_empty());
    }

    #[test]
    fn test_stray_close_tag_at_top_level_is_skipped() {
        let doc = Document::parse("</b><p>x</p>");
        assert_eq!(doc.get_elements_by_tag_name(doc.root(), "p").len(), 1);
        assert_eq!(doc.parse_errors().len(), 1);
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let doc = Document::parse("<p>1 < 2 and 3 <= 4</p>");
        let p = first(&doc, "p");
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "1 < 2 and 3 <= 4");
    }

    #[test]
    fn test_only_root_element_is_kept() {
        let doc = Document::parse("<!DOCTYPE html>\n<html><body>x</body></html>\n");
        let children = doc.children(doc.root());
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node_type(children[0]), NodeType::Element);
    }

    #[test]
    fn test_close_tag_allows_whitespace() {
        let doc = Document::parse("<div>a</div >");
        assert!(doc.parse_errors().is_empty());
        assert_eq!(doc.text_content(first(&doc, "div")), "a");
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let docs = [
            BASE,
            "<div><input><p>I'm in an input</p></input></div>",
            r#"<p title='say "hi"'>x<br>y<img src="a.png"/></p>"#,
        ];
        for html in docs {
            let first_pass = Document::parse(html);
            let serialized = first_pass.inner_html(first_pass.root());
            let second_pass = Document::parse(&serialized);
            assert_eq!(second_pass.inner_html(second_pass.root()), serialized);
        }
    }
}
