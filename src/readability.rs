//! Main Readability struct and parse implementation.
//!
//! [`Readability`] owns the parsed document and runs the whole pipeline:
//! metadata, document preparation, article extraction and post-processing.
//!
//! ```rust,no_run
//! use readabilityrs::Readability;
//!
//! let html = std::fs::read_to_string("article.html").unwrap();
//! let url = "https://example.com/article";
//!
//! let readability = Readability::new(&html, Some(url), None)?;
//!
//! if let Some(article) = readability.parse()? {
//!     println!("Title: {:?}", article.title);
//!     println!("Author: {:?}", article.byline);
//!     println!("Content length: {} chars", article.length);
//!
//!     if let Some(content) = article.content {
//!         std::fs::write("output.html", content)?;
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{
    article::Article,
    cleaner::{prep_document, remove_scripts},
    content_extractor::grab_article,
    dom::Document,
    error::{ReadabilityError, Result},
    metadata::{get_article_metadata, get_json_ld, Metadata},
    options::ReadabilityOptions,
    post_processor::post_process_content,
    utils::{char_len, is_url},
};

/// The main Readability parser.
///
/// Construct it from HTML with [`Readability::new`] or from an existing
/// tree with [`Readability::from_document`], then call
/// [`parse`](Readability::parse).
///
/// ```rust,no_run
/// use readabilityrs::{Readability, ReadabilityOptions};
///
/// let html = r#"
///     <html>
///     <head><title>Article Title</title></head>
///     <body>
///         <article>
///             <h1>Article Title</h1>
///             <p>First paragraph of content...</p>
///             <p>Second paragraph of content...</p>
///         </article>
///     </body>
///     </html>
/// "#;
///
/// let options = ReadabilityOptions::builder().char_threshold(20).build();
/// let readability = Readability::new(html, None, Some(options))?;
///
/// match readability.parse()? {
///     Some(article) => println!("Success! Extracted {} characters", article.length),
///     None => println!("Could not extract article content"),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Readability {
    document: Document,
    options: ReadabilityOptions,
}

impl Readability {
    /// Parse `html` and prepare it for extraction.
    ///
    /// `url` is the address the page was loaded from; relative links in the
    /// article are resolved against it (or against the page's `<base>`).
    /// It must be an absolute URL.
    pub fn new(html: &str, url: Option<&str>, options: Option<ReadabilityOptions>) -> Result<Self> {
        let document = match url {
            Some(url) if !is_url(url) => return Err(ReadabilityError::InvalidUrl(url.to_string())),
            Some(url) => Document::parse_with_url(html, url),
            None => Document::parse(html),
        };
        Ok(Self::from_document(document, options))
    }

    /// Run extraction on an already built document.
    pub fn from_document(document: Document, options: Option<ReadabilityOptions>) -> Self {
        Self {
            document,
            options: options.unwrap_or_default(),
        }
    }

    /// The document extraction will run on.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Extract the article.
    ///
    /// Returns `Ok(None)` when no candidate reaches the configured
    /// character threshold, and an error when the document exceeds
    /// `max_elems_to_parse` or a tree mutation is rejected.
    pub fn parse(mut self) -> Result<Option<Article>> {
        let options = &self.options;

        if options.max_elems_to_parse > 0 {
            let count = self
                .document
                .get_elements_by_tag_name(self.document.root(), "*")
                .len();
            if count > options.max_elems_to_parse {
                return Err(ReadabilityError::MaxElementsExceeded(count));
            }
        }

        let json_ld = if options.disable_json_ld {
            Metadata::default()
        } else {
            get_json_ld(&self.document)
        };

        remove_scripts(&mut self.document);
        prep_document(&mut self.document);

        let metadata = get_article_metadata(&self.document, json_ld);
        let title = metadata.title.clone().unwrap_or_default();
        debug_log!(options, "article title {title:?}");

        let Some(extracted) = grab_article(&self.document, &title, options)? else {
            debug_log!(options, "no article found");
            return Ok(None);
        };
        debug_log!(
            options,
            "article found with {} characters before post-processing",
            extracted.text_length
        );

        let mut document = extracted.document;
        let container = extracted.content;
        let raw_content = document.inner_html(container);

        post_process_content(&mut document, container, options);

        let excerpt = metadata.excerpt.or_else(|| {
            document
                .get_elements_by_tag_name(container, "p")
                .first()
                .map(|&p| document.text_content(p).trim().to_string())
        });

        let text_content = document.text_content(container);
        let content = match &options.serializer {
            Some(serializer) => serializer(&document, container),
            None => document.inner_html(container),
        };

        Ok(Some(Article {
            title: metadata.title,
            length: char_len(&text_content),
            content: Some(content),
            text_content: Some(text_content),
            excerpt,
            byline: metadata.byline.or(extracted.byline),
            dir: extracted.dir,
            site_name: metadata.site_name,
            lang: metadata.lang,
            published_time: metadata.published_time,
            raw_content: Some(raw_content),
        }))
    }
}
