//! HTML link extraction
//!
//! This module scans a parsed document for the configured element/attribute
//! pairs (by default `<a href>` and `<img src>`) and resolves every value it
//! finds against the page URL.

use crate::config::{Config, ExtractTarget};
use crate::url::resolve_reference;
use scraper::{Html, Node};
use url::Url;

/// Extracts absolute links from HTML documents
///
/// # Extraction Rules
///
/// - Elements and attributes are matched by name, ASCII case-insensitively
/// - Attribute values are used as written (no case folding)
/// - Links are returned in document order; duplicates within a page are kept
/// - Values that cannot be resolved, or resolve to non-HTTP(S) URLs, are
///   dropped
/// - Malformed markup never fails; the parser recovers and whatever links it
///   can still see are returned
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    targets: Vec<ExtractTarget>,
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new(vec![
            ExtractTarget::new("a", "href"),
            ExtractTarget::new("img", "src"),
        ])
    }
}

impl LinkExtractor {
    pub fn new(targets: Vec<ExtractTarget>) -> Self {
        Self { targets }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.extract.clone())
    }

    pub fn targets(&self) -> &[ExtractTarget] {
        &self.targets
    }

    /// Extracts links from raw response bytes, decoding them lossily as UTF-8
    pub fn extract_from_bytes(&self, body: &[u8], base_url: &Url) -> Vec<Url> {
        self.extract(&String::from_utf8_lossy(body), base_url)
    }

    /// Extracts links from an HTML document
    ///
    /// # Example
    ///
    /// ```
    /// use gleaner::crawler::LinkExtractor;
    /// use url::Url;
    ///
    /// let html = r#"<a href="/page">Link</a><img src="logo.png">"#;
    /// let base_url = Url::parse("https://example.com/docs/").unwrap();
    /// let links = LinkExtractor::default().extract(html, &base_url);
    /// assert_eq!(links[0].as_str(), "https://example.com/page");
    /// assert_eq!(links[1].as_str(), "https://example.com/docs/logo.png");
    /// ```
    pub fn extract(&self, html: &str, base_url: &Url) -> Vec<Url> {
        let document = Html::parse_document(html);
        let mut links = Vec::new();

        // Pre-order walk without recursion, so nesting depth is irrelevant
        for node in document.tree.root().descendants() {
            let Node::Element(element) = node.value() else {
                continue;
            };

            for target in &self.targets {
                if !element.name().eq_ignore_ascii_case(&target.tag) {
                    continue;
                }

                for (name, value) in element.attrs() {
                    if name.eq_ignore_ascii_case(&target.attribute) {
                        if let Some(url) = resolve_reference(base_url, value) {
                            links.push(url);
                        }
                    }
                }
            }
        }

        links
    }
}

/// Convenience function extracting `<a href>` and `<img src>` links
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    LinkExtractor::default().extract(html, base_url)
}
