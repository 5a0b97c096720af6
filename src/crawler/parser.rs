//! HTML parser for extracting anchor links
//!
//! Only `href` values of `<a>` elements are extracted, exactly as written in
//! the markup. Resolution, filtering, and de-duplication are left to the
//! caller; a page linking twice to the same target yields it twice.

use scraper::{Html, Selector};
use std::sync::OnceLock;

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("anchor selector is valid"))
}

/// A parsed HTML document
#[derive(Debug)]
pub struct ParsedPage {
    document: Html,
}

impl ParsedPage {
    /// Lazily yields every anchor `href` in document order
    ///
    /// # Example
    ///
    /// ```
    /// use frontier_crawl::crawler::parse_html;
    ///
    /// let page = parse_html(r#"<a href="/a">A</a><a href="/a">again</a>"#);
    /// assert_eq!(page.hrefs().collect::<Vec<_>>(), vec!["/a", "/a"]);
    /// ```
    pub fn hrefs(&self) -> impl Iterator<Item = &str> + '_ {
        self.document
            .select(anchor_selector())
            .filter_map(|element| element.value().attr("href"))
    }
}

/// Parses HTML content
///
/// The HTML5 parser recovers from malformed markup, so this never fails.
pub fn parse_html(html: &str) -> ParsedPage {
    ParsedPage {
        document: Html::parse_document(html),
    }
}

/// Convenience function for collecting every anchor `href` of a page
pub fn extract_hrefs(html: &str) -> Vec<String> {
    parse_html(html).hrefs().map(str::to_string).collect()
}
