//! URL handling module for Frontier-Crawl
//!
//! This module provides the small set of URL rules the pipeline depends on:
//! slash-stripping normalization, the `http` prefix test that separates
//! absolute links from relative ones, and RFC 3986 resolution of relative
//! links against the page they were found on.

mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

pub use normalize::normalize_url;

/// Prefix that marks a link as absolute and a final URL as valid
pub const ABSOLUTE_PREFIX: &str = "http";

/// Returns true if the link is treated as absolute
///
/// This is a plain prefix test on the raw href; `https:` and `http:` both
/// pass, and so does anything else spelled with a leading `http`.
pub fn is_absolute_link(link: &str) -> bool {
    link.starts_with(ABSOLUTE_PREFIX)
}

/// Minimal validation applied by the final filter
///
/// Does not check the scheme is well formed, that a host is present, or
/// that the URL can be fetched.
pub fn is_valid_url(url: &str) -> bool {
    url.starts_with(ABSOLUTE_PREFIX)
}

/// Resolves a relative link against the URL of the page it was found on
///
/// Uses standard RFC 3986 reference resolution, which handles dot segments,
/// query strings, fragments, and protocol-relative `//host/path` links.
///
/// # Examples
///
/// ```
/// use frontier_crawl::url::resolve_link;
///
/// let url = resolve_link("http://a.com/dir/page", "../x?q=1").unwrap();
/// assert_eq!(url, "http://a.com/x?q=1");
/// ```
pub fn resolve_link(base: &str, link: &str) -> UrlResult<String> {
    let base_url = Url::parse(base).map_err(|e| UrlError::InvalidBase {
        url: base.to_string(),
        message: e.to_string(),
    })?;

    base_url
        .join(link)
        .map(String::from)
        .map_err(|e| UrlError::Join {
            base: base.to_string(),
            link: link.to_string(),
            message: e.to_string(),
        })
}
