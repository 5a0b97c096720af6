/// Normalizes a URL by stripping every leading and trailing `/`
///
/// This is the only normalization the pipeline applies. It is what makes
/// `http://a.com/` and `http://a.com` meet in the same reduce group.
///
/// # Examples
///
/// ```
/// use frontier_crawl::url::normalize_url;
///
/// assert_eq!(normalize_url("http://a.com/page/"), "http://a.com/page");
/// assert_eq!(normalize_url("//x//"), "x");
/// ```
pub fn normalize_url(url: &str) -> &str {
    url.trim_matches('/')
}
