use url::Url;

/// Resolves an `href` found in a page to an absolute URL
///
/// Returns None if the link cannot be followed:
/// - empty or fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - hrefs that do not resolve against `base_url`
/// - non-HTTP(S) URLs after resolution
///
/// # Example
///
/// ```
/// use ideia_crawler::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/desafio/1885?page=1").unwrap();
/// let next = resolve_href("?page=2", &base).unwrap();
/// assert_eq!(next.as_str(), "https://example.com/desafio/1885?page=2");
/// ```
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url)
        }
        _ => None,
    }
}
