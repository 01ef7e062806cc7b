use url::Url;

/// Query parameter carrying the listing page number
pub const PAGE_PARAM: &str = "page";

/// Reads the page number carried by a URL's `page=` query parameter
///
/// Returns None when the parameter is absent or not a number.
pub fn page_number(url: &Url) -> Option<u32> {
    url.query_pairs()
        .find(|(key, _)| key == PAGE_PARAM)
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Builds `base` with its whole query string replaced by `page=<page>`
///
/// The fragment is dropped as well.
///
/// # Example
///
/// ```
/// use ideia_crawler::url::with_page;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/desafio/1885?page=1&ordem=recentes").unwrap();
/// assert_eq!(with_page(&base, 2).as_str(), "https://example.com/desafio/1885?page=2");
/// ```
pub fn with_page(base: &Url, page: u32) -> Url {
    let mut url = base.clone();
    url.set_fragment(None);
    url.set_query(Some(&format!("{}={}", PAGE_PARAM, page)));
    url
}
