use crate::UrlError;
use url::Url;

/// Parses a seed or detail-page URL and checks it can be fetched
///
/// # Rules
///
/// 1. Parse the URL; reject if malformed
/// 2. Only `http` and `https` schemes are accepted
/// 3. The URL must carry a host
/// 4. The fragment is dropped (it never reaches the server)
///
/// # Arguments
///
/// * `url_str` - The URL string to parse
///
/// # Returns
///
/// * `Ok(Url)` - Parsed URL
/// * `Err(UrlError)` - Failed to parse or validate the URL
///
/// # Examples
///
/// ```
/// use ideia_crawler::url::parse_http_url;
///
/// let url = parse_http_url("https://example.com/desafio/1885?page=1#topo").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/desafio/1885?page=1");
/// ```
pub fn parse_http_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url)
}
