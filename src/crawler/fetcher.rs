//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building one pooled HTTP client carrying the browser header set
//! - GET requests returning the response text, decoded per its declared charset
//! - Error classification (timeout, non-2xx status, network failure)
//!
//! The fetcher makes exactly one outbound call per invocation and never
//! retries; deciding what a failure means for the crawl is the caller's job.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Browser user agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_PT_BR: &str = "pt-BR,pt;q=0.9,en;q=0.8";

/// Why a fetch produced no document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: Url },

    #[error("{url} answered with HTTP {status}")]
    Status { url: Url, status: u16 },

    #[error("request to {url} failed: {source}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL that failed
    pub fn url(&self) -> &Url {
        match self {
            Self::Timeout { url } | Self::Status { url, .. } | Self::Network { url, .. } => url,
        }
    }

    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout { url: url.clone() }
        } else {
            Self::Network {
                url: url.clone(),
                source: error,
            }
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// HTTP status code
    pub status: u16,
    /// Response body, decompressed and decoded to UTF-8
    pub body: String,
}

/// Builds an HTTP client with the browser header set
///
/// `Accept-Encoding` is left to reqwest, which negotiates gzip and brotli
/// and decodes the body transparently.
///
/// # Arguments
///
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use ideia_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_PT_BR));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once
///
/// The body is decoded with the charset of the `Content-Type` header,
/// falling back to UTF-8 when none is declared.
///
/// # Returns
///
/// * `Ok(RawDocument)` - 2xx response with its body
/// * `Err(FetchError)` - Timeout, non-2xx status, or any other transport failure
pub async fn fetch_url(client: &Client, url: &Url) -> Result<RawDocument, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.clone(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    Ok(RawDocument {
        status: status.as_u16(),
        body,
    })
}

/// Owns the pooled client for the duration of a crawl
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher with its own client
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }

    /// Fetches a URL once, logging the outcome
    pub async fn fetch(&self, url: &Url) -> Result<RawDocument, FetchError> {
        tracing::debug!("GET {}", url);

        let result = fetch_url(&self.client, url).await;
        match &result {
            Ok(doc) => tracing::debug!("{} -> {} ({} bytes)", url, doc.status, doc.body.len()),
            Err(e) => tracing::debug!("{}", e),
        }
        result
    }
}
