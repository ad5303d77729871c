//! Page fetching
//!
//! The crawler only depends on the [`Fetcher`] trait; [`HttpFetcher`] is the
//! production implementation on top of `reqwest`. Tests drive the crawler
//! with in-memory fetchers instead.

use crate::config::CrawlerConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use url::Url;

/// A successfully retrieved resource
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the body was finally served from (after redirects)
    pub final_url: Url,

    /// Content-Type header value, empty when the server sent none
    pub content_type: String,

    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Returns true if the body should be scanned for links
    ///
    /// Servers that omit Content-Type get the benefit of the doubt.
    pub fn is_html(&self) -> bool {
        self.content_type.is_empty() || self.content_type.to_ascii_lowercase().contains("html")
    }
}

/// Retrieves the body of a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use gleaner::config::CrawlerConfig;
/// use gleaner::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP fetcher backed by a shared `reqwest` client
///
/// # Response Handling
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedPage)` |
/// | Other status | `FetchError::Status` |
/// | Timeout | `FetchError::Timeout` |
/// | Connection/TLS/redirect error | `FetchError::Http` |
/// | Body read failure | `FetchError::Body` |
///
/// Redirects are followed by the client. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.bytes().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(FetchedPage {
            final_url,
            content_type,
            body: body.to_vec(),
        })
    }
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content_type: &str) -> FetchedPage {
        FetchedPage {
            final_url: Url::parse("http://example.com/").unwrap(),
            content_type: content_type.to_string(),
            body: Vec::new(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&CrawlerConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_is_html() {
        assert!(page("text/html").is_html());
        assert!(page("text/html; charset=utf-8").is_html());
        assert!(page("application/xhtml+xml").is_html());
        assert!(page("TEXT/HTML").is_html());
        assert!(page("").is_html());
        assert!(!page("image/png").is_html());
        assert!(!page("application/json").is_html());
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        let fetcher = HttpFetcher::new(&CrawlerConfig::default()).unwrap();
        // Port 9 (discard) is closed on test machines
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        assert!(fetcher.fetch(&url).await.is_err());
    }
}
