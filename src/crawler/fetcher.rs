//! HTTP fetcher implementation
//!
//! This module handles every page request made by the mapper, including:
//! - Building HTTP clients with a user agent and bounded timeouts
//! - GET requests to fetch page content
//! - Classifying failures into typed outcomes
//!
//! Nothing here retries. A failed fetch is reported as-is so that whoever
//! runs the mapper can apply its own retry policy.

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Request did not finish within the configured time bound
    Timeout,

    /// Network error (connection refused, DNS failure, TLS error, etc.)
    NetworkError {
        /// Error description
        error: String,
    },

    /// Response arrived but its body could not be read
    BodyError {
        /// Error description
        error: String,
    },
}

/// Failure half of a `FetchResult`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl FetchResult {
    /// Returns the page body, or the typed reason there is none
    pub fn into_body(self) -> Result<String, FetchError> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::HttpError { status_code } => Err(FetchError::Status(status_code)),
            Self::Timeout => Err(FetchError::Timeout),
            Self::NetworkError { error } => Err(FetchError::Transport(error)),
            Self::BodyError { error } => Err(FetchError::Body(error)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Source of page bodies for the mapper
///
/// The HTTP implementation is `HttpFetcher`; tests substitute in-memory
/// page graphs.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a single URL
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use frontier_crawl::config::FetcherConfig;
/// use frontier_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// # Outcome Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | Success with body |
/// | Any other status | HttpError |
/// | Client timeout | Timeout |
/// | Connect/DNS/TLS/other send failure | NetworkError |
/// | Body read failure | BodyError (Timeout if the read timed out) |
///
/// Redirects are followed by the client; `final_url` is where they ended.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => return FetchResult::Timeout,
        Err(e) => {
            return FetchResult::NetworkError {
                error: e.to_string(),
            }
        }
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) if e.is_timeout() => FetchResult::Timeout,
        Err(e) => FetchResult::BodyError {
            error: e.to_string(),
        },
    }
}

/// `PageFetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        tracing::debug!("GET {}", url);
        let result = fetch_url(&self.client, url).await;
        if !result.is_success() {
            tracing::warn!("Fetch of {} failed: {:?}", url, result);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetcherConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_fetcher_new() {
        let config = FetcherConfig {
            timeout_secs: 1,
            connect_timeout_secs: 1,
            user_agent: "TestCrawler/1.0".to_string(),
        };
        assert!(HttpFetcher::new(&config).is_ok());
    }

    #[test]
    fn test_into_body() {
        let ok = FetchResult::Success {
            final_url: "http://a.com/".to_string(),
            status_code: 200,
            body: "<html></html>".to_string(),
        };
        assert_eq!(ok.into_body().unwrap(), "<html></html>");

        assert_eq!(
            FetchResult::HttpError { status_code: 404 }.into_body(),
            Err(FetchError::Status(404))
        );
        assert_eq!(FetchResult::Timeout.into_body(), Err(FetchError::Timeout));
        assert_eq!(
            FetchResult::NetworkError {
                error: "refused".to_string()
            }
            .into_body(),
            Err(FetchError::Transport("refused".to_string()))
        );
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let config = FetcherConfig {
            timeout_secs: 2,
            connect_timeout_secs: 1,
            ..FetcherConfig::default()
        };
        let client = build_http_client(&config).unwrap();

        // Port 9 on localhost is the discard service and is closed in practice
        let result = fetch_url(&client, "http://127.0.0.1:9/").await;
        assert!(!result.is_success());
        assert!(result.into_body().is_err());
    }
}
