// src/adapters/mod.rs
// =============================================================================
// The crawler talks to the outside world through two small capabilities:
//
// - Fetcher: given a URL, returns the page text or the raw image bytes
// - LinkExtractor: given HTML and its URL, returns absolute links and images
//
// Submodules:
// - http: the reqwest-backed Fetcher used by the CLI
// - html: the scraper-backed LinkExtractor used by the CLI
//
// The crawl engine only ever sees the traits below, so tests can swap in a
// fixed in-memory "web" without touching the network.
// =============================================================================

mod html;
mod http;

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

pub use html::HtmlExtractor;
pub use http::HttpFetcher;

// Why a fetch failed.
//
// The crawl engine never looks at the variant: every failure marks the URL as
// broken. The variants only exist so log lines say something useful.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The URL could not be turned into a request
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// The request did not finish within the configured timeout
    #[error("request timed out")]
    Timeout,
    /// Could not connect (DNS failure, refused connection, TLS error, ...)
    #[error("connection failed: {0}")]
    Connect(String),
    /// The server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),
    /// The response body could not be read
    #[error("failed to read body: {0}")]
    Body(String),
    /// Anything else reqwest reports
    #[error("{0}")]
    Other(String),
}

// Retrieves content for the crawler.
//
// Implementations must be cheap to share between workers (`Send + Sync`);
// the engine holds one behind an `Arc` for the whole crawl.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page and returns its body as text.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Fetches an image and returns its raw bytes.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

// Absolute URLs found in one HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    pub links: HashSet<String>,
    pub images: HashSet<String>,
}

// Turns markup into absolute link and image URLs.
//
// Malformed HTML or attributes must degrade to "nothing found", never to an
// error: the engine has no failure path for extraction.
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, html: &str, base_url: &str) -> ExtractedLinks;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Status(404).to_string(), "HTTP 404");
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
        assert_eq!(
            FetchError::InvalidUrl("nope".to_string()).to_string(),
            "invalid URL: nope"
        );
    }
}
