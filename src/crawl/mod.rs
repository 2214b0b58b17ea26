// src/crawl/mod.rs
// =============================================================================
// This module is the crawler itself.
//
// Features:
// - Breadth-first crawling from a seed URL, bounded by a depth limit
// - A fixed pool of workers fetching pages in parallel
// - Every URL is fetched at most once per crawl
// - Broken link classification (any fetch failure)
// - Duplicate image detection by content hash
//
// Submodules:
// - frontier: the shared work queue plus the visited set
// - hasher: content digests for images
// - images: digest -> first URL index, and the duplicates it finds
// - results: discovered pages and broken links, and the final report
// - engine: the worker pool tying it all together
// =============================================================================

mod engine;
mod frontier;
mod hasher;
mod images;
mod results;

#[cfg(test)]
mod testing;

pub use engine::CrawlEngine;
pub use frontier::{Claim, Frontier, FrontierEntry};
pub use hasher::{ContentHasher, Digest, Sha256Hasher};
pub use images::{DuplicateImageTracker, Observation};
pub use results::{CrawlReport, CrawlStats, ResultAccumulator};

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Depth used when none (or garbage) is given on the command line.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

// Errors that stop a crawl before it starts.
//
// Fetch failures are NOT errors at this level: they are results (broken links).
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },
}

// Settings for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Pages at this depth are recorded but not expanded
    pub max_depth: usize,
    /// Number of concurrent workers (and so concurrent requests)
    pub workers: usize,
    /// Timeout for every single page or image request
    pub request_timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Optional limit on the whole crawl; unfinished work is abandoned
    pub deadline: Option<Duration>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            workers: default_workers(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("depthcrawl/", env!("CARGO_PKG_VERSION")).to_string(),
            deadline: None,
        }
    }
}

/// One worker per available CPU, falling back to a single worker.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

// Checks that the seed is an absolute http(s) URL with a host.
//
// Returns the parsed form as a string, so "http://example.com" becomes
// "http://example.com/" and matches links that point back at the root.
pub fn validate_seed(seed: &str) -> Result<String, CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidSeed {
        url: seed.to_string(),
        reason,
    };

    let url = Url::parse(seed.trim()).map_err(|e| invalid(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_seed_accepts_http_and_https() {
        assert_eq!(validate_seed("https://example.com/a").unwrap(), "https://example.com/a");
        assert_eq!(validate_seed("http://example.com").unwrap(), "http://example.com/");
    }

    #[test]
    fn test_validate_seed_rejects_garbage() {
        assert!(validate_seed("not a url").is_err());
        assert!(validate_seed("").is_err());
        assert!(validate_seed("/relative/path").is_err());
    }

    #[test]
    fn test_validate_seed_rejects_other_schemes() {
        let err = validate_seed("ftp://example.com/file").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
        assert!(validate_seed("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = CrawlConfig::default();
        assert_eq!(config.max_depth, 3);
        assert!(config.workers >= 1);
        assert!(config.deadline.is_none());
    }
}
