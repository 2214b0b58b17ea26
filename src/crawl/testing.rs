// src/crawl/testing.rs
// =============================================================================
// An in-memory "web" for crawler tests: fixed pages, fixed image bytes,
// optional slow URLs, and counters for how often each URL was fetched.
// =============================================================================

use crate::adapters::{FetchError, Fetcher};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct FakeWeb {
    pages: HashMap<String, String>,
    images: HashMap<String, Vec<u8>>,
    delays: HashMap<String, Duration>,
    default_delay: Option<Duration>,
    fetches: DashMap<String, usize>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeWeb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page whose body is a list of links and images.
    pub fn page(mut self, url: &str, links: &[&str], images: &[&str]) -> Self {
        let mut html = String::from("<html><body>");
        for link in links {
            html.push_str(&format!("<a href=\"{link}\">link</a>"));
        }
        for image in images {
            html.push_str(&format!("<img src=\"{image}\">"));
        }
        html.push_str("</body></html>");
        self.pages.insert(url.to_string(), html);
        self
    }

    pub fn image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), bytes.to_vec());
        self
    }

    /// Makes every fetch of `url` take `delay`.
    pub fn slow(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Makes every fetch take at least `delay`.
    pub fn latency(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// How many times `url` was requested (pages and images alike).
    pub fn fetches(&self, url: &str) -> usize {
        self.fetches.get(url).map(|count| *count).unwrap_or(0)
    }

    /// The highest fetch count of any single URL.
    pub fn max_fetches(&self) -> usize {
        self.fetches.iter().map(|count| *count.value()).max().unwrap_or(0)
    }

    /// The most requests that were ever running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn request(&self, url: &str) {
        *self.fetches.entry(url.to_string()).or_insert(0) += 1;

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(url).copied().or(self.default_delay) {
            tokio::time::sleep(delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Fetcher for FakeWeb {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.request(url).await;
        self.pages.get(url).cloned().ok_or(FetchError::Status(404))
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.request(url).await;
        self.images.get(url).cloned().ok_or(FetchError::Status(404))
    }
}
