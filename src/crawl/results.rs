// src/crawl/results.rs
// =============================================================================
// Where the workers put what they find, and the report built from it.
//
// During the crawl every collection is a concurrent DashMap/DashSet, so
// workers never wait on each other to record a result. When the crawl ends
// the collections are copied into sorted containers, which makes the report
// files come out in the same order every run.
// =============================================================================

use super::images::DuplicateImageTracker;
use dashmap::{DashMap, DashSet};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Page and broken-link results written by the workers.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    pages: DashMap<String, usize>,
    broken: DashSet<String>,
    images_checked: AtomicUsize,
    image_failures: AtomicUsize,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successfully fetched page at the depth it was admitted with.
    pub fn record_page(&self, url: &str, depth: usize) {
        self.pages.insert(url.to_string(), depth);
    }

    /// Records a URL whose fetch failed. The reason only goes to the log.
    pub fn record_broken(&self, url: &str, reason: &str) {
        debug!(url, reason, "broken link");
        self.broken.insert(url.to_string());
    }

    /// Counts an image that was fetched and hashed.
    pub fn record_image_checked(&self) {
        self.images_checked.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an image that could not be fetched (it is otherwise ignored).
    pub fn record_image_failure(&self) {
        self.image_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current results into a report.
    pub fn snapshot(
        &self,
        images: &DuplicateImageTracker,
        urls_visited: usize,
        complete: bool,
    ) -> CrawlReport {
        CrawlReport {
            pages: self
                .pages
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
            broken_links: self.broken.iter().map(|url| url.key().clone()).collect(),
            duplicate_images: images.duplicates().into_iter().collect(),
            complete,
            stats: CrawlStats {
                urls_visited,
                images_checked: self.images_checked.load(Ordering::Relaxed),
                image_failures: self.image_failures.load(Ordering::Relaxed),
            },
        }
    }
}

/// Counters describing the work a crawl did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Distinct page URLs admitted to the frontier
    pub urls_visited: usize,
    /// Images fetched and hashed
    pub images_checked: usize,
    /// Images that failed to fetch (neither broken nor duplicate)
    pub image_failures: usize,
}

/// Everything one crawl found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// Page URL -> depth at which it was first admitted
    pub pages: BTreeMap<String, usize>,
    /// URLs whose fetch failed
    pub broken_links: BTreeSet<String>,
    /// Image URLs whose content matched an earlier image
    pub duplicate_images: BTreeSet<String>,
    /// False if the crawl was cut short by its deadline
    pub complete: bool,
    pub stats: CrawlStats,
}
