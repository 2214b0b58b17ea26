// src/crawl/engine.rs
// =============================================================================
// The crawl engine: a fixed pool of workers sharing one frontier.
//
// What each worker does with a claimed (url, depth):
// 1. Fetch the page. On failure record it as broken and move on.
// 2. Record url -> depth as discovered.
// 3. If depth < max_depth:
//    - queue every link at depth + 1 (the frontier drops ones already seen)
//    - fetch and hash every image not hashed before in this crawl, and
//      feed the digest to the duplicate tracker (failed images are skipped)
// 4. Drop the claim, which marks the URL done.
//
// The crawl ends when the frontier reports it is drained with nothing in
// flight, or when the optional deadline fires. Hitting the deadline aborts
// all workers; whatever they had not recorded yet is simply absent from the
// report.
// =============================================================================

use super::frontier::{Frontier, FrontierEntry};
use super::hasher::{ContentHasher, Sha256Hasher};
use super::images::{DuplicateImageTracker, Observation};
use super::results::{CrawlReport, ResultAccumulator};
use super::{validate_seed, CrawlConfig, CrawlError};
use crate::adapters::{Fetcher, HtmlExtractor, HttpFetcher, LinkExtractor};
use anyhow::Result;
use dashmap::DashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Runs crawls with injected fetch, extract and hash capabilities.
pub struct CrawlEngine {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    hasher: Arc<dyn ContentHasher>,
    config: CrawlConfig,
}

// State for one crawl invocation, shared by its workers.
#[derive(Default)]
struct CrawlState {
    frontier: Frontier,
    results: ResultAccumulator,
    images: DuplicateImageTracker,
    images_seen: DashSet<String>,
}

impl CrawlEngine {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
        hasher: Arc<dyn ContentHasher>,
        config: CrawlConfig,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            hasher,
            config,
        }
    }

    /// An engine that talks to the real web.
    pub fn http(config: CrawlConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.request_timeout, &config.user_agent)?;
        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(HtmlExtractor::new()),
            Arc::new(Sha256Hasher),
            config,
        ))
    }

    /// Crawls from `seed` and returns what was found.
    ///
    /// The only error is an invalid seed, reported before anything is fetched.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlReport, CrawlError> {
        let seed = validate_seed(seed)?;
        let workers = self.config.workers.max(1);

        info!(
            seed = %seed,
            max_depth = self.config.max_depth,
            workers,
            "starting crawl"
        );

        let state = Arc::new(CrawlState::default());
        state.frontier.enqueue(seed, 0);

        let mut pool = JoinSet::new();
        for id in 0..workers {
            let worker = Worker {
                id,
                state: Arc::clone(&state),
                fetcher: Arc::clone(&self.fetcher),
                extractor: Arc::clone(&self.extractor),
                hasher: Arc::clone(&self.hasher),
                max_depth: self.config.max_depth,
            };
            pool.spawn(worker.run());
        }

        let finished = match self.config.deadline {
            Some(limit) => {
                let outcome = tokio::time::timeout(limit, drain(&mut pool)).await;
                if outcome.is_err() {
                    warn!(
                        deadline_secs = limit.as_secs_f64(),
                        in_flight = state.frontier.in_flight_count(),
                        pending = state.frontier.pending_count(),
                        "crawl deadline reached, abandoning unfinished work"
                    );
                    pool.abort_all();
                    drain(&mut pool).await;
                }
                outcome.is_ok()
            }
            None => {
                drain(&mut pool).await;
                true
            }
        };

        // Workers can also all die (a panicking extractor, say) with work
        // still queued; that is not a complete crawl either
        let complete = finished && state.frontier.pending_count() == 0;

        let report = state
            .results
            .snapshot(&state.images, state.frontier.visited_count(), complete);

        info!(
            pages = report.pages.len(),
            broken = report.broken_links.len(),
            duplicate_images = report.duplicate_images.len(),
            complete,
            "crawl finished"
        );

        Ok(report)
    }
}

// Waits for every worker in the pool to exit.
async fn drain(pool: &mut JoinSet<()>) {
    while let Some(joined) = pool.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                warn!(error = %e, "crawl worker panicked");
            }
        }
    }
}

struct Worker {
    id: usize,
    state: Arc<CrawlState>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    hasher: Arc<dyn ContentHasher>,
    max_depth: usize,
}

impl Worker {
    async fn run(self) {
        while let Some(claim) = self.state.frontier.next().await {
            self.process(claim.entry()).await;
        }
        debug!(worker = self.id, "worker done");
    }

    async fn process(&self, entry: &FrontierEntry) {
        let FrontierEntry { url, depth } = entry;
        let depth = *depth;

        let html = match self.fetcher.fetch_page(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(worker = self.id, url = %url, error = %e, "broken link");
                self.state.results.record_broken(url, &e.to_string());
                return;
            }
        };

        self.state.results.record_page(url, depth);
        info!(worker = self.id, depth, url = %url, "crawled");

        // Pages at the depth limit are recorded but never expanded
        if depth >= self.max_depth {
            return;
        }

        let found = self.extractor.extract(&html, url);
        drop(html);

        // Queue children first so idle workers can start on them while this
        // one hashes images
        let mut queued = 0;
        for link in found.links {
            if self.state.frontier.enqueue(link, depth + 1) {
                queued += 1;
            }
        }
        debug!(worker = self.id, url = %url, queued, images = found.images.len(), "expanded");

        for image in &found.images {
            self.check_image(image).await;
        }
    }

    async fn check_image(&self, url: &str) {
        // Each image URL is hashed once per crawl, however many pages use it
        if !self.state.images_seen.insert(url.to_string()) {
            return;
        }

        let bytes = match self.fetcher.fetch_image(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(url, error = %e, "image fetch failed, skipping");
                self.state.results.record_image_failure();
                return;
            }
        };

        let digest = self.hasher.digest(&bytes);
        self.state.results.record_image_checked();

        if let Observation::Duplicate { original } = self.state.images.observe(url, digest) {
            info!(url, original = %original, digest = %digest, "duplicate image");
        }
    }
}
