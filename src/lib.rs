// src/lib.rs
// =============================================================================
// depthcrawl: a bounded-depth site crawler.
//
// Modules:
// - adapters: HTTP fetching and HTML link extraction behind small traits
// - crawl: the concurrent crawl engine and everything it records
// - report: text and JSON output of a finished crawl
//
// The binary in main.rs is a thin CLI over this library.
// =============================================================================

pub mod adapters;
pub mod crawl;
pub mod report;

pub use crawl::{CrawlConfig, CrawlEngine, CrawlError, CrawlReport};
