// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   depthcrawl <URL> [DEPTH] [OPTIONS]
//
// DEPTH is kept as a raw string on purpose: a missing or non-numeric depth
// is not an error, it falls back to the default with a warning.
// =============================================================================

use clap::Parser;
use depthcrawl::crawl::{default_workers, CrawlConfig, DEFAULT_MAX_DEPTH};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    name = "depthcrawl",
    version,
    about = "Crawl a site to a fixed depth and report page depths, broken links and duplicate images",
    long_about = "depthcrawl starts at a seed URL, follows links breadth-first up to a depth limit, \
                  and writes two reports: every page found with its depth plus every broken link, \
                  and every image URL whose content duplicates an earlier image."
)]
pub struct Cli {
    /// Seed URL to start crawling from (e.g., https://example.com)
    pub url: String,

    /// Maximum crawl depth (default: 3)
    ///
    /// Depth 0 = just the seed page
    /// Depth 1 = the seed page + every page it links to
    /// etc.
    #[arg(allow_hyphen_values = true)]
    pub depth: Option<String>,

    /// Number of concurrent workers (default: available CPUs)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Timeout for each page or image request, in seconds
    #[arg(long, default_value_t = 25)]
    pub timeout_secs: u64,

    /// Stop the whole crawl after this many seconds and report what was found
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Where to write pages and broken links
    #[arg(long, default_value = "output.txt")]
    pub output: PathBuf,

    /// Where to write duplicate image URLs
    #[arg(long, default_value = "duplicate_images.txt")]
    pub duplicates_output: PathBuf,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Exit with code 1 if any broken link was found
    #[arg(long)]
    pub fail_on_broken: bool,
}

impl Cli {
    /// Builds the engine configuration from the parsed arguments.
    pub fn crawl_config(&self) -> CrawlConfig {
        let defaults = CrawlConfig::default();

        CrawlConfig {
            max_depth: resolve_depth(self.depth.as_deref()),
            workers: self.workers.filter(|n| *n > 0).unwrap_or_else(default_workers),
            request_timeout: Duration::from_secs(self.timeout_secs.max(1)),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            deadline: self.deadline_secs.map(Duration::from_secs),
        }
    }
}

// Turns the optional DEPTH argument into a depth, falling back to the default.
//
//   None      -> 3 (with a warning)
//   Some("5") -> 5
//   Some("x") -> 3 (with a warning)
pub fn resolve_depth(raw: Option<&str>) -> usize {
    match raw {
        Some(raw) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => {
            match raw.parse() {
                Ok(depth) => depth,
                Err(_) => {
                    warn!(depth = raw, "depth is out of range, default depth = {DEFAULT_MAX_DEPTH}");
                    DEFAULT_MAX_DEPTH
                }
            }
        }
        Some(raw) => {
            warn!(depth = raw, "depth is not a number, default depth = {DEFAULT_MAX_DEPTH}");
            DEFAULT_MAX_DEPTH
        }
        None => {
            warn!("no depth was chosen, default depth = {DEFAULT_MAX_DEPTH}");
            DEFAULT_MAX_DEPTH
        }
    }
}
