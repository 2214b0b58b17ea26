// src/adapters/html.rs
// =============================================================================
// This module pulls link and image URLs out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (it never fails, broken markup is repaired)
// - Supports CSS selectors for finding elements
//
// We also use the `url` crate to resolve relative URLs against the page URL.
//
// What we collect:
// - <a href="...">  -> links (pages to crawl next)
// - <img src="..."> -> images (hashed for duplicate detection)
// =============================================================================

use super::{ExtractedLinks, LinkExtractor};
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::warn;
use url::Url;

// The scraper-backed LinkExtractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlExtractor {
    // Example:
    //   html = "<a href='/docs'>Docs</a><img src='logo.png'>"
    //   base_url = "https://example.com/"
    //   links  = {"https://example.com/docs"}
    //   images = {"https://example.com/logo.png"}
    fn extract(&self, html: &str, base_url: &str) -> ExtractedLinks {
        // If the base URL is invalid we can't resolve anything relative to it
        let base = match Url::parse(base_url) {
            Ok(url) => url,
            Err(_) => {
                warn!(base_url, "invalid base URL, skipping link extraction");
                return ExtractedLinks::default();
            }
        };

        let document = Html::parse_document(html);

        ExtractedLinks {
            links: collect_urls(&document, &base, "a[href]", "href"),
            images: collect_urls(&document, &base, "img[src]", "src"),
        }
    }
}

// Collects the resolved value of `attr` for every element matching `css`.
fn collect_urls(document: &Html, base: &Url, css: &str, attr: &str) -> HashSet<String> {
    // Selectors are constants known to be valid, so a parse failure is a
    // programmer error
    let selector = Selector::parse(css).expect("constant CSS selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .filter_map(|value| resolve_url(base, value))
        .filter(|url| is_crawlable(url))
        .collect()
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs"              -> Some("https://example.com/docs")
//   href = "https://other.com"  -> Some("https://other.com/")
//   href = "#top"               -> None (same page)
//   href = ""                   -> None
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    base.join(href).ok().map(|url| url.to_string())
}

// Only http(s) URLs can be fetched; mailto:, tel:, javascript:, data: and
// friends are dropped here.
fn is_crawlable(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
