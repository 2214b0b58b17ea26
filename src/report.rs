// src/report.rs
// =============================================================================
// Turning a CrawlReport into something a person can read.
//
// Two text files are written after the crawl:
// - the primary report: every page with its depth, then every broken link
// - the duplicate image report: every image URL whose bytes matched an
//   earlier image
//
// The terminal gets either a short summary table or the whole report as JSON.
// =============================================================================

use crate::crawl::CrawlReport;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const PAGES_HEADER: &str = "============= Links and Depths =============";
const BROKEN_HEADER: &str = "============= Broken Links =================";
const DUPLICATES_HEADER: &str = "============= Duplicate Images =================";

// Renders the primary report.
//
// Example:
//   ============= Links and Depths =============
//   URL: https://example.com/ --- Depth [0]
//
//
//   ============= Broken Links =================
//   https://example.com/missing
pub fn render_pages(report: &CrawlReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail, so the fmt::Results are ignored
    let _ = writeln!(out, "{PAGES_HEADER}");
    for (url, depth) in &report.pages {
        let _ = writeln!(out, "URL: {url} --- Depth [{depth}]");
    }

    let _ = writeln!(out, "\n\n{BROKEN_HEADER}");
    for url in &report.broken_links {
        let _ = writeln!(out, "{url}");
    }

    out
}

// Renders the duplicate image report.
pub fn render_duplicates(report: &CrawlReport) -> String {
    let mut out = format!("\n{DUPLICATES_HEADER}\n");
    for url in &report.duplicate_images {
        out.push_str(url);
        out.push('\n');
    }
    out
}

// Writes both report files, replacing any previous contents.
pub fn write_reports(report: &CrawlReport, pages_path: &Path, duplicates_path: &Path) -> Result<()> {
    fs::write(pages_path, render_pages(report))
        .with_context(|| format!("failed to write {}", pages_path.display()))?;

    fs::write(duplicates_path, render_duplicates(report))
        .with_context(|| format!("failed to write {}", duplicates_path.display()))?;

    Ok(())
}

// Prints the results either as a summary or as JSON
pub fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_summary(report);
    }
    Ok(())
}

fn print_summary(report: &CrawlReport) {
    println!("📊 Summary:");
    println!("   📄 Pages discovered: {}", report.pages.len());
    println!("   ❌ Broken links: {}", report.broken_links.len());
    println!("   🖼️  Duplicate images: {}", report.duplicate_images.len());
    println!("   🔗 URLs visited: {}", report.stats.urls_visited);
    println!(
        "   🔍 Images checked: {} ({} unreachable)",
        report.stats.images_checked, report.stats.image_failures
    );

    if !report.complete {
        println!("   ⏱️  Deadline reached, the crawl is incomplete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CrawlReport {
        let mut report = CrawlReport {
            complete: true,
            ..CrawlReport::default()
        };
        report.pages.insert("http://x/B".to_string(), 1);
        report.pages.insert("http://x/A".to_string(), 0);
        report.broken_links.insert("http://x/C".to_string());
        report.duplicate_images.insert("http://x/b.png".to_string());
        report
    }

    #[test]
    fn test_render_pages_layout() {
        let expected = "\
============= Links and Depths =============
URL: http://x/A --- Depth [0]
URL: http://x/B --- Depth [1]


============= Broken Links =================
http://x/C
";
        assert_eq!(render_pages(&sample()), expected);
    }

    #[test]
    fn test_render_duplicates_layout() {
        let expected = "\n============= Duplicate Images =================\nhttp://x/b.png\n";
        assert_eq!(render_duplicates(&sample()), expected);
    }

    #[test]
    fn test_empty_report_still_has_headers() {
        let rendered = render_pages(&CrawlReport::default());
        assert!(rendered.starts_with(PAGES_HEADER));
        assert!(rendered.trim_end().ends_with(BROKEN_HEADER));
    }

    #[test]
    fn test_write_reports_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("output.txt");
        let duplicates = dir.path().join("duplicate_images.txt");

        write_reports(&sample(), &pages, &duplicates).unwrap();

        let written = fs::read_to_string(&pages).unwrap();
        assert!(written.contains("URL: http://x/A --- Depth [0]"));
        let written = fs::read_to_string(&duplicates).unwrap();
        assert!(written.contains("http://x/b.png"));
    }

    #[test]
    fn test_write_reports_reports_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("output.txt");

        let err = write_reports(&sample(), &missing, &dir.path().join("d.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to write"));
    }
}
