// src/main.rs
// =============================================================================
// This is the entry point of the depthcrawl CLI.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Reject an invalid seed URL before any crawl work starts
// 4. Run the crawl and write the two report files
// 5. Exit with a proper code (0 = done, 1 = broken links with
//    --fail-on-broken, 2 = invalid input or error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use depthcrawl::crawl::validate_seed;
use depthcrawl::{report, CrawlEngine};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `--json` output on stdout stays machine readable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    // An invalid seed ends the program before anything is fetched
    let seed = match validate_seed(&cli.url) {
        Ok(seed) => seed,
        Err(e) => {
            eprintln!("Invalid URL input: {}", e);
            return Ok(2);
        }
    };

    let config = cli.crawl_config();

    if !cli.json {
        println!("🔍 Crawling: {}", seed);
        println!("📊 Max crawl depth: {}", config.max_depth);
    }

    let engine = CrawlEngine::http(config)?;
    let report = engine.crawl(&seed).await?;

    report::write_reports(&report, &cli.output, &cli.duplicates_output)?;
    report::print_report(&report, cli.json)?;

    if !cli.json {
        println!(
            "\n✅ Done, check {} and {}",
            cli.output.display(),
            cli.duplicates_output.display()
        );
    }

    if cli.fail_on_broken && !report.broken_links.is_empty() {
        Ok(1)
    } else {
        Ok(0)
    }
}
