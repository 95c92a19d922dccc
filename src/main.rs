// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the fetcher (the canned site map the crawl will explore)
// 3. Seed the crawl and stream results to the terminal as they arrive
// 4. Wait for every crawl task to finish, then print a summary
// 5. Exit with proper code (0 = success, 1 = failed fetches, 2 = error)
//
// Rust concepts used:
// - async/await: The crawl runs many fetch tasks concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - the concurrent crawl engine
mod fetcher; // src/fetcher/ - the fetch capability and canned site maps

// Import items we need from our modules
use cli::{Cli, Commands};
use clap::Parser; // Parser trait enables the parse() method
use crawl::{CrawlOutcome, CrawlReport, Crawler};
use fetcher::{FixtureFetcher, ResourceId};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every fetch succeeded
//   Ok(1) = some fetches failed
//   Ok(2) = internal error
//   Err = unexpected error
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Match on which subcommand was used
    match cli.command {
        Commands::Demo { max_depth, json } => {
            // A little simulated latency makes the concurrent fan-out
            // visible: results arrive interleaved instead of instantly
            let fetcher = FixtureFetcher::demo_site().with_latency(Duration::from_millis(50));
            let start = ResourceId::from("https://golang.org/");
            handle_crawl(fetcher, start, max_depth, json).await
        }
        Commands::Run {
            sitemap,
            start,
            max_depth,
            json,
        } => {
            // Load the site map file; a bad path or bad JSON ends up as
            // exit code 2 via the Err branch in main()
            let fetcher = FixtureFetcher::load(Path::new(&sitemap))?;
            handle_crawl(fetcher, ResourceId::from(start), max_depth, json).await
        }
    }
}

// Runs one complete crawl and reports on it
// Parameters:
//   fetcher: the canned site map to crawl
//   start: identifier to start from
//   max_depth: how many link hops to follow (0 = do nothing)
//   json: whether to output JSON format
async fn handle_crawl(
    fetcher: FixtureFetcher,
    start: ResourceId,
    max_depth: usize,
    json: bool,
) -> Result<i32> {
    println!("🔍 Crawling from: {}", start);
    println!("📊 Max crawl depth: {}", max_depth);
    println!();

    // Keep our own handle on the fetcher so we can report how many
    // fetches the run actually performed
    let fetcher = Arc::new(fetcher);
    let (crawler, mut reports) = Crawler::new(fetcher.clone());

    // Print reports the moment they arrive (their order is whatever the
    // scheduler produced), and collect them for the final output
    let printer = tokio::spawn(async move {
        let mut collected = Vec::new();
        while let Some(report) = reports.recv().await {
            match &report.outcome {
                CrawlOutcome::Fetched {
                    content,
                    references,
                } => {
                    println!(
                        "  📄 found: {} {:?} ({} links)",
                        report.id,
                        content,
                        references.len()
                    );
                }
                CrawlOutcome::Failed { reason } => {
                    eprintln!("  ⚠️  {}", reason);
                }
            }
            collected.push(report);
        }
        collected
    });

    // Seed the crawl and wait for the whole run to settle
    crawler.crawl(start, max_depth);
    crawler.wait().await;

    // Every task is done; dropping the crawler closes the report channel
    // so the printer task finishes its loop and hands the results back
    drop(crawler);
    let results = printer.await?;

    println!();
    print_results(&results, json)?;

    // Keep JSON output clean; the fetch count joins the human summary
    if !json {
        println!("   📡 Fetches performed: {}", fetcher.total_fetches());
    }

    // Count how many fetches failed to pick the exit code
    let failed_count = results.iter().filter(|r| !r.is_ok()).count();
    if failed_count > 0 {
        Ok(1) // Exit code 1 = some fetches failed
    } else {
        Ok(0) // Exit code 0 = all good
    }
}

// Prints the results either as a table or JSON
fn print_results(results: &[CrawlReport], json: bool) -> Result<()> {
    if json {
        // Serialize results to JSON and print
        let json_output = serde_json::to_string_pretty(results)?;
        println!("{}", json_output);
    } else {
        // Print human-readable table
        print_table(results);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(results: &[CrawlReport]) {
    // Print table header
    println!("{:<50} {:<12} {:<40}", "RESOURCE", "OUTCOME", "DETAIL");
    println!("{}", "=".repeat(102));

    // Print each result
    for result in results {
        let (outcome, detail) = match &result.outcome {
            CrawlOutcome::Fetched {
                content,
                references,
            } => (
                "✅ FETCHED",
                format!("{:?} ({} links)", content, references.len()),
            ),
            CrawlOutcome::Failed { reason } => ("❌ FAILED", reason.clone()),
        };

        // Truncate the identifier if too long for display
        let id_display = if result.id.as_str().len() > 47 {
            format!("{}...", &result.id.as_str()[..47])
        } else {
            result.id.to_string()
        };

        println!("{:<50} {:<12} {:<40}", id_display, outcome, detail);
    }

    println!();

    // Print summary
    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    let failed_count = results.len() - ok_count;

    println!("📊 Summary:");
    println!("   ✅ Fetched: {}", ok_count);
    println!("   ❌ Failed: {}", failed_count);
    println!("   📋 Total: {}", results.len());
}
