// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Parser, Subcommand};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "crawl-scout",
    version = "0.1.0",
    about = "A CLI tool that concurrently maps every page reachable from a starting resource",
    long_about = "crawl-scout fans out one concurrent task per discovered link, deduplicates \
                  pages so each is fetched at most once, and stops at a configurable depth. \
                  Pages come from a canned site map, so runs are fast and reproducible."
)]
pub struct Cli {
    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (demo, run)
//
// Each variant represents a different subcommand the user can run
// The fields inside each variant become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the built-in demo site
    ///
    /// Example: crawl-scout demo --max-depth 4
    Demo {
        /// Maximum crawl depth (how many link hops from the start)
        ///
        /// #[arg(long, default_value_t = 4)] creates --max-depth with a default
        #[arg(long, default_value_t = 4)]
        max_depth: usize,

        /// Output results in JSON format instead of a table
        ///
        /// This is an optional flag: --json
        #[arg(long)]
        json: bool,
    },

    /// Crawl a site map loaded from a JSON file
    ///
    /// Example: crawl-scout run site.json https://example.com/ --max-depth 2
    Run {
        /// Path to the JSON site map file
        ///
        /// This is a positional argument (required, no flag needed)
        sitemap: String,

        /// Identifier to start crawling from (must be a key in the site map
        /// for the crawl to find anything)
        start: String,

        /// Maximum crawl depth (how many link hops from the start)
        #[arg(long, default_value_t = 4)]
        max_depth: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why use structs and enums?
//    - Structs group related data (like the CLI arguments)
//    - Enums represent choices (like "demo OR run")
//
// 2. What are derive macros?
//    - #[derive(...)] automatically generates code for common operations
//    - Parser: generates CLI parsing logic
//    - Debug: generates code to print the struct for debugging
//
// 3. Why String instead of &str?
//    - String is owned (the struct owns the data)
//    - We use String here because the parsed arguments must outlive
//      the parsing call
//
// 4. What does the depth number mean?
//    - Depth 0 = fetch nothing at all
//    - Depth 1 = fetch just the starting page
//    - Depth 2 = the starting page plus everything it links to, etc.
// -----------------------------------------------------------------------------
