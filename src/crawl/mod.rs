// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine.
//
// Submodules:
// - visited: the shared already-seen set (one atomic check-and-mark op)
// - barrier: the completion barrier the driver waits on
// - fanout: the Crawler itself, spawning one task per discovered link
// - report: the per-resource results a run emits
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
//
// Rust concepts:
// - Modules: Organize code into namespaces
// - pub use: Re-export items to simplify imports for users of this module
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod barrier;
mod fanout;
mod report;
mod visited;

// Re-export public items from submodules
// This lets users write `crawl::Crawler` instead of
// `crawl::fanout::Crawler`
pub use fanout::Crawler;
pub use report::{CrawlOutcome, CrawlReport};
