// src/fetcher/fixture.rs
// =============================================================================
// An in-memory Fetcher backed by a canned site map.
//
// Why a fixture instead of real HTTP?
// - Fetching is a pluggable capability, so the simplest useful
//   implementation is a map of pages we control completely
// - Runs become reproducible: the same graph gives the same result set
//   every time, which is exactly what we want for demos and tests
// - Tests can count how often each page was fetched and inject latency
//   to widen race windows
//
// A site map can come from three places:
// - FixtureFetcher::new() with a map built in code
// - FixtureFetcher::load() with a JSON file (the `run` subcommand)
// - FixtureFetcher::demo_site() with the built-in demo graph
//
// Rust concepts:
// - HashMap: O(1) page lookup by identifier
// - Interior mutability: fetch counters mutate behind a Mutex even
//   though fetch() takes &self
// - Builder-style methods: with_latency() consumes and returns self
// =============================================================================

use super::{FetchError, FetchResult, Fetcher, ResourceId};
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

// One page of a canned site: its content and outgoing links
//
// This is also the on-disk schema for site map files:
//   { "https://a/": { "content": "...", "references": ["https://b/"] } }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturePage {
    /// The body a fetch of this page returns
    pub content: String,
    /// Identifiers this page references
    ///
    /// #[serde(default)] lets leaf pages omit the field in JSON
    #[serde(default)]
    pub references: Vec<ResourceId>,
}

// A Fetcher that serves canned pages from memory
//
// Unknown identifiers come back as FetchError::NotFound, which is how a
// site map expresses dangling links.
#[derive(Debug)]
pub struct FixtureFetcher {
    /// The canned site, immutable for the fetcher's lifetime
    pages: HashMap<ResourceId, FixturePage>,
    /// Optional simulated network delay per fetch
    latency: Option<Duration>,
    /// How often each identifier has been fetched (known or not)
    counts: Mutex<HashMap<ResourceId, usize>>,
}

impl FixtureFetcher {
    // Creates a fetcher serving the given pages
    pub fn new(pages: HashMap<ResourceId, FixturePage>) -> Self {
        Self {
            pages,
            latency: None,
            counts: Mutex::new(HashMap::new()),
        }
    }

    // Parses a site map from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let pages: HashMap<ResourceId, FixturePage> =
            serde_json::from_str(text).context("Site map is not valid JSON")?;
        Ok(Self::new(pages))
    }

    // Loads a site map from a JSON file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site map '{}'", path.display()))?;
        Self::from_json(&text)
    }

    // Adds a simulated network delay to every fetch
    //
    // The demo feels more like a real crawl with a delay, and the stress
    // tests use it to keep many tasks in flight at the same time
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// How many times the given identifier has been fetched
    pub fn fetch_count(&self, id: &ResourceId) -> usize {
        self.counts.lock().get(id).copied().unwrap_or(0)
    }

    /// Total number of fetch calls served, successful or not
    pub fn total_fetches(&self) -> usize {
        self.counts.lock().values().sum()
    }

    // The built-in demo site: four pages about the Go website, with a
    // dangling link to /cmd/ so the demo also shows a failed fetch
    pub fn demo_site() -> Self {
        let mut pages = HashMap::new();
        pages.insert(
            ResourceId::from("https://golang.org/"),
            FixturePage {
                content: "The Go Programming Language".to_string(),
                references: vec![
                    ResourceId::from("https://golang.org/pkg/"),
                    ResourceId::from("https://golang.org/cmd/"),
                ],
            },
        );
        pages.insert(
            ResourceId::from("https://golang.org/pkg/"),
            FixturePage {
                content: "Packages".to_string(),
                references: vec![
                    ResourceId::from("https://golang.org/"),
                    ResourceId::from("https://golang.org/cmd/"),
                    ResourceId::from("https://golang.org/pkg/fmt/"),
                    ResourceId::from("https://golang.org/pkg/os/"),
                ],
            },
        );
        pages.insert(
            ResourceId::from("https://golang.org/pkg/fmt/"),
            FixturePage {
                content: "Package fmt".to_string(),
                references: vec![
                    ResourceId::from("https://golang.org/"),
                    ResourceId::from("https://golang.org/pkg/"),
                ],
            },
        );
        pages.insert(
            ResourceId::from("https://golang.org/pkg/os/"),
            FixturePage {
                content: "Package os".to_string(),
                references: vec![
                    ResourceId::from("https://golang.org/"),
                    ResourceId::from("https://golang.org/pkg/"),
                ],
            },
        );
        Self::new(pages)
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, id: &ResourceId) -> Result<FetchResult, FetchError> {
        // Record the call before anything else so tests see every attempt,
        // including fetches of unknown identifiers
        *self.counts.lock().entry(id.clone()).or_insert(0) += 1;

        // Simulated network delay (async sleep, so other tasks keep running)
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.pages.get(id) {
            Some(page) => Ok(FetchResult {
                content: page.content.clone(),
                references: page.references.clone(),
            }),
            None => Err(FetchError::NotFound(id.clone())),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is `counts` behind a Mutex when `pages` is not?
//    - pages is read-only after construction, and shared immutable reads
//      need no lock
//    - counts mutates on every fetch, and fetches run concurrently, so
//      the map needs exclusive access while it updates
//
// 2. Why count before sleeping?
//    - The counter answers "how many fetch calls were made", not "how
//      many completed". Counting first means a test can never observe a
//      fetch that slipped past the counter
//
// 3. What does entry().or_insert(0) do?
//    - entry() looks up a key and lets us insert a default if missing
//    - or_insert(0) returns a mutable reference to the value either way
//    - `*... += 1` then increments through that reference
// -----------------------------------------------------------------------------
