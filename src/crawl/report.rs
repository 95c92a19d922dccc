// src/crawl/report.rs
// =============================================================================
// What a crawl run tells the outside world.
//
// Each fetched or failed resource produces exactly one report. Reports are
// emitted as tasks finish, so their order says nothing about the shape of
// the site; consumers should treat them as a set.
//
// The serde attributes mirror the JSON output of the CLI:
//   { "id": "https://a/", "outcome": "fetched", "content": "...", ... }
//   { "id": "https://b/", "outcome": "failed", "reason": "not found: ..." }
//
// Rust concepts:
// - Enums with data: the outcome carries different fields per variant
// - serde tagging/flattening: shape the JSON without hand-writing it
// =============================================================================

use crate::fetcher::ResourceId;
use serde::{Deserialize, Serialize};

// How one resource's crawl task ended
//
// #[serde(tag = "outcome")] puts the variant name inside the object
// instead of wrapping it, which keeps the JSON flat
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// The fetch succeeded; these are the content and discovered links
    Fetched {
        content: String,
        references: Vec<ResourceId>,
    },
    /// The fetch failed; the reason is the fetcher's error message
    Failed { reason: String },
}

// One resource's report: which identifier, and how it went
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    /// The identifier this report is about
    pub id: ResourceId,
    /// The outcome, flattened into the same JSON object
    #[serde(flatten)]
    pub outcome: CrawlOutcome,
}

impl CrawlReport {
    /// Helper to check whether the fetch succeeded
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, CrawlOutcome::Fetched { .. })
    }
}
