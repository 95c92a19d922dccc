// src/fetcher/mod.rs
// =============================================================================
// This module defines the fetch capability the crawler depends on.
//
// The crawler never does any networking itself. Instead it is handed a
// "Fetcher": anything that can resolve a resource identifier to its content
// plus the list of identifiers that content references. In production that
// would be an HTTP client and an HTML parser; here we ship an in-memory
// fixture (see fixture.rs) so runs are fast and reproducible.
//
// Contents:
// - ResourceId: opaque identifier for a crawlable resource
// - FetchResult: what a successful fetch produces
// - FetchError: the ways a fetch can fail
// - Fetcher: the trait the crawler consumes
//
// Rust concepts:
// - Traits: Define behavior without fixing the implementation
// - Trait objects: The crawler holds `Arc<dyn Fetcher>`, so any
//   implementation can be plugged in at runtime
// - async-trait: Async methods in traits need this crate (for now)
// - Newtypes: ResourceId wraps String to keep identifiers opaque
// =============================================================================

mod fixture;

// Re-export the fixture fetcher so callers write `fetcher::FixtureFetcher`
pub use fixture::{FixtureFetcher, FixturePage};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// An opaque identifier for a crawlable resource (usually a URL)
//
// The crawler only ever compares identifiers for equality and hashes them
// for deduplication. It never looks inside the string, so anything that
// names a resource uniquely works.
//
// #[serde(transparent)] makes it serialize as a plain JSON string, which
// keeps site map files readable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Borrow the identifier as a plain string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Display lets us print identifiers with {} in log lines and error messages
impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// What a successful fetch produces
//
// Consumed once by the task that requested it: the content goes into the
// task's report, the references drive the fan-out
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The body of the resource
    pub content: String,
    /// Identifiers referenced by the resource, in document order
    pub references: Vec<ResourceId>,
}

// The ways a fetch can fail
//
// A failed fetch is local to one crawl task: it gets reported and the rest
// of the run carries on. There is no retry at this level; a fetcher that
// wants retries does them internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The fetcher has no resource under this identifier
    #[error("not found: {0}")]
    NotFound(ResourceId),
}

// The capability the crawler consumes
//
// Implementations must be safe to call from many tasks at once, including
// for the same identifier: the crawler's dedup makes duplicate fetches
// for one identifier extremely unlikely, but the trait does not forbid them.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Resolve one identifier to its content and outgoing references
    async fn fetch(&self, id: &ResourceId) -> Result<FetchResult, FetchError>;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a newtype instead of plain String?
//    - `struct ResourceId(String)` is a "newtype": zero runtime cost,
//      but the compiler now stops us mixing identifiers with other strings
//    - It also gives us one place to hang trait impls (Display, From, ...)
//
// 2. What is a trait object (`dyn Fetcher`)?
//    - A value whose concrete type is only known at runtime
//    - The crawler stores `Arc<dyn Fetcher>` so tests can hand it a
//      fixture while a real deployment could hand it an HTTP client
//    - `Send + Sync` bounds are required because fetches run on many
//      tokio worker threads at once
//
// 3. Why the async-trait crate?
//    - Async functions in traits are not fully supported for trait
//      objects yet, so #[async_trait] rewrites them into functions
//      returning boxed futures
//
// 4. thiserror vs anyhow?
//    - thiserror: for library-style error enums that callers match on
//      (the crawler matches on FetchError)
//    - anyhow: for application code that just propagates errors upward
//      (main.rs uses it)
// -----------------------------------------------------------------------------
