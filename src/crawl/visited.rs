// src/crawl/visited.rs
// =============================================================================
// The shared set of already-discovered resources.
//
// Every crawl task asks this set one question before fetching: "has anyone
// claimed this identifier yet?" The answer and the claim must happen as a
// single atomic step. If checking and marking were two separate calls, two
// tasks could both see "not seen" in the gap and fetch the same page twice.
//
// Properties:
// - Append-only: once marked, an identifier stays marked for the whole run
// - One set per run: tests and concurrent runs never share state
//
// Rust concepts:
// - Mutex: one lock guards the whole check-then-mark sequence
// - HashSet: O(1) membership checks on hashable identifiers
// =============================================================================

use crate::fetcher::ResourceId;
use parking_lot::Mutex;
use std::collections::HashSet;

// Tracks which identifiers have been claimed by a crawl task
pub struct VisitedSet {
    seen: Mutex<HashSet<ResourceId>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
        }
    }

    // Atomically checks whether `id` was already claimed, claiming it if not
    //
    // Returns:
    //   false - the identifier was new; the caller now owns the fetch
    //   true  - someone already claimed it; the caller must skip it
    //
    // Holding the lock across the whole insert is what makes this safe: at
    // most one caller can ever get `false` for a given identifier.
    pub fn check_and_mark(&self, id: &ResourceId) -> bool {
        // HashSet::insert returns true when the value was NOT present,
        // so "already seen" is the negation
        !self.seen.lock().insert(id.clone())
    }
}

impl Default for VisitedSet {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why parking_lot::Mutex instead of std::sync::Mutex?
//    - Same idea, but lock() hands back the guard directly instead of a
//      Result, because parking_lot has no lock poisoning
//    - The guard releases the lock when it goes out of scope, which here
//      is the end of the check_and_mark expression
//
// 2. Why does the method take &self but still mutate?
//    - This is "interior mutability": the Mutex owns the mutable state,
//      so shared references are enough to use it
//    - That lets many tasks hold the same Arc<VisitedSet> at once
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_claim_wins() {
        let visited = VisitedSet::new();
        let id = ResourceId::from("https://example.com/");

        assert!(!visited.check_and_mark(&id), "first caller should claim it");
        assert!(visited.check_and_mark(&id), "second caller should be told to skip");
        assert!(visited.check_and_mark(&id), "the mark never goes away");
    }

    #[test]
    fn test_identifiers_are_independent() {
        let visited = VisitedSet::new();
        assert!(!visited.check_and_mark(&ResourceId::from("https://a/")));
        assert!(!visited.check_and_mark(&ResourceId::from("https://b/")));
        assert!(visited.check_and_mark(&ResourceId::from("https://a/")));
    }

    #[test]
    fn test_exactly_one_winner_under_contention() {
        // Race 16 threads at the same identifier; exactly one may win
        let visited = Arc::new(VisitedSet::new());
        let id = ResourceId::from("https://contested.example/");

        let mut handles = Vec::new();
        for _ in 0..16 {
            let visited = Arc::clone(&visited);
            let id = id.clone();
            handles.push(std::thread::spawn(move || !visited.check_and_mark(&id)));
        }

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
