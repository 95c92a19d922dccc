// src/crawl/fanout.rs
// =============================================================================
// The crawler core: recursive, concurrent, depth-bounded page discovery.
//
// How it works:
// 1. crawl() registers a task against the completion barrier, spawns it,
//    and returns right away
// 2. The task stops early if its depth budget is spent or the identifier
//    was already claimed by another task
// 3. Otherwise it fetches the resource and spawns one child task per
//    reference, each with one less depth
// 4. Every fetch (success or failure) becomes exactly one report on the
//    channel; failures never stop sibling or ancestor tasks
// 5. wait() returns once every task, including children spawned mid-run,
//    has finished
//
// There is deliberately no cap on how many tasks run at once: a page with
// fifty links spawns fifty tasks. The depth budget and the visited set are
// what keep the run finite. A production crawler would route this fan-out
// through a bounded worker pool instead.
//
// Rust concepts:
// - tokio::spawn: each discovered link becomes an independent task
// - Arc: tasks share the fetcher, visited set, and barrier by reference
//   counting
// - Channels: reports stream to the driver as they happen
// =============================================================================

use super::barrier::{WaitGroup, WorkGuard};
use super::report::{CrawlOutcome, CrawlReport};
use super::visited::VisitedSet;
use crate::fetcher::{Fetcher, ResourceId};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

// State shared by every task of one crawl run
struct Inner {
    fetcher: Arc<dyn Fetcher>,
    visited: VisitedSet,
    pending: WaitGroup,
    reports: UnboundedSender<CrawlReport>,
}

// One crawl run: seed it with crawl(), then wait() for it to settle
//
// Cloning is cheap (one Arc) and every clone drives the same run. The
// visited set and barrier live inside, so two Crawler values built with
// new() are fully independent runs that cannot interfere.
#[derive(Clone)]
pub struct Crawler {
    inner: Arc<Inner>,
}

impl Crawler {
    // Creates a run around the given fetcher
    //
    // Returns the crawler plus the receiving end of its report stream.
    // Reports arrive as tasks finish, in no particular order. The channel
    // closes once every clone of the crawler has been dropped.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> (Self, UnboundedReceiver<CrawlReport>) {
        let (reports, receiver) = mpsc::unbounded_channel();
        let crawler = Self {
            inner: Arc::new(Inner {
                fetcher,
                visited: VisitedSet::new(),
                pending: WaitGroup::new(),
                reports,
            }),
        };
        (crawler, receiver)
    }

    // Starts crawling `id` with the given depth budget
    //
    // Registers the task with the barrier BEFORE spawning, so a wait()
    // that begins right after this call can never slip past it. The call
    // itself never blocks; completion is wait()'s business.
    pub fn crawl(&self, id: ResourceId, depth: usize) {
        let guard = self.inner.pending.register();
        let crawler = self.clone();
        tokio::spawn(async move { crawler.visit(id, depth, guard).await });
    }

    // Suspends until every task of this run has finished
    pub async fn wait(&self) {
        self.inner.pending.wait().await;
    }

    // The body of one crawl task
    //
    // The guard keeps this task counted as outstanding; it drops on every
    // way out of this function, which is what keeps the barrier honest.
    async fn visit(self, id: ResourceId, depth: usize, _guard: WorkGuard) {
        // Depth budget spent: no fetch, no visited mark
        if depth == 0 {
            return;
        }

        // Lost the claim race (or the page was crawled long ago): skip.
        // Whoever got `false` first does the one and only fetch.
        if self.inner.visited.check_and_mark(&id) {
            return;
        }

        match self.inner.fetcher.fetch(&id).await {
            Ok(result) => {
                // Register the children before this task finishes so the
                // pending count never touches zero while work remains
                for reference in &result.references {
                    self.crawl(reference.clone(), depth - 1);
                }
                self.report(CrawlReport {
                    id,
                    outcome: CrawlOutcome::Fetched {
                        content: result.content,
                        references: result.references,
                    },
                });
            }
            Err(err) => {
                // A failed fetch is local: report it and let the rest of
                // the run carry on
                self.report(CrawlReport {
                    id,
                    outcome: CrawlOutcome::Failed {
                        reason: err.to_string(),
                    },
                });
            }
        }
    }

    fn report(&self, report: CrawlReport) {
        // A driver that dropped the receiver just stopped listening;
        // that must not bring the run down
        let _ = self.inner.reports.send(report);
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. How can an async fn spawn itself recursively?
//    - visit() never calls itself directly; it goes through crawl(),
//      which hands a fresh future to tokio::spawn
//    - The runtime boxes each spawned task, so the compiler never has to
//      build an infinitely nested future type
//
// 2. Why does visit() take self by value?
//    - Each task owns one clone of the Crawler (one Arc bump)
//    - When the task ends, its clone drops; after wait() the driver's
//      drop is the last one, which closes the report channel
//
// 3. Why check depth before the visited set?
//    - A task with no budget left should leave no trace: if it marked
//      the identifier, a later task arriving on a shorter path (with
//      budget to spare) would wrongly skip the fetch
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FixtureFetcher, FixturePage};
    use std::collections::{HashMap, HashSet};
    use std::time::Duration;
    use tokio::time::timeout;

    // Builds a fixture site from (id, [references]) pairs
    fn site(pages: &[(&str, &[&str])]) -> FixtureFetcher {
        let mut map = HashMap::new();
        for (id, refs) in pages {
            map.insert(
                ResourceId::from(*id),
                FixturePage {
                    content: format!("page {}", id),
                    references: refs.iter().map(|r| ResourceId::from(*r)).collect(),
                },
            );
        }
        FixtureFetcher::new(map)
    }

    // The shared-sink graph: two paths from A converge on D
    fn diamond() -> FixtureFetcher {
        site(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["D"]),
            ("D", &[]),
        ])
    }

    // Runs one complete crawl and returns every report
    async fn run_crawl(
        fetcher: Arc<FixtureFetcher>,
        start: &str,
        max_depth: usize,
    ) -> Vec<CrawlReport> {
        let (crawler, mut reports) = Crawler::new(fetcher);
        crawler.crawl(ResourceId::from(start), max_depth);

        timeout(Duration::from_secs(10), crawler.wait())
            .await
            .expect("crawl should settle");

        // All tasks are done; dropping the crawler closes the channel so
        // the drain loop below terminates
        drop(crawler);
        let mut collected = Vec::new();
        while let Some(report) = reports.recv().await {
            collected.push(report);
        }
        collected
    }

    fn reported_ids(reports: &[CrawlReport]) -> HashSet<ResourceId> {
        reports.iter().map(|r| r.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_crawls_every_reachable_page_exactly_once() {
        // A and B link to each other, so naive recursion would loop forever
        let fetcher = Arc::new(site(&[("A", &["B", "C"]), ("B", &["A", "C"]), ("C", &[])]));
        let reports = run_crawl(fetcher.clone(), "A", 4).await;

        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.is_ok()));
        let expected: HashSet<ResourceId> =
            ["A", "B", "C"].iter().map(|s| ResourceId::from(*s)).collect();
        assert_eq!(reported_ids(&reports), expected);

        // Each page was fetched exactly once despite the cycle
        assert_eq!(fetcher.total_fetches(), 3);
        for id in ["A", "B", "C"] {
            assert_eq!(fetcher.fetch_count(&ResourceId::from(id)), 1);
        }
    }

    #[tokio::test]
    async fn test_zero_depth_fetches_nothing() {
        let fetcher = Arc::new(diamond());
        let reports = run_crawl(fetcher.clone(), "A", 0).await;

        assert!(reports.is_empty());
        assert_eq!(fetcher.total_fetches(), 0);
    }

    #[tokio::test]
    async fn test_depth_budget_bounds_the_crawl() {
        // A chain four deep, but only budget for the first two hops
        let fetcher = Arc::new(site(&[
            ("A", &["B"]),
            ("B", &["C"]),
            ("C", &["D"]),
            ("D", &[]),
        ]));
        let reports = run_crawl(fetcher.clone(), "A", 2).await;

        let expected: HashSet<ResourceId> =
            ["A", "B"].iter().map(|s| ResourceId::from(*s)).collect();
        assert_eq!(reported_ids(&reports), expected);
        assert_eq!(fetcher.fetch_count(&ResourceId::from("C")), 0);
        assert_eq!(fetcher.fetch_count(&ResourceId::from("D")), 0);
    }

    #[tokio::test]
    async fn test_diamond_fetches_shared_page_once() {
        // D is reachable through both B and C; only one path may fetch it
        let fetcher = Arc::new(diamond());
        let reports = run_crawl(fetcher.clone(), "A", 4).await;

        assert_eq!(reports.len(), 4);
        assert_eq!(fetcher.fetch_count(&ResourceId::from("D")), 1);
        assert_eq!(fetcher.total_fetches(), 4);
    }

    #[tokio::test]
    async fn test_failed_fetch_does_not_stop_siblings() {
        // B does not exist in the site map; A and C must still succeed
        let fetcher = Arc::new(site(&[("A", &["B", "C"]), ("C", &[])]));
        let reports = run_crawl(fetcher.clone(), "A", 3).await;

        assert_eq!(reports.len(), 3);

        let by_id: HashMap<_, _> = reports.iter().map(|r| (r.id.clone(), r)).collect();
        assert!(by_id[&ResourceId::from("A")].is_ok());
        assert!(by_id[&ResourceId::from("C")].is_ok());

        let failed = by_id[&ResourceId::from("B")];
        assert!(!failed.is_ok());
        match &failed.outcome {
            CrawlOutcome::Failed { reason } => assert!(reason.contains("not found")),
            CrawlOutcome::Fetched { .. } => panic!("B should have failed"),
        }
    }

    #[tokio::test]
    async fn test_terminates_on_cyclic_graphs() {
        // A tight cycle with plenty of depth budget still settles, because
        // the visited set cuts every revisit off
        let fetcher = Arc::new(site(&[("A", &["B"]), ("B", &["A"])]));
        let reports = run_crawl(fetcher.clone(), "A", 50).await;

        assert_eq!(reports.len(), 2);
        assert_eq!(fetcher.total_fetches(), 2);
    }

    #[tokio::test]
    async fn test_reports_stream_while_the_run_is_live() {
        // Consume the first report before waiting on the barrier: results
        // are observable as they happen, not only after completion
        let fetcher = Arc::new(diamond().with_latency(Duration::from_millis(1)));
        let (crawler, mut reports) = Crawler::new(fetcher);
        crawler.crawl(ResourceId::from("A"), 4);

        let first = timeout(Duration::from_secs(5), reports.recv())
            .await
            .expect("a report should arrive while running")
            .expect("channel should still be open");
        assert!(first.is_ok());

        timeout(Duration::from_secs(5), crawler.wait())
            .await
            .expect("crawl should settle");
    }

    // Many repetitions on a multi-threaded runtime, with fixture latency
    // keeping sibling tasks in flight together, to give the B/C race at D
    // every chance to produce a duplicate fetch. One winner every time.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_dedup_holds_under_stress() {
        use futures::stream::{self, StreamExt};

        let runs: Vec<(usize, usize)> = stream::iter(0..200)
            .map(|_| async {
                let fetcher = Arc::new(diamond().with_latency(Duration::from_millis(1)));
                let reports = run_crawl(fetcher.clone(), "A", 4).await;
                (reports.len(), fetcher.fetch_count(&ResourceId::from("D")))
            })
            .buffer_unordered(16)
            .collect()
            .await;

        for (total_reports, d_fetches) in runs {
            assert_eq!(total_reports, 4);
            assert_eq!(d_fetches, 1);
        }
    }

    #[tokio::test]
    async fn test_independent_runs_do_not_share_dedup_state() {
        // Two runs over the same fixture must each fetch everything:
        // the visited set belongs to the run, not the process
        let fetcher = Arc::new(site(&[("A", &["B"]), ("B", &[])]));

        let first = run_crawl(fetcher.clone(), "A", 3).await;
        let second = run_crawl(fetcher.clone(), "A", 3).await;

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(fetcher.fetch_count(&ResourceId::from("A")), 2);
        assert_eq!(fetcher.fetch_count(&ResourceId::from("B")), 2);
    }
}
