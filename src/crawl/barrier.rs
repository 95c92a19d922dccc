// src/crawl/barrier.rs
// =============================================================================
// The completion barrier: how the driver knows the whole crawl is done.
//
// The crawler spawns tasks that spawn more tasks, and nobody knows up front
// how many there will be. So we keep one shared counter of outstanding
// tasks: +1 when a task is registered, -1 when it finishes, and wait()
// resolves when the counter reaches zero.
//
// The dangerous part of any such counter is pairing: a task that
// increments but never decrements hangs wait() forever, and a double
// decrement releases the waiter while work is still running. We make the
// pairing structural instead of trusting every code path to remember it:
// register() hands back a WorkGuard, and the decrement lives in the
// guard's Drop impl. Whatever way a task exits (finished, skipped, or
// panicked), its guard drops exactly once.
//
// Rust concepts:
// - RAII / Drop: cleanup tied to scope exit instead of manual calls
// - tokio::sync::Notify: wakes waiting tasks without busy-polling
// =============================================================================

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

// State shared between the wait group and all of its guards
struct Shared {
    /// Number of registered-but-not-finished tasks
    pending: Mutex<usize>,
    /// Signalled whenever the count drops to zero
    all_done: Notify,
}

// A counted barrier over a dynamic set of tasks
//
// Clones share the same counter, so the crawler can hold one clone per
// spawned task family while the driver waits on another.
#[derive(Clone)]
pub struct WaitGroup {
    shared: Arc<Shared>,
}

// Keeps one task counted as outstanding until dropped
pub struct WorkGuard {
    shared: Arc<Shared>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                pending: Mutex::new(0),
                all_done: Notify::new(),
            }),
        }
    }

    // Counts one more outstanding task
    //
    // Call this BEFORE handing the work to the runtime. If the spawn
    // happened first, a fast wait() could observe zero in between and
    // return while the task is still about to run.
    pub fn register(&self) -> WorkGuard {
        *self.shared.pending.lock() += 1;
        WorkGuard {
            shared: Arc::clone(&self.shared),
        }
    }

    // Suspends until every registered task has finished
    //
    // Tasks registered while we wait are counted too. Returns immediately
    // when nothing is outstanding.
    pub async fn wait(&self) {
        loop {
            // Create the listener and enable it BEFORE checking the
            // counter. If the last guard drops between our check and our
            // await, the notification still lands on this listener
            // instead of getting lost.
            let notified = self.shared.all_done.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if *self.shared.pending.lock() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        let mut pending = self.shared.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            self.shared.all_done.notify_waiters();
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is RAII?
//    - "Resource Acquisition Is Initialization": tie a resource's release
//      to a value's destruction
//    - Here the "resource" is a slot in the counter. Rust guarantees Drop
//      runs when the guard goes out of scope, so the decrement cannot be
//      forgotten on an early return
//
// 2. Why the enable() dance in wait()?
//    - Notify does not queue notifications for listeners that do not
//      exist yet. enable() registers our listener first, then we check
//      the counter, then we sleep
//    - The loop re-checks the counter after every wakeup, so a stale
//      wakeup just goes around again
//
// 3. Why is the counter a Mutex<usize> and not an AtomicUsize?
//    - The decrement and the are-we-at-zero check must be one step;
//      with separate atomic ops another task could register in between
//      and we would notify while work is pending
// -----------------------------------------------------------------------------
