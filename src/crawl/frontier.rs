// src/crawl/frontier.rs
// =============================================================================
// The frontier: URLs waiting to be crawled, plus every URL ever admitted.
//
// How it works:
// 1. enqueue() admits a URL only the first time it is seen. The visited check
//    and the insert are one DashSet::insert call, so two workers racing on
//    the same link can never both win.
// 2. next() hands out the oldest pending entry as a Claim. While a Claim is
//    alive the entry counts as "in flight".
// 3. Dropping the Claim marks the entry done.
// 4. The crawl is complete when nothing is pending AND nothing is in flight.
//    Only then does next() return None; before that, a worker with an empty
//    queue waits, because an in-flight page may still add children.
// =============================================================================

use dashmap::DashSet;
use std::collections::VecDeque;
use std::pin::pin;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

// A URL waiting in the frontier and the depth it was discovered at.
//
// The depth is fixed when the URL is first admitted and never revised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<FrontierEntry>,
    in_flight: usize,
    closed: bool,
}

/// Shared work queue for the crawl workers.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: DashSet<String>,
    state: Mutex<QueueState>,
    notify: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `url` at `depth` unless it was admitted before.
    ///
    /// Returns true if the URL was new and is now pending.
    pub fn enqueue(&self, url: impl Into<String>, depth: usize) -> bool {
        let url = url.into();
        if !self.visited.insert(url.clone()) {
            return false;
        }

        self.lock().pending.push_back(FrontierEntry { url, depth });
        self.notify.notify_one();
        true
    }

    /// Waits for the next entry to work on.
    ///
    /// Returns `None` once the queue is drained and no claims are
    /// outstanding; from then on every call returns `None` immediately.
    pub async fn next(&self) -> Option<Claim<'_>> {
        loop {
            // Register interest before looking at the queue, so a wakeup
            // sent between the check and the await is not lost
            let mut notified = pin!(self.notify.notified());
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return None;
                }
                if let Some(entry) = state.pending.pop_front() {
                    state.in_flight += 1;
                    return Some(Claim {
                        frontier: self,
                        entry,
                    });
                }
                if state.in_flight == 0 {
                    state.closed = true;
                    drop(state);
                    self.notify.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Number of distinct URLs ever admitted.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.lock().in_flight
    }

    fn finish(&self) {
        let mut state = self.lock();
        state.in_flight -= 1;
        let drained = state.in_flight == 0 && state.pending.is_empty();
        drop(state);

        if drained {
            self.notify.notify_waiters();
        }
    }

    // Nothing panics while holding the lock, but recover the guard anyway
    // rather than poisoning every other worker.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// An entry taken off the frontier. Dropping it marks the entry done.
#[derive(Debug)]
pub struct Claim<'a> {
    frontier: &'a Frontier,
    entry: FrontierEntry,
}

impl Claim<'_> {
    pub fn entry(&self) -> &FrontierEntry {
        &self.entry
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.frontier.finish();
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. What is DashSet?
//    - A HashSet split into shards, each behind its own lock
//    - insert() returns false if the value was already there, and the
//      check and the insert happen under the same shard lock
//
// 2. What is tokio::sync::Notify?
//    - A way for one task to wake another without sending data
//    - notify_one() wakes a single waiter (or leaves a permit for the next)
//    - notify_waiters() wakes everyone currently waiting
//    - enable() registers a waiter before it starts awaiting
//
// 3. Why is the queue behind a std Mutex and not a tokio one?
//    - The lock is never held across an .await, so the cheaper std lock is
//      enough
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_enqueue_admits_each_url_once() {
        let frontier = Frontier::new();
        assert!(frontier.enqueue("https://example.com/", 0));
        assert!(!frontier.enqueue("https://example.com/", 1));
        assert!(frontier.enqueue("https://example.com/other", 1));
        assert_eq!(frontier.visited_count(), 2);
        assert_eq!(frontier.pending_count(), 2);
    }

    #[tokio::test]
    async fn test_entries_come_out_fifo() {
        let frontier = Frontier::new();
        frontier.enqueue("a", 0);
        frontier.enqueue("b", 1);

        let first = frontier.next().await.unwrap();
        assert_eq!(first.entry(), &FrontierEntry { url: "a".into(), depth: 0 });
        let second = frontier.next().await.unwrap();
        assert_eq!(second.entry().url, "b");
        assert_eq!(frontier.in_flight_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_frontier_completes() {
        let frontier = Frontier::new();
        assert!(frontier.next().await.is_none());
        // A completed frontier stays completed
        assert!(frontier.next().await.is_none());
    }

    #[tokio::test]
    async fn test_visited_urls_stay_visited_after_dequeue() {
        let frontier = Frontier::new();
        frontier.enqueue("a", 0);
        let claim = frontier.next().await.unwrap();
        drop(claim);
        assert!(frontier.is_visited("a"));
        assert!(!frontier.enqueue("a", 3));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_waits_while_work_is_in_flight() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue("parent", 0);
        let parent = frontier.next().await.unwrap();

        // The queue is empty but "parent" is in flight, so this must wait
        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.next().await.map(|c| c.entry().clone()) })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        frontier.enqueue("child", 1);
        drop(parent);

        let got = waiter.await.unwrap();
        assert_eq!(got, Some(FrontierEntry { url: "child".into(), depth: 1 }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_last_claim_releases_all_waiters() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue("only", 0);
        let claim = frontier.next().await.unwrap();

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                tokio::spawn(async move { frontier.next().await.is_none() })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(claim);

        for waiter in waiters {
            assert!(waiter.await.unwrap());
        }
        assert_eq!(frontier.in_flight_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_enqueue_admits_once() {
        let frontier = Arc::new(Frontier::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                tokio::spawn(async move { frontier.enqueue("https://example.com/race", 1) })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(frontier.pending_count(), 1);
    }
}
