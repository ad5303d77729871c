//! Crawl frontier: deduplicating work queue and completion detector
//!
//! A single actor task owns every piece of frontier state:
//! - the visited set (URLs admitted at least once)
//! - the FIFO queue of admitted URLs not yet handed to a worker
//! - workers parked in [`Frontier::next`]
//! - the outstanding counter (admitted but not completed tasks)
//!
//! Workers talk to it through cloneable [`Frontier`] handles over a bounded
//! mailbox. Replies travel back over oneshot channels, so the actor never
//! waits on a worker and the mailbox always drains. A full mailbox makes
//! submitters wait, which bounds fan-out without risking deadlock. The URL
//! queue itself is not capped; its memory is bounded by the number of
//! distinct URLs, since each is queued at most once.
//!
//! # Termination
//!
//! When the outstanding counter drops to zero the frontier closes: parked and
//! future `next` calls return `None`. This is only correct if every worker
//! awaits `submit` for all links discovered on a page *before* calling
//! `complete` for that page. The worker pool in `coordinator` follows that
//! order.

use std::collections::{HashSet, VecDeque};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use url::Url;

/// Point-in-time view of the frontier state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierSnapshot {
    /// URLs admitted at least once
    pub visited: usize,

    /// Admitted tasks not yet completed
    pub outstanding: usize,

    /// Admitted URLs waiting for a worker
    pub queued: usize,

    /// Workers parked in `next`
    pub waiting: usize,

    /// Whether the frontier has drained
    pub closed: bool,
}

enum Command {
    Submit {
        url: Url,
        reply: oneshot::Sender<bool>,
    },
    Next {
        reply: oneshot::Sender<Option<Url>>,
    },
    Complete,
    Snapshot {
        reply: oneshot::Sender<FrontierSnapshot>,
    },
}

/// Handle to the frontier actor
///
/// Cloning is cheap. The actor stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct Frontier {
    commands: mpsc::Sender<Command>,
}

impl Frontier {
    /// Spawns the frontier actor on the current tokio runtime
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of commands that may be pending before callers
    ///   wait (clamped to at least 1)
    pub fn new(capacity: usize) -> Self {
        let (commands, mailbox) = mpsc::channel(capacity.max(1));
        tokio::spawn(FrontierState::default().run(mailbox));
        Self { commands }
    }

    /// Admits a URL unless it has been admitted before
    ///
    /// Returns `true` if the URL became a new task. Returns `false` for a
    /// duplicate, for a submission after the frontier closed, or if the actor
    /// is gone; in all of those cases nothing is counted or queued.
    pub async fn submit(&self, url: Url) -> bool {
        let (reply, response) = oneshot::channel();
        if self
            .commands
            .send(Command::Submit { url, reply })
            .await
            .is_err()
        {
            tracing::warn!("Frontier is gone, dropping submitted URL");
            return false;
        }
        response.await.unwrap_or(false)
    }

    /// Waits for the next URL to process
    ///
    /// Returns `None` once the frontier has drained, which tells the caller
    /// to stop.
    pub async fn next(&self) -> Option<Url> {
        let (reply, response) = oneshot::channel();
        if self.commands.send(Command::Next { reply }).await.is_err() {
            return None;
        }
        response.await.ok().flatten()
    }

    /// Marks one task as finished, successful or not
    ///
    /// Must be called exactly once per URL obtained from [`Frontier::next`],
    /// after every link discovered on it has been submitted.
    pub async fn complete(&self) {
        if self.commands.send(Command::Complete).await.is_err() {
            tracing::warn!("Frontier is gone, completion not recorded");
        }
    }

    /// Returns a guard that completes the current task when dropped
    ///
    /// Call [`CompletionGuard::complete`] on the normal path. If the task
    /// unwinds or is cancelled first, the drop handler still records the
    /// completion so the crawl can drain.
    pub fn completion_guard(&self) -> CompletionGuard {
        CompletionGuard {
            commands: Some(self.commands.clone()),
        }
    }

    /// Reports the current frontier state
    pub async fn snapshot(&self) -> FrontierSnapshot {
        let (reply, response) = oneshot::channel();
        if self.commands.send(Command::Snapshot { reply }).await.is_err() {
            return FrontierSnapshot {
                closed: true,
                ..FrontierSnapshot::default()
            };
        }
        response.await.unwrap_or_default()
    }
}

/// Completes a task exactly once, even if processing never reaches the end
pub struct CompletionGuard {
    commands: Option<mpsc::Sender<Command>>,
}

impl CompletionGuard {
    /// Records the completion on the normal path, waiting for mailbox space
    pub async fn complete(mut self) {
        if let Some(commands) = self.commands.take() {
            if commands.send(Command::Complete).await.is_err() {
                tracing::warn!("Frontier is gone, completion not recorded");
            }
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let Some(commands) = self.commands.take() else {
            return;
        };

        tracing::warn!("Task abandoned before completion, completing it now");
        match commands.try_send(Command::Complete) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(command)) => {
                if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                    runtime.spawn(async move {
                        let _ = commands.send(command).await;
                    });
                }
            }
        }
    }
}

/// State owned exclusively by the actor task
#[derive(Default)]
struct FrontierState {
    visited: HashSet<String>,
    queue: VecDeque<Url>,
    waiting: VecDeque<oneshot::Sender<Option<Url>>>,
    outstanding: usize,
    closed: bool,
}

impl FrontierState {
    async fn run(mut self, mut mailbox: mpsc::Receiver<Command>) {
        while let Some(command) = mailbox.recv().await {
            match command {
                Command::Submit { url, reply } => {
                    let admitted = self.submit(url);
                    let _ = reply.send(admitted);
                }
                Command::Next { reply } => self.next(reply),
                Command::Complete => self.complete(),
                Command::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
            }
        }

        tracing::trace!(
            visited = self.visited.len(),
            "Frontier actor stopped, all handles dropped"
        );
    }

    fn submit(&mut self, url: Url) -> bool {
        if self.closed {
            tracing::warn!("Rejecting {} submitted after the frontier drained", url);
            return false;
        }

        if !self.visited.insert(url.as_str().to_owned()) {
            return false;
        }

        self.outstanding += 1;
        self.dispatch(url);
        true
    }

    /// Hands a URL to the longest-waiting live worker, or queues it
    fn dispatch(&mut self, mut url: Url) {
        while let Some(waiter) = self.waiting.pop_front() {
            match waiter.send(Some(url)) {
                Ok(()) => return,
                // The worker stopped waiting; try the next one
                Err(Some(returned)) => url = returned,
                Err(None) => return,
            }
        }
        self.queue.push_back(url);
    }

    fn next(&mut self, reply: oneshot::Sender<Option<Url>>) {
        if let Some(url) = self.queue.pop_front() {
            if let Err(Some(url)) = reply.send(Some(url)) {
                self.queue.push_front(url);
            }
            return;
        }

        if self.outstanding == 0 {
            self.close();
            let _ = reply.send(None);
            return;
        }

        self.waiting.push_back(reply);
    }

    fn complete(&mut self) {
        if self.outstanding == 0 {
            tracing::error!("Completion received with no outstanding tasks, ignoring");
            return;
        }

        self.outstanding -= 1;
        if self.outstanding == 0 {
            self.close();
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }

        self.closed = true;
        tracing::debug!(
            visited = self.visited.len(),
            released = self.waiting.len(),
            "Frontier drained"
        );
        for waiter in self.waiting.drain(..) {
            let _ = waiter.send(None);
        }
    }

    fn snapshot(&self) -> FrontierSnapshot {
        FrontierSnapshot {
            visited: self.visited.len(),
            outstanding: self.outstanding,
            queued: self.queue.len(),
            waiting: self.waiting.len(),
            closed: self.closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::task::JoinSet;
    use tokio::time::timeout;

    fn url(path: &str) -> Url {
        Url::parse("http://example.com/")
            .unwrap()
            .join(path)
            .unwrap()
    }

    async fn next_within(frontier: &Frontier) -> Option<Url> {
        timeout(Duration::from_secs(5), frontier.next())
            .await
            .expect("next() did not return in time")
    }

    #[tokio::test]
    async fn test_submit_deduplicates() {
        let frontier = Frontier::new(8);

        assert!(frontier.submit(url("/a")).await);
        assert!(!frontier.submit(url("/a")).await);

        let snapshot = frontier.snapshot().await;
        assert_eq!(snapshot.visited, 1);
        assert_eq!(snapshot.outstanding, 1);
        assert_eq!(snapshot.queued, 1);
        assert!(!snapshot.closed);
    }

    #[tokio::test]
    async fn test_fragment_and_query_are_distinct() {
        let frontier = Frontier::new(8);

        assert!(frontier.submit(url("/a")).await);
        assert!(frontier.submit(url("/a?x=1")).await);
        assert!(frontier.submit(url("/a#top")).await);
        assert_eq!(frontier.snapshot().await.visited, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submit_admits_once() {
        let frontier = Frontier::new(4);
        let mut submitters = JoinSet::new();

        for _ in 0..64 {
            let frontier = frontier.clone();
            submitters.spawn(async move { frontier.submit(url("/shared")).await });
        }

        let mut admitted = 0;
        while let Some(result) = submitters.join_next().await {
            if result.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 1);
        let snapshot = frontier.snapshot().await;
        assert_eq!(snapshot.outstanding, 1);
        assert_eq!(snapshot.queued, 1);
    }

    #[tokio::test]
    async fn test_next_is_fifo() {
        let frontier = Frontier::new(8);
        for path in ["/1", "/2", "/3"] {
            frontier.submit(url(path)).await;
        }

        assert_eq!(next_within(&frontier).await, Some(url("/1")));
        assert_eq!(next_within(&frontier).await, Some(url("/2")));
        assert_eq!(next_within(&frontier).await, Some(url("/3")));
    }

    #[tokio::test]
    async fn test_next_on_unseeded_frontier_drains() {
        let frontier = Frontier::new(8);
        assert_eq!(next_within(&frontier).await, None);
        assert!(frontier.snapshot().await.closed);
    }

    #[tokio::test]
    async fn test_completing_last_task_closes() {
        let frontier = Frontier::new(8);
        frontier.submit(url("/only")).await;

        assert_eq!(next_within(&frontier).await, Some(url("/only")));
        frontier.complete().await;

        assert_eq!(next_within(&frontier).await, None);
        let snapshot = frontier.snapshot().await;
        assert!(snapshot.closed);
        assert_eq!(snapshot.outstanding, 0);

        // Late submissions are refused rather than reopening the frontier
        assert!(!frontier.submit(url("/late")).await);
        assert_eq!(frontier.snapshot().await.visited, 1);
    }

    #[tokio::test]
    async fn test_parked_worker_receives_later_submission() {
        let frontier = Frontier::new(8);
        frontier.submit(url("/seed")).await;
        assert_eq!(next_within(&frontier).await, Some(url("/seed")));

        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move { frontier.next().await })
        };

        // Let the waiter park before submitting
        while frontier.snapshot().await.waiting == 0 {
            tokio::task::yield_now().await;
        }

        frontier.submit(url("/child")).await;
        let received = timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap();
        assert_eq!(received, Some(url("/child")));
    }

    #[tokio::test]
    async fn test_parked_workers_released_on_drain() {
        let frontier = Frontier::new(8);
        frontier.submit(url("/seed")).await;
        assert!(next_within(&frontier).await.is_some());

        let mut waiters = JoinSet::new();
        for _ in 0..3 {
            let frontier = frontier.clone();
            waiters.spawn(async move { frontier.next().await });
        }
        while frontier.snapshot().await.waiting < 3 {
            tokio::task::yield_now().await;
        }

        frontier.complete().await;

        while let Some(result) = timeout(Duration::from_secs(5), waiters.join_next())
            .await
            .unwrap()
        {
            assert_eq!(result.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_children_submitted_before_completion_keep_crawl_alive() {
        let frontier = Frontier::new(8);
        frontier.submit(url("/a")).await;

        let a = next_within(&frontier).await.unwrap();
        assert_eq!(a, url("/a"));

        // A discovers B; B is submitted before A completes
        assert!(frontier.submit(url("/b")).await);
        frontier.complete().await;

        assert!(!frontier.snapshot().await.closed);
        assert_eq!(next_within(&frontier).await, Some(url("/b")));
        frontier.complete().await;
        assert_eq!(next_within(&frontier).await, None);
    }

    #[tokio::test]
    async fn test_resubmission_does_not_double_count() {
        let frontier = Frontier::new(8);
        frontier.submit(url("/a")).await;
        let _ = next_within(&frontier).await;

        // Re-submitting an in-flight URL is a no-op
        assert!(!frontier.submit(url("/a")).await);
        assert_eq!(frontier.snapshot().await.outstanding, 1);

        frontier.complete().await;
        assert!(frontier.snapshot().await.closed);
    }

    #[tokio::test]
    async fn test_unmatched_complete_is_ignored() {
        let frontier = Frontier::new(8);
        frontier.submit(url("/a")).await;
        frontier.submit(url("/b")).await;

        let _ = next_within(&frontier).await;
        frontier.complete().await;
        let _ = next_within(&frontier).await;
        frontier.complete().await;
        frontier.complete().await;

        let snapshot = frontier.snapshot().await;
        assert_eq!(snapshot.outstanding, 0);
        assert!(snapshot.closed);
    }

    #[tokio::test]
    async fn test_dropped_guard_completes_task() {
        let frontier = Frontier::new(8);
        frontier.submit(url("/panics")).await;
        let _ = next_within(&frontier).await;

        let worker = {
            let frontier = frontier.clone();
            tokio::spawn(async move {
                let _guard = frontier.completion_guard();
                panic!("worker failed mid-task");
            })
        };
        assert!(worker.await.is_err());

        assert_eq!(next_within(&frontier).await, None);
    }

    #[tokio::test]
    async fn test_guard_completes_once() {
        let frontier = Frontier::new(8);
        frontier.submit(url("/a")).await;
        frontier.submit(url("/b")).await;
        let _ = next_within(&frontier).await;

        frontier.completion_guard().complete().await;

        let snapshot = frontier.snapshot().await;
        assert_eq!(snapshot.outstanding, 1);
        assert!(!snapshot.closed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_tiny_mailbox_under_fan_out() {
        // Mailbox of one: every submitter waits on the actor, which must
        // still make progress
        let frontier = Frontier::new(1);
        frontier.submit(url("/root")).await;

        let processed = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut workers = JoinSet::new();
        for _ in 0..4 {
            let frontier = frontier.clone();
            let processed = processed.clone();
            workers.spawn(async move {
                while let Some(current) = frontier.next().await {
                    if current.path() == "/root" {
                        for i in 0..200 {
                            frontier.submit(url(&format!("/child/{}", i))).await;
                        }
                    }
                    processed.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    frontier.complete().await;
                }
            });
        }

        timeout(Duration::from_secs(10), async {
            while let Some(result) = workers.join_next().await {
                result.unwrap();
            }
        })
        .await
        .expect("crawl did not drain");

        assert_eq!(processed.load(std::sync::atomic::Ordering::SeqCst), 201);
    }
}
