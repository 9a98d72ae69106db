//! Bounded-concurrency paged fetcher.
//!
//! Retrieves every page of the remote collection with a fixed pool of
//! workers sharing one session token. The result is all-or-nothing: a
//! failed page or a cancellation discards everything already fetched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use stocksync_engine::{plan_pages, RemoteItem};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::remote::client::{RemoteError, SessionToken};

/// Errors from the paged fetch phase.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("page fetch at offset {offset} failed: {source}")]
    Page {
        offset: i64,
        #[source]
        source: RemoteError,
    },

    #[error("fetch cancelled before completion")]
    Cancelled,

    #[error(transparent)]
    Plan(#[from] stocksync_engine::Error),

    #[error("fetch collector failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// One remote page round trip.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        token: &SessionToken,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RemoteItem>, RemoteError>;
}

/// Outcome of a single page request, collected out of order.
#[derive(Debug)]
struct PageOutcome {
    offset: i64,
    result: Result<Vec<RemoteItem>, RemoteError>,
}

/// Fetches every page of the collection.
///
/// `worker_count` tasks pull page requests from a shared cursor, perform
/// one round trip each and hand the outcome to a collector task. Workers
/// observe `cancel` before each pickup, while a fetch is in flight, and
/// on hand-off. A failed page does not stop the other workers; the first
/// collected failure (or a cancellation, which takes precedence) is
/// reported only after every worker has drained the queue.
///
/// Record order follows completion order, not offset order; callers that
/// need offset order must sort.
pub async fn fetch_all<S>(
    source: Arc<S>,
    token: SessionToken,
    total_count: i64,
    page_size: i64,
    worker_count: usize,
    cancel: CancellationToken,
) -> Result<Vec<RemoteItem>, FetchError>
where
    S: PageSource + 'static,
{
    let requests = Arc::new(plan_pages(total_count, page_size)?);
    if requests.is_empty() {
        return Ok(Vec::new());
    }
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    let worker_count = worker_count.clamp(1, requests.len());
    let cursor = Arc::new(AtomicUsize::new(0));
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<PageOutcome>(worker_count);

    // Dedicated collector: accumulates outcomes as they arrive,
    // independent of submission order.
    let collector = tokio::spawn(async move {
        let mut outcomes = Vec::new();
        while let Some(outcome) = outcome_rx.recv().await {
            outcomes.push(outcome);
        }
        outcomes
    });

    let mut workers = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        let source = Arc::clone(&source);
        let token = token.clone();
        let requests = Arc::clone(&requests);
        let cursor = Arc::clone(&cursor);
        let cancel = cancel.clone();
        let outcome_tx = outcome_tx.clone();

        workers.push(tokio::spawn(async move {
            loop {
                if cancel.is_cancelled() {
                    break;
                }

                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(request) = requests.get(index).copied() else {
                    break;
                };

                let result = tokio::select! {
                    _ = cancel.cancelled() => break,
                    result = source.fetch_page(&token, request.limit, request.offset) => result,
                };

                let outcome = PageOutcome {
                    offset: request.offset,
                    result,
                };
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    sent = outcome_tx.send(outcome) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
        }));
    }
    drop(outcome_tx);

    for worker in workers {
        if let Err(e) = worker.await {
            tracing::error!("fetch worker panicked: {}", e);
        }
    }

    // Sender side is gone once every worker has exited; the collector
    // drains whatever is left and finishes.
    let outcomes = collector.await?;

    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    let mut records = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(page) => records.extend(page),
            Err(source) => {
                return Err(FetchError::Page {
                    offset: outcome.offset,
                    source,
                })
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Page source backed by a fixed item set, with optional failures
    /// and artificial latency.
    struct FakeSource {
        total: usize,
        fail_at_offset: Option<i64>,
        delay: Option<Duration>,
        calls: Mutex<Vec<i64>>,
    }

    impl FakeSource {
        fn new(total: usize) -> Self {
            Self {
                total,
                fail_at_offset: None,
                delay: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageSource for FakeSource {
        async fn fetch_page(
            &self,
            _token: &SessionToken,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<RemoteItem>, RemoteError> {
            self.calls.lock().unwrap().push(offset);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.fail_at_offset == Some(offset) {
                return Err(RemoteError::Decode("malformed page".to_string()));
            }

            let start = offset as usize;
            let end = ((offset + limit) as usize).min(self.total);
            Ok((start..end)
                .map(|i| {
                    json!({"ItemName": format!("Item {i}")})
                        .as_object()
                        .unwrap()
                        .clone()
                })
                .collect())
        }
    }

    fn token() -> SessionToken {
        SessionToken::new("test-session")
    }

    #[tokio::test]
    async fn fetches_every_page_exactly_once() {
        let source = Arc::new(FakeSource::new(47));

        let records = fetch_all(
            Arc::clone(&source),
            token(),
            47,
            20,
            4,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(records.len(), 47);

        let mut calls = source.calls.lock().unwrap().clone();
        calls.sort_unstable();
        assert_eq!(calls, vec![0, 20, 40]);
    }

    #[tokio::test]
    async fn worker_count_does_not_change_request_set() {
        for workers in [1, 3, 16] {
            let source = Arc::new(FakeSource::new(47));

            let records = fetch_all(
                Arc::clone(&source),
                token(),
                47,
                20,
                workers,
                CancellationToken::new(),
            )
            .await
            .unwrap();

            assert_eq!(records.len(), 47, "workers: {workers}");
            assert_eq!(source.calls.lock().unwrap().len(), 3, "workers: {workers}");
        }
    }

    #[tokio::test]
    async fn one_failing_page_discards_everything() {
        let mut source = FakeSource::new(60);
        source.fail_at_offset = Some(20);

        let result = fetch_all(
            Arc::new(source),
            token(),
            60,
            20,
            2,
            CancellationToken::new(),
        )
        .await;

        match result {
            Err(FetchError::Page { offset, .. }) => assert_eq!(offset, 20),
            other => panic!("expected page failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn remaining_pages_still_fetched_after_failure() {
        // A failed page must not stop the queue from draining.
        let mut source = FakeSource::new(60);
        source.fail_at_offset = Some(0);
        let source = Arc::new(source);

        let result = fetch_all(
            Arc::clone(&source),
            token(),
            60,
            20,
            1,
            CancellationToken::new(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(source.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn cancelled_before_start_fetches_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let source = Arc::new(FakeSource::new(47));
        let result = fetch_all(Arc::clone(&source), token(), 47, 20, 4, cancel).await;

        assert!(matches!(result, Err(FetchError::Cancelled)));
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancellation_wins_over_partial_results() {
        let mut source = FakeSource::new(200);
        source.delay = Some(Duration::from_millis(50));
        let source = Arc::new(source);

        let cancel = CancellationToken::new();
        let guard = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            guard.cancel();
        });

        let result = fetch_all(Arc::clone(&source), token(), 200, 20, 2, cancel).await;

        assert!(matches!(result, Err(FetchError::Cancelled)));
    }

    #[tokio::test]
    async fn empty_collection_returns_no_records() {
        let source = Arc::new(FakeSource::new(0));

        let records = fetch_all(
            Arc::clone(&source),
            token(),
            0,
            20,
            4,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(records.is_empty());
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_page_size_is_rejected() {
        let source = Arc::new(FakeSource::new(10));
        let result = fetch_all(
            Arc::clone(&source),
            token(),
            10,
            0,
            4,
            CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(FetchError::Plan(_))));
    }
}
