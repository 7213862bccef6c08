//! Bounded-concurrency bulk updates
//!
//! Runs one update future per item with at most `limit` in flight at any
//! instant; a finished slot is refilled immediately. Results are reported per
//! item — a failed update lands in the failure list with its error text and
//! never aborts the run.

use crate::board::dates::DatedItem;
use futures::stream::{self, StreamExt};
use std::future::Future;
use tracing::warn;

/// Default cap on in-flight update requests
pub const DEFAULT_CONCURRENCY: usize = 5;

/// A single item that could not be updated
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub item_id: String,
    pub error: String,
}

/// Per-item outcome of a bulk update
#[derive(Debug, Default, Clone)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Apply `op` to every item with bounded concurrency.
///
/// `progress` is called with (completed, total) after each item settles.
/// Completion order is not the input order.
pub async fn run<F, Fut>(
    items: Vec<DatedItem>,
    limit: usize,
    mut progress: impl FnMut(usize, usize),
    op: F,
) -> BatchReport
where
    F: Fn(DatedItem) -> Fut,
    Fut: Future<Output = crate::Result<()>>,
{
    let total = items.len();
    let limit = limit.max(1);
    let op = &op;

    let mut results = stream::iter(items)
        .map(|item| {
            let id = item.id.clone();
            async move { (id, op(item).await) }
        })
        .buffer_unordered(limit);

    let mut report = BatchReport::default();
    let mut completed = 0usize;

    while let Some((id, result)) = results.next().await {
        completed += 1;
        match result {
            Ok(()) => report.succeeded.push(id),
            Err(e) => {
                warn!(item = %id, error = %e, "item update failed");
                report.failed.push(BatchFailure {
                    item_id: id,
                    error: e.to_string(),
                });
            }
        }
        progress(completed, total);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardlineError;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn items(n: usize) -> Vec<DatedItem> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        (0..n)
            .map(|i| DatedItem {
                id: i.to_string(),
                start,
                end,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let report = run(items(20), 5, |_, _| {}, |_item| {
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            async move {
                let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(current, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert_eq!(report.succeeded.len(), 20);
        assert!(report.failed.is_empty());
        assert!(max_seen.load(Ordering::SeqCst) <= 5);
        assert!(max_seen.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_failures_are_reported_not_fatal() {
        let report = run(items(9), 3, |_, _| {}, |item| async move {
            let id: usize = item.id.parse().unwrap();
            if id % 3 == 0 {
                Err(BoardlineError::Api(format!("boom {}", id)))
            } else {
                Ok(())
            }
        })
        .await;

        assert_eq!(report.succeeded.len(), 6);
        assert_eq!(report.failed.len(), 3);
        assert_eq!(report.total(), 9);

        let mut failed: Vec<&str> = report.failed.iter().map(|f| f.item_id.as_str()).collect();
        failed.sort_unstable();
        assert_eq!(failed, vec!["0", "3", "6"]);
        assert!(report.failed.iter().all(|f| f.error.contains("boom")));
    }

    #[tokio::test]
    async fn test_progress_reports_running_count() {
        let mut calls = Vec::new();
        let report = run(
            items(4),
            2,
            |completed, total| calls.push((completed, total)),
            |_item| async move { Ok(()) },
        )
        .await;

        assert_eq!(report.succeeded.len(), 4);
        assert_eq!(calls, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[tokio::test]
    async fn test_zero_limit_is_clamped() {
        let report = run(items(2), 0, |_, _| {}, |_item| async move { Ok(()) }).await;
        assert_eq!(report.total(), 2);
    }
}
