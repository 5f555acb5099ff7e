//! Bounded-concurrency batch scheduler
//!
//! Work items are partitioned into consecutive chunks of the concurrency
//! limit; every item of a chunk is launched together and the whole chunk
//! settles before the next one starts. Each item's result lands at its
//! original index, so downstream order always matches input order, and a
//! failing item is caught, logged, and replaced with a neutral placeholder
//! without cancelling its siblings.

use futures::future::join_all;
use std::fmt::Display;
use std::future::Future;

/// Partitions items into consecutive chunks of `size`; the last chunk may
/// be smaller
pub fn chunked<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut iter = items.into_iter();
    loop {
        let chunk: Vec<T> = iter.by_ref().take(size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }
    chunks
}

/// Runs `worker` over `items` with at most `limit` in flight, preserving
/// input order in the output
///
/// A worker failure is logged and mapped to `R::default()`; it never
/// aborts the batch.
pub async fn run_batched<T, R, E, W, Fut>(items: Vec<T>, limit: usize, worker: W) -> Vec<R>
where
    R: Default,
    E: Display,
    W: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    run_batched_with_hook(items, limit, worker, || {}).await
}

/// Like [`run_batched`], additionally invoking `on_settled` exactly once
/// per item as it settles (success or failure), enabling per-item progress
/// accounting instead of per-chunk
pub async fn run_batched_with_hook<T, R, E, W, Fut, H>(
    items: Vec<T>,
    limit: usize,
    worker: W,
    on_settled: H,
) -> Vec<R>
where
    R: Default,
    E: Display,
    W: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    H: Fn(),
{
    let mut results = Vec::with_capacity(items.len());

    for chunk in chunked(items, limit) {
        let settled = join_all(chunk.into_iter().map(|item| {
            let fut = worker(item);
            let on_settled = &on_settled;
            async move {
                let result = fut.await;
                on_settled();
                result
            }
        }))
        .await;

        for result in settled {
            match result {
                Ok(value) => results.push(value),
                Err(e) => {
                    tracing::warn!("Batch item failed: {}", e);
                    results.push(R::default());
                }
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn test_chunked_shapes() {
        let chunks = chunked((0..12).collect(), 5);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 5);
        assert_eq!(chunks[1].len(), 5);
        assert_eq!(chunks[2].len(), 2);
        assert_eq!(chunks[2], vec![10, 11]);
    }

    #[test]
    fn test_chunked_empty_and_exact() {
        assert!(chunked(Vec::<i32>::new(), 5).is_empty());

        let chunks = chunked((0..10).collect(), 5);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].len(), 5);
    }

    #[tokio::test]
    async fn test_run_batched_preserves_input_order() {
        // Later items finish first within their chunk
        let results = run_batched((0u64..8).collect(), 4, |n| async move {
            tokio::time::sleep(Duration::from_millis(40 - n * 5)).await;
            Ok::<u64, String>(n * 10)
        })
        .await;

        assert_eq!(results, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[tokio::test]
    async fn test_run_batched_respects_concurrency_limit() {
        let current = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        run_batched((0..12).collect::<Vec<i32>>(), 5, |_| {
            let current = &current;
            let peak = &peak;
            async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                Ok::<(), String>(())
            }
        })
        .await;

        assert!(peak.load(Ordering::SeqCst) <= 5);
    }

    #[tokio::test]
    async fn test_chunk_barrier_holds_between_chunks() {
        // Records every item start; no item of chunk 2 may start before
        // every item of chunk 1 has finished
        let events = Mutex::new(Vec::new());

        run_batched((0..7).collect::<Vec<usize>>(), 5, |n| {
            let events = &events;
            async move {
                events.lock().unwrap().push(("start", n));
                tokio::time::sleep(Duration::from_millis(15)).await;
                events.lock().unwrap().push(("end", n));
                Ok::<(), String>(())
            }
        })
        .await;

        let events = events.into_inner().unwrap();
        let late_start = events
            .iter()
            .position(|(kind, n)| *kind == "start" && *n >= 5)
            .unwrap();
        let chunk_one_ends = events
            .iter()
            .enumerate()
            .filter(|(_, (kind, n))| *kind == "end" && *n < 5)
            .map(|(i, _)| i)
            .max()
            .unwrap();
        assert!(late_start > chunk_one_ends);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_placeholder() {
        let results = run_batched((0..6).collect::<Vec<i32>>(), 3, |n| async move {
            if n == 2 {
                Err("synthetic failure".to_string())
            } else {
                Ok(vec![n])
            }
        })
        .await;

        assert_eq!(results.len(), 6);
        assert_eq!(results[2], Vec::<i32>::new());
        assert_eq!(results[0], vec![0]);
        assert_eq!(results[5], vec![5]);
    }

    #[tokio::test]
    async fn test_settled_hook_fires_once_per_item() {
        let settled = AtomicUsize::new(0);

        let results = run_batched_with_hook(
            (0..12).collect::<Vec<i32>>(),
            5,
            |n| async move {
                if n % 4 == 0 {
                    Err("fail".to_string())
                } else {
                    Ok(n)
                }
            },
            || {
                settled.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await;

        assert_eq!(results.len(), 12);
        // The hook fires for failures too
        assert_eq!(settled.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn test_zero_limit_treated_as_one() {
        let results =
            run_batched(vec![1, 2, 3], 0, |n| async move { Ok::<i32, String>(n) }).await;
        assert_eq!(results, vec![1, 2, 3]);
    }
}
