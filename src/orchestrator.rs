// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Fetch Orchestrator
 * Batched, bounded-concurrency fetching of a target and its derived resources
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::http_client::{FetchOutcome, HttpClient};

/// Whether a job targets the scan's primary URL or a resource discovered
/// from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Primary,
    Derived,
}

/// One fetch to perform. Consumed exactly once; never retried automatically.
#[derive(Debug, Clone)]
pub struct FetchJob {
    pub url: String,
    pub kind: JobKind,
    pub timeout: Duration,
    pub max_bytes: usize,
}

impl FetchJob {
    pub fn primary(url: impl Into<String>, timeout_secs: u64, max_bytes: usize) -> Self {
        Self {
            url: url.into(),
            kind: JobKind::Primary,
            timeout: Duration::from_secs(timeout_secs),
            max_bytes,
        }
    }

    pub fn derived(url: impl Into<String>, timeout_secs: u64, max_bytes: usize) -> Self {
        Self {
            url: url.into(),
            kind: JobKind::Derived,
            timeout: Duration::from_secs(timeout_secs),
            max_bytes,
        }
    }
}

/// One result per job, owned by whichever component issued the job.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub job: FetchJob,
    pub outcome: FetchOutcome,
    pub elapsed_ms: u64,
}

/// Scan-level cancellation signal, shared across every batch of a scan.
///
/// Checked at batch boundaries: cancelling stops new batches from being
/// issued, while in-flight fetches still run to their own deadline.
#[derive(Debug, Clone, Default)]
pub struct ScanCancellation {
    flag: Arc<AtomicBool>,
}

impl ScanCancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Issues HTTP requests in fixed-size batches: all fetches within a batch
/// run in parallel and the whole batch completes before the next one is
/// issued, bounding peak concurrent connections against the target.
pub struct FetchOrchestrator {
    client: Arc<HttpClient>,
    batch_size: usize,
}

impl FetchOrchestrator {
    pub fn new(client: Arc<HttpClient>, batch_size: usize) -> Self {
        Self {
            client,
            batch_size: batch_size.max(1),
        }
    }

    /// Fetch every job and return one result per job, in input order.
    ///
    /// No URL is silently dropped: timeouts, refused connections and
    /// malformed URLs all come back as typed outcomes. Jobs skipped after
    /// cancellation come back as `FetchOutcome::Cancelled`.
    pub async fn fetch_all(
        &self,
        jobs: Vec<FetchJob>,
        cancel: &ScanCancellation,
    ) -> Vec<FetchResult> {
        let total = jobs.len();
        let mut slots: Vec<Option<FetchResult>> = (0..total).map(|_| None).collect();

        let indexed: Vec<(usize, FetchJob)> = jobs.into_iter().enumerate().collect();

        for batch in indexed.chunks(self.batch_size) {
            if cancel.is_cancelled() {
                warn!("[Orchestrator] Scan cancelled, skipping remaining fetches");
                for (index, job) in batch.iter().chain(remaining_after(batch, &indexed)) {
                    slots[*index] = Some(FetchResult {
                        job: job.clone(),
                        outcome: FetchOutcome::Cancelled,
                        elapsed_ms: 0,
                    });
                }
                break;
            }

            let futures = batch.iter().map(|(index, job)| {
                let client = Arc::clone(&self.client);
                let job = job.clone();
                let index = *index;
                async move {
                    let started = Instant::now();
                    let outcome = client.fetch(&job.url, job.timeout, job.max_bytes).await;
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    debug!(
                        "[Orchestrator] {} -> {} ({}ms)",
                        job.url,
                        outcome_label(&outcome),
                        elapsed_ms
                    );
                    (
                        index,
                        FetchResult {
                            job,
                            outcome,
                            elapsed_ms,
                        },
                    )
                }
            });

            // Whole batch completes before the next one starts
            for (index, result) in futures::future::join_all(futures).await {
                slots[index] = Some(result);
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.expect("every job writes its slot"))
            .collect()
    }

    /// Convenience wrapper for a single job.
    pub async fn fetch_one(&self, job: FetchJob, cancel: &ScanCancellation) -> FetchResult {
        self.fetch_all(vec![job], cancel)
            .await
            .into_iter()
            .next()
            .expect("one job yields one result")
    }
}

/// Jobs in later batches than the one being cancelled.
fn remaining_after<'a>(
    batch: &'a [(usize, FetchJob)],
    all: &'a [(usize, FetchJob)],
) -> impl Iterator<Item = &'a (usize, FetchJob)> {
    let last_index = batch.last().map(|(i, _)| *i);
    all.iter()
        .filter(move |(i, _)| last_index.map(|last| *i > last).unwrap_or(false))
}

fn outcome_label(outcome: &FetchOutcome) -> &'static str {
    match outcome {
        FetchOutcome::Success(_) => "success",
        FetchOutcome::Timeout => "timeout",
        FetchOutcome::NetworkError(_) => "network error",
        FetchOutcome::InvalidUrl(_) => "invalid url",
        FetchOutcome::Cancelled => "cancelled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_flag() {
        let cancel = ScanCancellation::new();
        assert!(!cancel.is_cancelled());

        let clone = cancel.clone();
        clone.cancel();
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_job_constructors() {
        let job = FetchJob::primary("https://site.example/", 10, 1024);
        assert_eq!(job.kind, JobKind::Primary);
        assert_eq!(job.timeout, Duration::from_secs(10));

        let job = FetchJob::derived("https://site.example/app.js", 8, 1024);
        assert_eq!(job.kind, JobKind::Derived);
    }
}
