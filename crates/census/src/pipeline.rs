// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Batched, rate-limited fan-out
//!
//! [`BatchPipeline`] splits its input into contiguous batches and runs them
//! one after another. Every item of a batch is in flight at once, and a fixed
//! delay follows each batch (including the last) to stay under the upstream
//! rate limit. A failing item is logged and dropped; it never aborts the
//! batch or the run.

use std::{fmt, future::Future, num::NonZeroUsize, time::Duration};

use futures::future::join_all;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default number of items processed concurrently per batch
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default pause after each batch
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(2000);

/// Errors that stop a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A batch must hold at least one item
    #[error("Batch size must be greater than zero")]
    InvalidBatchSize,

    /// The run was cancelled before all batches settled
    #[error("Pipeline cancelled after {completed_batches} of {total_batches} batches")]
    Cancelled {
        /// Batches fully processed before cancellation
        completed_batches: usize,
        /// Batches the run was partitioned into
        total_batches: usize,
    },
}

/// Why a single item produced no result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemFailure {
    /// The worker returned an error
    #[error("{0}")]
    Failed(String),

    /// The worker did not finish within the item timeout
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Outcome of processing one item
pub type ItemOutcome<U> = Result<U, ItemFailure>;

/// Batch sizing and pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    batch_size: NonZeroUsize,
    inter_batch_delay: Duration,
    item_timeout: Option<Duration>,
}

impl BatchPolicy {
    /// Create a policy with the given batch size and post-batch delay
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidBatchSize`] if `batch_size` is zero
    pub fn new(batch_size: usize, inter_batch_delay: Duration) -> Result<Self, PipelineError> {
        let batch_size = NonZeroUsize::new(batch_size).ok_or(PipelineError::InvalidBatchSize)?;
        Ok(Self {
            batch_size,
            inter_batch_delay,
            item_timeout: None,
        })
    }

    /// Bound each item's processing time
    #[must_use]
    pub fn with_item_timeout(mut self, item_timeout: Duration) -> Self {
        self.item_timeout = Some(item_timeout);
        self
    }

    /// Maximum number of items in flight at once
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Pause after each batch
    pub fn inter_batch_delay(&self) -> Duration {
        self.inter_batch_delay
    }

    /// Per-item deadline, if any
    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout
    }

    /// Number of batches `items` inputs are split into
    pub fn batch_count(&self, items: usize) -> usize {
        items.div_ceil(self.batch_size.get())
    }
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            inter_batch_delay: DEFAULT_BATCH_DELAY,
            item_timeout: None,
        }
    }
}

/// Results of a run along with its failure accounting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport<U> {
    /// Successful results, in input order
    pub results: Vec<U>,
    /// Number of batches processed
    pub batches: usize,
    /// Number of items that failed or timed out
    pub failed: usize,
}

impl<U> BatchReport<U> {
    /// Number of items that produced a result
    pub fn succeeded(&self) -> usize {
        self.results.len()
    }
}

/// Split `items` into contiguous chunks of at most `batch_size` elements
///
/// The chunks concatenate back to the input.
pub fn partition<T>(items: Vec<T>, batch_size: NonZeroUsize) -> Vec<Vec<T>> {
    let mut batches = Vec::with_capacity(items.len().div_ceil(batch_size.get()));
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        batches.push(items.by_ref().take(batch_size.get()).collect());
    }
    batches
}

/// Sequential batches of concurrent work
#[derive(Debug, Clone, Default)]
pub struct BatchPipeline {
    policy: BatchPolicy,
    cancellation: CancellationToken,
}

impl BatchPipeline {
    /// Create a pipeline that runs until completion
    pub fn new(policy: BatchPolicy) -> Self {
        Self {
            policy,
            cancellation: CancellationToken::new(),
        }
    }

    /// Create a pipeline that stops when `cancellation` fires
    pub fn with_cancellation(policy: BatchPolicy, cancellation: CancellationToken) -> Self {
        Self {
            policy,
            cancellation,
        }
    }

    /// Batch sizing and pacing in effect
    pub fn policy(&self) -> &BatchPolicy {
        &self.policy
    }

    /// Run `worker` over every item and keep the successful results
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Cancelled`] if the run is cancelled
    pub async fn run<T, U, E, F, Fut>(
        &self,
        items: Vec<T>,
        worker: F,
    ) -> Result<Vec<U>, PipelineError>
    where
        T: Clone + fmt::Debug,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<U, E>>,
        E: fmt::Display,
    {
        Ok(self.run_with_report(items, worker).await?.results)
    }

    /// Run `worker` over every item, reporting how many items failed
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Cancelled`] if the run is cancelled
    pub async fn run_with_report<T, U, E, F, Fut>(
        &self,
        items: Vec<T>,
        worker: F,
    ) -> Result<BatchReport<U>, PipelineError>
    where
        T: Clone + fmt::Debug,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<U, E>>,
        E: fmt::Display,
    {
        let batches = partition(items, self.policy.batch_size);
        let total_batches = batches.len();
        let mut outcomes: Vec<ItemOutcome<U>> = Vec::new();

        for (index, batch) in batches.into_iter().enumerate() {
            info!(
                batch_size = batch.len(),
                "Processing batch {} of {}",
                index + 1,
                total_batches
            );

            let limit = self.policy.item_timeout;
            let pending = join_all(batch.into_iter().map(|item| {
                let work = worker(item.clone());
                settle(item, work, limit)
            }));

            let settled = tokio::select! {
                biased;
                () = self.cancellation.cancelled() => {
                    return Err(PipelineError::Cancelled {
                        completed_batches: index,
                        total_batches,
                    });
                }
                settled = pending => settled,
            };
            outcomes.extend(settled);

            self.pause(index + 1, total_batches).await?;
        }

        let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
        let results: Vec<U> = outcomes.into_iter().filter_map(Result::ok).collect();
        debug!(
            batches = total_batches,
            succeeded = results.len(),
            failed,
            "Pipeline finished"
        );

        Ok(BatchReport {
            results,
            batches: total_batches,
            failed,
        })
    }

    /// Wait out the inter-batch delay unless cancelled
    async fn pause(&self, completed_batches: usize, total_batches: usize) -> Result<(), PipelineError> {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => {
                // Every batch has already settled; nothing is lost.
                if completed_batches == total_batches {
                    debug!("Cancelled during final delay");
                    return Ok(());
                }
                Err(PipelineError::Cancelled {
                    completed_batches,
                    total_batches,
                })
            }
            () = sleep(self.policy.inter_batch_delay) => Ok(()),
        }
    }
}

/// Drive one item to an outcome, logging failures with the item's identity
async fn settle<T, U, E, Fut>(item: T, work: Fut, limit: Option<Duration>) -> ItemOutcome<U>
where
    T: fmt::Debug,
    Fut: Future<Output = Result<U, E>>,
    E: fmt::Display,
{
    let outcome = match limit {
        Some(limit) => match timeout(limit, work).await {
            Ok(result) => result.map_err(|e| ItemFailure::Failed(e.to_string())),
            Err(_) => Err(ItemFailure::TimedOut(limit)),
        },
        None => work.await.map_err(|e| ItemFailure::Failed(e.to_string())),
    };

    if let Err(failure) = &outcome {
        warn!(item = ?item, error = %failure, "Failed to process item");
    }

    outcome
}
