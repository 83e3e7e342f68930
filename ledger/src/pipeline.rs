//! The tag generation run: validate, write each batch, then merge.
//!
//! A run is sequential. Batches are independent of each other, so a batch
//! whose stream can't be written is recorded as a [`BatchFailure`] and the
//! run moves on to the next one. Once every batch has been attempted, the
//! batches that were written are merged into the combined stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::batch::{BatchMerger, MergeReport, OutputSink, RangeBatcher, SinkNames};
use crate::error::Error;

/// A cloneable flag used to stop a run between batches.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Every clone of the token observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Parameters of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateParams {
    /// First identifier of the range.
    pub start_range: u64,
    /// Last identifier of the range (inclusive).
    pub end_range: u64,
    /// Maximum number of identifiers per batch.
    pub batch_size: u64,
}

/// A batch whose stream could not be written.
#[derive(Debug)]
pub struct BatchFailure {
    /// Index of the failed batch.
    pub index: u64,
    /// Why the batch failed.
    pub error: Error,
}

/// Aggregate outcome of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of batches the range was split into.
    pub batches: u64,
    /// Total tag lines written across all batches.
    pub written: u64,
    /// Total identifiers that produced no tag.
    pub skipped: u64,
    /// Batches that could not be written.
    pub failures: Vec<BatchFailure>,
    /// Outcome of the merge step.
    pub merge: MergeReport,
}

impl RunSummary {
    /// Returns true when every batch was written and merged.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.merge.missing.is_empty()
    }
}

/// Drives a full generation run over an identifier range.
#[derive(Debug, Clone)]
pub struct TagGenerator {
    batcher: RangeBatcher,
    merger: BatchMerger,
}

impl TagGenerator {
    /// Validates the parameters and prepares a run. Nothing is written yet.
    ///
    /// ## Errors
    /// - `InvalidBatchSize` or `InvalidRange` for unusable parameters
    /// - `CombinedNameCollision` if the combined stream would overwrite one
    ///   of this run's batch streams
    pub fn new(params: GenerateParams, names: SinkNames) -> Result<Self, Error> {
        let batcher = RangeBatcher::new(params.start_range, params.end_range, params.batch_size)?
            .with_names(names.clone());

        if let Some(name) = names.combined_collision(batcher.batch_count()) {
            return Err(Error::CombinedNameCollision { name: name.to_string() });
        }

        Ok(Self {
            batcher,
            merger: BatchMerger::new(names),
        })
    }

    /// The batcher used by this run.
    pub fn batcher(&self) -> &RangeBatcher {
        &self.batcher
    }

    /// Writes every batch and the combined stream to `sink`.
    ///
    /// The token is checked before each batch. A cancelled run stops there,
    /// skips the merge, and returns [`Error::Cancelled`].
    ///
    /// ## Errors
    /// - `Cancelled` if the token was cancelled before the last batch
    /// - `SinkUnavailable` if the combined stream can't be written
    #[tracing::instrument(skip_all, fields(batch_count = self.batcher.batch_count()))]
    pub fn run(
        &self,
        sink: &dyn OutputSink,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, Error> {
        let mut summary = RunSummary {
            batches: self.batcher.batch_count(),
            ..Default::default()
        };
        let mut written_batches = Vec::new();

        tracing::info!(batches = summary.batches, "generating tags");

        for batch in self.batcher.batches() {
            if cancel.is_cancelled() {
                tracing::warn!(completed = batch.index, "run cancelled");
                return Err(Error::Cancelled { completed: batch.index });
            }

            match self.batcher.materialize(&batch, sink) {
                Ok(report) => {
                    tracing::debug!(
                        batch = report.index,
                        written = report.written,
                        skipped = report.skipped,
                        "batch written"
                    );
                    summary.written += report.written;
                    summary.skipped += report.skipped;
                    written_batches.push(batch.index);
                }
                Err(error) => {
                    tracing::error!(batch = batch.index, %error, "batch failed");
                    summary.failures.push(BatchFailure { index: batch.index, error });
                }
            }
        }

        summary.merge = self.merger.merge_indices(written_batches, sink)?;

        tracing::info!(
            batches = summary.batches,
            written = summary.written,
            skipped = summary.skipped,
            failed = summary.failures.len(),
            "tag generation finished"
        );

        Ok(summary)
    }
}
