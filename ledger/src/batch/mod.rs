//! # Batch: Range Partitioning and Tag List Output
//!
//! Large identifier ranges are split into consecutive batches. Each batch is
//! written to its own named stream, one tag per line in ascending identifier
//! order, and the batch streams are then concatenated into a combined stream.
//!
//! ```
//! use ledger::batch::{BatchMerger, MemorySink, RangeBatcher};
//!
//! let batcher = RangeBatcher::new(0, 9, 4).unwrap();
//! let sink = MemorySink::new();
//!
//! for batch in batcher.batches() {
//!     batcher.materialize(&batch, &sink).unwrap();
//! }
//! BatchMerger::default().merge(batcher.batch_count(), &sink).unwrap();
//!
//! let combined = sink.get_string("combined_output.txt").unwrap();
//! assert_eq!(combined.lines().next(), Some("2PP"));
//! ```

mod merger;
mod sink;

use std::io::{BufWriter, Write};
use std::ops::RangeInclusive;

use crate::error::Error;
use crate::tagpack::TagEncoder;

pub use merger::BatchMerger;
pub use merger::MergeReport;

pub use sink::DirectorySink;
pub use sink::MemorySink;
pub use sink::OutputSink;
pub use sink::SinkNames;
pub use sink::DEFAULT_BATCH_PREFIX;
pub use sink::DEFAULT_COMBINED_NAME;

/// One contiguous, inclusive sub-range of identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchDescriptor {
    /// Position of the batch within the run, starting at zero.
    pub index: u64,
    /// First identifier in the batch.
    pub start: u64,
    /// Last identifier in the batch (inclusive).
    pub end: u64,
}

impl BatchDescriptor {
    /// The identifiers covered by this batch, in ascending order.
    pub fn identifiers(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

/// Outcome of writing a single batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    /// Index of the batch.
    pub index: u64,
    /// Number of tag lines written.
    pub written: u64,
    /// Number of identifiers that produced no tag.
    pub skipped: u64,
}

/// Splits an inclusive identifier range into fixed-size batches and writes
/// the tags for each batch.
#[derive(Debug, Clone)]
pub struct RangeBatcher {
    start: u64,
    end: u64,
    batch_size: u64,
    names: SinkNames,
    encoder: TagEncoder,
}

impl RangeBatcher {
    /// Creates a batcher over `[start, end]`.
    ///
    /// ## Errors
    /// - `InvalidBatchSize` if `batch_size` is zero
    /// - `InvalidRange` if `start > end`
    pub fn new(start: u64, end: u64, batch_size: u64) -> Result<Self, Error> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize(batch_size));
        }
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }

        Ok(Self {
            start,
            end,
            batch_size,
            names: SinkNames::default(),
            encoder: TagEncoder,
        })
    }

    /// Replaces the naming scheme used for batch streams.
    pub fn with_names(mut self, names: SinkNames) -> Self {
        self.names = names;
        self
    }

    /// The naming scheme used for batch streams.
    pub fn names(&self) -> &SinkNames {
        &self.names
    }

    /// Number of batches: `ceil((end - start + 1) / batch_size)`.
    pub fn batch_count(&self) -> u64 {
        // Same as the ceiling division, without overflowing on a full range.
        (self.end - self.start) / self.batch_size + 1
    }

    /// Iterates over the batches in ascending order.
    pub fn batches(&self) -> Batches {
        Batches {
            start: self.start,
            end: self.end,
            batch_size: self.batch_size,
            next_index: 0,
            count: self.batch_count(),
        }
    }

    /// Writes the tags of every identifier in `batch` to the batch's stream,
    /// one per line. Identifiers without a tag are skipped.
    #[tracing::instrument(skip_all, fields(batch = batch.index, start = batch.start, end = batch.end))]
    pub fn materialize(
        &self,
        batch: &BatchDescriptor,
        sink: &dyn OutputSink,
    ) -> Result<BatchReport, Error> {
        let name = self.names.batch_name(batch.index);
        let to_error = |error: std::io::Error| Error::sink(sink.location(&name), error);

        let mut writer = BufWriter::new(sink.create(&name).map_err(to_error)?);
        let mut report = BatchReport {
            index: batch.index,
            ..Default::default()
        };

        for identifier in batch.identifiers() {
            match self.encoder.encode_identifier(identifier) {
                Ok(tag) => {
                    writeln!(writer, "{tag}").map_err(to_error)?;
                    report.written += 1;
                }
                Err(error) => {
                    tracing::trace!(identifier, %error, "identifier has no tag");
                    report.skipped += 1;
                }
            }
        }

        writer.flush().map_err(to_error)?;

        Ok(report)
    }
}

/// Iterator over the batches of a [`RangeBatcher`].
#[derive(Debug, Clone)]
pub struct Batches {
    start: u64,
    end: u64,
    batch_size: u64,
    next_index: u64,
    count: u64,
}

impl Iterator for Batches {
    type Item = BatchDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.count {
            return None;
        }

        let index = self.next_index;
        // index < count, so the batch start never passes `end`.
        let start = self.start + index * self.batch_size;
        let end = start.saturating_add(self.batch_size - 1).min(self.end);
        self.next_index += 1;

        Some(BatchDescriptor { index, start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.count - self.next_index).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    fn bounds(batcher: &RangeBatcher) -> Vec<(u64, u64)> {
        batcher.batches().map(|b| (b.start, b.end)).collect()
    }

    #[test_case(0, 9, 4, &[(0, 3), (4, 7), (8, 9)]; "last batch shorter")]
    #[test_case(0, 7, 4, &[(0, 3), (4, 7)]; "exact fit")]
    #[test_case(5, 5, 10, &[(5, 5)]; "single identifier")]
    #[test_case(10, 12, 1, &[(10, 10), (11, 11), (12, 12)]; "batch size one")]
    #[test_case(1, 100, 1000, &[(1, 100)]; "batch larger than range")]
    fn test_batch_bounds(start: u64, end: u64, size: u64, expected: &[(u64, u64)]) {
        let batcher = RangeBatcher::new(start, end, size).unwrap();

        assert_eq!(batcher.batch_count(), expected.len() as u64);
        assert_eq!(bounds(&batcher), expected);

        let indices: Vec<u64> = batcher.batches().map(|b| b.index).collect();
        assert_eq!(indices, (0..expected.len() as u64).collect::<Vec<_>>());
    }

    #[test]
    fn test_full_range_does_not_overflow() {
        let batcher = RangeBatcher::new(0, u64::MAX, u64::MAX).unwrap();

        assert_eq!(batcher.batch_count(), 2);
        assert_eq!(bounds(&batcher), vec![(0, u64::MAX - 1), (u64::MAX, u64::MAX)]);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert_matches!(RangeBatcher::new(0, 9, 0), Err(Error::InvalidBatchSize(0)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert_matches!(
            RangeBatcher::new(10, 9, 4),
            Err(Error::InvalidRange { start: 10, end: 9 })
        );
    }

    #[test]
    fn test_materialize_writes_ascending_tags() {
        let batcher = RangeBatcher::new(0, 3, 4).unwrap();
        let sink = MemorySink::new();
        let batch = batcher.batches().next().unwrap();

        let report = batcher.materialize(&batch, &sink).unwrap();

        // Zero encodes to an empty tag and is left out.
        assert_eq!(report, BatchReport { index: 0, written: 3, skipped: 1 });
        assert_eq!(sink.get_string("tags0.txt").unwrap(), "2PP\n8GG\n9UU\n");
    }

    #[test]
    fn test_materialize_skips_out_of_range_identifiers() {
        let batcher = RangeBatcher::new(80_707_212, 80_707_215, 10).unwrap();
        let sink = MemorySink::new();
        let batch = batcher.batches().next().unwrap();

        let report = batcher.materialize(&batch, &sink).unwrap();

        assert_eq!(report.written, 2);
        assert_eq!(report.skipped, 2);
        let contents = sink.get_string("tags0.txt").unwrap();
        assert_eq!(contents.lines().last(), Some("VVVVVVURJ"));
    }

    #[test]
    fn test_materialize_uses_custom_names() {
        let names = SinkNames::new("batch", "all.txt");
        let batcher = RangeBatcher::new(1, 2, 1).unwrap().with_names(names);
        let sink = MemorySink::new();

        for batch in batcher.batches() {
            batcher.materialize(&batch, &sink).unwrap();
        }

        assert_eq!(sink.names(), vec!["batch0.txt", "batch1.txt"]);
        assert_eq!(sink.get_string("batch1.txt").unwrap(), "8GG\n");
    }
}
