//! Concatenation of batch streams into the combined stream.

use std::io::{BufWriter, Write};

use crate::error::Error;

use super::sink::{OutputSink, SinkNames};

/// Outcome of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of batch streams that were copied.
    pub merged: u64,
    /// Indices of batch streams that could not be opened and were treated
    /// as empty.
    pub missing: Vec<u64>,
    /// Total bytes written to the combined stream.
    pub bytes: u64,
}

/// Concatenates batch streams, in index order, into one combined stream.
#[derive(Debug, Clone, Default)]
pub struct BatchMerger {
    names: SinkNames,
}

impl BatchMerger {
    /// Creates a merger using the given naming scheme.
    pub fn new(names: SinkNames) -> Self {
        Self { names }
    }

    /// Merges batch streams `0..batch_count` into the combined stream.
    pub fn merge(&self, batch_count: u64, sink: &dyn OutputSink) -> Result<MergeReport, Error> {
        self.merge_indices(0..batch_count, sink)
    }

    /// Merges the batch streams with the given indices, in the order given.
    ///
    /// The copy is byte-exact. A batch stream that can't be opened
    /// contributes nothing and is listed in [`MergeReport::missing`]. Failing
    /// to create or write the combined stream is an error.
    #[tracing::instrument(skip_all, fields(combined = %self.names.combined_name))]
    pub fn merge_indices<I>(&self, indices: I, sink: &dyn OutputSink) -> Result<MergeReport, Error>
    where
        I: IntoIterator<Item = u64>,
    {
        let combined = &self.names.combined_name;
        let to_error = |error: std::io::Error| Error::sink(sink.location(combined), error);

        let mut writer = BufWriter::new(sink.create(combined).map_err(to_error)?);
        let mut report = MergeReport::default();

        for index in indices {
            let name = self.names.batch_name(index);
            let mut reader = match sink.open(&name) {
                Ok(reader) => reader,
                Err(error) => {
                    tracing::warn!(
                        batch = index,
                        location = %sink.location(&name),
                        %error,
                        "batch stream could not be opened; treating it as empty"
                    );
                    report.missing.push(index);
                    continue;
                }
            };

            let copied = std::io::copy(&mut reader, &mut writer).map_err(to_error)?;
            report.bytes += copied;
            report.merged += 1;
        }

        writer.flush().map_err(to_error)?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::MemorySink;

    fn write(sink: &MemorySink, name: &str, contents: &str) {
        sink.create(name)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
    }

    #[test]
    fn test_merge_concatenates_in_order() {
        let sink = MemorySink::new();
        write(&sink, "tags0.txt", "2PP\n");
        write(&sink, "tags1.txt", "8GG\n9UU\n");
        write(&sink, "tags2.txt", "");

        let report = BatchMerger::default().merge(3, &sink).unwrap();

        assert_eq!(report.merged, 3);
        assert!(report.missing.is_empty());
        assert_eq!(report.bytes, 12);
        assert_eq!(
            sink.get_string("combined_output.txt").unwrap(),
            "2PP\n8GG\n9UU\n"
        );
    }

    #[test]
    fn test_missing_batch_is_empty() {
        let sink = MemorySink::new();
        write(&sink, "tags0.txt", "2PP\n");
        write(&sink, "tags2.txt", "CJG\n");

        let report = BatchMerger::default().merge(3, &sink).unwrap();

        assert_eq!(report.merged, 2);
        assert_eq!(report.missing, vec![1]);
        assert_eq!(sink.get_string("combined_output.txt").unwrap(), "2PP\nCJG\n");
    }

    #[test]
    fn test_merge_indices_leaves_out_unlisted_batches() {
        let sink = MemorySink::new();
        write(&sink, "tags0.txt", "2PP\n");
        write(&sink, "tags1.txt", "stale\n");
        write(&sink, "tags2.txt", "CJG\n");

        let report = BatchMerger::default().merge_indices([0, 2], &sink).unwrap();

        assert_eq!(report.merged, 2);
        assert_eq!(sink.get_string("combined_output.txt").unwrap(), "2PP\nCJG\n");
    }

    #[test]
    fn test_merge_zero_batches_creates_empty_combined() {
        let sink = MemorySink::new();
        let report = BatchMerger::default().merge(0, &sink).unwrap();

        assert_eq!(report, MergeReport::default());
        assert_eq!(sink.get("combined_output.txt"), Some(Vec::new()));
    }
}
