//! Top-level error type for the ledger library
//!

/// Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The batch size must be at least one.
    #[error("invalid batch size {0}; must be greater than zero")]
    InvalidBatchSize(u64),

    /// The range start lies after the range end.
    #[error("invalid range: start {start} is greater than end {end}")]
    InvalidRange {
        /// Start of the requested range.
        start: u64,
        /// End of the requested range (inclusive).
        end: u64,
    },

    /// The combined stream has the same name as one of the run's batch
    /// streams, so merging would overwrite that batch.
    #[error("combined output {name} would overwrite a batch of the same name")]
    CombinedNameCollision {
        /// The shared stream name.
        name: String,
    },

    /// A named output stream could not be opened, written or flushed.
    #[error("output sink {name} is unavailable: {source}")]
    SinkUnavailable {
        /// Location of the stream, as reported by the sink.
        name: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled at a batch boundary.
    #[error("the run was cancelled after {completed} batch(es)")]
    Cancelled {
        /// Number of batches that were attempted before cancellation.
        completed: u64,
    },

    /// Listing a range of tags was cancelled before the end of the range.
    #[error("listing was cancelled after {processed} player number(s)")]
    ListingCancelled {
        /// Number of identifiers encoded (or skipped) before cancellation.
        processed: u64,
    },

    /// Loading or validating the settings failed.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Writing command output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a [`Error::SinkUnavailable`] for the given stream location.
    pub fn sink(name: impl Into<String>, source: std::io::Error) -> Self {
        Error::SinkUnavailable { name: name.into(), source }
    }
}
