/// Configuration error variants.
#[derive(Debug, thiserror::Error)]
pub enum LedgerConfigError {
    /// Batches must hold at least one player number.
    #[error("The batch size must be greater than zero")]
    ZeroBatchSize,

    /// The range is inclusive on both ends and can't be inverted.
    #[error("The start of the range ({0}) must not be greater than the end ({1})")]
    InvertedRange(u64, u64),

    /// Output names are used as file names and can't be blank.
    #[error("The output name for {0} must not be empty")]
    EmptyOutputName(&'static str),

    /// Output names must stay inside the output directory.
    #[error("The output name for {0} must not contain a path separator: '{1}'")]
    OutputNameHasSeparator(&'static str, String),

    /// The combined file would be written over a batch file.
    #[error("The combined output name '{0}' has the form of a batch file name")]
    CombinedNameIsBatchName(String),
}
