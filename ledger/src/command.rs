//! The commands the ledger can run, each mapped to one handler.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::batch::{DirectorySink, SinkNames};
use crate::config::{Overrides, Settings};
use crate::error::Error;
use crate::pipeline::{CancellationToken, GenerateParams, RunSummary, TagGenerator};
use crate::tagpack::{Tag, TagEncoder, TagError};

/// A single request to the ledger.
#[derive(Debug, Clone)]
pub enum Command {
    /// Translate one player number into its tag.
    EncodeNumber(u64),
    /// Translate an inclusive range of player numbers, writing one tag per
    /// line.
    EncodeRange {
        /// First player number.
        start: u64,
        /// Last player number (inclusive).
        end: u64,
    },
    /// Write batch files and a combined file for a range of player numbers.
    Generate {
        /// Range and batch size.
        params: GenerateParams,
        /// How the files are named.
        names: SinkNames,
        /// Directory the files are written to.
        output_directory: PathBuf,
    },
}

/// What a command produced.
#[derive(Debug)]
pub enum Outcome {
    /// The result of encoding a single player number.
    Encoded {
        /// The player number.
        identifier: u64,
        /// Its tag, or the reason it has none.
        tag: Result<Tag, TagError>,
    },
    /// Counts from encoding a range.
    Listed {
        /// Tag lines written.
        written: u64,
        /// Player numbers without a tag.
        skipped: u64,
    },
    /// The summary of a generation run.
    Generated(RunSummary),
}

impl Command {
    /// Loads the layered settings and builds the generate command they
    /// describe.
    ///
    /// ## Errors
    /// - `Config` if the settings can't be loaded or fail validation
    pub fn generate_from_settings(
        config_path: Option<impl AsRef<Path>>,
        overrides: &Overrides,
    ) -> Result<Self, Error> {
        let settings = Settings::new_with_overrides(config_path, overrides)?;

        Ok(Command::Generate {
            params: settings.generate_params(),
            names: settings.sink_names(),
            output_directory: settings.generate.output_directory,
        })
    }

    /// Runs the command. Tags are written to `out`; generated files go to
    /// the command's output directory.
    pub fn execute(
        self,
        out: &mut dyn Write,
        cancel: &CancellationToken,
    ) -> Result<Outcome, Error> {
        match self {
            Command::EncodeNumber(identifier) => encode_number(identifier, out),
            Command::EncodeRange { start, end } => encode_range(start, end, out, cancel),
            Command::Generate {
                params,
                names,
                output_directory,
            } => generate(params, names, output_directory, cancel),
        }
    }
}

fn encode_number(identifier: u64, out: &mut dyn Write) -> Result<Outcome, Error> {
    let tag = TagEncoder.encode_identifier(identifier);
    if let Ok(tag) = &tag {
        writeln!(out, "{tag}")?;
    }

    Ok(Outcome::Encoded { identifier, tag })
}

#[tracing::instrument(skip(out, cancel))]
fn encode_range(
    start: u64,
    end: u64,
    out: &mut dyn Write,
    cancel: &CancellationToken,
) -> Result<Outcome, Error> {
    if start > end {
        return Err(Error::InvalidRange { start, end });
    }

    let mut written: u64 = 0;
    let mut skipped: u64 = 0;

    for identifier in start..=end {
        if cancel.is_cancelled() {
            let processed = written + skipped;
            tracing::warn!(processed, "listing cancelled");
            return Err(Error::ListingCancelled { processed });
        }
        match TagEncoder.encode_identifier(identifier) {
            Ok(tag) => {
                writeln!(out, "{tag}")?;
                written += 1;
            }
            Err(_) => skipped += 1,
        }
    }
    out.flush()?;

    Ok(Outcome::Listed { written, skipped })
}

fn generate(
    params: GenerateParams,
    names: SinkNames,
    output_directory: PathBuf,
    cancel: &CancellationToken,
) -> Result<Outcome, Error> {
    let generator = TagGenerator::new(params, names)?;
    let sink = DirectorySink::new(output_directory);

    generator.run(&sink, cancel).map(Outcome::Generated)
}
