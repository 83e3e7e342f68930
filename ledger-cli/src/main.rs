use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use ledger::command::Command;
use ledger::command::Outcome;
use ledger::config::Overrides;
use ledger::error::Error;
use ledger::pipeline::CancellationToken;
use tokio::signal;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Command line arguments for the ledger.
#[derive(Debug, Parser)]
#[clap(name = "Chief's Ledger")]
struct LedgerArgs {
    /// Optional path to the configuration file. If not provided, it is expected
    /// that all parameters are provided via flags or environment variables.
    #[clap(short = 'c', long, required = false)]
    config: Option<PathBuf>,

    #[clap(short = 'o', long = "output-format", default_value = "pretty")]
    output_format: Option<LogOutputFormat>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Translate a player number to its player tag.
    Encode {
        /// The player number.
        number: u64,
    },
    /// Translate a range of player numbers to tags, one per line on stdout.
    Range {
        /// First player number.
        start: u64,
        /// Last player number (inclusive).
        end: u64,
    },
    /// Write the tags for a range of player numbers to batch files, then
    /// combine them into one file.
    Generate {
        /// First player number, overriding `generate.start_range`.
        #[clap(long)]
        start: Option<u64>,
        /// Last player number, overriding `generate.end_range`.
        #[clap(long)]
        end: Option<u64>,
        /// Player numbers per batch file, overriding `generate.batch_size`.
        #[clap(long)]
        batch_size: Option<u64>,
        /// Output directory, overriding `generate.output_directory`.
        #[clap(long)]
        output_dir: Option<PathBuf>,
    },
}

impl CliCommand {
    fn into_command(self, config: Option<PathBuf>) -> Result<Command, Error> {
        let command = match self {
            CliCommand::Encode { number } => Command::EncodeNumber(number),
            CliCommand::Range { start, end } => Command::EncodeRange { start, end },
            CliCommand::Generate {
                start,
                end,
                batch_size,
                output_dir,
            } => {
                let overrides = Overrides {
                    start_range: start,
                    end_range: end,
                    batch_size,
                    output_directory: output_dir,
                };
                Command::generate_from_settings(config, &overrides)?
            }
        };

        Ok(command)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse the command line arguments.
    let args = LedgerArgs::parse();

    // Configure the binary's stderr output based on the provided output format.
    let pretty = matches!(args.output_format, Some(LogOutputFormat::Pretty));
    ledger::logging::setup_logging("info,ledger=debug", pretty);

    let command = args.command.into_command(args.config)?;

    // Ctrl-C stops a running command at the next batch boundary.
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                tracing::warn!("received interrupt; stopping after the current batch");
                cancel.cancel();
            }
        }
    });

    let outcome = tokio::task::spawn_blocking(move || {
        let mut stdout = std::io::stdout().lock();
        command.execute(&mut stdout, &cancel)
    })
    .await??;

    watcher.abort();

    report(outcome)
}

/// Logs the outcome and turns incomplete results into a non-zero exit.
fn report(outcome: Outcome) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        Outcome::Encoded { identifier, tag } => {
            if let Err(error) = tag {
                tracing::warn!(identifier, %error, "player number has no tag");
                return Err(error.into());
            }
        }
        Outcome::Listed { written, skipped } => {
            tracing::info!(written, skipped, "tags listed");
        }
        Outcome::Generated(summary) => {
            for failure in &summary.failures {
                tracing::error!(batch = failure.index, error = %failure.error, "batch was not written");
            }
            for index in &summary.merge.missing {
                tracing::error!(batch = index, "batch was missing from the combined file");
            }
            if !summary.is_complete() {
                return Err(format!(
                    "{} of {} batches failed",
                    summary.failures.len() + summary.merge.missing.len(),
                    summary.batches
                )
                .into());
            }
        }
    }

    Ok(())
}
