//! Configuration management for the tag generator
use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

use crate::batch::SinkNames;
use crate::batch::DEFAULT_BATCH_PREFIX;
use crate::batch::DEFAULT_COMBINED_NAME;
use crate::config::error::LedgerConfigError;
use crate::pipeline::GenerateParams;

mod error;

/// Default number of player numbers per batch.
pub const DEFAULT_BATCH_SIZE: u64 = 500_000;

/// Trait for validating configuration values.
trait Validatable {
    /// Validate the configuration values.
    fn validate(&self, cfg: &Settings) -> Result<(), ConfigError>;
}

/// Top-level configuration for the tag generator
#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    /// Range and batching parameters
    pub generate: GenerateConfig,
    /// Output naming
    pub output: OutputConfig,
}

/// The identifier range to generate tags for and how to batch it.
#[derive(Deserialize, Clone, Debug)]
pub struct GenerateConfig {
    /// First player number of the range (inclusive).
    pub start_range: u64,
    /// Last player number of the range (inclusive).
    pub end_range: u64,
    /// Number of player numbers per batch file.
    pub batch_size: u64,
    /// Directory the batch files and the combined file are written to.
    pub output_directory: PathBuf,
}

impl Validatable for GenerateConfig {
    fn validate(&self, _: &Settings) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Message(
                LedgerConfigError::ZeroBatchSize.to_string(),
            ));
        }
        if self.start_range > self.end_range {
            return Err(ConfigError::Message(
                LedgerConfigError::InvertedRange(self.start_range, self.end_range).to_string(),
            ));
        }

        Ok(())
    }
}

/// How the output files are named.
#[derive(Deserialize, Clone, Debug)]
pub struct OutputConfig {
    /// Batch files are named `<batch_prefix><index>.txt`.
    pub batch_prefix: String,
    /// Name of the combined file.
    pub combined_name: String,
}

impl Validatable for OutputConfig {
    fn validate(&self, _: &Settings) -> Result<(), ConfigError> {
        let names = [
            ("output.batch_prefix", &self.batch_prefix),
            ("output.combined_name", &self.combined_name),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(
                    LedgerConfigError::EmptyOutputName(key).to_string(),
                ));
            }
            if value.contains(['/', '\\']) {
                return Err(ConfigError::Message(
                    LedgerConfigError::OutputNameHasSeparator(key, value.clone()).to_string(),
                ));
            }
        }

        let names = SinkNames::new(&self.batch_prefix, &self.combined_name);
        if names.batch_index(&self.combined_name).is_some() {
            return Err(ConfigError::Message(
                LedgerConfigError::CombinedNameIsBatchName(self.combined_name.clone()).to_string(),
            ));
        }

        Ok(())
    }
}

/// Values given on the command line, which take precedence over both the
/// configuration file and the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Overrides `generate.start_range`.
    pub start_range: Option<u64>,
    /// Overrides `generate.end_range`.
    pub end_range: Option<u64>,
    /// Overrides `generate.batch_size`.
    pub batch_size: Option<u64>,
    /// Overrides `generate.output_directory`.
    pub output_directory: Option<PathBuf>,
}

impl Settings {
    /// Initializing the global config first with default values and then with
    /// provided/overwritten environment variables. The explicit separator with
    /// double underscores is needed to correctly parse the nested config structure.
    ///
    /// The environment variables are prefixed with `LEDGER_` and the nested
    /// fields are separated with double underscores. For example, the path
    /// `generate.batch_size` is parsed as following:
    ///
    /// ```text
    /// LEDGER_GENERATE__BATCH_SIZE
    /// ^^^^^^ ^^^^^^^^  ^^^^^^^^^^
    ///    │  ^    │   ^^     │
    ///    │  │    │   │      └ The `batch_size` field of the `generate` object
    ///    │  │    │   └ separator("__")
    ///    │  │    └ The `generate` field of the root object (`Settings`)
    ///    │  └ prefix_separator("_")
    ///    └ with_prefix("LEDGER")
    /// ```
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        Self::new_with_overrides(config_path, &Overrides::default())
    }

    /// Same as [`Settings::new`], with command line values layered on top.
    pub fn new_with_overrides(
        config_path: Option<impl AsRef<Path>>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix("LEDGER")
            .separator("__")
            .try_parsing(true)
            .prefix_separator("_");

        let mut cfg_builder = Config::builder();

        cfg_builder = cfg_builder.set_default("generate.batch_size", DEFAULT_BATCH_SIZE)?;
        cfg_builder = cfg_builder.set_default("generate.output_directory", ".")?;
        cfg_builder = cfg_builder.set_default("output.batch_prefix", DEFAULT_BATCH_PREFIX)?;
        cfg_builder = cfg_builder.set_default("output.combined_name", DEFAULT_COMBINED_NAME)?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(env);

        cfg_builder = cfg_builder
            .set_override_option("generate.start_range", overrides.start_range)?
            .set_override_option("generate.end_range", overrides.end_range)?
            .set_override_option("generate.batch_size", overrides.batch_size)?
            .set_override_option(
                "generate.output_directory",
                overrides
                    .output_directory
                    .as_ref()
                    .map(|path| path.to_string_lossy().into_owned()),
            )?;

        let cfg = cfg_builder.build()?;

        let settings: Settings = cfg.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Perform validation on the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.generate.validate(self)?;
        self.output.validate(self)?;

        Ok(())
    }

    /// The run parameters described by these settings.
    pub fn generate_params(&self) -> GenerateParams {
        GenerateParams {
            start_range: self.generate.start_range,
            end_range: self.generate.end_range,
            batch_size: self.generate.batch_size,
        }
    }

    /// The naming scheme described by these settings.
    pub fn sink_names(&self) -> SinkNames {
        SinkNames::new(&self.output.batch_prefix, &self.output.combined_name)
    }
}
