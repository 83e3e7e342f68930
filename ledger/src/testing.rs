//! Module with testing utility functions.

#![allow(clippy::unwrap_in_result, clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::io::{Read, Write};

use crate::batch::{MemorySink, OutputSink};
use crate::config::Settings;

/// The path for the configuration file that we should use during testing.
pub const DEFAULT_CONFIG_PATH: Option<&str> = Some("./src/config/default");

impl Settings {
    /// Create a new `Settings` instance from the default configuration file.
    /// This is useful for testing.
    pub fn new_from_default_config() -> Result<Self, config::ConfigError> {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

/// Clears all ledger-specific configuration environment variables. This is needed
/// for a number of tests which use the `Settings` struct due to the fact that
/// `cargo test` runs tests in threads, and environment variables are per-process.
pub fn clear_env() {
    for var in std::env::vars() {
        if var.0.starts_with("LEDGER_") {
            std::env::remove_var(var.0);
        }
    }
}

/// A [`MemorySink`] that refuses to create or open selected streams, for
/// exercising partial failures.
#[derive(Debug, Default)]
pub struct FlakySink {
    /// The streams that were written successfully.
    pub inner: MemorySink,
    fail_create: BTreeSet<String>,
    fail_open: BTreeSet<String>,
}

impl FlakySink {
    /// Creates a sink that behaves like a [`MemorySink`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `create` fail for the named stream.
    pub fn fail_create(mut self, name: impl Into<String>) -> Self {
        self.fail_create.insert(name.into());
        self
    }

    /// Makes `open` fail for the named stream.
    pub fn fail_open(mut self, name: impl Into<String>) -> Self {
        self.fail_open.insert(name.into());
        self
    }

    fn refused(name: &str) -> std::io::Error {
        std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("{name} is not writable"),
        )
    }
}

impl OutputSink for FlakySink {
    fn create(&self, name: &str) -> std::io::Result<Box<dyn Write + '_>> {
        if self.fail_create.contains(name) {
            return Err(Self::refused(name));
        }
        self.inner.create(name)
    }

    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read + '_>> {
        if self.fail_open.contains(name) {
            return Err(Self::refused(name));
        }
        self.inner.open(name)
    }
}
