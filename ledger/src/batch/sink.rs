//! Named output streams that batches are written to and merged from.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Default prefix of batch stream names.
pub const DEFAULT_BATCH_PREFIX: &str = "tags";

/// Default name of the combined stream.
pub const DEFAULT_COMBINED_NAME: &str = "combined_output.txt";

/// Extension appended to every batch stream name.
const BATCH_EXTENSION: &str = "txt";

/// A destination for named byte streams.
///
/// Each stream is written once per run: [`OutputSink::create`] truncates any
/// existing stream with the same name. Streams are read back by the merge
/// step through [`OutputSink::open`].
pub trait OutputSink {
    /// Creates (or truncates) the named stream and returns a writer for it.
    fn create(&self, name: &str) -> std::io::Result<Box<dyn Write + '_>>;

    /// Opens the named stream for reading.
    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read + '_>>;

    /// Describes where the named stream lives, for logs and errors.
    fn location(&self, name: &str) -> String {
        name.to_string()
    }
}

/// How batch and combined streams are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkNames {
    /// Prefix of each batch stream, followed by the batch index.
    pub batch_prefix: String,
    /// Name of the combined stream.
    pub combined_name: String,
}

impl SinkNames {
    /// Creates a naming scheme.
    pub fn new(batch_prefix: impl Into<String>, combined_name: impl Into<String>) -> Self {
        Self {
            batch_prefix: batch_prefix.into(),
            combined_name: combined_name.into(),
        }
    }

    /// Name of the stream for the batch with the given index, e.g. `tags3.txt`.
    pub fn batch_name(&self, index: u64) -> String {
        format!("{}{}.{}", self.batch_prefix, index, BATCH_EXTENSION)
    }

    /// Returns the batch index if `name` is exactly the name of a batch
    /// stream under this scheme.
    pub fn batch_index(&self, name: &str) -> Option<u64> {
        let digits = name
            .strip_prefix(self.batch_prefix.as_str())?
            .strip_suffix(BATCH_EXTENSION)?
            .strip_suffix('.')?;
        let index = digits.parse::<u64>().ok()?;

        // Rejects `+1` and zero padding, which `batch_name` never produces.
        (self.batch_name(index) == name).then_some(index)
    }

    /// Returns the name of the first batch stream, among the first
    /// `batch_count`, that the combined stream would overwrite.
    pub fn combined_collision(&self, batch_count: u64) -> Option<&str> {
        self.batch_index(&self.combined_name)
            .filter(|&index| index < batch_count)
            .map(|_| self.combined_name.as_str())
    }
}

impl Default for SinkNames {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_PREFIX, DEFAULT_COMBINED_NAME)
    }
}

/// Writes streams as files inside a directory.
///
/// The directory is created on first use if it does not exist.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Creates a sink rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory streams are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl OutputSink for DirectorySink {
    fn create(&self, name: &str) -> std::io::Result<Box<dyn Write + '_>> {
        std::fs::create_dir_all(&self.root)?;
        let file = File::create(self.path(name))?;
        Ok(Box::new(file))
    }

    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.path(name))?;
        Ok(Box::new(file))
    }

    fn location(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }
}

/// Keeps streams in memory, keyed by name.
#[derive(Debug, Default)]
pub struct MemorySink {
    streams: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the named stream's contents, if it exists.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.streams.borrow().get(name).cloned()
    }

    /// Returns the named stream's contents as UTF-8 text, if it exists.
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Lists the names of all streams, in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.streams.borrow().keys().cloned().collect()
    }
}

/// Appends to a single stream of a [`MemorySink`].
struct MemoryWriter<'a> {
    streams: &'a RefCell<BTreeMap<String, Vec<u8>>>,
    name: String,
}

impl Write for MemoryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.streams
            .borrow_mut()
            .entry(self.name.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl OutputSink for MemorySink {
    fn create(&self, name: &str) -> std::io::Result<Box<dyn Write + '_>> {
        self.streams.borrow_mut().insert(name.to_string(), Vec::new());
        Ok(Box::new(MemoryWriter {
            streams: &self.streams,
            name: name.to_string(),
        }))
    }

    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read + '_>> {
        // Readers get a snapshot so the merge can write while reading.
        let bytes = self.get(name).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no stream named {name}"),
            )
        })?;
        Ok(Box::new(Cursor::new(bytes)))
    }
}
