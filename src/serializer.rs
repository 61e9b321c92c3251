//! High-level [`FileSerializer`] API — the primary embedding surface.
//!
//! ```no_run
//! use recstream::{make_serializer, FileFormat, SerializerOptions};
//! use serde_json::json;
//!
//! let mut out = make_serializer(FileFormat::JsonGzip, SerializerOptions::default());
//! if out.open_file("steps.json.gz") {
//!     out.serialize(&json!({"step": 0}), false)?;
//!     out.serialize(&json!({"step": 1}), true)?;
//!     out.close_file()?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::codec::{OutputStream, DEFAULT_COMPRESSION_LEVEL};
use crate::error::StreamError;
use crate::format::FileFormat;
use crate::io_stream::{SequentialFileSerializer, SerializerState, DEFAULT_BASENAME, DEFAULT_CHANNEL};
use crate::record::{JsonRecordSerializer, DEFAULT_INDENT};

// ── SerializerOptions ─────────────────────────────────────────────────────────

/// Configuration for [`make_serializer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Name attached to every log event from this serializer.
    pub channel:           String,
    /// Anchor for the filename used when `open_file("")` is called.
    pub default_basename:  String,
    /// 0–9; clamped per codec.  Ignored for plain JSON.
    pub compression_level: u32,
    pub indent:            usize,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            channel:           DEFAULT_CHANNEL.into(),
            default_basename:  DEFAULT_BASENAME.into(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            indent:            DEFAULT_INDENT,
        }
    }
}

impl SerializerOptions {
    /// Load options from a JSON object.  Missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| StreamError::Config(format!("{}: {e}", path.display())))
    }
}

// ── FileSerializer ────────────────────────────────────────────────────────────

/// Open / serialize / close, independent of format and compression.
///
/// Dropping a handle closes its file.
pub trait FileSerializer {
    /// Open `filename`, or the default filename when it is empty.  Returns
    /// `false` if the file could not be opened; the failure is logged and
    /// the handle stays unusable.
    fn open_file(&mut self, filename: &str) -> bool;

    /// Append one record.  `write_delim` must be `false` for the first
    /// record of the file and `true` for every record after it.
    fn serialize(&mut self, record: &Value, write_delim: bool) -> Result<(), StreamError>;

    /// Finish the file.  Safe to call in any state and more than once.
    fn close_file(&mut self) -> Result<(), StreamError>;

    fn file_format(&self) -> FileFormat;

    fn state(&self) -> SerializerState;

    fn path(&self) -> Option<&Path>;

    fn default_filename(&self) -> String;
}

/// A JSON array written through one of the [`FileFormat`] transports.
pub struct JsonFileSerializer {
    inner:  SequentialFileSerializer<JsonRecordSerializer>,
    format: FileFormat,
}

impl JsonFileSerializer {
    pub fn new(format: FileFormat, opts: &SerializerOptions) -> Self {
        let stream = OutputStream::with_options(format.codec(), opts.compression_level, &opts.channel);
        let inner  = SequentialFileSerializer::with_options(
            JsonRecordSerializer::with_indent(opts.indent),
            stream,
            &opts.default_basename,
            &opts.channel,
        );
        Self { inner, format }
    }

    pub fn records_written(&self) -> u64 { self.inner.records_written() }
}

impl FileSerializer for JsonFileSerializer {
    fn open_file(&mut self, filename: &str) -> bool { self.inner.open_file(filename) }

    fn serialize(&mut self, record: &Value, write_delim: bool) -> Result<(), StreamError> {
        self.inner.serialize(record, write_delim)
    }

    fn close_file(&mut self) -> Result<(), StreamError> { self.inner.close_file() }

    fn file_format(&self) -> FileFormat { self.format }

    fn state(&self) -> SerializerState { self.inner.state() }

    fn path(&self) -> Option<&Path> { self.inner.path() }

    fn default_filename(&self) -> String { self.inner.default_filename() }
}

// ── Factory ───────────────────────────────────────────────────────────────────

/// Build the serializer for `format`.
pub fn make_serializer(format: FileFormat, opts: SerializerOptions) -> Box<dyn FileSerializer> {
    Box::new(JsonFileSerializer::new(format, &opts))
}

/// Build a serializer whose format matches the suffix of `path`.  Unknown
/// suffixes fall back to plain JSON.
pub fn make_serializer_for_path<P: AsRef<Path>>(
    path: P,
    opts: SerializerOptions,
) -> Box<dyn FileSerializer> {
    let path = path.as_ref();
    let format = FileFormat::detect(path).unwrap_or_else(|| {
        warn!(channel = %opts.channel, "Cannot infer format from {}, using json", path.display());
        FileFormat::Json
    });
    make_serializer(format, opts)
}
