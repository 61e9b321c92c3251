//! Sequential file serializer: the open → serialize* → close lifecycle.
//!
//! # Composition
//! [`SequentialFileSerializer`] owns one [`OutputStream`] (where bytes go,
//! and how they are compressed) and one [`RecordFormat`] (how records and
//! the surrounding container look).  Neither knows about the other; this
//! type drives both.
//!
//! # States
//! ```text
//! Created ──open_file──▶ Opened ──close_file──▶ Closed
//! ```
//! `serialize` is only valid in `Opened`.  `open_file` is only valid in
//! `Created`; a failed open leaves the serializer in `Created` with nothing
//! written.  `close_file` is valid everywhere and only does work the first
//! time it runs in `Opened`.  Dropping the serializer closes it.
//!
//! A failed write ends the channel: the file is released without its close
//! marker, the state becomes `Closed`, and every later `serialize` returns
//! [`StreamError::NotOpen`].
//!
//! # Delimiters
//! The caller passes `write_delim = false` for the first record and `true`
//! for every later one, giving N−1 delimiters for N records.
//! [`append`](SequentialFileSerializer::append) tracks this automatically.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::codec::OutputStream;
use crate::error::StreamError;
use crate::record::RecordFormat;

/// Anchor name used to derive a filename when none is given.
pub const DEFAULT_BASENAME: &str = "output";
/// Channel name attached to log events when none is configured.
pub const DEFAULT_CHANNEL:  &str = "output";

// ── SerializerState ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializerState {
    Created,
    Opened,
    Closed,
}

impl fmt::Display for SerializerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SerializerState::Created => "created",
            SerializerState::Opened  => "opened",
            SerializerState::Closed  => "closed",
        })
    }
}

// ── SequentialFileSerializer ─────────────────────────────────────────────────

pub struct SequentialFileSerializer<F: RecordFormat> {
    stream:           OutputStream,
    format:           F,
    state:            SerializerState,
    default_basename: String,
    channel:          String,

    // Reused between records; holds one formatted record at a time.
    scratch:          Vec<u8>,
    records_written:  u64,
}

impl<F: RecordFormat> SequentialFileSerializer<F> {
    pub fn new(format: F, stream: OutputStream) -> Self {
        Self::with_options(format, stream, DEFAULT_BASENAME, DEFAULT_CHANNEL)
    }

    pub fn with_options(
        format:           F,
        stream:           OutputStream,
        default_basename: &str,
        channel:          &str,
    ) -> Self {
        Self {
            stream,
            format,
            state:            SerializerState::Created,
            default_basename: default_basename.to_owned(),
            channel:          channel.to_owned(),
            scratch:          Vec::new(),
            records_written:  0,
        }
    }

    pub fn state(&self) -> SerializerState { self.state }

    /// Effective output path, once a file has been opened.
    pub fn path(&self) -> Option<&Path> { self.stream.path() }

    pub fn records_written(&self) -> u64 { self.records_written }

    pub fn format(&self) -> &F { &self.format }

    /// Filename used when `open_file` is given an empty name: the anchor
    /// name, then the record extension, then the codec suffix.
    pub fn default_filename(&self) -> String {
        self.stream
            .make_default_filename(&self.format.make_default_filename(&self.default_basename))
    }

    /// Open the output file and write the container's open marker.
    ///
    /// Returns `false` if the file cannot be created or the serializer is
    /// not in `Created`.  The reason is logged.
    pub fn open_file(&mut self, filename: &str) -> bool {
        self.try_open_file(filename).is_ok()
    }

    /// [`open_file`](Self::open_file) with the failure returned to the caller.
    pub fn try_open_file(&mut self, filename: &str) -> Result<PathBuf, StreamError> {
        if self.state != SerializerState::Created {
            error!(channel = %self.channel, state = %self.state,
                   "Output file already opened once, refusing to reopen");
            return Err(StreamError::AlreadyOpened { state: self.state });
        }

        let default_name = self.default_filename();
        let path = self.stream.open(filename, &default_name)?;
        self.state = SerializerState::Opened;

        if let Err(e) = self.on_file_opened() {
            error!(channel = %self.channel, "Failed to start output file {}: {e}", path.display());
            self.release_after_failure();
            return Err(e);
        }
        Ok(path)
    }

    /// Format `record` and append it to the file.
    ///
    /// Nothing is written if the record cannot be formatted.
    pub fn serialize<T: Serialize + ?Sized>(
        &mut self,
        record:      &T,
        write_delim: bool,
    ) -> Result<(), StreamError> {
        if self.state != SerializerState::Opened {
            return Err(StreamError::NotOpen { state: self.state });
        }
        if write_delim != (self.records_written > 0) {
            warn!(channel = %self.channel, write_delim, records = self.records_written,
                  "Delimiter flag does not match record position; output may not parse");
        }

        self.scratch.clear();
        self.format.format(record, write_delim, &mut self.scratch)?;
        if let Err(e) = self.stream.write(&self.scratch) {
            error!(channel = %self.channel, records = self.records_written,
                   "Write failed, abandoning output file: {e}");
            self.release_after_failure();
            return Err(e.into());
        }
        self.records_written += 1;
        Ok(())
    }

    /// Serialize `record` with the delimiter flag derived from how many
    /// records this serializer has already written.
    pub fn append<T: Serialize + ?Sized>(&mut self, record: &T) -> Result<(), StreamError> {
        let write_delim = self.records_written > 0;
        self.serialize(record, write_delim)
    }

    /// Write the close marker and release the file.  Only the first call
    /// after a successful open does anything.
    ///
    /// The serializer is `Closed` afterwards even if finishing the file
    /// failed; the first error is returned.
    pub fn close_file(&mut self) -> Result<(), StreamError> {
        if self.state != SerializerState::Opened {
            debug!(channel = %self.channel, state = %self.state, "close_file: nothing to close");
            return Ok(());
        }
        self.state = SerializerState::Closed;

        let closing = self.on_file_closing();
        let closed  = self.stream.close();
        info!(channel = %self.channel, records = self.records_written, "Finished output file");

        closing?;
        closed?;
        Ok(())
    }

    /// The file may hold a partial record; drop it without a close marker.
    fn release_after_failure(&mut self) {
        self.state = SerializerState::Closed;
        if let Err(e) = self.stream.close() {
            warn!(channel = %self.channel, "Error releasing failed output file: {e}");
        }
    }

    // ── Framing hooks ────────────────────────────────────────────────────────

    fn on_file_opened(&mut self) -> Result<(), StreamError> {
        self.stream.write(self.format.open_marker())?;
        Ok(())
    }

    fn on_file_closing(&mut self) -> Result<(), StreamError> {
        self.stream.write(self.format.close_marker())?;
        Ok(())
    }
}

impl<F: RecordFormat> Drop for SequentialFileSerializer<F> {
    fn drop(&mut self) {
        if let Err(e) = self.close_file() {
            warn!(channel = %self.channel, "Error closing output file on drop: {e}");
        }
    }
}
