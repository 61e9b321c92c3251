//! Byte transport: plain files and compressed files behind one contract.
//!
//! # Layers
//! [`OutputStream`] owns at most one open file.  The file is wrapped in a
//! [`ByteSink`] chosen by [`Codec`] when the stream is opened, so callers
//! write uncompressed bytes and never branch on the compression type.
//!
//! # Codecs
//! | Codec   | Suffix  | Stream format                 |
//! |---------|---------|-------------------------------|
//! | `None`  | ``      | raw bytes                     |
//! | `Gzip`  | `.gz`   | gzip member (RFC 1952)        |
//! | `Bzip2` | `.bz2`  | bzip2 stream                  |
//! | `Zlib`  | `.zip`  | zlib stream (RFC 1950)        |
//!
//! The `.zip` suffix is historical: the payload is a bare zlib stream, not a
//! PKZIP archive.
//!
//! Adding a codec means one new [`ByteSink`] impl plus one arm in
//! [`Codec::wrap`]; nothing above this module changes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::StreamError;
use crate::io_stream::DEFAULT_CHANNEL;

/// Default compression level applied when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
/// Capacity of the write buffer placed between the codec and the file.
pub const WRITE_BUFFER_SIZE: usize = 64 * 1024;

// ── Codec ────────────────────────────────────────────────────────────────────

/// Transport discriminant.  Chosen once, when the serializer is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    None,
    Gzip,
    Bzip2,
    Zlib,
}

impl Codec {
    pub const ALL: [Codec; 4] = [Codec::None, Codec::Gzip, Codec::Bzip2, Codec::Zlib];

    /// Filename suffix appended by [`OutputStream::make_default_filename`].
    pub fn suffix(self) -> &'static str {
        match self {
            Codec::None  => "",
            Codec::Gzip  => ".gz",
            Codec::Bzip2 => ".bz2",
            Codec::Zlib  => ".zip",
        }
    }

    /// Human-readable name (diagnostics and CLI).
    pub fn name(self) -> &'static str {
        match self {
            Codec::None  => "none",
            Codec::Gzip  => "gzip",
            Codec::Bzip2 => "bzip2",
            Codec::Zlib  => "zlib",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none"          => Some(Codec::None),
            "gzip" | "gz"   => Some(Codec::Gzip),
            "bzip2" | "bz2" => Some(Codec::Bzip2),
            "zlib" | "zip"  => Some(Codec::Zlib),
            _               => None,
        }
    }

    /// Wrap `writer` in the sink for this codec.
    ///
    /// `level` is clamped to the range the codec accepts (0–9, and 1–9 for
    /// bzip2).  It is ignored by [`Codec::None`].
    pub fn wrap<W: Write + 'static>(self, writer: W, level: u32) -> Box<dyn ByteSink> {
        let buffered = BufWriter::with_capacity(WRITE_BUFFER_SIZE, writer);
        match self {
            Codec::None  => Box::new(PlainSink { inner: buffered }),
            Codec::Gzip  => Box::new(GzipSink {
                inner: flate2::write::GzEncoder::new(buffered, flate2::Compression::new(level.min(9))),
            }),
            Codec::Bzip2 => Box::new(Bzip2Sink {
                inner: bzip2::write::BzEncoder::new(buffered, bzip2::Compression::new(level.clamp(1, 9))),
            }),
            Codec::Zlib  => Box::new(ZlibSink {
                inner: flate2::write::ZlibEncoder::new(buffered, flate2::Compression::new(level.min(9))),
            }),
        }
    }
}

// ── ByteSink ─────────────────────────────────────────────────────────────────

/// Destination for serialized bytes.
pub trait ByteSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Write any codec trailer, flush, and release the underlying writer.
    fn finish(self: Box<Self>) -> io::Result<()>;
}

pub struct PlainSink<W: Write> {
    inner: BufWriter<W>,
}
impl<W: Write> ByteSink for PlainSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> { self.inner.write_all(bytes) }
    fn finish(mut self: Box<Self>) -> io::Result<()> { self.inner.flush() }
}

pub struct GzipSink<W: Write> {
    inner: flate2::write::GzEncoder<BufWriter<W>>,
}
impl<W: Write> ByteSink for GzipSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> { self.inner.write_all(bytes) }
    fn finish(self: Box<Self>) -> io::Result<()> { self.inner.finish()?.flush() }
}

pub struct Bzip2Sink<W: Write> {
    inner: bzip2::write::BzEncoder<BufWriter<W>>,
}
impl<W: Write> ByteSink for Bzip2Sink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> { self.inner.write_all(bytes) }
    fn finish(self: Box<Self>) -> io::Result<()> { self.inner.finish()?.flush() }
}

pub struct ZlibSink<W: Write> {
    inner: flate2::write::ZlibEncoder<BufWriter<W>>,
}
impl<W: Write> ByteSink for ZlibSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> { self.inner.write_all(bytes) }
    fn finish(self: Box<Self>) -> io::Result<()> { self.inner.finish()?.flush() }
}

// ── OutputStream ─────────────────────────────────────────────────────────────

/// A file opened for sequential writing through a [`Codec`].
///
/// Writes append in call order.  [`close`](Self::close) is idempotent and a
/// no-op on a stream that was never opened.
pub struct OutputStream {
    codec:   Codec,
    level:   u32,
    channel: String,
    sink:    Option<Box<dyn ByteSink>>,
    path:    Option<PathBuf>,
}

impl OutputStream {
    pub fn new(codec: Codec) -> Self {
        Self::with_options(codec, DEFAULT_COMPRESSION_LEVEL, DEFAULT_CHANNEL)
    }

    pub fn with_options(codec: Codec, level: u32, channel: &str) -> Self {
        Self {
            codec,
            level,
            channel: channel.to_owned(),
            sink:    None,
            path:    None,
        }
    }

    pub fn codec(&self) -> Codec { self.codec }

    pub fn is_open(&self) -> bool { self.sink.is_some() }

    /// Path of the file this stream was last opened on.
    pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

    /// `base` plus this stream's codec suffix, e.g. `out.json` → `out.json.gz`.
    pub fn make_default_filename(&self, base: &str) -> String {
        format!("{base}{}", self.codec.suffix())
    }

    /// Create `filename` for writing, or `default_filename` when `filename`
    /// is empty.  Any handle already held is finished first.
    ///
    /// On failure the stream stays closed and every later write fails.
    pub fn open(&mut self, filename: &str, default_filename: &str) -> Result<PathBuf, StreamError> {
        let output_file = if filename.is_empty() {
            warn!(channel = %self.channel, "No output file specified, using {default_filename}");
            default_filename
        } else {
            filename
        };
        let path = PathBuf::from(output_file);

        if self.sink.is_some() {
            self.close()?;
        }

        match File::create(&path) {
            Ok(file) => {
                info!(channel = %self.channel, codec = self.codec.name(),
                      "Writing output to file: {}", path.display());
                self.sink = Some(self.codec.wrap(file, self.level));
                self.path = Some(path.clone());
                Ok(path)
            }
            Err(source) => {
                error!(channel = %self.channel, "Error opening file for writing: {}: {source}",
                       path.display());
                Err(StreamError::Open { path, source })
            }
        }
    }

    pub fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.write_bytes(bytes),
            None       => Err(not_open()),
        }
    }

    /// Finish the codec, flush, and release the file.
    pub fn close(&mut self) -> io::Result<()> {
        if let Some(sink) = self.sink.take() {
            sink.finish()?;
            if let Some(path) = &self.path {
                debug!(channel = %self.channel, "Closed output file: {}", path.display());
            }
        }
        Ok(())
    }
}

fn not_open() -> io::Error { io::Error::new(io::ErrorKind::NotConnected, "output stream is not open") }
