//! Output file formats and their canonical extensions.
//!
//! The mapping is fixed and bidirectional:
//!
//! | Format      | Extension  |
//! |-------------|------------|
//! | `Json`      | `json`     |
//! | `JsonGzip`  | `json.gz`  |
//! | `JsonBzip2` | `json.bz2` |
//! | `JsonZip`   | `json.zip` |
//!
//! Serde and `Display` both use the extension string, so a format tag in a
//! config file reads the same as the file suffix it produces.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::error::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FileFormat {
    #[default]
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "json.gz")]
    JsonGzip,
    #[serde(rename = "json.bz2")]
    JsonBzip2,
    #[serde(rename = "json.zip")]
    JsonZip,
}

impl FileFormat {
    pub const ALL: [FileFormat; 4] = [
        FileFormat::Json,
        FileFormat::JsonGzip,
        FileFormat::JsonBzip2,
        FileFormat::JsonZip,
    ];

    /// Canonical extension, without a leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json      => "json",
            FileFormat::JsonGzip  => "json.gz",
            FileFormat::JsonBzip2 => "json.bz2",
            FileFormat::JsonZip   => "json.zip",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Transport used to write this format.
    pub fn codec(self) -> Codec {
        match self {
            FileFormat::Json      => Codec::None,
            FileFormat::JsonGzip  => Codec::Gzip,
            FileFormat::JsonBzip2 => Codec::Bzip2,
            FileFormat::JsonZip   => Codec::Zlib,
        }
    }

    /// Guess the format from a path suffix.  The longest matching extension
    /// wins, so `run.json.gz` is `JsonGzip` rather than nothing.
    pub fn detect<P: AsRef<Path>>(path: P) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?;
        Self::ALL
            .into_iter()
            .filter(|f| name.ends_with(&format!(".{}", f.extension())))
            .max_by_key(|f| f.extension().len())
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Accepts either the extension (`json.gz`) or a codec name (`gzip`, `gz`).
impl FromStr for FileFormat {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().trim_start_matches('.').to_lowercase();
        if let Some(f) = Self::from_extension(&lower) {
            return Ok(f);
        }
        match Codec::from_name(&lower) {
            Some(Codec::None)  => Ok(FileFormat::Json),
            Some(Codec::Gzip)  => Ok(FileFormat::JsonGzip),
            Some(Codec::Bzip2) => Ok(FileFormat::JsonBzip2),
            Some(Codec::Zlib)  => Ok(FileFormat::JsonZip),
            None               => Err(StreamError::UnknownFormat(s.to_owned())),
        }
    }
}
