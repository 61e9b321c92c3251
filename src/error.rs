use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::io_stream::SerializerState;

#[derive(Error, Debug)]
pub enum StreamError {
    /// The output file could not be created for writing.  Fatal for the
    /// serializer that hit it, never for the process.
    #[error("Error opening file for writing: {}", .path.display())]
    Open {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Serializer is not open for writing (state: {state})")]
    NotOpen { state: SerializerState },
    #[error("Serializer cannot be opened again (state: {state})")]
    AlreadyOpened { state: SerializerState },
    #[error("Record could not be formatted: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Unknown file format: {0}")]
    UnknownFormat(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
