//! Record formatting: how one record becomes bytes inside the container.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::StreamError;

/// Indentation width used for pretty-printed JSON records.
pub const DEFAULT_INDENT: usize = 3;

pub const JSON_ARRAY_OPEN:  &[u8] = b"\n[\n";
pub const JSON_ARRAY_CLOSE: &[u8] = b"\n]\n";
pub const JSON_DELIMITER:   &[u8] = b",\n";

/// A container format for a sequence of records.
///
/// Implementors supply the structural markers written when the file is
/// opened and closed, and the per-record encoding including the delimiter.
pub trait RecordFormat {
    /// Extension without a leading dot, e.g. `"json"`.
    fn extension(&self) -> &'static str;

    fn make_default_filename(&self, base: &str) -> String {
        format!("{base}.{}", self.extension())
    }

    fn open_marker(&self) -> &[u8];

    fn close_marker(&self) -> &[u8];

    /// Append `record` to `out`, preceded by the delimiter when
    /// `write_delim` is set.  On error `out` is left as it was.
    fn format<T: Serialize + ?Sized>(
        &self,
        record:      &T,
        write_delim: bool,
        out:         &mut Vec<u8>,
    ) -> Result<(), StreamError>;
}

/// Elements of a single JSON array, separated by `,\n`.
#[derive(Debug, Clone)]
pub struct JsonRecordSerializer {
    indent: Vec<u8>,
}

impl JsonRecordSerializer {
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    pub fn with_indent(width: usize) -> Self {
        Self { indent: vec![b' '; width] }
    }

    pub fn indent(&self) -> usize { self.indent.len() }
}

impl Default for JsonRecordSerializer {
    fn default() -> Self { Self::new() }
}

impl RecordFormat for JsonRecordSerializer {
    fn extension(&self) -> &'static str { "json" }

    fn open_marker(&self) -> &[u8] { JSON_ARRAY_OPEN }

    fn close_marker(&self) -> &[u8] { JSON_ARRAY_CLOSE }

    fn format<T: Serialize + ?Sized>(
        &self,
        record:      &T,
        write_delim: bool,
        out:         &mut Vec<u8>,
    ) -> Result<(), StreamError> {
        let start = out.len();
        if write_delim {
            out.extend_from_slice(JSON_DELIMITER);
        }
        let result = {
            let formatter = PrettyFormatter::with_indent(&self.indent);
            let mut ser = serde_json::Serializer::with_formatter(&mut *out, formatter);
            record.serialize(&mut ser)
        };
        if let Err(e) = result {
            out.truncate(start);
            return Err(StreamError::Format(e));
        }
        Ok(())
    }
}

