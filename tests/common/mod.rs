#![allow(dead_code)]

use recstream::{FileFormat, SerializerOptions};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Decompress (if needed) and return the file contents as text.
pub fn read_back(path: &Path, format: FileFormat) -> String {
    let file = File::open(path).unwrap();
    let mut text = String::new();
    match format {
        FileFormat::Json      => { let mut f = file; f.read_to_string(&mut text).unwrap(); }
        FileFormat::JsonGzip  => { flate2::read::GzDecoder::new(file).read_to_string(&mut text).unwrap(); }
        FileFormat::JsonBzip2 => { bzip2::read::BzDecoder::new(file).read_to_string(&mut text).unwrap(); }
        FileFormat::JsonZip   => { flate2::read::ZlibDecoder::new(file).read_to_string(&mut text).unwrap(); }
    };
    text
}

pub fn parse_back(path: &Path, format: FileFormat) -> serde_json::Value {
    serde_json::from_str(&read_back(path, format)).unwrap()
}

/// Options whose default filename lands inside `dir`.
pub fn options_in(dir: &Path) -> SerializerOptions {
    SerializerOptions {
        channel:          "test".into(),
        default_basename: dir.join("run").to_string_lossy().into_owned(),
        ..SerializerOptions::default()
    }
}
