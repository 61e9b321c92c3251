mod common;

use common::read_back;
use recstream::codec::{Codec, OutputStream};
use recstream::{FileFormat, StreamError};
use std::io::ErrorKind;
use tempfile::TempDir;

#[test]
fn test_codec_suffixes() {
    assert_eq!(Codec::None.suffix(), "");
    assert_eq!(Codec::Gzip.suffix(), ".gz");
    assert_eq!(Codec::Bzip2.suffix(), ".bz2");
    assert_eq!(Codec::Zlib.suffix(), ".zip");

    let stream = OutputStream::new(Codec::Bzip2);
    assert_eq!(stream.make_default_filename("run.json"), "run.json.bz2");
}

#[test]
fn test_codec_names_roundtrip() {
    for codec in Codec::ALL {
        assert_eq!(Codec::from_name(codec.name()), Some(codec));
    }
    assert_eq!(Codec::from_name("GZ"), Some(Codec::Gzip));
    assert_eq!(Codec::from_name("zip"), Some(Codec::Zlib));
    assert_eq!(Codec::from_name("xz"), None);
}

#[test]
fn test_stream_writes_in_order_through_every_codec() {
    let dir = TempDir::new().unwrap();
    let formats = [
        (Codec::None,  FileFormat::Json),
        (Codec::Gzip,  FileFormat::JsonGzip),
        (Codec::Bzip2, FileFormat::JsonBzip2),
        (Codec::Zlib,  FileFormat::JsonZip),
    ];

    for (codec, format) in formats {
        let path = dir.path().join(format!("stream{}", codec.suffix()));
        let mut stream = OutputStream::new(codec);
        stream.open(path.to_str().unwrap(), "unused").unwrap();
        assert!(stream.is_open());
        for chunk in ["alpha ", "beta ", "gamma"] {
            stream.write(chunk.as_bytes()).unwrap();
        }
        stream.close().unwrap();
        assert!(!stream.is_open());

        assert_eq!(read_back(&path, format), "alpha beta gamma", "codec {}", codec.name());
    }
}

#[test]
fn test_large_payload_compresses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.gz");
    let payload = "0123456789".repeat(100_000);

    let mut stream = OutputStream::new(Codec::Gzip);
    stream.open(path.to_str().unwrap(), "unused").unwrap();
    stream.write(payload.as_bytes()).unwrap();
    stream.close().unwrap();

    assert!(std::fs::metadata(&path).unwrap().len() < payload.len() as u64 / 10);
    assert_eq!(read_back(&path, FileFormat::JsonGzip), payload);
}

#[test]
fn test_empty_filename_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let default = dir.path().join("fallback");

    let mut stream = OutputStream::new(Codec::None);
    let opened = stream.open("", default.to_str().unwrap()).unwrap();
    stream.close().unwrap();

    assert_eq!(opened, default);
    assert_eq!(stream.path(), Some(default.as_path()));
    assert!(default.exists());
}

#[test]
fn test_open_failure_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no").join("such").join("file");

    let mut stream = OutputStream::new(Codec::Zlib);
    match stream.open(path.to_str().unwrap(), "unused") {
        Err(StreamError::Open { path: p, source }) => {
            assert_eq!(p, path);
            assert_eq!(source.kind(), ErrorKind::NotFound);
        }
        other => panic!("expected open failure, got {other:?}"),
    }
    assert!(!stream.is_open());
}

#[test]
fn test_write_on_unopened_stream_errors() {
    let mut stream = OutputStream::new(Codec::Gzip);
    let err = stream.write(b"data").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConnected);
}

#[test]
fn test_close_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("idem");

    let mut never_opened = OutputStream::new(Codec::Bzip2);
    never_opened.close().unwrap();
    never_opened.close().unwrap();

    let mut stream = OutputStream::new(Codec::None);
    stream.open(path.to_str().unwrap(), "unused").unwrap();
    stream.write(b"once").unwrap();
    stream.close().unwrap();
    stream.close().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"once");
}

#[test]
fn test_level_is_clamped() {
    let dir = TempDir::new().unwrap();
    for codec in [Codec::Gzip, Codec::Bzip2, Codec::Zlib] {
        for level in [0, 9, 42] {
            let path = dir.path().join(format!("lvl{level}{}", codec.suffix()));
            let mut stream = OutputStream::with_options(codec, level, "test");
            stream.open(path.to_str().unwrap(), "unused").unwrap();
            stream.write(b"clamped").unwrap();
            stream.close().unwrap();

            let format = FileFormat::ALL.into_iter().find(|f| f.codec() == codec).unwrap();
            assert_eq!(read_back(&path, format), "clamped");
        }
    }
}
