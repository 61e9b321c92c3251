pub mod error;
pub mod format;
pub mod codec;
pub mod record;
pub mod io_stream;
pub mod serializer;

pub use error::StreamError;
pub use format::FileFormat;
pub use codec::{Codec, OutputStream};
pub use record::{JsonRecordSerializer, RecordFormat};
pub use io_stream::{SequentialFileSerializer, SerializerState};
pub use serializer::{make_serializer, make_serializer_for_path, FileSerializer, SerializerOptions};
