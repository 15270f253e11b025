//! Dataset input and output stages.

pub mod read;
pub mod values;
pub mod write;

pub use read::{ReadCsv, STREAM_THRESHOLD_BYTES, should_stream, slice_into_chunks};
pub use values::{any_to_i64, any_to_string};
pub use write::WriteCsv;
