//! Protobuf framing used by the vector tile schema.

mod reader;
mod writer;

pub use reader::PbfReader;
pub use writer::PbfWriter;
