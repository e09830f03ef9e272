//! The geometry command stream: encoding tile geometries and decoding them back.

mod command;
mod decoder;
mod encoder;

pub use command::{CLOSE_PATH, LINE_TO, MAX_COUNT, MOVE_TO, command_header, split_header, unzigzag, zigzag};
pub use decoder::{GeometryDecoder, SpecVersion, decode_geometry};
pub use encoder::{EncodeCursor, encode_feature_geometry, encode_geometry};
