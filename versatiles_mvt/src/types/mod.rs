mod blob;
mod geometry;
mod geo_interop;

pub use blob::Blob;
pub use geometry::*;
