//! Geometry codec, clipper, simplifier and validator for Mapbox Vector Tiles.
//!
//! Write path: source geometry → [`transform`] → [`simplify`] → [`clipper`] →
//! [`codec`] → [`vector_tile`] bytes. [`processor::LayerProcessor`] runs that path
//! for a whole layer.
//!
//! Read path: bytes → [`validity`] (optional) → [`vector_tile`] → [`codec`] → geometry.
//!
//! # Example
//!
//! ```rust
//! use versatiles_mvt::{
//! 	config::ProcessorOptions,
//! 	processor::LayerProcessor,
//! 	transform::Identity,
//! 	vector_tile::{SourceFeature, VectorTile},
//! 	SourceGeometry,
//! };
//!
//! let features = vec![SourceFeature::new(SourceGeometry::new_line_string(&[[10.0, 10.0], [500.0, 300.0]]))];
//! let processor = LayerProcessor::new(&Identity, [0.0, 0.0, 4096.0, 4096.0], ProcessorOptions::default());
//! let layer = processor.process("lines", features).unwrap();
//!
//! let blob = VectorTile::new(vec![layer]).to_blob().unwrap();
//! assert!(versatiles_mvt::validity::tile_is_valid(&blob).is_empty());
//! ```

pub mod clipper;
pub mod codec;
pub mod compression;
pub mod config;
mod error;
pub mod math;
pub mod merge;
pub mod pbf;
pub mod processor;
pub mod simplify;
pub mod transform;
mod types;
pub mod validity;
pub mod vector_tile;

pub use error::{DecodeError, OverflowError};
pub use types::*;
