//! Vector tile messages.
//!
//! - [`VectorTile`]: the top-level container holding layers.
//! - [`VectorTileLayer`]: one layer with its key/value tables and features.
//! - [`VectorTileFeature`]: tag indices plus the raw geometry command stream.
//! - [`GeoValue`] and [`GeoProperties`]: typed property values.
//! - [`GeoFeature`]: a feature with decoded properties and geometry, the unit the
//!   write pipeline works on.

mod feature;
mod geo_feature;
mod geometry_type;
mod layer;
mod properties;
mod property_manager;
mod tile;
mod value;

pub use feature::VectorTileFeature;
pub use geo_feature::{GeoFeature, SourceFeature, TileFeature};
pub use geometry_type::GeomType;
pub use layer::VectorTileLayer;
pub use properties::GeoProperties;
pub use property_manager::{PropertyManager, VTLPMap};
pub use tile::VectorTile;
pub use value::GeoValue;
