//! Coordinate transform from source geometries into tile units.

mod projection;
mod strategy;
mod view;

pub use projection::{
	EARTH_RADIUS, Identity, MERCATOR_HALF_SIZE, MercatorToWgs, Projection, WgsToMercator, lonlat_to_mercator,
	mercator_to_lonlat, tile_bbox_mercator,
};
pub use strategy::TransformStrategy;
pub use view::ViewTransform;
