//! Configuration values for the write pipeline.
//!
//! Nothing in this crate reads global state: extent, tile size, buffer, safe
//! coordinate range and clipping options are handed in explicitly. All structs can
//! be deserialized with Serde, missing fields fall back to their defaults.
//!
//! # Example YAML
//! ```yaml
//! tile:
//!   extent: 4096
//!   buffer_size: 8
//! clip:
//!   fill_rule: even_odd
//!   multi_polygon_union: true
//! simplify_distance: 1.0
//! ```

use crate::clipper::{FillRule, OverlayEngine};
use serde::Deserialize;

/// Tile geometry: integer extent, nominal pixel size and the buffer around it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TileConfig {
	/// Number of tile units along one side. Defaults to 4096.
	pub extent: u32,
	/// Nominal size of the tile in pixels. Defaults to 256.
	pub tile_size: u32,
	/// Buffer around the tile in pixels. Defaults to 0.
	pub buffer_size: i32,
}

impl Default for TileConfig {
	fn default() -> Self {
		TileConfig {
			extent: 4096,
			tile_size: 256,
			buffer_size: 0,
		}
	}
}

impl TileConfig {
	/// The buffer converted from pixels to tile units.
	pub fn buffer_units(&self) -> f64 {
		f64::from(self.buffer_size) * f64::from(self.extent) / f64::from(self.tile_size.max(1))
	}

	/// `[x_min, y_min, x_max, y_max]` of the buffered tile in tile units.
	pub fn buffered_extent(&self) -> [f64; 4] {
		let buffer = self.buffer_units();
		let extent = f64::from(self.extent);
		[-buffer, -buffer, extent + buffer, extent + buffer]
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
	/// Largest coordinate magnitude a transformed point may have.
	/// Defaults to half the overflow threshold of the union engine.
	pub safe_range: i64,
}

impl Default for TransformConfig {
	fn default() -> Self {
		TransformConfig {
			safe_range: OverlayEngine::OVERFLOW_THRESHOLD / 2,
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClipOptions {
	/// Rings with a smaller absolute area in tile units² are dropped. Defaults to 0.1.
	pub area_threshold: f64,
	/// Fill rule of the union. Defaults to `non_zero`.
	pub fill_rule: FillRule,
	/// Union all members of a multi polygon in one pass instead of one by one.
	pub multi_polygon_union: bool,
	/// Keep rings regardless of point count or area.
	pub process_all_rings: bool,
}

impl Default for ClipOptions {
	fn default() -> Self {
		ClipOptions {
			area_threshold: 0.1,
			fill_rule: FillRule::NonZero,
			multi_polygon_union: false,
			process_all_rings: false,
		}
	}
}

/// Everything the layer pipeline needs.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorOptions {
	pub tile: TileConfig,
	pub transform: TransformConfig,
	pub clip: ClipOptions,
	/// Simplification distance in tile units, 0 disables simplification.
	pub simplify_distance: f64,
}
