//! Projections between the coordinate system of the data and that of the tile grid.

use crate::types::Point;
use std::f64::consts::{FRAC_PI_4, PI};

/// Radius of the spherical mercator projection (WGS84 semi-major axis).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the mercator world in meters.
pub const MERCATOR_HALF_SIZE: f64 = PI * EARTH_RADIUS;

/// Maps points between the source system of the data and the system of the tile grid.
///
/// Both directions return `None` where the mapping is undefined.
pub trait Projection: Send + Sync {
	/// Source system to tile grid system.
	fn project(&self, p: Point<f64>) -> Option<Point<f64>>;
	/// Tile grid system back to the source system.
	fn unproject(&self, p: Point<f64>) -> Option<Point<f64>>;

	/// Unprojects a box by sampling its corners and edge midpoints. Returns the
	/// bounds of all samples that could be unprojected.
	fn unproject_box(&self, [x_min, y_min, x_max, y_max]: [f64; 4]) -> Option<[f64; 4]> {
		let x_mid = (x_min + x_max) / 2.0;
		let y_mid = (y_min + y_max) / 2.0;
		let samples = [
			(x_min, y_min),
			(x_mid, y_min),
			(x_max, y_min),
			(x_max, y_mid),
			(x_max, y_max),
			(x_mid, y_max),
			(x_min, y_max),
			(x_min, y_mid),
		];
		let points: Vec<Point<f64>> = samples
			.into_iter()
			.filter_map(|s| self.unproject(Point::from(s)))
			.collect();
		crate::types::compute_bounds(&points)
	}
}

/// Data and tile grid share one coordinate system.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Projection for Identity {
	fn project(&self, p: Point<f64>) -> Option<Point<f64>> {
		Some(p)
	}
	fn unproject(&self, p: Point<f64>) -> Option<Point<f64>> {
		Some(p)
	}
}

/// Data in longitude/latitude degrees, tiles in spherical mercator meters.
#[derive(Clone, Copy, Debug, Default)]
pub struct WgsToMercator;

/// Data in spherical mercator meters, tiles in longitude/latitude degrees.
#[derive(Clone, Copy, Debug, Default)]
pub struct MercatorToWgs;

/// Longitude/latitude in degrees to mercator meters. Undefined at and beyond the poles.
pub fn lonlat_to_mercator(p: Point<f64>) -> Option<Point<f64>> {
	if !p.x.is_finite() || !(p.y.abs() < 90.0) {
		return None;
	}
	let x = EARTH_RADIUS * p.x.to_radians();
	let y = EARTH_RADIUS * (FRAC_PI_4 + p.y.to_radians() / 2.0).tan().ln();
	y.is_finite().then_some(Point::new(x, y))
}

/// Mercator meters to longitude/latitude in degrees.
pub fn mercator_to_lonlat(p: Point<f64>) -> Option<Point<f64>> {
	if !p.x.is_finite() || !p.y.is_finite() {
		return None;
	}
	let lon = (p.x / EARTH_RADIUS).to_degrees();
	let lat = (2.0 * (p.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
	Some(Point::new(lon, lat))
}

impl Projection for WgsToMercator {
	fn project(&self, p: Point<f64>) -> Option<Point<f64>> {
		lonlat_to_mercator(p)
	}
	fn unproject(&self, p: Point<f64>) -> Option<Point<f64>> {
		mercator_to_lonlat(p)
	}
}

impl Projection for MercatorToWgs {
	fn project(&self, p: Point<f64>) -> Option<Point<f64>> {
		mercator_to_lonlat(p)
	}
	fn unproject(&self, p: Point<f64>) -> Option<Point<f64>> {
		lonlat_to_mercator(p)
	}
}

/// Mercator bounds `[x_min, y_min, x_max, y_max]` of tile `x`/`y` at zoom `z`.
pub fn tile_bbox_mercator(z: u8, x: u32, y: u32) -> [f64; 4] {
	let size = 2.0 * MERCATOR_HALF_SIZE / f64::from(1u32 << z.min(31));
	let x_min = -MERCATOR_HALF_SIZE + f64::from(x) * size;
	let y_max = MERCATOR_HALF_SIZE - f64::from(y) * size;
	[x_min, y_max - size, x_min + size, y_max]
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;
	use rstest::rstest;

	#[test]
	fn lonlat_to_mercator_values() {
		let p = lonlat_to_mercator(Point::new(180.0, 0.0)).unwrap();
		assert_abs_diff_eq!(p.x, MERCATOR_HALF_SIZE, epsilon = 1e-6);
		assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-6);

		let p = lonlat_to_mercator(Point::new(13.4, 52.5)).unwrap();
		assert_abs_diff_eq!(p.x, 1_491_681.18, epsilon = 0.01);
		assert_abs_diff_eq!(p.y, 6_891_041.72, epsilon = 0.01);
	}

	#[rstest]
	#[case(0.0, 90.0)]
	#[case(0.0, -90.0)]
	#[case(0.0, 95.0)]
	#[case(f64::NAN, 0.0)]
	#[case(0.0, f64::NAN)]
	#[case(f64::INFINITY, 10.0)]
	fn poles_are_undefined(#[case] lon: f64, #[case] lat: f64) {
		assert_eq!(lonlat_to_mercator(Point::new(lon, lat)), None);
	}

	#[test]
	fn mercator_round_trip() {
		let p = Point::new(-73.9, 40.7);
		let back = mercator_to_lonlat(lonlat_to_mercator(p).unwrap()).unwrap();
		assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-9);
		assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-9);
	}

	#[test]
	fn tile_bounds() {
		let world = tile_bbox_mercator(0, 0, 0);
		assert_abs_diff_eq!(world[0], -MERCATOR_HALF_SIZE);
		assert_abs_diff_eq!(world[3], MERCATOR_HALF_SIZE);

		let [x_min, y_min, x_max, y_max] = tile_bbox_mercator(1, 1, 1);
		assert_abs_diff_eq!(x_min, 0.0);
		assert_abs_diff_eq!(y_min, -MERCATOR_HALF_SIZE);
		assert_abs_diff_eq!(x_max, MERCATOR_HALF_SIZE);
		assert_abs_diff_eq!(y_max, 0.0);
	}

	#[test]
	fn unproject_box_samples_edges() {
		let half = MERCATOR_HALF_SIZE;
		let [lon_min, lat_min, lon_max, lat_max] = WgsToMercator.unproject_box([-half, -half, half, half]).unwrap();
		assert_abs_diff_eq!(lon_min, -180.0, epsilon = 1e-9);
		assert_abs_diff_eq!(lon_max, 180.0, epsilon = 1e-9);
		assert_abs_diff_eq!(lat_min, -85.0511287798, epsilon = 1e-9);
		assert_abs_diff_eq!(lat_max, 85.0511287798, epsilon = 1e-9);
	}
}
