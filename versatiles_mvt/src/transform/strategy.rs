//! Turns source geometries into tile-local integer geometries.
//!
//! Each vertex is projected into the tile grid system, mapped by the view
//! transform, rounded and checked against the safe range. Vertices that fail any
//! step are dropped; parts left without vertices are dropped as well.

use super::{Projection, ViewTransform};
use crate::{
	config::{TileConfig, TransformConfig},
	types::{Geometry, Point, Polygon, SourceGeometry, TileGeometry, compute_bounds},
};
use log::trace;

pub struct TransformStrategy<'a> {
	projection: &'a dyn Projection,
	view: ViewTransform,
	safe_range: i64,
	/// Buffered tile in tile units.
	tile_extent: [f64; 4],
	/// Buffered tile in source coordinates, if it could be computed.
	source_extent: Option<[f64; 4]>,
}

impl<'a> TransformStrategy<'a> {
	/// `bbox` is the unbuffered tile in the tile grid system, as produced by
	/// [`tile_bbox_mercator`](super::tile_bbox_mercator) for mercator tiles.
	pub fn new(
		projection: &'a dyn Projection,
		bbox: [f64; 4],
		tile: &TileConfig,
		config: &TransformConfig,
	) -> TransformStrategy<'a> {
		let view = ViewTransform::new(bbox, tile.extent);
		let tile_extent = tile.buffered_extent();
		let corner_a = view.backward(Point::new(tile_extent[0], tile_extent[1]));
		let corner_b = view.backward(Point::new(tile_extent[2], tile_extent[3]));
		let grid_extent = [
			corner_a.x.min(corner_b.x),
			corner_a.y.min(corner_b.y),
			corner_a.x.max(corner_b.x),
			corner_a.y.max(corner_b.y),
		];
		TransformStrategy {
			projection,
			view,
			safe_range: config.safe_range,
			tile_extent,
			source_extent: projection.unproject_box(grid_extent),
		}
	}

	/// Transforms one point, or returns `None` if it cannot be represented.
	pub fn transform_point(&self, p: Point<f64>) -> Option<Point<i64>> {
		let projected = self.projection.project(p)?;
		let tile = self.view.forward(projected);
		let limit = self.safe_range as f64;
		let x = tile.x.round();
		let y = tile.y.round();
		// negated so that NaN fails as well
		if !(x.abs() <= limit) || !(y.abs() <= limit) {
			trace!("dropping vertex ({}, {}) outside of the safe range", p.x, p.y);
			return None;
		}
		Some(Point::new(x as i64, y as i64))
	}

	pub fn transform(&self, geometry: &SourceGeometry) -> TileGeometry {
		match geometry {
			Geometry::Empty => Geometry::Empty,
			Geometry::Point(p) => self.transform_single_point(*p).map_or(Geometry::Empty, Geometry::Point),
			Geometry::MultiPoint(points) => {
				let points: Vec<_> = points.iter().filter_map(|p| self.transform_single_point(*p)).collect();
				if points.is_empty() { Geometry::Empty } else { Geometry::MultiPoint(points) }
			}
			Geometry::LineString(line) => self.transform_part(line).map_or(Geometry::Empty, Geometry::LineString),
			Geometry::MultiLineString(lines) => {
				let lines: Vec<_> = lines.iter().filter_map(|l| self.transform_part(l)).collect();
				if lines.is_empty() { Geometry::Empty } else { Geometry::MultiLineString(lines) }
			}
			Geometry::Polygon(rings) => self.transform_polygon(rings).map_or(Geometry::Empty, Geometry::Polygon),
			Geometry::MultiPolygon(polygons) => {
				let polygons: Vec<_> = polygons.iter().filter_map(|p| self.transform_polygon(p)).collect();
				if polygons.is_empty() { Geometry::Empty } else { Geometry::MultiPolygon(polygons) }
			}
			Geometry::Collection(members) => {
				let members: Vec<_> = members
					.iter()
					.map(|m| self.transform(m))
					.filter(|m| !m.is_empty())
					.collect();
				if members.is_empty() { Geometry::Empty } else { Geometry::Collection(members) }
			}
		}
	}

	fn transform_single_point(&self, p: Point<f64>) -> Option<Point<i64>> {
		let t = self.transform_point(p)?;
		let [x_min, y_min, x_max, y_max] = self.tile_extent;
		let (x, y) = (t.x as f64, t.y as f64);
		(x >= x_min && x <= x_max && y >= y_min && y <= y_max).then_some(t)
	}

	/// Transforms a line or ring. Parts whose bounds miss the tile are skipped
	/// without looking at their vertices.
	fn transform_part(&self, part: &[Point<f64>]) -> Option<Vec<Point<i64>>> {
		if let (Some(extent), Some(bounds)) = (self.source_extent, compute_bounds(part))
			&& (bounds[0] > extent[2] || bounds[2] < extent[0] || bounds[1] > extent[3] || bounds[3] < extent[1])
		{
			trace!("skipping part outside of the tile");
			return None;
		}
		let points: Vec<Point<i64>> = part.iter().filter_map(|p| self.transform_point(*p)).collect();
		if points.is_empty() { None } else { Some(points) }
	}

	fn transform_polygon(&self, rings: &Polygon<f64>) -> Option<Polygon<i64>> {
		let (exterior, interiors) = rings.split_first()?;
		let mut result = vec![self.transform_part(exterior)?];
		result.extend(interiors.iter().filter_map(|ring| self.transform_part(ring)));
		Some(result)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transform::{Identity, WgsToMercator, tile_bbox_mercator};

	fn identity_strategy(projection: &dyn Projection) -> TransformStrategy<'_> {
		// one source unit per tile unit, y flipped
		TransformStrategy::new(
			projection,
			[0.0, 0.0, 4096.0, 4096.0],
			&TileConfig::default(),
			&TransformConfig::default(),
		)
	}

	#[test]
	fn view_only() {
		let strategy = identity_strategy(&Identity);
		assert_eq!(strategy.transform_point(Point::new(10.4, 4000.6)), Some(Point::new(10, 95)));
		assert_eq!(strategy.transform_point(Point::new(-0.5, 4096.0)), Some(Point::new(-1, 0)));
	}

	#[test]
	fn safe_range_is_checked_per_axis() {
		let projection = Identity;
		let strategy = TransformStrategy::new(
			&projection,
			[0.0, 0.0, 4096.0, 4096.0],
			&TileConfig::default(),
			&TransformConfig { safe_range: 5000 },
		);
		assert_eq!(strategy.transform_point(Point::new(5000.0, 0.0)), Some(Point::new(5000, 4096)));
		assert_eq!(strategy.transform_point(Point::new(5001.0, 0.0)), None);
		assert_eq!(strategy.transform_point(Point::new(0.0, -904.0)), Some(Point::new(0, 5000)));
		assert_eq!(strategy.transform_point(Point::new(0.0, -905.0)), None);
		assert_eq!(strategy.transform_point(Point::new(f64::NAN, 0.0)), None);
		assert_eq!(strategy.transform_point(Point::new(1e300, 0.0)), None);
	}

	#[test]
	fn reprojection_fails_at_the_pole() {
		let projection = WgsToMercator;
		let strategy = TransformStrategy::new(
			&projection,
			tile_bbox_mercator(0, 0, 0),
			&TileConfig::default(),
			&TransformConfig::default(),
		);
		assert_eq!(strategy.transform_point(Point::new(0.0, 0.0)), Some(Point::new(2048, 2048)));
		assert_eq!(strategy.transform_point(Point::new(-180.0, 85.0511287798)), Some(Point::new(0, 0)));
		assert_eq!(strategy.transform_point(Point::new(0.0, 90.0)), None);
	}

	#[test]
	fn failed_vertices_are_dropped() {
		let strategy = identity_strategy(&Identity);
		let line = SourceGeometry::new_line_string(&[[0.0, 0.0], [f64::NAN, 1.0], [10.0, 10.0]]);
		assert_eq!(
			strategy.transform(&line),
			TileGeometry::new_line_string(&[[0, 4096], [10, 4086]])
		);
	}

	#[test]
	fn parts_outside_of_the_tile_are_skipped() {
		let strategy = identity_strategy(&Identity);
		let lines = SourceGeometry::new_multi_line_string(&[
			vec![[5000.0, 0.0], [6000.0, 10.0]],
			vec![[0.0, 0.0], [10.0, 0.0]],
		]);
		assert_eq!(
			strategy.transform(&lines),
			TileGeometry::new_multi_line_string(&[vec![[0, 4096], [10, 4096]]])
		);
		let outside = SourceGeometry::new_polygon(&[vec![[-100.0, 0.0], [-50.0, 0.0], [-50.0, 50.0]]]);
		assert_eq!(strategy.transform(&outside), TileGeometry::Empty);
	}

	#[test]
	fn points_outside_of_the_buffer_are_dropped() {
		let strategy = identity_strategy(&Identity);
		let points = SourceGeometry::new_multi_point(&[[-1.0, 10.0], [5.0, 10.0]]);
		assert_eq!(strategy.transform(&points), TileGeometry::new_multi_point(&[[5, 4086]]));
		assert_eq!(strategy.transform(&SourceGeometry::new_point([-1.0, 10.0])), TileGeometry::Empty);
	}
}
