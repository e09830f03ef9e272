//! Clipping of tile geometries against the tile box.
//!
//! Points pass through, lines are cut at the box, and polygons are cut ring by ring
//! and then merged by a union engine, which also repairs overlapping rings. The
//! result is always a canonical tile geometry: exteriors with positive area, holes
//! with negative area, every ring closed.

mod rect;
mod union;

pub use union::{OverlayEngine, RingRole, UnionEngine};

use crate::{
	config::{ClipOptions, TileConfig},
	error::OverflowError,
	math::area_ring,
	types::{Geometry, Point, Polygon, Ring, TileGeometry, dedup_adjacent},
};
use log::trace;
use serde::Deserialize;

/// How the union engine decides which regions of overlapping rings are filled.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
	EvenOdd,
	#[default]
	NonZero,
	Positive,
	Negative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipOp {
	Union,
	Intersect,
	Difference,
	Xor,
}

/// Axis-aligned clipping rectangle in tile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipBox {
	pub x_min: i64,
	pub y_min: i64,
	pub x_max: i64,
	pub y_max: i64,
}

impl ClipBox {
	/// Creates a box, swapping bounds where necessary so that min ≤ max.
	pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> ClipBox {
		ClipBox {
			x_min: x0.min(x1),
			y_min: y0.min(y1),
			x_max: x0.max(x1),
			y_max: y0.max(y1),
		}
	}

	/// The buffered tile, rounded outwards.
	pub fn from_tile(tile: &TileConfig) -> ClipBox {
		let [x_min, y_min, x_max, y_max] = tile.buffered_extent();
		ClipBox::new(
			x_min.floor() as i64,
			y_min.floor() as i64,
			x_max.ceil() as i64,
			y_max.ceil() as i64,
		)
	}

	pub fn contains(&self, p: &Point<i64>) -> bool {
		p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
	}
}

/// Clips one geometry. Degenerate results come back as [`Geometry::Empty`].
///
/// `safe_range` is the largest coordinate magnitude the union engine accepts; a
/// ring outside of it is an [`OverflowError`].
pub fn clip(
	geometry: TileGeometry,
	clip_box: &ClipBox,
	options: &ClipOptions,
	safe_range: i64,
) -> Result<TileGeometry, OverflowError> {
	Ok(match geometry {
		Geometry::Empty => Geometry::Empty,
		Geometry::Point(p) => Geometry::Point(p),
		Geometry::MultiPoint(points) => {
			let points = dedup_adjacent(&points);
			if points.is_empty() { Geometry::Empty } else { Geometry::MultiPoint(points) }
		}
		Geometry::LineString(line) => lines_to_geometry(clip_lines(std::iter::once(line), clip_box)),
		Geometry::MultiLineString(lines) => lines_to_geometry(clip_lines(lines, clip_box)),
		Geometry::Polygon(polygon) => {
			let clipper = PolygonClipper::new(clip_box, options, safe_range);
			polygons_to_geometry(clipper.union(std::iter::once(polygon))?)
		}
		Geometry::MultiPolygon(polygons) => {
			let clipper = PolygonClipper::new(clip_box, options, safe_range);
			if options.multi_polygon_union {
				polygons_to_geometry(clipper.union(polygons)?)
			} else {
				let mut result = Vec::new();
				for polygon in polygons {
					result.extend(clipper.union(std::iter::once(polygon))?);
				}
				polygons_to_geometry(result)
			}
		}
		Geometry::Collection(members) => {
			let mut parts = Vec::new();
			for member in members {
				parts.extend(clip(member, clip_box, options, safe_range)?.into_parts());
			}
			match parts.len() {
				0 => Geometry::Empty,
				1 => parts.pop().unwrap_or_default(),
				_ => Geometry::Collection(parts),
			}
		}
	})
}

fn clip_lines<I: IntoIterator<Item = Vec<Point<i64>>>>(lines: I, clip_box: &ClipBox) -> Vec<Vec<Point<i64>>> {
	lines
		.into_iter()
		.map(|line| dedup_adjacent(&line))
		.filter(|line| line.len() >= 2)
		.flat_map(|line| rect::clip_line(&line, clip_box))
		.collect()
}

fn lines_to_geometry(mut lines: Vec<Vec<Point<i64>>>) -> TileGeometry {
	match lines.len() {
		0 => Geometry::Empty,
		1 => Geometry::LineString(lines.pop().unwrap_or_default()),
		_ => Geometry::MultiLineString(lines),
	}
}

fn polygons_to_geometry(mut polygons: Vec<Polygon<i64>>) -> TileGeometry {
	match polygons.len() {
		0 => Geometry::Empty,
		1 => Geometry::Polygon(polygons.pop().unwrap_or_default()),
		_ => Geometry::MultiPolygon(polygons),
	}
}

struct PolygonClipper<'a> {
	clip_box: &'a ClipBox,
	options: &'a ClipOptions,
	safe_range: i64,
}

impl<'a> PolygonClipper<'a> {
	fn new(clip_box: &'a ClipBox, options: &'a ClipOptions, safe_range: i64) -> Self {
		PolygonClipper {
			clip_box,
			options,
			safe_range,
		}
	}

	/// Whether a ring is too small to be kept.
	fn is_negligible(&self, ring: &[Point<i64>], area: f64) -> bool {
		!self.options.process_all_rings && (ring.len() < 3 || area.abs() < self.options.area_threshold)
	}

	/// Reverses the ring if its winding does not match the expected sign, then clips it.
	fn prepare_ring(&self, ring: &[Point<i64>], exterior: bool) -> Option<Ring<i64>> {
		let area = area_ring(ring);
		if self.is_negligible(ring, area) {
			trace!("dropping ring with {} points and area {area}", ring.len());
			return None;
		}
		let mut ring = ring.to_vec();
		if (exterior && area < 0.0) || (!exterior && area > 0.0) {
			ring.reverse();
		}
		rect::clip_ring(&ring, self.clip_box)
	}

	fn check_range(&self, ring: &[Point<i64>]) -> Result<(), OverflowError> {
		let limit = self.safe_range;
		match ring.iter().find(|p| p.x.abs() > limit || p.y.abs() > limit) {
			Some(p) => Err(OverflowError { x: p.x, y: p.y, limit }),
			None => Ok(()),
		}
	}

	/// Adds the rings of a polygon to the engine. Returns false if the exterior was dropped.
	fn add_polygon(&self, engine: &mut impl UnionEngine, polygon: &Polygon<i64>) -> Result<bool, OverflowError> {
		let Some((exterior, interiors)) = polygon.split_first() else {
			return Ok(false);
		};
		let Some(exterior) = self.prepare_ring(exterior, true) else {
			return Ok(false);
		};
		self.check_range(&exterior)?;
		engine.add_ring(&exterior, RingRole::Subject);

		for interior in interiors {
			if let Some(hole) = self.prepare_ring(interior, false) {
				self.check_range(&hole)?;
				engine.add_ring(&hole, RingRole::Subject);
			}
		}
		Ok(true)
	}

	/// Unions all rings of the given polygons in one pass.
	fn union<I: IntoIterator<Item = Polygon<i64>>>(&self, polygons: I) -> Result<Vec<Polygon<i64>>, OverflowError> {
		let mut engine = OverlayEngine::new();
		let mut any = false;
		for polygon in polygons {
			any |= self.add_polygon(&mut engine, &polygon)?;
		}
		if !any {
			return Ok(Vec::new());
		}
		let result = engine.execute(ClipOp::Union, self.options.fill_rule, FillRule::EvenOdd);
		if self.options.process_all_rings {
			return Ok(result);
		}
		Ok(result
			.into_iter()
			.filter_map(|polygon| self.filter_output(polygon))
			.collect())
	}

	/// Applies the area filter to the engine output.
	fn filter_output(&self, polygon: Polygon<i64>) -> Option<Polygon<i64>> {
		let mut rings = polygon.into_iter();
		let exterior = rings.next()?;
		if self.is_negligible(&exterior, area_ring(&exterior)) {
			return None;
		}
		let mut result = vec![exterior];
		result.extend(rings.filter(|ring| !self.is_negligible(ring, area_ring(ring))));
		Some(result)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::math::area_polygon;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	const BOX: ClipBox = ClipBox {
		x_min: 0,
		y_min: 0,
		x_max: 4096,
		y_max: 4096,
	};

	fn run(geometry: TileGeometry, options: &ClipOptions) -> TileGeometry {
		clip(geometry, &BOX, options, OverlayEngine::OVERFLOW_THRESHOLD / 2).unwrap()
	}

	fn polygon_areas(geometry: &TileGeometry) -> Vec<f64> {
		match geometry {
			Geometry::Polygon(p) => vec![area_polygon(p)],
			Geometry::MultiPolygon(ps) => ps.iter().map(|p| area_polygon(p)).collect(),
			_ => vec![],
		}
	}

	#[test]
	fn clip_box_is_normalized() {
		assert_eq!(ClipBox::new(10, 20, 0, 5), ClipBox::new(0, 5, 10, 20));
		let tile = TileConfig {
			buffer_size: 8,
			..TileConfig::default()
		};
		assert_eq!(ClipBox::from_tile(&tile), ClipBox::new(-128, -128, 4224, 4224));
		assert!(BOX.contains(&Point::new(4096, 0)));
		assert!(!BOX.contains(&Point::new(4097, 0)));
	}

	#[test]
	fn points_pass_through() {
		let options = ClipOptions::default();
		let point = TileGeometry::new_point([-100, 5000]);
		assert_eq!(run(point.clone(), &options), point);
		assert_eq!(
			run(TileGeometry::new_multi_point(&[[1, 1], [1, 1], [2, 2], [1, 1]]), &options),
			TileGeometry::new_multi_point(&[[1, 1], [2, 2], [1, 1]])
		);
	}

	#[test]
	fn lines_are_cut() {
		let options = ClipOptions::default();
		let lines = TileGeometry::new_multi_line_string(&[
			vec![[-100, 10], [100, 10]],
			vec![[5, 5], [5, 5]],
			vec![[5000, 0], [6000, 0]],
		]);
		assert_eq!(run(lines, &options), TileGeometry::new_line_string(&[[0, 10], [100, 10]]));
	}

	#[test]
	fn polygon_is_cut_and_closed() {
		let options = ClipOptions::default();
		let polygon = TileGeometry::new_polygon(&[vec![[-100, -100], [100, -100], [100, 100], [-100, 100]]]);
		let result = run(polygon, &options);
		assert_eq!(polygon_areas(&result), vec![10000.0]);
		let Geometry::Polygon(rings) = result else {
			panic!("expected a polygon");
		};
		assert_eq!(rings[0].first(), rings[0].last());
	}

	#[test]
	fn winding_is_canonicalized() {
		let options = ClipOptions::default();
		let polygon = TileGeometry::new_polygon(&[
			vec![[10, 10], [10, 110], [110, 110], [110, 10]],
			vec![[20, 20], [40, 20], [40, 40], [20, 40]],
		]);
		let Geometry::Polygon(rings) = run(polygon, &options) else {
			panic!("expected a polygon");
		};
		assert_eq!(rings.len(), 2);
		assert_eq!(area_ring(&rings[0]), 10000.0);
		assert_eq!(area_ring(&rings[1]), -400.0);
	}

	#[rstest]
	#[case(false, 0)]
	#[case(true, 1)]
	fn tiny_exterior(#[case] process_all_rings: bool, #[case] count: usize) {
		let options = ClipOptions {
			area_threshold: 1.0,
			process_all_rings,
			..ClipOptions::default()
		};
		// area 0.5, below the threshold
		let polygon = TileGeometry::new_polygon(&[vec![[10, 10], [11, 10], [11, 11]]]);
		assert_eq!(polygon_areas(&run(polygon, &options)).len(), count);
	}

	#[test]
	fn tiny_holes_are_dropped_alone() {
		let options = ClipOptions {
			area_threshold: 1.0,
			..ClipOptions::default()
		};
		let polygon = TileGeometry::new_polygon(&[
			vec![[0, 0], [100, 0], [100, 100], [0, 100]],
			vec![[10, 10], [10, 11], [11, 11]],
		]);
		assert_eq!(polygon_areas(&run(polygon, &options)), vec![10000.0]);
	}

	#[test]
	fn outside_polygon_disappears() {
		let options = ClipOptions::default();
		let polygon = TileGeometry::new_polygon(&[vec![[5000, 5000], [6000, 5000], [6000, 6000]]]);
		assert_eq!(run(polygon, &options), TileGeometry::Empty);
	}

	#[rstest]
	#[case(true, vec![175.0])]
	#[case(false, vec![100.0, 100.0])]
	fn multi_polygon_modes(#[case] multi_polygon_union: bool, #[case] areas: Vec<f64>) {
		let options = ClipOptions {
			multi_polygon_union,
			..ClipOptions::default()
		};
		let polygons = TileGeometry::new_multi_polygon(&[
			vec![vec![[0, 0], [10, 0], [10, 10], [0, 10]]],
			vec![vec![[5, 5], [15, 5], [15, 15], [5, 15]]],
		]);
		assert_eq!(polygon_areas(&run(polygons, &options)), areas);
	}

	#[test]
	fn self_overlap_is_resolved_by_the_fill_rule() {
		// the second exterior lies inside the first one
		let polygons = TileGeometry::new_multi_polygon(&[
			vec![vec![[0, 0], [20, 0], [20, 20], [0, 20]]],
			vec![vec![[5, 5], [15, 5], [15, 15], [5, 15]]],
		]);
		let non_zero = ClipOptions {
			multi_polygon_union: true,
			..ClipOptions::default()
		};
		assert_eq!(polygon_areas(&run(polygons.clone(), &non_zero)), vec![400.0]);

		let even_odd = ClipOptions {
			fill_rule: FillRule::EvenOdd,
			..non_zero
		};
		assert_eq!(polygon_areas(&run(polygons, &even_odd)), vec![300.0]);
	}

	#[test]
	fn collections_are_flattened() {
		let options = ClipOptions::default();
		let collection = TileGeometry::Collection(vec![
			TileGeometry::new_point([1, 1]),
			TileGeometry::Collection(vec![TileGeometry::new_line_string(&[[-10, 5], [10, 5]])]),
			TileGeometry::new_polygon(&[vec![[5000, 5000], [6000, 5000], [6000, 6000]]]),
		]);
		assert_eq!(
			run(collection, &options),
			TileGeometry::Collection(vec![
				TileGeometry::new_point([1, 1]),
				TileGeometry::new_line_string(&[[0, 5], [10, 5]]),
			])
		);
	}

	#[test]
	fn coordinates_beyond_the_safe_range_are_an_error() {
		let options = ClipOptions::default();
		let wide = ClipBox::new(-(1 << 40), -(1 << 40), 1 << 40, 1 << 40);
		let polygon = TileGeometry::new_polygon(&[vec![[0, 0], [1 << 35, 0], [1 << 35, 1 << 35]]]);
		let error = clip(polygon, &wide, &options, 1 << 30).unwrap_err();
		assert_eq!(error.x, 1 << 35);
		assert_eq!(error.limit, 1 << 30);
	}

	#[test]
	fn rings_at_the_safe_range_stay_exact() {
		let limit = crate::config::TransformConfig::default().safe_range;
		let wide = ClipBox::new(-limit, -limit, limit, limit);
		let polygon = TileGeometry::new_polygon(&[
			vec![[-limit, -limit], [limit, -limit], [limit, limit], [-limit, limit], [-limit, -limit]],
			vec![[1, 1], [1, 4], [4, 4], [4, 1], [1, 1]],
		]);
		let result = clip(polygon, &wide, &ClipOptions::default(), limit).unwrap();
		let Geometry::Polygon(rings) = &result else {
			panic!("expected a polygon, got {result:?}");
		};
		assert_eq!(rings.len(), 2);
		assert_eq!(rings[0].len(), 5);
		for p in &rings[0] {
			assert_eq!((p.x.abs(), p.y.abs()), (limit, limit));
		}
		let mut hole: Vec<(i64, i64)> = rings[1].iter().map(|p| (p.x, p.y)).collect();
		hole.pop();
		hole.sort_unstable();
		assert_eq!(hole, vec![(1, 1), (1, 4), (4, 1), (4, 4)]);
		assert_eq!(area_ring(&rings[1]), -9.0);
	}
}
