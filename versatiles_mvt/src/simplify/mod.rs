//! Douglas-Peucker simplification.
//!
//! The first and last point of a sequence are always kept. Between them the point
//! farthest from the connecting segment is kept if its squared distance exceeds the
//! tolerance, and both halves are processed the same way. Ties go to the lowest
//! index.
//!
//! Spans of five or more points are scanned four points at a time when the target
//! supports vector registers. Both scans produce identical results.

mod lanes;
mod scalar;

use crate::types::{Coord, Geometry, Point};
use scalar::Segment;

const MIN_LANE_SPAN: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scan {
	Scalar,
	Lanes,
}

fn detected_scan() -> Scan {
	if cfg!(any(target_feature = "sse2", target_feature = "neon", target_feature = "simd128")) {
		Scan::Lanes
	} else {
		Scan::Scalar
	}
}

/// Returns a keep flag per point.
fn keep_flags<T: Coord>(points: &[Point<T>], tolerance_sq: f64, scan: Scan) -> Vec<bool> {
	let mut keep = vec![false; points.len()];
	if let Some(last) = points.len().checked_sub(1) {
		keep[0] = true;
		keep[last] = true;
	}
	// explicit stack instead of recursion, spans are (begin, last)
	let mut spans = vec![(0, points.len().saturating_sub(1))];
	while let Some((begin, last)) = spans.pop() {
		if last < begin + 2 {
			continue;
		}
		let segment = Segment::new(&points[begin], &points[last]);
		let (max, index) = if scan == Scan::Lanes && last - begin + 1 >= MIN_LANE_SPAN {
			lanes::max_deviation_lanes(points, begin + 1, last, &segment)
		} else {
			scalar::max_deviation(points, begin + 1, last, &segment)
		};
		if tolerance_sq < max {
			keep[index] = true;
			spans.push((index, last));
			spans.push((begin, index));
		}
	}
	keep
}

fn simplify_with<T: Coord>(points: &[Point<T>], tolerance_sq: f64, scan: Scan) -> Vec<Point<T>> {
	if tolerance_sq <= 0.0 || points.len() < 3 {
		return points.to_vec();
	}
	keep_flags(points, tolerance_sq, scan)
		.into_iter()
		.zip(points)
		.filter_map(|(keep, p)| keep.then_some(*p))
		.collect()
}

/// Simplifies a point sequence. `tolerance_sq` is the squared distance; 0 keeps every point.
pub fn douglas_peucker<T: Coord>(points: &[Point<T>], tolerance_sq: f64) -> Vec<Point<T>> {
	simplify_with(points, tolerance_sq, detected_scan())
}

/// Scalar-only variant, identical in output to [`douglas_peucker`].
pub fn douglas_peucker_scalar<T: Coord>(points: &[Point<T>], tolerance_sq: f64) -> Vec<Point<T>> {
	simplify_with(points, tolerance_sq, Scan::Scalar)
}

/// Simplifies every line and ring of a geometry. `distance` is not squared.
pub fn simplify_geometry<T: Coord>(geometry: Geometry<T>, distance: f64) -> Geometry<T> {
	if distance <= 0.0 {
		return geometry;
	}
	let tolerance_sq = distance * distance;
	let part = |points: Vec<Point<T>>| douglas_peucker(&points, tolerance_sq);
	let polygon = |rings: Vec<Vec<Point<T>>>| rings.into_iter().map(part).collect::<Vec<_>>();

	match geometry {
		Geometry::LineString(line) => Geometry::LineString(part(line)),
		Geometry::MultiLineString(lines) => Geometry::MultiLineString(lines.into_iter().map(part).collect()),
		Geometry::Polygon(rings) => Geometry::Polygon(polygon(rings)),
		Geometry::MultiPolygon(polygons) => Geometry::MultiPolygon(polygons.into_iter().map(polygon).collect()),
		Geometry::Collection(members) => {
			Geometry::Collection(members.into_iter().map(|m| simplify_geometry(m, distance)).collect())
		}
		other => other,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{TileGeometry, points};
	use rstest::rstest;

	/// Deterministic pseudo random walk.
	fn walk(len: usize, seed: u64) -> Vec<Point<i64>> {
		let mut state = seed;
		let mut next = move || {
			state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
			((state >> 33) % 21) as i64 - 10
		};
		let mut p = Point::new(0, 0);
		(0..len)
			.map(|_| {
				p = Point::new(p.x + next(), p.y + next());
				p
			})
			.collect()
	}

	#[test]
	fn zero_tolerance_is_a_no_op() {
		let line = walk(50, 1);
		assert_eq!(douglas_peucker(&line, 0.0), line);
	}

	#[test]
	fn keeps_first_and_last() {
		let line = points(&[[0, 0], [1, 0], [2, 0], [3, 0], [4, 0], [5, 0]]);
		assert_eq!(douglas_peucker(&line, 1.0), points(&[[0, 0], [5, 0]]));
	}

	#[test]
	fn keeps_points_beyond_tolerance() {
		let line = points(&[[0, 0], [5, 1], [10, 0], [15, 5], [20, 0]]);
		// (15,5) deviates most from (0,0)-(20,0), then (10,0) from (0,0)-(15,5)
		assert_eq!(douglas_peucker(&line, 4.0), points(&[[0, 0], [10, 0], [15, 5], [20, 0]]));
		assert_eq!(douglas_peucker(&line, 0.5), line);
	}

	#[test]
	fn tolerance_is_exclusive() {
		let line = points(&[[0, 0], [5, 2], [10, 0]]);
		assert_eq!(douglas_peucker(&line, 4.0), points(&[[0, 0], [10, 0]]));
		assert_eq!(douglas_peucker(&line, 3.9), line);
	}

	#[test]
	fn endpoint_distance_outside_of_the_segment() {
		// the middle point projects beyond the last point, its distance is measured to it
		let line = points(&[[0.0, 0.0], [13.0, 0.0], [10.0, 0.0]]);
		assert_eq!(douglas_peucker(&line, 8.9), line);
		assert_eq!(douglas_peucker(&line, 9.0), points(&[[0.0, 0.0], [10.0, 0.0]]));
	}

	#[test]
	fn ties_resolve_to_the_lowest_index() {
		let line = points(&[[0, 0], [1, 3], [2, 3], [3, 3], [4, 3], [5, 3], [6, 3], [7, 0]]);
		let keep = keep_flags(&line, 8.0, Scan::Lanes);
		assert_eq!(keep, keep_flags(&line, 8.0, Scan::Scalar));
		assert!(keep[1]);
	}

	#[rstest]
	#[case(5, 1, 2.0)]
	#[case(6, 2, 1.0)]
	#[case(9, 3, 4.0)]
	#[case(100, 4, 9.0)]
	#[case(1000, 5, 25.0)]
	#[case(1000, 6, 0.25)]
	fn lanes_match_scalar(#[case] len: usize, #[case] seed: u64, #[case] tolerance_sq: f64) {
		let line = walk(len, seed);
		assert_eq!(
			keep_flags(&line, tolerance_sq, Scan::Lanes),
			keep_flags(&line, tolerance_sq, Scan::Scalar)
		);
		assert_eq!(douglas_peucker(&line, tolerance_sq), douglas_peucker_scalar(&line, tolerance_sq));
	}

	#[rstest]
	#[case(200, 7, 4.0)]
	#[case(200, 8, 100.0)]
	fn idempotent(#[case] len: usize, #[case] seed: u64, #[case] tolerance_sq: f64) {
		let once = douglas_peucker(&walk(len, seed), tolerance_sq);
		assert_eq!(douglas_peucker(&once, tolerance_sq), once);
	}

	#[test]
	fn short_sequences() {
		assert_eq!(douglas_peucker::<i64>(&[], 1.0), vec![]);
		assert_eq!(douglas_peucker(&points(&[[1, 1]]), 1.0), points(&[[1, 1]]));
		assert_eq!(douglas_peucker(&points(&[[1, 1], [2, 2]]), 1.0), points(&[[1, 1], [2, 2]]));
	}

	#[test]
	fn geometry_parts() {
		let geometry = TileGeometry::new_multi_line_string(&[
			vec![[0, 0], [5, 0], [10, 0]],
			vec![[0, 10], [5, 11], [10, 10]],
		]);
		assert_eq!(
			simplify_geometry(geometry, 2.0),
			TileGeometry::new_multi_line_string(&[vec![[0, 0], [10, 0]], vec![[0, 10], [10, 10]]])
		);
		let point = TileGeometry::new_point([3, 3]);
		assert_eq!(simplify_geometry(point.clone(), 2.0), point);
	}
}
