//! Geometry values flowing through the codec.
//!
//! A [`Geometry`] is generic over its coordinate type: `f64` for geometries in a
//! source coordinate system ([`SourceGeometry`]) and `i64` for tile-local integer
//! geometries ([`TileGeometry`]). Rings are plain point vectors; the first ring of
//! a polygon is its exterior, all further rings are holes.

use std::fmt::Debug;

/// Scalar type usable as a coordinate.
pub trait Coord: Copy + Debug + PartialEq + PartialOrd + Send + Sync {
	fn as_f64(self) -> f64;
}

impl Coord for i64 {
	#[inline]
	fn as_f64(self) -> f64 {
		self as f64
	}
}

impl Coord for f64 {
	#[inline]
	fn as_f64(self) -> f64 {
		self
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point<T> {
	pub x: T,
	pub y: T,
}

impl<T> Point<T> {
	pub const fn new(x: T, y: T) -> Self {
		Point { x, y }
	}
}

impl<T> From<[T; 2]> for Point<T> {
	fn from([x, y]: [T; 2]) -> Self {
		Point { x, y }
	}
}

impl<T> From<(T, T)> for Point<T> {
	fn from((x, y): (T, T)) -> Self {
		Point { x, y }
	}
}

pub type LineString<T> = Vec<Point<T>>;
pub type Ring<T> = Vec<Point<T>>;
pub type Polygon<T> = Vec<Ring<T>>;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Geometry<T> {
	#[default]
	Empty,
	Point(Point<T>),
	MultiPoint(Vec<Point<T>>),
	LineString(LineString<T>),
	MultiLineString(Vec<LineString<T>>),
	Polygon(Polygon<T>),
	MultiPolygon(Vec<Polygon<T>>),
	Collection(Vec<Geometry<T>>),
}

pub type TileGeometry = Geometry<i64>;
pub type SourceGeometry = Geometry<f64>;

impl<T: Coord> Geometry<T> {
	pub fn new_point(coord: [T; 2]) -> Self {
		Geometry::Point(Point::from(coord))
	}

	pub fn new_multi_point(coords: &[[T; 2]]) -> Self {
		Geometry::MultiPoint(points(coords))
	}

	pub fn new_line_string(coords: &[[T; 2]]) -> Self {
		Geometry::LineString(points(coords))
	}

	pub fn new_multi_line_string(lines: &[Vec<[T; 2]>]) -> Self {
		Geometry::MultiLineString(lines.iter().map(|line| points(line)).collect())
	}

	pub fn new_polygon(rings: &[Vec<[T; 2]>]) -> Self {
		Geometry::Polygon(rings.iter().map(|ring| points(ring)).collect())
	}

	pub fn new_multi_polygon(polygons: &[Vec<Vec<[T; 2]>>]) -> Self {
		Geometry::MultiPolygon(
			polygons
				.iter()
				.map(|polygon| polygon.iter().map(|ring| points(ring)).collect())
				.collect(),
		)
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		match self {
			Geometry::Empty => true,
			Geometry::Point(_) => false,
			Geometry::MultiPoint(p) => p.is_empty(),
			Geometry::LineString(l) => l.is_empty(),
			Geometry::MultiLineString(l) => l.iter().all(Vec::is_empty),
			Geometry::Polygon(p) => p.iter().all(Vec::is_empty),
			Geometry::MultiPolygon(p) => p.iter().all(|polygon| polygon.iter().all(Vec::is_empty)),
			Geometry::Collection(c) => c.iter().all(Geometry::is_empty),
		}
	}

	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			Geometry::Empty => "Empty",
			Geometry::Point(_) => "Point",
			Geometry::MultiPoint(_) => "MultiPoint",
			Geometry::LineString(_) => "LineString",
			Geometry::MultiLineString(_) => "MultiLineString",
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPolygon(_) => "MultiPolygon",
			Geometry::Collection(_) => "Collection",
		}
	}

	/// Flattens nested collections into a list of non-collection geometries.
	pub fn into_parts(self) -> Vec<Geometry<T>> {
		match self {
			Geometry::Collection(members) => members.into_iter().flat_map(Geometry::into_parts).collect(),
			Geometry::Empty => vec![],
			geometry => vec![geometry],
		}
	}
}

pub fn points<T: Copy>(coords: &[[T; 2]]) -> Vec<Point<T>> {
	coords.iter().map(|c| Point::from(*c)).collect()
}

/// Removes consecutive repeated points, keeping the first of each run.
pub fn dedup_adjacent<T: PartialEq + Copy>(points: &[Point<T>]) -> Vec<Point<T>> {
	let mut result: Vec<Point<T>> = Vec::with_capacity(points.len());
	for p in points {
		if result.last() != Some(p) {
			result.push(*p);
		}
	}
	result
}

/// Returns `[x_min, y_min, x_max, y_max]`, or `None` for an empty sequence.
pub fn compute_bounds<T: Coord>(points: &[Point<T>]) -> Option<[f64; 4]> {
	if points.is_empty() {
		return None;
	}

	let mut x_min = f64::MAX;
	let mut y_min = f64::MAX;
	let mut x_max = f64::MIN;
	let mut y_max = f64::MIN;

	for p in points {
		x_min = x_min.min(p.x.as_f64());
		y_min = y_min.min(p.y.as_f64());
		x_max = x_max.max(p.x.as_f64());
		y_max = y_max.max(p.y.as_f64());
	}

	Some([x_min, y_min, x_max, y_max])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dedup_adjacent_keeps_non_adjacent_repeats() {
		let input = points(&[[0, 0], [0, 0], [1, 1], [0, 0], [0, 0]]);
		assert_eq!(dedup_adjacent(&input), points(&[[0, 0], [1, 1], [0, 0]]));
	}

	#[test]
	fn is_empty() {
		assert!(TileGeometry::Empty.is_empty());
		assert!(TileGeometry::MultiPoint(vec![]).is_empty());
		assert!(TileGeometry::Collection(vec![TileGeometry::Empty]).is_empty());
		assert!(!TileGeometry::new_point([0, 0]).is_empty());
		assert!(!TileGeometry::new_polygon(&[vec![[0, 0], [1, 0], [1, 1]]]).is_empty());
	}

	#[test]
	fn into_parts_flattens_collections() {
		let geometry = TileGeometry::Collection(vec![
			TileGeometry::new_point([1, 2]),
			TileGeometry::Collection(vec![TileGeometry::Empty, TileGeometry::new_line_string(&[[0, 0], [1, 1]])]),
		]);
		let parts = geometry.into_parts();
		assert_eq!(parts.len(), 2);
		assert_eq!(parts[0].type_name(), "Point");
		assert_eq!(parts[1].type_name(), "LineString");
	}

	#[test]
	fn bounds() {
		let line = points(&[[1.0, 5.0], [-2.0, 3.0], [4.0, -1.0]]);
		assert_eq!(compute_bounds(&line), Some([-2.0, -1.0, 4.0, 5.0]));
		assert_eq!(compute_bounds::<f64>(&[]), None);
	}
}
