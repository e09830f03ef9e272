//! Conversions between [`geo`] types and [`SourceGeometry`].

use super::{Geometry, Point, SourceGeometry};

impl From<geo::Coord<f64>> for Point<f64> {
	fn from(value: geo::Coord<f64>) -> Self {
		Point::new(value.x, value.y)
	}
}

impl From<Point<f64>> for geo::Coord<f64> {
	fn from(value: Point<f64>) -> Self {
		geo::Coord { x: value.x, y: value.y }
	}
}

fn from_line_string(line: &geo::LineString<f64>) -> Vec<Point<f64>> {
	line.coords().map(|c| Point::from(*c)).collect()
}

fn from_polygon(polygon: &geo::Polygon<f64>) -> Vec<Vec<Point<f64>>> {
	let mut rings = Vec::with_capacity(polygon.interiors().len() + 1);
	rings.push(from_line_string(polygon.exterior()));
	for interior in polygon.interiors() {
		rings.push(from_line_string(interior));
	}
	rings
}

fn to_line_string(points: &[Point<f64>]) -> geo::LineString<f64> {
	geo::LineString::new(points.iter().map(|p| geo::Coord::from(*p)).collect())
}

fn to_polygon(rings: &[Vec<Point<f64>>]) -> geo::Polygon<f64> {
	let mut iter = rings.iter();
	let exterior = iter.next().map(|r| to_line_string(r)).unwrap_or_else(|| geo::LineString::new(vec![]));
	geo::Polygon::new(exterior, iter.map(|r| to_line_string(r)).collect())
}

impl From<&geo::Geometry<f64>> for SourceGeometry {
	fn from(geometry: &geo::Geometry<f64>) -> Self {
		use geo::Geometry as G;
		match geometry {
			G::Point(p) => Geometry::Point(Point::from(p.0)),
			G::MultiPoint(mp) => Geometry::MultiPoint(mp.iter().map(|p| Point::from(p.0)).collect()),
			G::Line(l) => Geometry::LineString(vec![Point::from(l.start), Point::from(l.end)]),
			G::LineString(ls) => Geometry::LineString(from_line_string(ls)),
			G::MultiLineString(mls) => Geometry::MultiLineString(mls.iter().map(from_line_string).collect()),
			G::Polygon(p) => Geometry::Polygon(from_polygon(p)),
			G::MultiPolygon(mp) => Geometry::MultiPolygon(mp.iter().map(from_polygon).collect()),
			G::Rect(r) => Geometry::Polygon(from_polygon(&r.to_polygon())),
			G::Triangle(t) => Geometry::Polygon(from_polygon(&t.to_polygon())),
			G::GeometryCollection(gc) => Geometry::Collection(gc.iter().map(SourceGeometry::from).collect()),
		}
	}
}

impl From<geo::Geometry<f64>> for SourceGeometry {
	fn from(geometry: geo::Geometry<f64>) -> Self {
		SourceGeometry::from(&geometry)
	}
}

impl SourceGeometry {
	/// Converts into a [`geo::Geometry`]; `Empty` has no counterpart.
	pub fn to_geo(&self) -> Option<geo::Geometry<f64>> {
		use geo::Geometry as G;
		Some(match self {
			Geometry::Empty => return None,
			Geometry::Point(p) => G::Point(geo::Point::from(geo::Coord::from(*p))),
			Geometry::MultiPoint(points) => G::MultiPoint(geo::MultiPoint::new(
				points.iter().map(|p| geo::Point::from(geo::Coord::from(*p))).collect(),
			)),
			Geometry::LineString(line) => G::LineString(to_line_string(line)),
			Geometry::MultiLineString(lines) => {
				G::MultiLineString(geo::MultiLineString::new(lines.iter().map(|l| to_line_string(l)).collect()))
			}
			Geometry::Polygon(rings) => G::Polygon(to_polygon(rings)),
			Geometry::MultiPolygon(polygons) => {
				G::MultiPolygon(geo::MultiPolygon::new(polygons.iter().map(|p| to_polygon(p)).collect()))
			}
			Geometry::Collection(members) => G::GeometryCollection(geo::GeometryCollection::new_from(
				members.iter().filter_map(SourceGeometry::to_geo).collect(),
			)),
		})
	}
}

impl From<&geo::LineString<f64>> for SourceGeometry {
	fn from(line: &geo::LineString<f64>) -> Self {
		Geometry::LineString(from_line_string(line))
	}
}
