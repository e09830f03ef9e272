use crate::types::Geometry;

/// Geometry type of a wire feature.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GeomType {
	#[default]
	Unknown = 0,
	Point = 1,
	LineString = 2,
	Polygon = 3,
}

impl GeomType {
	pub fn as_u64(&self) -> u64 {
		*self as u64
	}
}

impl From<u64> for GeomType {
	fn from(value: u64) -> Self {
		match value {
			1 => GeomType::Point,
			2 => GeomType::LineString,
			3 => GeomType::Polygon,
			_ => GeomType::Unknown,
		}
	}
}

impl<T> From<&Geometry<T>> for GeomType {
	fn from(geometry: &Geometry<T>) -> Self {
		use Geometry::*;
		match geometry {
			Point(_) | MultiPoint(_) => GeomType::Point,
			LineString(_) | MultiLineString(_) => GeomType::LineString,
			Polygon(_) | MultiPolygon(_) => GeomType::Polygon,
			Empty | Collection(_) => GeomType::Unknown,
		}
	}
}
