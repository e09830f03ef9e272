use super::GeoProperties;
use crate::types::Geometry;

/// A feature with decoded properties and a geometry value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoFeature<T> {
	pub id: Option<u64>,
	pub properties: GeoProperties,
	pub geometry: Geometry<T>,
}

/// A feature in source coordinates, as handed to the write pipeline.
pub type SourceFeature = GeoFeature<f64>;
/// A feature in tile units.
pub type TileFeature = GeoFeature<i64>;

impl<T> GeoFeature<T> {
	pub fn new(geometry: Geometry<T>) -> Self {
		GeoFeature {
			id: None,
			properties: GeoProperties::new(),
			geometry,
		}
	}

	#[must_use]
	pub fn with_id(mut self, id: u64) -> Self {
		self.id = Some(id);
		self
	}

	#[must_use]
	pub fn with_properties(mut self, properties: GeoProperties) -> Self {
		self.properties = properties;
		self
	}
}
