//! A single layer of a vector tile.
//!
//! The encoding follows the tile schema:
//!  * field 1: `name` (string)
//!  * field 2: repeated `feature` (embedded message)
//!  * field 3: repeated `keys` (string)
//!  * field 4: repeated `values` (embedded message)
//!  * field 5: `extent` (varint, default 4096)
//!  * field 15: `version` (varint, default 1)

use super::{GeoFeature, GeoValue, PropertyManager, SourceFeature, TileFeature, VectorTileFeature};
use crate::{
	codec::SpecVersion,
	pbf::{PbfReader, PbfWriter},
	types::{Blob, Geometry, Point},
};
use anyhow::{Context, Result, anyhow};
use log::{debug, trace, warn};

/// A vector tile layer with features, key/value tables, extent and version.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileLayer {
	/// Number of tile units along one side of the tile.
	pub extent: u32,
	pub features: Vec<VectorTileFeature>,
	pub name: String,
	/// Key and value tables referenced by the features' `tag_ids`.
	pub property_manager: PropertyManager,
	pub version: u32,
}

impl VectorTileLayer {
	#[must_use]
	pub fn new(name: String, extent: u32, version: u32) -> VectorTileLayer {
		VectorTileLayer {
			extent,
			features: vec![],
			name,
			property_manager: PropertyManager::default(),
			version,
		}
	}

	pub fn read(reader: &mut PbfReader<'_>) -> Result<VectorTileLayer> {
		let mut extent = 4096;
		let mut features: Vec<VectorTileFeature> = Vec::new();
		let mut name = None;
		let mut property_manager = PropertyManager::new();
		let mut version = 1;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => name = Some(reader.read_pbf_string().context("Failed to read layer name")?),
				(2, 2) => features.push(
					VectorTileFeature::read(
						&mut reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for feature")?,
					)
					.context("Failed to read VectorTileFeature")?,
				),
				(3, 2) => {
					property_manager
						.key
						.push(reader.read_pbf_string().context("Failed to read property key")?);
				}
				(4, 2) => {
					property_manager.val.push(
						GeoValue::read(
							&mut reader
								.get_pbf_sub_reader()
								.context("Failed to get PBF sub-reader for property value")?,
						)
						.context("Failed to read GeoValue")?,
					);
				}
				(5, 0) => extent = u32::try_from(reader.read_varint().context("Failed to read extent")?)?,
				(15, 0) => version = u32::try_from(reader.read_varint().context("Failed to read version")?)?,
				(field, wire_type) => {
					trace!("skipping unknown layer field {field} (wire type {wire_type})");
					reader.skip(wire_type).context("Failed to skip unknown layer field")?;
				}
			}
		}

		Ok(VectorTileLayer {
			extent,
			features,
			name: name
				.ok_or(anyhow!("Layer name is required"))
				.context("Failed to get layer name")?,
			property_manager,
			version,
		})
	}

	/// Serializes the layer. The extent is always written, the version only if it is not 1.
	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = PbfWriter::new();

		writer.write_pbf_key(1, 2).context("Failed to write PBF key for layer name")?;
		writer.write_pbf_string(&self.name).context("Failed to write layer name")?;

		for feature in &self.features {
			writer.write_pbf_key(2, 2).context("Failed to write PBF key for feature")?;
			writer
				.write_pbf_blob(&feature.to_blob().context("Failed to convert feature to blob")?)
				.context("Failed to write feature blob")?;
		}

		for key in self.property_manager.iter_key() {
			writer.write_pbf_key(3, 2).context("Failed to write PBF key for property key")?;
			writer.write_pbf_string(key).context("Failed to write property key")?;
		}

		for value in self.property_manager.iter_val() {
			writer.write_pbf_key(4, 2).context("Failed to write PBF key for property value")?;
			writer
				.write_pbf_blob(&value.to_blob().context("Failed to convert property value to blob")?)
				.context("Failed to write property value blob")?;
		}

		writer.write_pbf_key(5, 0).context("Failed to write PBF key for extent")?;
		writer
			.write_varint(u64::from(self.extent))
			.context("Failed to write extent")?;

		if self.version != 1 {
			writer.write_pbf_key(15, 0).context("Failed to write PBF key for version")?;
			writer
				.write_varint(u64::from(self.version))
				.context("Failed to write version")?;
		}

		Ok(writer.into_blob())
	}

	pub fn spec_version(&self) -> SpecVersion {
		SpecVersion::from_layer_version(self.version)
	}

	/// Decodes every vector feature in tile units. Raster features and features
	/// that fail to decode are skipped.
	pub fn to_tile_features(&self) -> Vec<TileFeature> {
		self.decode_features(|feature| feature.to_tile_geometry(self.spec_version()))
	}

	/// Decodes every vector feature into `origin + delta / scale` coordinates.
	pub fn to_features(&self, origin: Point<f64>, scale_x: f64, scale_y: f64) -> Vec<SourceFeature> {
		self.decode_features(|feature| feature.to_geometry(self.spec_version(), origin, scale_x, scale_y))
	}

	fn decode_features<T, F>(&self, decode: F) -> Vec<GeoFeature<T>>
	where
		F: Fn(&VectorTileFeature) -> Result<Geometry<T>>,
	{
		let mut features = Vec::with_capacity(self.features.len());
		for (index, feature) in self.features.iter().enumerate() {
			if feature.raster.is_some() {
				debug!("skipping raster feature {index} of layer '{}'", self.name);
				continue;
			}
			let decoded = self
				.property_manager
				.decode_tag_ids(&feature.tag_ids)
				.and_then(|properties| Ok((properties, decode(feature)?)));
			match decoded {
				Ok((properties, geometry)) => features.push(GeoFeature {
					id: feature.id,
					properties,
					geometry,
				}),
				Err(e) => warn!("skipping feature {index} of layer '{}': {e:#}", self.name),
			}
		}
		features
	}

	/// Builds a version 2 layer from tile features.
	///
	/// Collections become one wire feature per part, all sharing id and tags.
	/// Features whose geometry encodes to nothing are left out.
	pub fn from_features(name: String, extent: u32, features: Vec<TileFeature>) -> VectorTileLayer {
		let mut layer = VectorTileLayer::new(name, extent, 2);
		layer.property_manager = PropertyManager::from_iter(features.iter().map(|f| &f.properties));

		for feature in features {
			let tag_ids = layer.property_manager.encode_tag_ids(feature.properties);
			let mut encoded = false;
			for part in feature.geometry.into_parts() {
				if let Some(wire) = VectorTileFeature::from_geometry(feature.id, tag_ids.clone(), &part) {
					layer.features.push(wire);
					encoded = true;
				}
			}
			if !encoded {
				debug!("feature {:?} of layer '{}' has no geometry left", feature.id, layer.name);
			}
		}
		layer
	}

	pub fn add_feature(&mut self, feature: TileFeature) {
		let tag_ids = self.property_manager.encode_tag_ids(feature.properties);
		for part in feature.geometry.into_parts() {
			if let Some(wire) = VectorTileFeature::from_geometry(feature.id, tag_ids.clone(), &part) {
				self.features.push(wire);
			}
		}
	}
}
