use super::geometry_type::GeomType;
use crate::{
	codec::{GeometryDecoder, SpecVersion, encode_feature_geometry},
	pbf::{PbfReader, PbfWriter},
	types::{Blob, Point, SourceGeometry, TileGeometry},
};
use anyhow::{Context, Result};
use log::trace;

/// A feature as stored on the wire: tag indices and the raw command stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileFeature {
	pub id: Option<u64>,
	pub tag_ids: Vec<u32>,
	pub geom_type: GeomType,
	pub geom_data: Vec<u32>,
	pub raster: Option<Blob>,
}

impl VectorTileFeature {
	pub fn read(reader: &mut PbfReader<'_>) -> Result<VectorTileFeature> {
		let mut f = VectorTileFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => f.id = Some(reader.read_varint().context("Failed to read feature ID")?),
				(2, 2) => f.tag_ids = reader.read_pbf_packed_uint32().context("Failed to read tag IDs")?,
				(3, 0) => f.geom_type = GeomType::from(reader.read_varint().context("Failed to read geometry type")?),
				(4, 2) => {
					f.geom_data = reader
						.read_pbf_packed_uint32()
						.context("Failed to read geometry data")?
				}
				(5, 2) => f.raster = Some(reader.read_pbf_blob().context("Failed to read raster data")?),
				(field, wire_type) => {
					trace!("skipping unknown feature field {field} (wire type {wire_type})");
					reader.skip(wire_type).context("Failed to skip unknown feature field")?;
				}
			}
		}

		Ok(f)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = PbfWriter::new();

		if let Some(id) = self.id {
			writer.write_pbf_key(1, 0).context("Failed to write PBF key for feature ID")?;
			writer.write_varint(id).context("Failed to write feature ID")?;
		}

		if !self.tag_ids.is_empty() {
			writer.write_pbf_key(2, 2).context("Failed to write PBF key for tag IDs")?;
			writer
				.write_pbf_packed_uint32(&self.tag_ids)
				.context("Failed to write tag IDs")?;
		}

		if !self.geom_data.is_empty() {
			writer.write_pbf_key(3, 0).context("Failed to write PBF key for geometry type")?;
			writer
				.write_varint(self.geom_type.as_u64())
				.context("Failed to write geometry type")?;
			writer.write_pbf_key(4, 2).context("Failed to write PBF key for geometry data")?;
			writer
				.write_pbf_packed_uint32(&self.geom_data)
				.context("Failed to write geometry data")?;
		}

		if let Some(raster) = &self.raster {
			writer.write_pbf_key(5, 2).context("Failed to write PBF key for raster data")?;
			writer.write_pbf_blob(raster).context("Failed to write raster data")?;
		}

		Ok(writer.into_blob())
	}

	/// Encodes a tile geometry. Returns `None` if every part was degenerate.
	///
	/// Collections have to be split beforehand, they have no wire representation.
	pub fn from_geometry(id: Option<u64>, tag_ids: Vec<u32>, geometry: &TileGeometry) -> Option<VectorTileFeature> {
		let geom_data = encode_feature_geometry(geometry)?;
		Some(VectorTileFeature {
			id,
			tag_ids,
			geom_type: GeomType::from(geometry),
			geom_data,
			raster: None,
		})
	}

	/// Decodes the geometry in tile units.
	///
	/// A [`DecodeError`](crate::DecodeError) stays reachable through `downcast_ref`.
	pub fn to_tile_geometry(&self, version: SpecVersion) -> Result<TileGeometry> {
		GeometryDecoder::new_tile(&self.geom_data, version)
			.decode_tile(self.geom_type)
			.context("Failed to decode feature geometry")
	}

	/// Decodes the geometry into `origin + delta / scale` coordinates.
	pub fn to_geometry(
		&self,
		version: SpecVersion,
		origin: Point<f64>,
		scale_x: f64,
		scale_y: f64,
	) -> Result<SourceGeometry> {
		GeometryDecoder::new(&self.geom_data, version, origin, scale_x, scale_y)
			.and_then(|decoder| decoder.decode(self.geom_type))
			.context("Failed to decode feature geometry")
	}
}
