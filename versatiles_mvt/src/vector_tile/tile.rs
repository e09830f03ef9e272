use super::layer::VectorTileLayer;
use crate::{
	pbf::{PbfReader, PbfWriter},
	types::Blob,
};
use anyhow::{Context, Result};
use log::trace;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTile {
	pub layers: Vec<VectorTileLayer>,
}

impl VectorTile {
	pub fn new(layers: Vec<VectorTileLayer>) -> VectorTile {
		VectorTile { layers }
	}

	/// Parses an uncompressed tile.
	pub fn from_blob(blob: &Blob) -> Result<VectorTile> {
		let mut reader = PbfReader::new(blob.as_slice());

		let mut tile = VectorTile::default();
		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(3, 2) => {
					tile.layers.push(
						VectorTileLayer::read(&mut reader.get_pbf_sub_reader().context("Failed to get PBF sub-reader")?)
							.context("Failed to read VectorTileLayer")?,
					);
				}
				(field, wire_type) => {
					trace!("skipping unknown tile field {field} (wire type {wire_type})");
					reader.skip(wire_type).context("Failed to skip unknown tile field")?;
				}
			}
		}

		Ok(tile)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = PbfWriter::new();

		for layer in &self.layers {
			writer.write_pbf_key(3, 2).context("Failed to write PBF key")?;
			writer
				.write_pbf_blob(&layer.to_blob().context("Failed to convert VectorTileLayer to blob")?)
				.context("Failed to write PBF blob")?;
		}

		Ok(writer.into_blob())
	}

	pub fn find_layer(&self, name: &str) -> Option<&VectorTileLayer> {
		self.layers.iter().find(|layer| layer.name == name)
	}

	pub fn find_layer_mut(&mut self, name: &str) -> Option<&mut VectorTileLayer> {
		self.layers.iter_mut().find(|layer| layer.name == name)
	}
}
