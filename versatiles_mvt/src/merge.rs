//! Merging of encoded tiles into one tile.
//!
//! Layers are kept as encoded buffers. A valid version 2 layer is appended as it
//! is. A version 1 layer is decoded under the legacy rules and written again as
//! version 2, so the merged tile only contains version 2 layers.

use crate::{
	clipper::FillRule,
	compression::decompress,
	config::{ClipOptions, ProcessorOptions, TileConfig},
	pbf::{PbfReader, PbfWriter},
	processor::LayerProcessor,
	transform::{Identity, ViewTransform},
	types::Blob,
	validity::{findings_to_string, layer_is_valid},
	vector_tile::{VectorTile, VectorTileLayer},
};
use anyhow::{Context, Result, bail};
use log::{debug, trace};

/// Buffer in pixels used when re-encoding legacy layers, large enough to keep
/// everything the source layer contains.
const LEGACY_BUFFER_SIZE: i32 = 4096;

#[derive(Clone, Debug, Default)]
pub struct TileMerger {
	layers: Vec<(String, Blob)>,
}

impl TileMerger {
	pub fn new() -> TileMerger {
		TileMerger::default()
	}

	pub fn has_layer(&self, name: &str) -> bool {
		self.layers.iter().any(|(n, _)| n == name)
	}

	pub fn layer_names(&self) -> Vec<&str> {
		self.layers.iter().map(|(n, _)| n.as_str()).collect()
	}

	pub fn len(&self) -> usize {
		self.layers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}

	/// Appends an encoded layer. Returns `false` if a layer of that name exists.
	pub fn add_layer(&mut self, layer: &VectorTileLayer) -> Result<bool> {
		if self.has_layer(&layer.name) {
			return Ok(false);
		}
		let blob = layer.to_blob().context("Failed to encode layer")?;
		self.layers.push((layer.name.clone(), blob));
		Ok(true)
	}

	/// Merges all layers of an encoded, possibly compressed, tile.
	///
	/// Every layer is validated first; an invalid layer is an error listing the
	/// findings. Layers whose name is already present are skipped. `options`
	/// describe the target tile; for legacy layers the clip settings are replaced
	/// by a polygon union with even-odd fill that keeps every ring.
	pub fn merge_from_buffer(&mut self, blob: &Blob, options: &ProcessorOptions) -> Result<()> {
		let data = decompress(blob).context("Failed to decompress tile")?;
		let mut reader = PbfReader::new(data.as_slice());

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(3, 2) => {
					let layer_data = reader.read_pbf_slice().context("Failed to read layer")?;
					self.merge_layer(layer_data, options)?;
				}
				(field, wire_type) => bail!("Vector Tile Buffer contains invalid tag {field} (wire type {wire_type})"),
			}
		}
		Ok(())
	}

	fn merge_layer(&mut self, data: &[u8], options: &ProcessorOptions) -> Result<()> {
		let report = layer_is_valid(data);
		if !report.is_valid() {
			bail!("{}", findings_to_string(report.findings));
		}
		let name = report.name.unwrap_or_default();
		if self.has_layer(&name) {
			debug!("skipping layer '{name}', it already exists");
			return Ok(());
		}

		if report.version != 1 {
			trace!("appending layer '{name}' as it is");
			self.layers.push((name, Blob::from(data)));
			return Ok(());
		}

		let layer = VectorTileLayer::read(&mut PbfReader::new(data)).context("Failed to read legacy layer")?;
		match upgrade_legacy_layer(&layer, options) {
			Some(upgraded) => {
				debug!("upgraded layer '{name}' to version 2");
				self.add_layer(&upgraded)?;
			}
			None => debug!("legacy layer '{name}' has no features left"),
		}
		Ok(())
	}

	/// Serializes the merged tile.
	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = PbfWriter::new();
		for (_, layer) in &self.layers {
			writer.write_pbf_key(3, 2).context("Failed to write PBF key")?;
			writer.write_pbf_blob(layer).context("Failed to write layer")?;
		}
		Ok(writer.into_blob())
	}

	pub fn to_tile(&self) -> Result<VectorTile> {
		VectorTile::from_blob(&self.to_blob()?)
	}
}

/// Decodes a version 1 layer and encodes it again through the write pipeline.
fn upgrade_legacy_layer(layer: &VectorTileLayer, options: &ProcessorOptions) -> Option<VectorTileLayer> {
	let extent = f64::from(layer.extent);
	let bbox = [0.0, 0.0, extent, extent];
	// source coordinates with y pointing up, as the view transform expects
	let (origin, scale_x, scale_y) = ViewTransform::new(bbox, layer.extent).decode_parameters();
	let features = layer.to_features(origin, scale_x, scale_y);

	let options = ProcessorOptions {
		tile: TileConfig {
			buffer_size: LEGACY_BUFFER_SIZE,
			..options.tile.clone()
		},
		transform: options.transform.clone(),
		clip: ClipOptions {
			fill_rule: FillRule::EvenOdd,
			multi_polygon_union: true,
			process_all_rings: true,
			..options.clip.clone()
		},
		simplify_distance: 0.0,
	};
	LayerProcessor::new(&Identity, bbox, options).process(&layer.name, features)
}
