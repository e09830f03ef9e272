//! The write pipeline for one layer.
//!
//! Each source feature runs through transform, simplification, clipping and
//! encoding on its own, so features are processed in parallel. Results keep the
//! input order, which keeps the produced bytes deterministic.

use crate::{
	clipper::{ClipBox, clip},
	config::ProcessorOptions,
	simplify::simplify_geometry,
	transform::{Projection, TransformStrategy, tile_bbox_mercator},
	vector_tile::{SourceFeature, TileFeature, VectorTileLayer},
};
use anyhow::{Context, Result};
use log::{debug, trace, warn};
use rayon::prelude::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

pub struct LayerProcessor<'a> {
	strategy: TransformStrategy<'a>,
	clip_box: ClipBox,
	options: ProcessorOptions,
}

impl<'a> LayerProcessor<'a> {
	/// `bbox` is the unbuffered tile in the tile grid system of `projection`.
	pub fn new(projection: &'a dyn Projection, bbox: [f64; 4], options: ProcessorOptions) -> LayerProcessor<'a> {
		LayerProcessor {
			strategy: TransformStrategy::new(projection, bbox, &options.tile, &options.transform),
			clip_box: ClipBox::from_tile(&options.tile),
			options,
		}
	}

	/// A processor for web mercator tile `z`/`x`/`y`.
	pub fn for_tile(
		projection: &'a dyn Projection,
		z: u8,
		x: u32,
		y: u32,
		options: ProcessorOptions,
	) -> LayerProcessor<'a> {
		LayerProcessor::new(projection, tile_bbox_mercator(z, x, y), options)
	}

	/// Runs one feature through the pipeline. `Ok(None)` means nothing survived.
	pub fn process_feature(&self, feature: &SourceFeature) -> Result<Option<TileFeature>> {
		let geometry = self.strategy.transform(&feature.geometry);
		if geometry.is_empty() {
			return Ok(None);
		}
		let geometry = simplify_geometry(geometry, self.options.simplify_distance);
		let kind = geometry.type_name();
		let geometry = clip(
			geometry,
			&self.clip_box,
			&self.options.clip,
			self.options.transform.safe_range,
		)
		.context("Failed to clip geometry")?;
		if geometry.is_empty() {
			trace!("{kind} has nothing left inside the clip box");
			return Ok(None);
		}
		Ok(Some(TileFeature {
			id: feature.id,
			properties: feature.properties.clone(),
			geometry,
		}))
	}

	/// Processes all features and builds a version 2 layer from them.
	///
	/// Features that fail are logged and skipped. Returns `None` if no feature
	/// produced any geometry.
	pub fn process(&self, name: &str, features: Vec<SourceFeature>) -> Option<VectorTileLayer> {
		let processed: Vec<TileFeature> = features
			.into_par_iter()
			.enumerate()
			.filter_map(|(index, feature)| match self.process_feature(&feature) {
				Ok(result) => result,
				Err(e) => {
					warn!("skipping feature {index} of layer '{name}': {e:#}");
					None
				}
			})
			.collect();

		if processed.is_empty() {
			debug!("layer '{name}' has no features left");
			return None;
		}

		let layer = VectorTileLayer::from_features(name.to_string(), self.options.tile.extent, processed);
		if layer.features.is_empty() { None } else { Some(layer) }
	}
}
