//! Structural validation of raw vector tile buffers.
//!
//! The walk only inspects field keys and message framing. It never decodes
//! geometries and never stops at the first problem: every finding is collected into
//! an [`EnumSet`]. A buffer whose framing cannot be parsed produces
//! [`ValidityError::InvalidPbfBuffer`] in addition to whatever was found before the
//! failure.
//!
//! A known field number with an unexpected wire type is treated like an unknown
//! field: it is reported and skipped.

use crate::{pbf::PbfReader, types::Blob};
use anyhow::Result;
use enumset::{EnumSet, EnumSetType};
use itertools::Itertools;
use std::{collections::HashSet, fmt};

#[derive(Debug, EnumSetType, PartialOrd, Ord, Hash)]
pub enum ValidityError {
	TileRepeatedLayerNames,
	TileHasUnknownTag,
	TileHasDifferentVersions,
	LayerHasNoName,
	LayerHasMultipleNames,
	LayerHasNoExtent,
	LayerHasMultipleExtent,
	LayerHasMultipleVersion,
	LayerHasNoFeatures,
	LayerHasInvalidVersion,
	LayerHasRasterAndVector,
	LayerHasUnknownTag,
	ValueMultipleValues,
	ValueNoValue,
	ValueHasUnknownTag,
	FeatureIsEmpty,
	FeatureMultipleId,
	FeatureMultipleTags,
	FeatureMultipleGeom,
	FeatureMultipleRaster,
	FeatureRasterAndGeom,
	FeatureNoGeomType,
	FeatureHasInvalidGeomType,
	FeatureHasUnknownTag,
	InvalidPbfBuffer,
}

impl ValidityError {
	pub fn description(&self) -> &'static str {
		use ValidityError::*;
		match self {
			TileRepeatedLayerNames => "Vector Tile message has two or more layers with the same name",
			TileHasUnknownTag => "Vector Tile message has an unknown tag",
			TileHasDifferentVersions => "Vector Tile message has layers with different versions",
			LayerHasNoName => "Vector Tile Layer message has no name",
			LayerHasMultipleNames => "Vector Tile Layer message has multiple name tags",
			LayerHasNoExtent => "Vector Tile Layer message has no extent",
			LayerHasMultipleExtent => "Vector Tile Layer message has multiple extent tags",
			LayerHasMultipleVersion => "Vector Tile Layer message has multiple version tags",
			LayerHasNoFeatures => "Vector Tile Layer message has no features",
			LayerHasInvalidVersion => "Vector Tile Layer message has an invalid version",
			LayerHasRasterAndVector => "Vector Tile Layer contains raster and vector features",
			LayerHasUnknownTag => "Vector Tile Layer message has an unknown tag",
			ValueMultipleValues => "Vector Tile Value message contains more than one value",
			ValueNoValue => "Vector Tile Value message contains no value",
			ValueHasUnknownTag => "Vector Tile Value message has an unknown tag",
			FeatureIsEmpty => "Vector Tile Feature message has no geometry",
			FeatureMultipleId => "Vector Tile Feature message has multiple ids",
			FeatureMultipleTags => "Vector Tile Feature message has multiple repeated tags",
			FeatureMultipleGeom => "Vector Tile Feature message has multiple geometries",
			FeatureMultipleRaster => "Vector Tile Feature message has multiple rasters",
			FeatureRasterAndGeom => "Vector Tile Feature message has both raster and geometry types",
			FeatureNoGeomType => "Vector Tile Feature message is missing a geometry type",
			FeatureHasInvalidGeomType => "Vector Tile Feature message has an invalid geometry type",
			FeatureHasUnknownTag => "Vector Tile Feature message has an unknown tag",
			InvalidPbfBuffer => "Buffer is not encoded as a valid PBF",
		}
	}
}

impl fmt::Display for ValidityError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.description())
	}
}

/// Formats findings as a bullet list, or an empty string if there are none.
pub fn findings_to_string(findings: EnumSet<ValidityError>) -> String {
	if findings.is_empty() {
		return String::new();
	}
	let lines = findings.iter().map(|finding| format!(" - {finding}\n")).join("");
	format!("Vector Tile Validity Errors Found:\n{lines}")
}

/// Validates a whole, decompressed tile.
pub fn tile_is_valid(blob: &Blob) -> EnumSet<ValidityError> {
	let mut findings = EnumSet::new();
	let mut names = HashSet::new();
	let mut versions = HashSet::new();
	let mut reader = PbfReader::new(blob.as_slice());
	if walk_tile(&mut reader, &mut findings, &mut names, &mut versions).is_err() {
		findings.insert(ValidityError::InvalidPbfBuffer);
	}
	if versions.len() > 1 {
		findings.insert(ValidityError::TileHasDifferentVersions);
	}
	findings
}

fn walk_tile(
	reader: &mut PbfReader<'_>,
	findings: &mut EnumSet<ValidityError>,
	names: &mut HashSet<String>,
	versions: &mut HashSet<u32>,
) -> Result<()> {
	while reader.has_remaining() {
		match reader.read_pbf_key()? {
			(3, 2) => {
				let report = layer_is_valid(reader.read_pbf_slice()?);
				*findings |= report.findings;
				versions.insert(report.version);
				if !names.insert(report.name.unwrap_or_default()) {
					findings.insert(ValidityError::TileRepeatedLayerNames);
				}
			}
			(_, wire_type) => {
				findings.insert(ValidityError::TileHasUnknownTag);
				reader.skip(wire_type)?;
			}
		}
	}
	Ok(())
}

/// Result of validating a single layer message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerReport {
	pub findings: EnumSet<ValidityError>,
	/// The last name found, if any.
	pub name: Option<String>,
	/// The last version found, 1 if the field is missing.
	pub version: u32,
}

impl LayerReport {
	pub fn is_valid(&self) -> bool {
		self.findings.is_empty()
	}
}

#[derive(Default)]
struct LayerState {
	names: u32,
	extents: u32,
	versions: u32,
	features: u32,
	has_raster: bool,
	has_geometry: bool,
}

/// Validates the content of one layer message, without its surrounding key.
pub fn layer_is_valid(data: &[u8]) -> LayerReport {
	let mut report = LayerReport {
		version: 1,
		..LayerReport::default()
	};
	let mut state = LayerState::default();
	if walk_layer(&mut PbfReader::new(data), &mut report, &mut state).is_err() {
		report.findings.insert(ValidityError::InvalidPbfBuffer);
	}

	use ValidityError::*;
	let findings = &mut report.findings;
	match state.names {
		0 => findings.insert(LayerHasNoName),
		1 => false,
		_ => findings.insert(LayerHasMultipleNames),
	};
	if state.extents > 1 {
		findings.insert(LayerHasMultipleExtent);
	}
	if state.extents == 0 && report.version != 1 {
		findings.insert(LayerHasNoExtent);
	}
	if state.versions > 1 {
		findings.insert(LayerHasMultipleVersion);
	}
	if report.version == 0 || report.version > 2 {
		findings.insert(LayerHasInvalidVersion);
	}
	if state.features == 0 {
		findings.insert(LayerHasNoFeatures);
	}
	if state.has_raster && state.has_geometry {
		findings.insert(LayerHasRasterAndVector);
	}
	report
}

fn walk_layer(reader: &mut PbfReader<'_>, report: &mut LayerReport, state: &mut LayerState) -> Result<()> {
	while reader.has_remaining() {
		match reader.read_pbf_key()? {
			(1, 2) => {
				state.names += 1;
				report.name = Some(reader.read_pbf_string()?);
			}
			(2, 2) => {
				state.features += 1;
				let feature = feature_is_valid(reader.read_pbf_slice()?);
				report.findings |= feature.findings;
				state.has_raster |= feature.has_raster;
				state.has_geometry |= feature.has_geometry;
			}
			(3, 2) => {
				reader.read_pbf_slice()?;
			}
			(4, 2) => report.findings |= value_is_valid(reader.read_pbf_slice()?),
			(5, 0) => {
				state.extents += 1;
				reader.read_varint()?;
			}
			(15, 0) => {
				state.versions += 1;
				report.version = u32::try_from(reader.read_varint()?).unwrap_or(u32::MAX);
			}
			(_, wire_type) => {
				report.findings.insert(ValidityError::LayerHasUnknownTag);
				reader.skip(wire_type)?;
			}
		}
	}
	Ok(())
}

struct FeatureReport {
	findings: EnumSet<ValidityError>,
	has_raster: bool,
	has_geometry: bool,
}

#[derive(Default)]
struct FeatureState {
	ids: u32,
	tags: u32,
	types: u32,
	geometries: u32,
	rasters: u32,
}

fn feature_is_valid(data: &[u8]) -> FeatureReport {
	let mut findings = EnumSet::new();
	let mut state = FeatureState::default();
	if walk_feature(&mut PbfReader::new(data), &mut findings, &mut state).is_err() {
		findings.insert(ValidityError::InvalidPbfBuffer);
	}

	use ValidityError::*;
	if state.ids > 1 {
		findings.insert(FeatureMultipleId);
	}
	if state.tags > 1 {
		findings.insert(FeatureMultipleTags);
	}
	if state.geometries > 1 {
		findings.insert(FeatureMultipleGeom);
	}
	if state.rasters > 1 {
		findings.insert(FeatureMultipleRaster);
	}
	if state.geometries > 0 && state.rasters > 0 {
		findings.insert(FeatureRasterAndGeom);
	}
	if state.geometries == 0 && state.rasters == 0 {
		findings.insert(FeatureIsEmpty);
	}
	if state.geometries > 0 && state.types == 0 {
		findings.insert(FeatureNoGeomType);
	}
	FeatureReport {
		findings,
		has_raster: state.rasters > 0,
		has_geometry: state.geometries > 0,
	}
}

fn walk_feature(reader: &mut PbfReader<'_>, findings: &mut EnumSet<ValidityError>, state: &mut FeatureState) -> Result<()> {
	while reader.has_remaining() {
		match reader.read_pbf_key()? {
			(1, 0) => {
				state.ids += 1;
				reader.read_varint()?;
			}
			(2, 2) => {
				state.tags += 1;
				reader.read_pbf_packed_uint32()?;
			}
			(3, 0) => {
				state.types += 1;
				if !(1..=3).contains(&reader.read_varint()?) {
					findings.insert(ValidityError::FeatureHasInvalidGeomType);
				}
			}
			(4, 2) => {
				state.geometries += 1;
				reader.read_pbf_packed_uint32()?;
			}
			(5, 2) => {
				state.rasters += 1;
				reader.read_pbf_slice()?;
			}
			(_, wire_type) => {
				findings.insert(ValidityError::FeatureHasUnknownTag);
				reader.skip(wire_type)?;
			}
		}
	}
	Ok(())
}

/// Validates the content of one value message.
pub fn value_is_valid(data: &[u8]) -> EnumSet<ValidityError> {
	let mut findings = EnumSet::new();
	let mut values = 0u32;
	if walk_value(&mut PbfReader::new(data), &mut findings, &mut values).is_err() {
		findings.insert(ValidityError::InvalidPbfBuffer);
	}
	match values {
		0 => findings.insert(ValidityError::ValueNoValue),
		1 => false,
		_ => findings.insert(ValidityError::ValueMultipleValues),
	};
	findings
}

fn walk_value(reader: &mut PbfReader<'_>, findings: &mut EnumSet<ValidityError>, values: &mut u32) -> Result<()> {
	while reader.has_remaining() {
		let (field, wire_type) = reader.read_pbf_key()?;
		let expected = match field {
			1 => Some(2),
			2 => Some(5),
			3 => Some(1),
			4..=7 => Some(0),
			_ => None,
		};
		if expected == Some(wire_type) {
			*values += 1;
		} else {
			findings.insert(ValidityError::ValueHasUnknownTag);
		}
		reader.skip(wire_type)?;
	}
	Ok(())
}
