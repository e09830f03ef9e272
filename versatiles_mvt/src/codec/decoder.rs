//! Decodes a geometry command stream back into geometry values.
//!
//! One decoder serves both versions of the vector tile format. The version picks a
//! row of [`VersionRules`]; every structural check consults that row and either
//! fails with a [`DecodeError`] (version 2) or tolerates the input the way legacy
//! version 1 readers did.
//!
//! Decoding happens in tile space first: deltas accumulate in an `i64` cursor,
//! rings are classified by the sign of their area in tile units, where exterior
//! rings are positive. Only then are coordinates mapped to the output space with
//! `origin + delta / scale`, per axis. A negative scale on exactly one axis flips
//! the orientation of every ring in the output.

use super::command::{CLOSE_PATH, LINE_TO, MOVE_TO, command_name, split_header, unzigzag};
use crate::{
	error::DecodeError,
	math::area_ring,
	types::{LineString, Point, Polygon, Ring, SourceGeometry, TileGeometry},
	vector_tile::GeomType,
};
use log::trace;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpecVersion {
	V1,
	#[default]
	V2,
}

impl SpecVersion {
	/// Maps a layer's `version` field; everything below 2 follows the legacy rules.
	pub fn from_layer_version(version: u32) -> SpecVersion {
		if version >= 2 { SpecVersion::V2 } else { SpecVersion::V1 }
	}

	fn rules(self) -> &'static VersionRules {
		match self {
			SpecVersion::V1 => &V1_RULES,
			SpecVersion::V2 => &V2_RULES,
		}
	}
}

/// Which structural problems are fatal. `false` means the legacy tolerance applies.
#[derive(Debug)]
struct VersionRules {
	/// Zero repeat counts; tolerated by skipping the header.
	zero_count: bool,
	/// Unknown command ids; tolerated by ending the stream.
	unknown_command: bool,
	/// MoveTo with a repeat count other than 1 outside of points.
	multi_move_to: bool,
	/// A second MoveTo or LineTo block within the same part.
	repeated_block: bool,
	/// LineTo/ClosePath before any MoveTo, repeated ClosePath, commands not valid for the type.
	misplaced_command: bool,
	/// Lines under 2 points, rings under 3 points or without area.
	degenerate_part: bool,
	/// A polygon whose first ring is not an exterior ring.
	winding: bool,
}

static V1_RULES: VersionRules = VersionRules {
	zero_count: false,
	unknown_command: false,
	multi_move_to: false,
	repeated_block: false,
	misplaced_command: false,
	degenerate_part: false,
	winding: false,
};

static V2_RULES: VersionRules = VersionRules {
	zero_count: true,
	unknown_command: true,
	multi_move_to: true,
	repeated_block: true,
	misplaced_command: true,
	degenerate_part: true,
	winding: true,
};

/// A line or ring under construction.
#[derive(Default)]
struct Part {
	points: Vec<Point<i64>>,
	has_line_to: bool,
	closed: bool,
}

impl Part {
	fn start(p: Point<i64>) -> Part {
		Part {
			points: vec![p],
			..Part::default()
		}
	}

	fn push(&mut self, p: Point<i64>) {
		// a LineTo that does not move adds nothing
		if self.points.last() != Some(&p) {
			self.points.push(p);
		}
	}
}

/// Single-use decoder bound to one command stream.
pub struct GeometryDecoder<'a> {
	commands: &'a [u32],
	index: usize,
	cursor: Point<i64>,
	rules: &'static VersionRules,
	origin: Point<f64>,
	scale_x: f64,
	scale_y: f64,
}

impl<'a> GeometryDecoder<'a> {
	/// Creates a decoder that maps tile coordinates to `origin + delta / scale`.
	pub fn new(
		commands: &'a [u32],
		version: SpecVersion,
		origin: Point<f64>,
		scale_x: f64,
		scale_y: f64,
	) -> Result<GeometryDecoder<'a>, DecodeError> {
		let valid = |s: f64| s.is_finite() && s != 0.0;
		if !valid(scale_x) || !valid(scale_y) {
			return Err(DecodeError::InvalidScale(scale_x, scale_y));
		}
		Ok(GeometryDecoder {
			commands,
			index: 0,
			cursor: Point::default(),
			rules: version.rules(),
			origin,
			scale_x,
			scale_y,
		})
	}

	/// Creates a decoder with origin 0 and scale 1.
	pub fn new_tile(commands: &'a [u32], version: SpecVersion) -> GeometryDecoder<'a> {
		GeometryDecoder {
			commands,
			index: 0,
			cursor: Point::default(),
			rules: version.rules(),
			origin: Point::default(),
			scale_x: 1.0,
			scale_y: 1.0,
		}
	}

	/// Decodes the stream into output coordinates.
	pub fn decode(self, geom_type: GeomType) -> Result<SourceGeometry, DecodeError> {
		let origin = self.origin;
		let (scale_x, scale_y) = (self.scale_x, self.scale_y);
		let tile = self.decode_tile(geom_type)?;
		Ok(map_geometry(tile, &|p: Point<i64>| {
			Point::new(origin.x + p.x as f64 / scale_x, origin.y + p.y as f64 / scale_y)
		}))
	}

	/// Decodes the stream into integer tile coordinates, ignoring origin and scale.
	pub fn decode_tile(mut self, geom_type: GeomType) -> Result<TileGeometry, DecodeError> {
		match geom_type {
			GeomType::Point => self.decode_points(),
			GeomType::LineString => self.decode_lines(),
			GeomType::Polygon => self.decode_polygons(),
			GeomType::Unknown => Err(DecodeError::UnknownGeometryType(0)),
		}
	}

	/// Fails if `fatal` is set, otherwise logs the tolerated problem.
	fn check(&self, fatal: bool, error: DecodeError) -> Result<(), DecodeError> {
		if fatal {
			Err(error)
		} else {
			trace!("tolerating: {error}");
			Ok(())
		}
	}

	/// Reads the next usable command header as `(id, count)`, or `None` at the end.
	fn next_block(&mut self) -> Result<Option<(u32, u32)>, DecodeError> {
		while let Some(&header) = self.commands.get(self.index) {
			self.index += 1;
			let (id, count) = split_header(header);
			if !matches!(id, MOVE_TO | LINE_TO | CLOSE_PATH) {
				self.check(self.rules.unknown_command, DecodeError::UnknownCommand(id))?;
				return Ok(None);
			}
			if count == 0 {
				// no parameters follow, so the next integer is the next header
				self.check(self.rules.zero_count, DecodeError::ZeroLengthCommand(id))?;
				continue;
			}
			return Ok(Some((id, count)));
		}
		Ok(None)
	}

	fn read_point(&mut self) -> Result<Point<i64>, DecodeError> {
		let (Some(&dx), Some(&dy)) = (self.commands.get(self.index), self.commands.get(self.index + 1)) else {
			return Err(DecodeError::TruncatedParameters);
		};
		self.index += 2;
		self.cursor.x += i64::from(unzigzag(dx));
		self.cursor.y += i64::from(unzigzag(dy));
		Ok(self.cursor)
	}

	fn decode_points(&mut self) -> Result<TileGeometry, DecodeError> {
		let mut points = Vec::new();
		let mut seen_move_to = false;
		let mut last_move_to = Point::default();

		while let Some((id, count)) = self.next_block()? {
			match id {
				MOVE_TO => {
					if seen_move_to {
						self.check(self.rules.repeated_block, DecodeError::RepeatedCommandBlock("MoveTo"))?;
					}
					seen_move_to = true;
				}
				LINE_TO => {
					self.check(
						self.rules.misplaced_command,
						DecodeError::CommandNotAllowed("LineTo", "Point"),
					)?;
				}
				_ => {
					self.check(
						self.rules.misplaced_command,
						DecodeError::CommandNotAllowed("ClosePath", "Point"),
					)?;
					// legacy readers emit the last MoveTo position again
					points.extend(std::iter::repeat_n(last_move_to, count as usize));
					continue;
				}
			}
			for _ in 0..count {
				let point = self.read_point()?;
				if id == MOVE_TO {
					last_move_to = point;
				}
				points.push(point);
			}
		}

		Ok(match points.len() {
			0 => TileGeometry::Empty,
			1 => TileGeometry::Point(points[0]),
			_ => TileGeometry::MultiPoint(points),
		})
	}

	/// Handles a MoveTo point for lines and rings: starts a new part, finishing
	/// the current one unless it never got past its own MoveTo.
	fn move_to<F>(&mut self, part: &mut Option<Part>, p: Point<i64>, mut finish: F) -> Result<(), DecodeError>
	where
		F: FnMut(&Self, Part) -> Result<(), DecodeError>,
	{
		if let Some(current) = part.take() {
			if current.has_line_to || current.closed {
				finish(self, current)?;
			} else {
				self.check(self.rules.repeated_block, DecodeError::RepeatedCommandBlock("MoveTo"))?;
				trace!("replacing MoveTo without LineTo");
			}
		}
		*part = Some(Part::start(p));
		Ok(())
	}

	/// Handles a LineTo block for lines and rings.
	fn line_to(&mut self, part: &mut Option<Part>, count: u32) -> Result<(), DecodeError> {
		match part.as_ref() {
			Some(current) if current.has_line_to || current.closed => {
				self.check(self.rules.repeated_block, DecodeError::RepeatedCommandBlock("LineTo"))?;
			}
			Some(_) => {}
			None => {
				self.check(self.rules.misplaced_command, DecodeError::CommandBeforeMoveTo("LineTo"))?;
			}
		}
		let current = part.get_or_insert_with(Part::default);
		current.has_line_to = true;
		current.closed = false;
		for _ in 0..count {
			let p = self.read_point()?;
			current.push(p);
		}
		Ok(())
	}

	fn decode_lines(&mut self) -> Result<TileGeometry, DecodeError> {
		let mut lines: Vec<LineString<i64>> = Vec::new();
		let mut part: Option<Part> = None;

		let finish = |decoder: &Self, line: Part, lines: &mut Vec<LineString<i64>>| -> Result<(), DecodeError> {
			if line.points.len() < 2 {
				decoder.check(decoder.rules.degenerate_part, DecodeError::LineTooShort)?;
				trace!("dropping line with {} points", line.points.len());
			} else {
				lines.push(line.points);
			}
			Ok(())
		};

		while let Some((id, count)) = self.next_block()? {
			match id {
				MOVE_TO => {
					if count != 1 {
						self.check(self.rules.multi_move_to, DecodeError::MultiMoveTo(count))?;
					}
					for _ in 0..count {
						let p = self.read_point()?;
						self.move_to(&mut part, p, |d, line| finish(d, line, &mut lines))?;
					}
				}
				LINE_TO => self.line_to(&mut part, count)?,
				_ => self.check(
					self.rules.misplaced_command,
					DecodeError::CommandNotAllowed(command_name(id), "LineString"),
				)?,
			}
		}
		if let Some(line) = part {
			finish(self, line, &mut lines)?;
		}

		Ok(match lines.len() {
			0 => TileGeometry::Empty,
			1 => TileGeometry::LineString(lines.remove(0)),
			_ => TileGeometry::MultiLineString(lines),
		})
	}

	fn decode_polygons(&mut self) -> Result<TileGeometry, DecodeError> {
		// `None` marks a ring dropped as degenerate; the legacy classification needs to see it
		let mut rings: Vec<Option<Ring<i64>>> = Vec::new();
		let mut part: Option<Part> = None;

		let finish = |decoder: &Self, ring: Part, rings: &mut Vec<Option<Ring<i64>>>| -> Result<(), DecodeError> {
			let mut points = ring.points;
			if points.len() > 1 && points.first() == points.last() {
				points.pop();
			}
			if points.len() < 3 {
				decoder.check(decoder.rules.degenerate_part, DecodeError::RingTooShort)?;
				trace!("dropping ring with {} points", points.len());
				rings.push(None);
				return Ok(());
			}
			if area_ring(&points) == 0.0 {
				decoder.check(decoder.rules.degenerate_part, DecodeError::ZeroAreaRing)?;
			}
			points.push(points[0]);
			rings.push(Some(points));
			Ok(())
		};

		while let Some((id, count)) = self.next_block()? {
			match id {
				MOVE_TO => {
					if count != 1 {
						self.check(self.rules.multi_move_to, DecodeError::MultiMoveTo(count))?;
					}
					for _ in 0..count {
						let p = self.read_point()?;
						self.move_to(&mut part, p, |d, ring| finish(d, ring, &mut rings))?;
					}
				}
				LINE_TO => self.line_to(&mut part, count)?,
				_ => {
					for _ in 0..count {
						match part.as_mut() {
							None => {
								self.check(self.rules.misplaced_command, DecodeError::CommandBeforeMoveTo("ClosePath"))?;
							}
							Some(ring) if ring.closed => {
								self.check(self.rules.misplaced_command, DecodeError::ConsecutiveClosePath)?;
							}
							Some(ring) => ring.closed = true,
						}
					}
				}
			}
		}
		if let Some(ring) = part {
			finish(self, ring, &mut rings)?;
		}

		let polygons = if self.rules.winding {
			classify_rings(rings)?
		} else {
			classify_rings_legacy(rings)
		};

		Ok(match polygons.len() {
			0 => TileGeometry::Empty,
			1 => TileGeometry::Polygon(polygons.into_iter().next().unwrap_or_default()),
			_ => TileGeometry::MultiPolygon(polygons),
		})
	}
}

/// Positive rings start a new polygon, negative rings are holes of the last one.
fn classify_rings(rings: Vec<Option<Ring<i64>>>) -> Result<Vec<Polygon<i64>>, DecodeError> {
	let mut polygons: Vec<Polygon<i64>> = Vec::new();
	for ring in rings.into_iter().flatten() {
		if area_ring(&ring) > 0.0 {
			polygons.push(vec![ring]);
		} else if let Some(polygon) = polygons.last_mut() {
			polygon.push(ring);
		} else {
			return Err(DecodeError::WrongWinding);
		}
	}
	Ok(polygons)
}

/// Legacy classification: the winding of the first usable ring defines "exterior",
/// and rings are reversed so that exteriors end up positive.
///
/// If the first ring is degenerate the flag `exterior_was_degenerate` is never
/// reset by the next exterior, so the holes of that exterior are dropped until
/// another exterior shows up.
fn classify_rings_legacy(rings: Vec<Option<Ring<i64>>>) -> Vec<Polygon<i64>> {
	let mut polygons: Vec<Polygon<i64>> = Vec::new();
	let mut first = true;
	let mut first_negative = false;
	let mut exterior_was_degenerate = false;

	for ring in rings {
		let Some(mut ring) = ring else {
			if first {
				exterior_was_degenerate = true;
			}
			continue;
		};
		let negative = area_ring(&ring) < 0.0;
		if first_negative || (first && negative) {
			ring.reverse();
		}
		if first {
			first_negative = negative;
			first = false;
			polygons.push(vec![ring]);
		} else if negative == first_negative {
			polygons.push(vec![ring]);
			exterior_was_degenerate = false;
		} else if exterior_was_degenerate {
			trace!("dropping hole after a degenerate exterior ring");
		} else if let Some(polygon) = polygons.last_mut() {
			polygon.push(ring);
		}
	}
	polygons
}

fn map_ring<F: Fn(Point<i64>) -> Point<f64>>(ring: Vec<Point<i64>>, f: &F) -> Vec<Point<f64>> {
	ring.into_iter().map(f).collect()
}

fn map_geometry<F: Fn(Point<i64>) -> Point<f64>>(geometry: TileGeometry, f: &F) -> SourceGeometry {
	use TileGeometry as G;
	match geometry {
		G::Empty => SourceGeometry::Empty,
		G::Point(p) => SourceGeometry::Point(f(p)),
		G::MultiPoint(points) => SourceGeometry::MultiPoint(map_ring(points, f)),
		G::LineString(line) => SourceGeometry::LineString(map_ring(line, f)),
		G::MultiLineString(lines) => {
			SourceGeometry::MultiLineString(lines.into_iter().map(|l| map_ring(l, f)).collect())
		}
		G::Polygon(rings) => SourceGeometry::Polygon(rings.into_iter().map(|r| map_ring(r, f)).collect()),
		G::MultiPolygon(polygons) => SourceGeometry::MultiPolygon(
			polygons
				.into_iter()
				.map(|rings| rings.into_iter().map(|r| map_ring(r, f)).collect())
				.collect(),
		),
		G::Collection(members) => {
			SourceGeometry::Collection(members.into_iter().map(|m| map_geometry(m, f)).collect())
		}
	}
}

/// Decodes `commands` of the given type at origin 0 and scale 1.
pub fn decode_geometry(
	commands: &[u32],
	geom_type: GeomType,
	version: SpecVersion,
) -> Result<SourceGeometry, DecodeError> {
	GeometryDecoder::new_tile(commands, version).decode(geom_type)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::encode_feature_geometry;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn decode(commands: &[u32], geom_type: GeomType, version: SpecVersion) -> Result<TileGeometry, DecodeError> {
		GeometryDecoder::new_tile(commands, version).decode_tile(geom_type)
	}

	fn both(commands: &[u32], geom_type: GeomType) -> TileGeometry {
		let v1 = decode(commands, geom_type, SpecVersion::V1).unwrap();
		let v2 = decode(commands, geom_type, SpecVersion::V2).unwrap();
		assert_eq!(v1, v2);
		v2
	}

	fn square(x: i64, y: i64, size: i64) -> Vec<[i64; 2]> {
		vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]]
	}

	#[test]
	fn point() {
		assert_eq!(both(&[9, 20, 20], GeomType::Point), TileGeometry::new_point([10, 10]));
	}

	#[test]
	fn multi_point() {
		assert_eq!(
			both(&[17, 0, 0, 2, 2], GeomType::Point),
			TileGeometry::new_multi_point(&[[0, 0], [1, 1]])
		);
	}

	#[test]
	fn line_string() {
		assert_eq!(
			both(&[9, 0, 0, 18, 2, 2, 198, 198], GeomType::LineString),
			TileGeometry::new_line_string(&[[0, 0], [1, 1], [100, 100]])
		);
	}

	fn hole(x: i64, y: i64, size: i64) -> Vec<[i64; 2]> {
		let mut ring = square(x, y, size);
		ring.reverse();
		ring
	}

	#[rstest]
	#[case::point(TileGeometry::new_point([3, -7]))]
	#[case::multi_point(TileGeometry::new_multi_point(&[[5, 5], [-20, 3], [5, 5], [400, 4000]]))]
	#[case::line_string(TileGeometry::new_line_string(&[[0, 0], [1, 1], [100, 100], [50, -8]]))]
	#[case::multi_line_string(TileGeometry::new_multi_line_string(&[
		vec![[0, 0], [10, 0]],
		vec![[12, 0], [12, 10], [-5, 10]],
		vec![[300, 300], [301, 302]],
	]))]
	#[case::polygon(TileGeometry::new_polygon(&[square(0, 0, 10), hole(2, 2, 3)]))]
	#[case::multi_polygon(TileGeometry::new_multi_polygon(&[
		vec![square(0, 0, 10), hole(2, 2, 3), hole(6, 6, 2)],
		vec![square(20, 0, 10)],
		vec![square(-50, -50, 20), hole(-45, -45, 5)],
	]))]
	fn encoded_geometry_decodes_back(
		#[case] geometry: TileGeometry,
		#[values(SpecVersion::V1, SpecVersion::V2)] version: SpecVersion,
	) {
		let commands = encode_feature_geometry(&geometry).unwrap();
		assert_eq!(decode(&commands, GeomType::from(&geometry), version), Ok(geometry));
	}

	#[test]
	fn polygon_with_hole_round_trip() {
		let geometry = TileGeometry::new_polygon(&[
			vec![[0, 0], [0, 10], [-10, 10], [-10, 0], [0, 0]],
			vec![[-7, 7], [-3, 7], [-3, 3], [-7, 3], [-7, 7]],
		]);
		let commands = encode_feature_geometry(&geometry).unwrap();
		assert_eq!(both(&commands, GeomType::Polygon), geometry);
	}

	#[test]
	fn two_exteriors_make_a_multi_polygon() {
		let commands = [
			9, 0, 0, 26, 20, 0, 0, 20, 19, 0, 15, //
			9, 40, 19, 26, 20, 0, 0, 20, 19, 0, 15,
		];
		assert_eq!(
			both(&commands, GeomType::Polygon),
			TileGeometry::new_multi_polygon(&[vec![square(0, 0, 10)], vec![square(20, 0, 10)]])
		);
	}

	#[test]
	fn zero_delta_line_to_is_skipped() {
		assert_eq!(
			both(&[9, 0, 0, 26, 0, 0, 2, 2, 4, 4], GeomType::LineString),
			TileGeometry::new_line_string(&[[0, 0], [1, 1], [3, 3]])
		);
	}

	#[rstest]
	#[case::ring_too_short(&[9, 2, 2, 15], GeomType::Polygon, DecodeError::RingTooShort, TileGeometry::Empty)]
	#[case::zero_length_command(&[1, 9, 2, 2], GeomType::Point, DecodeError::ZeroLengthCommand(1), TileGeometry::new_point([1, 1]))]
	#[case::unknown_command(&[9, 2, 2, 11, 4, 4], GeomType::Point, DecodeError::UnknownCommand(3), TileGeometry::new_point([1, 1]))]
	#[case::multi_move_to(&[17, 0, 0, 2, 2], GeomType::LineString, DecodeError::MultiMoveTo(2), TileGeometry::Empty)]
	#[case::line_to_before_move_to(
		&[18, 2, 2, 4, 4],
		GeomType::LineString,
		DecodeError::CommandBeforeMoveTo("LineTo"),
		TileGeometry::new_line_string(&[[1, 1], [3, 3]])
	)]
	#[case::close_path_in_line(
		&[9, 0, 0, 18, 2, 2, 4, 4, 15],
		GeomType::LineString,
		DecodeError::CommandNotAllowed("ClosePath", "LineString"),
		TileGeometry::new_line_string(&[[0, 0], [1, 1], [3, 3]])
	)]
	#[case::repeated_line_to(
		&[9, 0, 0, 10, 2, 2, 10, 2, 2],
		GeomType::LineString,
		DecodeError::RepeatedCommandBlock("LineTo"),
		TileGeometry::new_line_string(&[[0, 0], [1, 1], [2, 2]])
	)]
	#[case::line_to_in_point(
		&[9, 2, 2, 10, 2, 2],
		GeomType::Point,
		DecodeError::CommandNotAllowed("LineTo", "Point"),
		TileGeometry::new_multi_point(&[[1, 1], [2, 2]])
	)]
	#[case::close_path_in_point(
		&[17, 2, 2, 4, 4, 15, 10, 2, 2, 15],
		GeomType::Point,
		DecodeError::CommandNotAllowed("ClosePath", "Point"),
		TileGeometry::new_multi_point(&[[1, 1], [3, 3], [3, 3], [4, 4], [3, 3]])
	)]
	#[case::consecutive_close_path(
		&[9, 0, 0, 26, 20, 0, 0, 20, 19, 0, 15, 15],
		GeomType::Polygon,
		DecodeError::ConsecutiveClosePath,
		TileGeometry::new_polygon(&[square(0, 0, 10)])
	)]
	#[case::close_path_before_move_to(
		&[15, 9, 0, 0, 26, 20, 0, 0, 20, 19, 0, 15],
		GeomType::Polygon,
		DecodeError::CommandBeforeMoveTo("ClosePath"),
		TileGeometry::new_polygon(&[square(0, 0, 10)])
	)]
	#[case::exterior_with_wrong_winding(
		&[9, 0, 0, 26, 0, 20, 20, 0, 0, 19, 15],
		GeomType::Polygon,
		DecodeError::WrongWinding,
		TileGeometry::new_polygon(&[square(0, 0, 10)])
	)]
	#[case::zero_area_ring(
		&[9, 0, 0, 18, 2, 2, 2, 2, 15],
		GeomType::Polygon,
		DecodeError::ZeroAreaRing,
		TileGeometry::new_polygon(&[vec![[0, 0], [1, 1], [2, 2], [0, 0]]])
	)]
	fn strict_rejects_and_legacy_tolerates(
		#[case] commands: &[u32],
		#[case] geom_type: GeomType,
		#[case] error: DecodeError,
		#[case] legacy: TileGeometry,
	) {
		assert_eq!(decode(commands, geom_type, SpecVersion::V2), Err(error));
		assert_eq!(decode(commands, geom_type, SpecVersion::V1), Ok(legacy));
	}

	#[rstest]
	#[case(SpecVersion::V1)]
	#[case(SpecVersion::V2)]
	fn truncated_parameters(#[case] version: SpecVersion) {
		assert_eq!(
			decode(&[9, 2], GeomType::Point, version),
			Err(DecodeError::TruncatedParameters)
		);
		assert_eq!(
			decode(&[9, 0, 0, 26, 2, 2, 4], GeomType::LineString, version),
			Err(DecodeError::TruncatedParameters)
		);
	}

	#[test]
	fn unknown_geometry_type() {
		assert_eq!(
			decode(&[9, 2, 2], GeomType::Unknown, SpecVersion::V1),
			Err(DecodeError::UnknownGeometryType(0))
		);
	}

	#[test]
	fn empty_stream_is_empty_geometry() {
		assert_eq!(both(&[], GeomType::Polygon), TileGeometry::Empty);
		assert_eq!(both(&[], GeomType::Point), TileGeometry::Empty);
	}

	#[test]
	fn origin_and_scale() {
		let decoder = GeometryDecoder::new(&[9, 20, 20], SpecVersion::V2, Point::new(100.0, 200.0), 2.0, -4.0).unwrap();
		assert_eq!(
			decoder.decode(GeomType::Point).unwrap(),
			SourceGeometry::new_point([105.0, 197.5])
		);
	}

	#[test]
	fn negative_scale_flips_output_winding_only() {
		let commands = [9, 0, 0, 26, 20, 0, 0, 20, 19, 0, 15];
		let decoder = GeometryDecoder::new(&commands, SpecVersion::V2, Point::default(), 1.0, -1.0).unwrap();
		let SourceGeometry::Polygon(rings) = decoder.decode(GeomType::Polygon).unwrap() else {
			panic!("expected a polygon");
		};
		assert_eq!(area_ring(&rings[0]), -100.0);
	}

	#[rstest]
	#[case(0.0, 1.0)]
	#[case(1.0, f64::NAN)]
	#[case(f64::INFINITY, 1.0)]
	fn invalid_scale(#[case] scale_x: f64, #[case] scale_y: f64) {
		let result = GeometryDecoder::new(&[], SpecVersion::V2, Point::default(), scale_x, scale_y);
		assert!(matches!(result, Err(DecodeError::InvalidScale(..))));
	}

	#[test]
	fn legacy_rings_follow_the_first_winding() {
		// both rings clockwise: the first one defines "exterior", all get reversed
		let commands = [
			9, 0, 0, 26, 0, 20, 20, 0, 0, 19, 15, //
			9, 20, 0, 26, 0, 20, 20, 0, 0, 19, 15,
		];
		assert_eq!(
			decode(&commands, GeomType::Polygon, SpecVersion::V1).unwrap(),
			TileGeometry::new_multi_polygon(&[vec![square(0, 0, 10)], vec![square(20, 0, 10)]])
		);
	}

	#[test]
	fn legacy_degenerate_first_ring_drops_holes_of_next_exterior() {
		// Legacy readers keep a "degenerate exterior" flag alive through the next
		// exterior, so hole A vanishes while hole B survives. Not the ideal
		// outcome; kept for compatibility with existing version 1 consumers.
		let commands = [
			9, 0, 0, 10, 2, 0, 15, // degenerate
			9, 1, 0, 26, 20, 0, 0, 20, 19, 0, 15, // exterior A
			9, 4, 15, 26, 0, 12, 12, 0, 0, 11, 15, // hole A
			9, 24, 3, 26, 20, 0, 0, 20, 19, 0, 15, // exterior B
			9, 4, 15, 26, 0, 12, 12, 0, 0, 11, 15, // hole B
		];
		assert_eq!(
			decode(&commands, GeomType::Polygon, SpecVersion::V1).unwrap(),
			TileGeometry::new_multi_polygon(&[
				vec![square(0, 0, 10)],
				vec![
					square(20, 0, 10),
					vec![[22, 2], [22, 8], [28, 8], [28, 2], [22, 2]]
				],
			])
		);
		assert_eq!(
			decode(&commands, GeomType::Polygon, SpecVersion::V2),
			Err(DecodeError::RingTooShort)
		);
	}
}
