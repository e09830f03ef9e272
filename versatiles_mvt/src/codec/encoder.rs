//! Encodes tile-local integer geometries into the geometry command stream.
//!
//! The cursor is carried across all parts of one feature: the first MoveTo of a
//! ring or line is relative to the last point written before it. Degenerate parts
//! are dropped before anything is written, so no orphan MoveTo ever appears.

use super::command::{CLOSE_PATH, LINE_TO, MOVE_TO, command_header, zigzag};
use crate::types::{Geometry, Point, TileGeometry, dedup_adjacent};
use log::trace;

/// Running position of the encoder, in tile units.
pub type EncodeCursor = Point<i32>;

/// Appends the command stream of `geometry` to `out`.
///
/// Returns `false` if nothing was written because every part was degenerate.
/// Collections cannot be encoded into a single feature and also return `false`.
pub fn encode_geometry(geometry: &TileGeometry, out: &mut Vec<u32>, cursor: &mut EncodeCursor) -> bool {
	match geometry {
		Geometry::Empty => false,
		Geometry::Point(p) => {
			out.push(command_header(MOVE_TO, 1));
			push_delta(p, out, cursor);
			true
		}
		Geometry::MultiPoint(points) => encode_multi_point(points, out, cursor),
		Geometry::LineString(line) => encode_line(line, out, cursor),
		Geometry::MultiLineString(lines) => {
			let mut success = false;
			for line in lines {
				success |= encode_line(line, out, cursor);
			}
			success
		}
		Geometry::Polygon(rings) => encode_polygon(rings, out, cursor),
		Geometry::MultiPolygon(polygons) => {
			let mut success = false;
			for rings in polygons {
				success |= encode_polygon(rings, out, cursor);
			}
			success
		}
		Geometry::Collection(_) => {
			trace!("collections have to be split into parts before encoding");
			false
		}
	}
}

/// Encodes a geometry with a fresh cursor, as used for one feature.
pub fn encode_feature_geometry(geometry: &TileGeometry) -> Option<Vec<u32>> {
	let mut out = Vec::new();
	let mut cursor = EncodeCursor::default();
	encode_geometry(geometry, &mut out, &mut cursor).then_some(out)
}

#[inline]
fn push_delta(p: &Point<i64>, out: &mut Vec<u32>, cursor: &mut EncodeCursor) {
	let x = p.x as i32;
	let y = p.y as i32;
	out.push(zigzag(x.wrapping_sub(cursor.x)));
	out.push(zigzag(y.wrapping_sub(cursor.y)));
	cursor.x = x;
	cursor.y = y;
}

fn encode_multi_point(points: &[Point<i64>], out: &mut Vec<u32>, cursor: &mut EncodeCursor) -> bool {
	let points = dedup_adjacent(points);
	if points.is_empty() {
		return false;
	}
	out.push(command_header(MOVE_TO, points.len() as u32));
	for p in &points {
		push_delta(p, out, cursor);
	}
	true
}

fn encode_path(points: &[Point<i64>], out: &mut Vec<u32>, cursor: &mut EncodeCursor) {
	out.push(command_header(MOVE_TO, 1));
	push_delta(&points[0], out, cursor);
	out.push(command_header(LINE_TO, (points.len() - 1) as u32));
	for p in &points[1..] {
		push_delta(p, out, cursor);
	}
}

fn encode_line(line: &[Point<i64>], out: &mut Vec<u32>, cursor: &mut EncodeCursor) -> bool {
	let points = dedup_adjacent(line);
	if points.len() < 2 {
		trace!("dropping line with {} distinct points", points.len());
		return false;
	}
	encode_path(&points, out, cursor);
	true
}

fn encode_ring(ring: &[Point<i64>], out: &mut Vec<u32>, cursor: &mut EncodeCursor) -> bool {
	let mut points = dedup_adjacent(ring);
	if points.len() > 1 && points.first() == points.last() {
		points.pop();
	}
	if points.len() < 3 {
		trace!("dropping ring with {} distinct points", points.len());
		return false;
	}
	encode_path(&points, out, cursor);
	out.push(command_header(CLOSE_PATH, 1));
	true
}

fn encode_polygon(rings: &[Vec<Point<i64>>], out: &mut Vec<u32>, cursor: &mut EncodeCursor) -> bool {
	let Some((exterior, interiors)) = rings.split_first() else {
		return false;
	};
	if !encode_ring(exterior, out, cursor) {
		return false;
	}
	for interior in interiors {
		encode_ring(interior, out, cursor);
	}
	true
}
