//! Polygon union behind a narrow interface.
//!
//! The clipper only needs to hand rings to an engine and get polygons back, so any
//! polygon boolean implementation can sit behind [`UnionEngine`]. [`OverlayEngine`]
//! is the default, backed by `i_overlay`.

use super::{ClipOp, FillRule};
use crate::{
	math::area_ring,
	types::{Point, Polygon, Ring, dedup_adjacent},
};
use i_overlay::{
	core::{fill_rule::FillRule as OverlayFill, overlay::Overlay, overlay_rule::OverlayRule},
	i_float::int::point::IntPoint,
	i_shape::int::shape::{IntContour, IntShape},
};

/// Which operand of the boolean operation a ring belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingRole {
	Subject,
	Clip,
}

/// A polygon boolean engine working on integer rings.
///
/// Rings are added with their role, then [`execute`](UnionEngine::execute) consumes
/// them and returns polygons whose exteriors have positive and holes negative area.
pub trait UnionEngine {
	fn add_ring(&mut self, ring: &[Point<i64>], role: RingRole);
	fn execute(&mut self, op: ClipOp, fill_subject: FillRule, fill_clip: FillRule) -> Vec<Polygon<i64>>;
}

/// Runs i_overlay's integer overlay, so vertices come back on the input grid.
#[derive(Debug, Default)]
pub struct OverlayEngine {
	subject: Vec<IntContour>,
	clip: Vec<IntContour>,
}

impl OverlayEngine {
	/// Coordinates must stay within ±this value. i_overlay keeps its integer grid
	/// within ±2^30 so that edge cross products fit into an `i64`.
	pub const OVERFLOW_THRESHOLD: i64 = 1 << 30;

	pub fn new() -> OverlayEngine {
		OverlayEngine::default()
	}

	pub fn is_empty(&self) -> bool {
		self.subject.is_empty() && self.clip.is_empty()
	}
}

impl From<FillRule> for OverlayFill {
	fn from(rule: FillRule) -> Self {
		match rule {
			FillRule::EvenOdd => OverlayFill::EvenOdd,
			FillRule::NonZero => OverlayFill::NonZero,
			FillRule::Positive => OverlayFill::Positive,
			FillRule::Negative => OverlayFill::Negative,
		}
	}
}

impl From<ClipOp> for OverlayRule {
	fn from(op: ClipOp) -> Self {
		match op {
			ClipOp::Union => OverlayRule::Union,
			ClipOp::Intersect => OverlayRule::Intersect,
			ClipOp::Difference => OverlayRule::Difference,
			ClipOp::Xor => OverlayRule::Xor,
		}
	}
}

fn overlay(subject: &[IntContour], clip: &[IntContour], rule: OverlayRule, fill: OverlayFill) -> Vec<IntShape> {
	Overlay::with_contours(subject, clip).overlay(rule, fill)
}

/// Resolves overlaps of one operand under its own fill rule. The result is a set of
/// disjoint, consistently oriented contours.
fn normalize(contours: Vec<IntContour>, fill: FillRule) -> Vec<IntContour> {
	if contours.is_empty() {
		return Vec::new();
	}
	overlay(&contours, &[], OverlayRule::Subject, fill.into())
		.into_iter()
		.flatten()
		.collect()
}

fn to_ring(contour: &[IntPoint]) -> Option<Ring<i64>> {
	let points: Vec<Point<i64>> = contour
		.iter()
		.map(|p| Point::new(i64::from(p.x), i64::from(p.y)))
		.collect();
	let mut ring = dedup_adjacent(&points);
	if ring.len() > 1 && ring.first() == ring.last() {
		ring.pop();
	}
	if ring.len() < 3 {
		return None;
	}
	ring.push(ring[0]);
	Some(ring)
}

/// Closes and orients one output shape.
fn to_polygon(shape: IntShape) -> Option<Polygon<i64>> {
	let mut contours = shape.iter();
	let mut exterior = to_ring(contours.next()?)?;
	if area_ring(&exterior) < 0.0 {
		exterior.reverse();
	}
	let mut polygon = vec![exterior];
	for contour in contours {
		if let Some(mut hole) = to_ring(contour) {
			if area_ring(&hole) > 0.0 {
				hole.reverse();
			}
			polygon.push(hole);
		}
	}
	Some(polygon)
}

impl UnionEngine for OverlayEngine {
	fn add_ring(&mut self, ring: &[Point<i64>], role: RingRole) {
		// callers keep coordinates within OVERFLOW_THRESHOLD, so they fit an i32
		let mut contour: IntContour = ring.iter().map(|p| IntPoint::new(p.x as i32, p.y as i32)).collect();
		// contours are implicitly closed
		if contour.len() > 1 && contour.first() == contour.last() {
			contour.pop();
		}
		match role {
			RingRole::Subject => self.subject.push(contour),
			RingRole::Clip => self.clip.push(contour),
		}
	}

	fn execute(&mut self, op: ClipOp, fill_subject: FillRule, fill_clip: FillRule) -> Vec<Polygon<i64>> {
		let subject = std::mem::take(&mut self.subject);
		let clip = std::mem::take(&mut self.clip);
		if subject.is_empty() && clip.is_empty() {
			return Vec::new();
		}

		// a single overlay call takes one fill rule, so operands with different rules
		// are resolved on their own first
		let shapes = if fill_subject == fill_clip || clip.is_empty() {
			overlay(&subject, &clip, op.into(), fill_subject.into())
		} else {
			let subject = normalize(subject, fill_subject);
			let clip = normalize(clip, fill_clip);
			overlay(&subject, &clip, op.into(), OverlayFill::NonZero)
		};

		shapes.into_iter().filter_map(to_polygon).collect()
	}
}
