use crate::types::{Coord, Point};

/// The segment a span of points is measured against.
#[derive(Clone, Copy, Debug)]
pub(super) struct Segment {
	pub bx: f64,
	pub by: f64,
	pub lx: f64,
	pub ly: f64,
	pub vx: f64,
	pub vy: f64,
	pub c2: f64,
}

impl Segment {
	pub fn new<T: Coord>(begin: &Point<T>, last: &Point<T>) -> Segment {
		let (bx, by) = (begin.x.as_f64(), begin.y.as_f64());
		let (lx, ly) = (last.x.as_f64(), last.y.as_f64());
		let vx = lx - bx;
		let vy = ly - by;
		Segment {
			bx,
			by,
			lx,
			ly,
			vx,
			vy,
			c2: vx * vx + vy * vy,
		}
	}

	/// Squared distance of `(px, py)` to the segment.
	#[inline]
	pub fn distance_sq(&self, px: f64, py: f64) -> f64 {
		let wx = px - self.bx;
		let wy = py - self.by;
		let c1 = wx * self.vx + wy * self.vy;
		if c1 <= 0.0 {
			wx * wx + wy * wy
		} else if self.c2 <= c1 {
			let dx = px - self.lx;
			let dy = py - self.ly;
			dx * dx + dy * dy
		} else {
			let b = c1 / self.c2;
			let dx = wx - b * self.vx;
			let dy = wy - b * self.vy;
			dx * dx + dy * dy
		}
	}
}

/// Finds the point in `points[from..to]` farthest from `segment`.
///
/// Starts from `(-1, from)`, a later point only wins with a strictly larger distance.
pub(super) fn max_deviation<T: Coord>(points: &[Point<T>], from: usize, to: usize, segment: &Segment) -> (f64, usize) {
	let mut max = -1.0;
	let mut index = from;
	for (i, p) in points.iter().enumerate().take(to).skip(from) {
		let dist = segment.distance_sq(p.x.as_f64(), p.y.as_f64());
		if max < dist {
			max = dist;
			index = i;
		}
	}
	(max, index)
}
