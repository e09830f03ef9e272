//! Four-lane variant of the deviation scan.
//!
//! Each lane evaluates exactly the scalar formula, operation by operation, and the
//! lanes are reduced in index order. The results are therefore bit-identical to
//! [`super::scalar::max_deviation`]; the chunked layout only lets the compiler
//! vectorize the arithmetic. Multiplications and additions are kept separate so
//! no fused multiply-add changes the rounding.

use super::scalar::{Segment, max_deviation};
use crate::types::{Coord, Point};

const LANES: usize = 4;

type Lane = [f64; LANES];

#[inline]
fn lane_map<F: Fn(usize) -> f64>(f: F) -> Lane {
	[f(0), f(1), f(2), f(3)]
}

#[inline]
fn distances(xs: &Lane, ys: &Lane, s: &Segment) -> Lane {
	let wx = lane_map(|k| xs[k] - s.bx);
	let wy = lane_map(|k| ys[k] - s.by);
	let ux = lane_map(|k| xs[k] - s.lx);
	let uy = lane_map(|k| ys[k] - s.ly);
	let c1 = lane_map(|k| wx[k] * s.vx + wy[k] * s.vy);

	let dist_begin = lane_map(|k| wx[k] * wx[k] + wy[k] * wy[k]);
	let dist_last = lane_map(|k| ux[k] * ux[k] + uy[k] * uy[k]);
	let b = lane_map(|k| c1[k] / s.c2);
	let dx = lane_map(|k| wx[k] - b[k] * s.vx);
	let dy = lane_map(|k| wy[k] - b[k] * s.vy);
	let dist_line = lane_map(|k| dx[k] * dx[k] + dy[k] * dy[k]);

	lane_map(|k| {
		if c1[k] <= 0.0 {
			dist_begin[k]
		} else if s.c2 <= c1[k] {
			dist_last[k]
		} else {
			dist_line[k]
		}
	})
}

/// Same contract as the scalar scan.
pub(super) fn max_deviation_lanes<T: Coord>(
	points: &[Point<T>],
	from: usize,
	to: usize,
	segment: &Segment,
) -> (f64, usize) {
	let mut max = -1.0;
	let mut index = from;
	let mut i = from;

	while i + LANES <= to {
		let xs = lane_map(|k| points[i + k].x.as_f64());
		let ys = lane_map(|k| points[i + k].y.as_f64());
		let dist = distances(&xs, &ys, segment);
		for (k, d) in dist.iter().enumerate() {
			if max < *d {
				max = *d;
				index = i + k;
			}
		}
		i += LANES;
	}

	if i < to {
		let (rest_max, rest_index) = max_deviation(points, i, to, segment);
		if max < rest_max {
			max = rest_max;
			index = rest_index;
		}
	}
	(max, index)
}
