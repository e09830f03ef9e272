//! Clipping of lines and rings against an axis-aligned box.
//!
//! Intersections are computed in `f64` and rounded to the tile grid once at the end,
//! so a ring crossing several box edges does not accumulate rounding errors.

use super::ClipBox;
use crate::types::{LineString, Point, Ring, dedup_adjacent};

fn to_f64(p: Point<i64>) -> Point<f64> {
	Point::new(p.x as f64, p.y as f64)
}

fn round(p: Point<f64>) -> Point<i64> {
	Point::new(p.x.round() as i64, p.y.round() as i64)
}

/// Liang-Barsky: the parameter range `t0..=t1` of segment `a`-`b` inside the box.
fn clip_segment(a: Point<f64>, b: Point<f64>, clip: &ClipBox) -> Option<(f64, f64)> {
	let dx = b.x - a.x;
	let dy = b.y - a.y;
	let mut t0 = 0.0;
	let mut t1 = 1.0;
	let bounds = [
		(-dx, a.x - clip.x_min as f64),
		(dx, clip.x_max as f64 - a.x),
		(-dy, a.y - clip.y_min as f64),
		(dy, clip.y_max as f64 - a.y),
	];
	for (p, q) in bounds {
		if p == 0.0 {
			if q < 0.0 {
				return None;
			}
		} else {
			let r = q / p;
			if p < 0.0 {
				if r > t1 {
					return None;
				}
				if r > t0 {
					t0 = r;
				}
			} else {
				if r < t0 {
					return None;
				}
				if r < t1 {
					t1 = r;
				}
			}
		}
	}
	Some((t0, t1))
}

fn lerp(a: Point<f64>, b: Point<f64>, t: f64) -> Point<f64> {
	Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Clips a line, splitting it wherever it leaves the box. Parts with fewer than two
/// distinct points are dropped.
pub(super) fn clip_line(line: &[Point<i64>], clip: &ClipBox) -> Vec<LineString<i64>> {
	let mut parts: Vec<LineString<i64>> = Vec::new();
	let mut current: LineString<i64> = Vec::new();

	let mut flush = |current: &mut LineString<i64>| {
		let part = dedup_adjacent(current);
		if part.len() >= 2 {
			parts.push(part);
		}
		current.clear();
	};

	for pair in line.windows(2) {
		let (a, b) = (to_f64(pair[0]), to_f64(pair[1]));
		let Some((t0, t1)) = clip_segment(a, b, clip) else {
			flush(&mut current);
			continue;
		};
		let start = round(lerp(a, b, t0));
		let end = round(lerp(a, b, t1));
		if t0 > 0.0 || current.last() != Some(&start) {
			flush(&mut current);
			current.push(start);
		}
		current.push(end);
		if t1 < 1.0 {
			flush(&mut current);
		}
	}
	flush(&mut current);
	parts
}

/// Sutherland-Hodgman against one edge. `inside` tells whether a point is on the
/// kept side, `cross` computes where a segment crosses the edge.
fn clip_edge<I, C>(input: &[Point<f64>], inside: I, cross: C) -> Vec<Point<f64>>
where
	I: Fn(&Point<f64>) -> bool,
	C: Fn(&Point<f64>, &Point<f64>) -> Point<f64>,
{
	let mut output = Vec::with_capacity(input.len() + 4);
	let Some(mut previous) = input.last() else {
		return output;
	};
	for current in input {
		match (inside(current), inside(previous)) {
			(true, true) => output.push(*current),
			(true, false) => {
				output.push(cross(previous, current));
				output.push(*current);
			}
			(false, true) => output.push(cross(previous, current)),
			(false, false) => {}
		}
		previous = current;
	}
	output
}

fn cross_x(a: &Point<f64>, b: &Point<f64>, x: f64) -> Point<f64> {
	Point::new(x, a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x))
}

fn cross_y(a: &Point<f64>, b: &Point<f64>, y: f64) -> Point<f64> {
	Point::new(a.x + (b.x - a.x) * (y - a.y) / (b.y - a.y), y)
}

/// Clips a ring. The result is closed and keeps the orientation of the input, or
/// `None` if fewer than three distinct points remain.
pub(super) fn clip_ring(ring: &[Point<i64>], clip: &ClipBox) -> Option<Ring<i64>> {
	let mut points: Vec<Point<f64>> = ring.iter().map(|p| to_f64(*p)).collect();
	if points.len() > 1 && points.first() == points.last() {
		points.pop();
	}

	let (x_min, y_min) = (clip.x_min as f64, clip.y_min as f64);
	let (x_max, y_max) = (clip.x_max as f64, clip.y_max as f64);

	let points = clip_edge(&points, |p| p.x >= x_min, |a, b| cross_x(a, b, x_min));
	let points = clip_edge(&points, |p| p.x <= x_max, |a, b| cross_x(a, b, x_max));
	let points = clip_edge(&points, |p| p.y >= y_min, |a, b| cross_y(a, b, y_min));
	let points = clip_edge(&points, |p| p.y <= y_max, |a, b| cross_y(a, b, y_max));

	let rounded: Vec<Point<i64>> = points.into_iter().map(round).collect();
	let mut result = dedup_adjacent(&rounded);
	if result.len() > 1 && result.first() == result.last() {
		result.pop();
	}
	if result.len() < 3 {
		return None;
	}
	result.push(result[0]);
	Some(result)
}
