use crate::types::{Coord, Point};

/// Signed area of a ring (shoelace formula).
///
/// Positive for a counter-clockwise ring in a y-up system, which is a clockwise
/// ring in the y-down tile system. Works on open and closed rings alike.
pub fn area_ring<T: Coord>(ring: &[Point<T>]) -> f64 {
	let mut sum = 0f64;
	if let Some(mut p2) = ring.last() {
		for p1 in ring {
			sum += (p2.x.as_f64() - p1.x.as_f64()) * (p1.y.as_f64() + p2.y.as_f64());
			p2 = p1;
		}
	}
	sum / 2.0
}

pub fn area_polygon<T: Coord>(rings: &[Vec<Point<T>>]) -> f64 {
	rings.iter().map(|ring| area_ring(ring)).sum()
}
