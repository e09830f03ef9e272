use crate::types::Point;

/// Affine mapping from the tile grid system to tile units: scale, translate, flip y.
///
/// The north-west corner of the tile bounds maps to `(0, 0)`, the south-east corner
/// to `(extent, extent)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	x_min: f64,
	y_max: f64,
	scale_x: f64,
	scale_y: f64,
}

impl ViewTransform {
	/// `bbox` is `[x_min, y_min, x_max, y_max]` of the unbuffered tile.
	pub fn new(bbox: [f64; 4], extent: u32) -> ViewTransform {
		let [x_min, y_min, x_max, y_max] = bbox;
		let extent = f64::from(extent);
		ViewTransform {
			x_min,
			y_max,
			scale_x: extent / (x_max - x_min),
			scale_y: extent / (y_max - y_min),
		}
	}

	#[inline]
	pub fn forward(&self, p: Point<f64>) -> Point<f64> {
		Point::new((p.x - self.x_min) * self.scale_x, (self.y_max - p.y) * self.scale_y)
	}

	#[inline]
	pub fn backward(&self, p: Point<f64>) -> Point<f64> {
		Point::new(p.x / self.scale_x + self.x_min, self.y_max - p.y / self.scale_y)
	}

	/// Origin and per-axis scale for decoding tile units straight back into the
	/// tile grid system: `origin + delta / scale`.
	pub fn decode_parameters(&self) -> (Point<f64>, f64, f64) {
		(Point::new(self.x_min, self.y_max), self.scale_x, -self.scale_y)
	}
}
