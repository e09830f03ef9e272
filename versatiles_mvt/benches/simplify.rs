use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use versatiles_mvt::{
	Point,
	simplify::{douglas_peucker, douglas_peucker_scalar},
};

/// A deterministic random walk, so runs are comparable.
fn random_walk(count: usize) -> Vec<Point<f64>> {
	let mut state: u64 = 0x2545_f491_4f6c_dd1d;
	let mut next = || {
		state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
		((state >> 33) as f64 / f64::from(u32::MAX >> 1)) - 0.5
	};
	let mut x = 0.0;
	let mut y = 0.0;
	(0..count)
		.map(|_| {
			x += next() * 8.0 + 1.0;
			y += next() * 8.0;
			Point::new(x, y)
		})
		.collect()
}

fn bench_douglas_peucker(c: &mut Criterion) {
	let mut group = c.benchmark_group("douglas_peucker");

	for count in [100, 10_000] {
		let points = random_walk(count);
		group.throughput(Throughput::Elements(count as u64));

		group.bench_with_input(BenchmarkId::new("scalar", count), &points, |b, points| {
			b.iter(|| black_box(douglas_peucker_scalar(black_box(points), 4.0)));
		});

		group.bench_with_input(BenchmarkId::new("lanes", count), &points, |b, points| {
			b.iter(|| black_box(douglas_peucker(black_box(points), 4.0)));
		});
	}

	// both scans must agree
	let points = random_walk(10_000);
	assert_eq!(douglas_peucker(&points, 4.0), douglas_peucker_scalar(&points, 4.0));

	group.finish();
}

criterion_group!(benches, bench_douglas_peucker);
criterion_main!(benches);
