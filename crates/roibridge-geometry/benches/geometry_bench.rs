use criterion::{black_box, criterion_group, criterion_main, Criterion};
use roibridge_core::{Mask, Polygon2D, RealMask, RealPoint};
use roibridge_geometry::{from_remote_shape, to_remote_shape};

fn ring(n: usize) -> Vec<RealPoint> {
    (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (n as f64);
            RealPoint::new(100.0 * theta.cos(), 100.0 * theta.sin())
        })
        .collect()
}

fn bench_bounds(c: &mut Criterion) {
    let polygon = Polygon2D::new(ring(1024));
    c.bench_function("polygon_bounds_1024", |b| {
        b.iter(|| black_box(&polygon).bounds())
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let mask = Mask::new(Polygon2D::new(ring(256)));
    c.bench_function("polygon_round_trip_256", |b| {
        b.iter(|| {
            let record = to_remote_shape(black_box(&mask)).unwrap();
            from_remote_shape(&record).unwrap()
        })
    });
}

criterion_group!(benches, bench_bounds, bench_round_trip);
criterion_main!(benches);
