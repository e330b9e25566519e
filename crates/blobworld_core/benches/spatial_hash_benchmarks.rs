use blobworld_core::spatial_hash::SpatialHash;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;

fn grid_points() -> Vec<(Vec2, u32)> {
    (0..1000)
        .map(|i| {
            let x = (i % 40) as f32 - 20.0;
            let y = (i / 40) as f32 - 12.5;
            (Vec2::new(x, y), i)
        })
        .collect()
}

fn built() -> SpatialHash<u32> {
    let mut spatial = SpatialHash::new(2.0, Vec2::splat(-20.0), Vec2::splat(20.0));
    spatial.build(&grid_points());
    spatial
}

fn bench_spatial_hash_build(c: &mut Criterion) {
    let points = grid_points();

    c.bench_function("spatial_hash_build_1000", |b| {
        b.iter(|| {
            let mut spatial = SpatialHash::new(2.0, Vec2::splat(-20.0), Vec2::splat(20.0));
            spatial.build(black_box(&points));
            black_box(spatial)
        })
    });
}

fn bench_spatial_hash_query(c: &mut Criterion) {
    let spatial = built();

    c.bench_function("spatial_hash_query_4x4", |b| {
        let mut results = Vec::new();
        b.iter(|| {
            results.clear();
            spatial.query_into(Vec2::splat(-2.0), Vec2::splat(2.0), &mut results);
            black_box(results.len())
        })
    });
}

fn bench_spatial_hash_count_nearby(c: &mut Criterion) {
    let spatial = built();

    c.bench_function("spatial_hash_count_nearby_10x10", |b| {
        b.iter(|| {
            let count = spatial.count_nearby(black_box(Vec2::splat(-5.0)), Vec2::splat(5.0));
            black_box(count)
        })
    });
}

criterion_group!(
    benches,
    bench_spatial_hash_build,
    bench_spatial_hash_query,
    bench_spatial_hash_count_nearby
);
criterion_main!(benches);
