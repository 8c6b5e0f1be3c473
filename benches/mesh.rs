use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
};

use levelset::compile::{compile_formulas, presets_3d};
use levelset::mesh::{polygonize_3d, PolygonizeOptions};

const GYROID: &str = "sin(2x)cos(2y)+sin(2y)cos(2z)+sin(2z)cos(2x)=0";

pub fn gyroid_resolution_sweep(c: &mut Criterion) {
    let batch = compile_formulas(&[GYROID], &["x", "y", "z"], presets_3d());
    let root = batch.results[0].node.unwrap();
    let ctx = &batch.context;

    let mut group = c.benchmark_group("speed vs resolution (gyroid, 3d)");
    for size in [32, 64, 128] {
        let options = PolygonizeOptions {
            max_resolution: size,
            ..PolygonizeOptions::default()
        };
        group.bench_function(BenchmarkId::new("polygonize", size), move |b| {
            b.iter(|| black_box(polygonize_3d(ctx, root, options).unwrap()))
        });
    }
}

pub fn gyroid_final_pass(c: &mut Criterion) {
    let batch = compile_formulas(&[GYROID], &["x", "y", "z"], presets_3d());
    let root = batch.results[0].node.unwrap();
    let ctx = &batch.context;

    let mut group =
        c.benchmark_group("final pass cost (gyroid, 3d) (40k triangles)");
    for quality in [false, true] {
        let options = PolygonizeOptions {
            max_triangles: 40_000,
            quality,
            ..PolygonizeOptions::default()
        };
        let name = if quality { "quality" } else { "plain" };
        group.bench_function(name, move |b| {
            b.iter(|| black_box(polygonize_3d(ctx, root, options).unwrap()))
        });
    }
}

criterion_group!(benches, gyroid_resolution_sweep, gyroid_final_pass);
criterion_main!(benches);
