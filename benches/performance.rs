// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trimm::geometry::{analyze, NormalStrategy, Primitive, RenderArrays, Shading};

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");

    group.bench_function("cube", |b| {
        b.iter(|| Primitive::cube(black_box(10.0)).to_mesh());
    });

    group.bench_function("icosahedron", |b| {
        b.iter(|| Primitive::icosahedron(black_box(10.0)).to_mesh());
    });

    group.bench_function("grid_64", |b| {
        b.iter(|| Primitive::grid(black_box(10.0), black_box(64)).to_mesh());
    });

    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");

    for level in [2u32, 3, 4] {
        let mesh = Primitive::sphere(1.0, level).to_mesh();
        group.bench_with_input(
            BenchmarkId::new("sphere", mesh.triangle_count()),
            &mesh,
            |b, mesh| {
                b.iter_batched(
                    || mesh.clone(),
                    |mut mesh| mesh.rebuild().unwrap(),
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_subdivide(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdivide");

    for steps in [1u32, 2, 3] {
        let base = Primitive::icosahedron(1.0).to_mesh();
        group.bench_with_input(BenchmarkId::new("icosahedron", steps), &steps, |b, &steps| {
            b.iter_batched(
                || base.clone(),
                |mut mesh| mesh.subdivide(black_box(steps)).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_normals(c: &mut Criterion) {
    let mut group = c.benchmark_group("normals");
    let mesh = Primitive::sphere(1.0, 4).to_mesh();

    for strategy in NormalStrategy::ALL {
        group.bench_with_input(BenchmarkId::new("strategy", strategy), &strategy, |b, strategy| {
            b.iter(|| strategy.compute(black_box(&mesh)));
        });
    }

    group.finish();
}

fn bench_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics");
    let mesh = Primitive::sphere(1.0, 4).to_mesh();

    group.bench_function("analyze", |b| {
        b.iter(|| analyze(black_box(&mesh)));
    });

    group.bench_function("render_smooth", |b| {
        b.iter(|| RenderArrays::from_mesh(black_box(&mesh), Shading::Smooth));
    });

    group.bench_function("render_flat", |b| {
        b.iter(|| RenderArrays::from_mesh(black_box(&mesh), Shading::Flat));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_primitives,
    bench_rebuild,
    bench_subdivide,
    bench_normals,
    bench_analytics
);
criterion_main!(benches);
