//! Benchmarks für die CPU-Hotpaths der Spline-Engine:
//! - Sequentieller Kontrollpunkt-Solver
//! - Pfad-Zusammenbau
//! - Bogenlängen-Schätzung (einzeln und ganze Kurve)

use bezier_spline_engine::{
    build_render_path, estimate_length, estimate_path_length, SequentialStrategy,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use std::hint::black_box;

fn build_wave(point_count: usize) -> Vec<DVec2> {
    (0..point_count)
        .map(|i| {
            let x = i as f64 * 2.5;
            DVec2::new(x, (x * 0.07).sin() * 40.0 + (i % 3) as f64)
        })
        .collect()
}

fn bench_control_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("control_points");

    for &point_count in &[1_000usize, 100_000usize] {
        let points = build_wave(point_count);
        group.bench_with_input(
            BenchmarkId::new("sequential", point_count),
            &points,
            |b, points| b.iter(|| black_box(SequentialStrategy.compute(black_box(points), 0.5))),
        );

        let control_points = SequentialStrategy.compute(&points, 0.5);
        group.bench_with_input(
            BenchmarkId::new("build_render_path", point_count),
            &points,
            |b, points| {
                b.iter(|| black_box(build_render_path(black_box(points), &control_points).len()))
            },
        );
    }

    group.finish();
}

fn bench_arc_length(c: &mut Criterion) {
    let arch = [
        DVec2::new(0.0, 0.0),
        DVec2::new(0.0, 10.0),
        DVec2::new(10.0, 10.0),
        DVec2::new(10.0, 0.0),
    ];

    let mut group = c.benchmark_group("arc_length");
    for &bound in &[1.0f64, 0.05, 1e-6] {
        group.bench_with_input(BenchmarkId::new("single_cubic", bound), &bound, |b, &bound| {
            b.iter(|| black_box(estimate_length(black_box(&arch), bound)))
        });
    }

    let points = build_wave(10_000);
    let path = build_render_path(&points, &SequentialStrategy.compute(&points, 0.5));
    group.bench_function("whole_path_10k", |b| {
        b.iter(|| black_box(estimate_path_length(black_box(&path), 0.05)))
    });
    group.finish();
}

criterion_group!(spline_benches, bench_control_points, bench_arc_length);
criterion_main!(spline_benches);
