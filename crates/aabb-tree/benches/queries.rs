use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use aabb_tree::AabbTree;

/// A wavy height field with `n * n` quads, two triangles each.
fn height_field(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f64 / n as f64, j as f64 / n as f64);
            let z = 0.1 * (x * 12.0).sin() * (y * 9.0).cos();
            vertices.push(Point3::new(x, y, z));
        }
    }
    let row = n + 1;
    let mut elements = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            let a = j * row + i;
            elements.push([a, a + 1, a + row]);
            elements.push([a + 1, a + row + 1, a + row]);
        }
    }
    (vertices, elements)
}

fn random_points(count: usize) -> Vec<Point3<f64>> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut coord = |range: std::ops::Range<f64>| rng.random_range(range);
    (0..count)
        .map(|_| Point3::new(coord(0.0..1.0), coord(0.0..1.0), coord(-0.5..0.5)))
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("AabbTree");
    group
        .warm_up_time(std::time::Duration::from_secs(1))
        .sample_size(20);

    for n in [32, 128, 256] {
        let (vertices, elements) = height_field(n);
        let primitives = elements.len();

        group.bench_with_input(BenchmarkId::new("build", primitives), &n, |b, _| {
            b.iter(|| AabbTree::build(black_box(&vertices), black_box(&elements)))
        });

        let tree = AabbTree::build(&vertices, &elements);
        let points = random_points(20_000);

        group.bench_with_input(BenchmarkId::new("nearest", primitives), &points, |b, input| {
            b.iter(|| {
                input
                    .iter()
                    .take(1_000)
                    .filter_map(|p| tree.nearest(&vertices, &elements, p))
                    .count()
            })
        });

        group.bench_with_input(
            BenchmarkId::new("nearest_many", primitives),
            &points,
            |b, input| b.iter(|| tree.nearest_many(&vertices, &elements, input)),
        );

        let origins: Vec<Point3<f64>> = points.iter().map(|p| Point3::new(p.x, p.y, 1.0)).collect();
        let dirs = vec![Vector3::new(0.0, 0.0, -1.0); origins.len()];

        group.bench_with_input(
            BenchmarkId::new("ray_first_hits", primitives),
            &origins,
            |b, input| b.iter(|| tree.ray_first_hits(&vertices, &elements, input, &dirs)),
        );
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
