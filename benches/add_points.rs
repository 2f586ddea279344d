use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use kdarena::axes::array_axes;
use kdarena::distance::SquaredEuclidean;
use kdarena::KdTree;

fn rand_data_2d() -> [f64; 2] {
    rand::random()
}

fn rand_data_3d() -> [f64; 3] {
    rand::random()
}

pub fn add_100_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("add 100 items to 2d kdtree of increasing size");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(100));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let points_to_add: Vec<[f64; 2]> = (0..100).map(|_| rand_data_2d()).collect();
            let points: Vec<[f64; 2]> = (0..size).map(|_| rand_data_2d()).collect();

            b.iter_batched(
                || KdTree::build(points.clone(), array_axes::<f64, 2>(), SquaredEuclidean).unwrap(),
                |mut kdtree| {
                    points_to_add
                        .iter()
                        .for_each(|point| {
                            black_box(kdtree.insert(black_box(*point)).unwrap());
                        })
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
}

pub fn add_100_3d(c: &mut Criterion) {
    let mut group = c.benchmark_group("add 100 items to 3d kdtree of increasing size");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(100));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let points_to_add: Vec<[f64; 3]> = (0..100).map(|_| rand_data_3d()).collect();
            let points: Vec<[f64; 3]> = (0..size).map(|_| rand_data_3d()).collect();

            b.iter_batched(
                || KdTree::build(points.clone(), array_axes::<f64, 3>(), SquaredEuclidean).unwrap(),
                |mut kdtree| {
                    points_to_add
                        .iter()
                        .for_each(|point| {
                            black_box(kdtree.insert(black_box(*point)).unwrap());
                        })
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
}

criterion_group!(benches, add_100_2d, add_100_3d);
criterion_main!(benches);
