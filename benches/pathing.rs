use criterion::{criterion_group, criterion_main, Criterion};
use mazegen::{
    cells::Cartesian2DCoordinate,
    generators,
    pathing,
    units::{Height, Width},
};

fn bench_distances_64(c: &mut Criterion) {
    let maze = generators::generate_seeded(Width(64), Height(64), Some(64)).unwrap();
    let start = Cartesian2DCoordinate::new(0, 0);
    c.bench_function("distances_64", move |b| {
        b.iter(|| pathing::Distances::<u32>::new(&maze, start))
    });
}

fn bench_longest_path_64(c: &mut Criterion) {
    let maze = generators::generate_seeded(Width(64), Height(64), Some(64)).unwrap();
    c.bench_function("longest_path_64", move |b| {
        b.iter(|| pathing::longest_path(&maze))
    });
}

fn bench_path_to_exit_64(c: &mut Criterion) {
    let maze = generators::generate_seeded(Width(64), Height(64), Some(64)).unwrap();
    let start = Cartesian2DCoordinate::new(0, 0);
    c.bench_function("path_to_exit_64", move |b| {
        b.iter(|| pathing::path_to_exit(&maze, start))
    });
}

criterion_group!(benches, bench_distances_64, bench_longest_path_64, bench_path_to_exit_64);
criterion_main!(benches);
