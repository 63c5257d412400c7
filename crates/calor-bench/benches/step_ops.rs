//! Criterion micro-benchmarks for the stencil and topology.

use std::hint::black_box;

use calor_grid::{Grid, GridDims, InitialField, Spacing};
use calor_solver::{BoundaryPolicy, EdgeValues, StabilityController, Stencil};
use calor_space::{EdgeBehavior, Space, Square4};
use criterion::{criterion_group, criterion_main, Criterion};
use smallvec::smallvec;

fn noisy_plate() -> Grid {
    Grid::new(
        GridDims::plane(100, 100),
        Spacing::uniform(1.0),
        EdgeBehavior::Absorb,
        &InitialField::Noise {
            base: 0.0,
            amplitude: 1.0,
            seed: 7,
        },
    )
    .unwrap()
}

/// Benchmark: Laplacian at every cell of a 100x100 plate.
fn bench_laplacian_10k(c: &mut Criterion) {
    let grid = noisy_plate();
    let stencil = Stencil::new(grid.dims(), grid.spacing());
    let policy = BoundaryPolicy::Dirichlet(EdgeValues::uniform(0.0));

    c.bench_function("laplacian_10k", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..grid.cell_count() {
                sum += stencil.laplacian(grid.values(), i, &policy);
            }
            black_box(sum);
        });
    });
}

/// Benchmark: Divergence scan over 10K cells.
fn bench_inspect_10k(c: &mut Criterion) {
    let grid = noisy_plate();
    let controller = StabilityController::new(1.0, &grid.dims(), &grid.spacing())
        .with_reference_magnitude(grid.max_abs());

    c.bench_function("inspect_10k", |b| {
        b.iter(|| {
            let r = controller.inspect(&grid, calor_core::Iteration(1));
            black_box(&r);
        });
    });
}

/// Benchmark: Call neighbours() on all 10K cells of a 100x100 Square4.
fn bench_neighbours_square4_10k(c: &mut Criterion) {
    let space = Square4::new(100, 100, EdgeBehavior::Absorb).unwrap();

    c.bench_function("neighbours_square4_10k", |b| {
        b.iter(|| {
            for r in 0..100i32 {
                for col in 0..100i32 {
                    let coord = smallvec![r, col];
                    let n = space.neighbours(&coord);
                    black_box(&n);
                }
            }
        });
    });
}

criterion_group!(
    benches,
    bench_laplacian_10k,
    bench_inspect_10k,
    bench_neighbours_square4_10k
);
criterion_main!(benches);
