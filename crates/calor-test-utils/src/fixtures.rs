//! Canonical grids and fields used across the test suites.

use calor_grid::{Grid, GridDims, InitialField, Spacing};
use calor_space::EdgeBehavior;

/// The five-cell spike `[0, 0, 100, 0, 0]`.
pub fn spike_values() -> Vec<f64> {
    vec![0.0, 0.0, 100.0, 0.0, 0.0]
}

/// A 1D grid with unit spacing.
pub fn line_grid(values: Vec<f64>, edge: EdgeBehavior) -> Grid {
    Grid::new(
        GridDims::line(values.len()),
        Spacing::uniform(1.0),
        edge,
        &InitialField::Values(values),
    )
    .expect("fixture line grid")
}

/// A uniform 2D grid with `ny` rows of `nx` cells.
pub fn uniform_plane(nx: usize, ny: usize, value: f64, spacing: Spacing, edge: EdgeBehavior) -> Grid {
    Grid::new(
        GridDims::plane(nx, ny),
        spacing,
        edge,
        &InitialField::Uniform(value),
    )
    .expect("fixture plane grid")
}

/// A 2D grid from explicit row-major values.
pub fn plane_grid(nx: usize, ny: usize, values: Vec<f64>, edge: EdgeBehavior) -> Grid {
    Grid::new(
        GridDims::plane(nx, ny),
        Spacing::uniform(1.0),
        edge,
        &InitialField::Values(values),
    )
    .expect("fixture plane grid")
}

/// A smooth bump centred in an `nx`-cell line, peak `amplitude`.
pub fn bump_values(nx: usize, amplitude: f64) -> Vec<f64> {
    let centre = (nx as f64 - 1.0) / 2.0;
    let width = (nx as f64 / 6.0).max(1.0);
    (0..nx)
        .map(|i| {
            let d = (i as f64 - centre) / width;
            amplitude * (-d * d).exp()
        })
        .collect()
}

/// One full sine period per row: periodic along x by construction.
pub fn sine_rows(nx: usize, ny: usize, amplitude: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(nx * ny);
    for row in 0..ny {
        for col in 0..nx {
            let phase = 2.0 * std::f64::consts::PI * col as f64 / nx as f64;
            values.push(amplitude * phase.sin() + row as f64);
        }
    }
    values
}
