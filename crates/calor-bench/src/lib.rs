//! Benchmark profiles for the Calor heat simulator.
//!
//! Provides pre-built [`SimulationConfig`] profiles:
//!
//! - [`reference_profile`]: 100x100 plate (10K cells), Dirichlet edges
//! - [`stress_profile`]: 316x316 plate (~100K cells)
//! - [`rod_profile`]: 10K-cell 1D rod with a held hot end
//! - [`alloy_profile`]: 100x100 alloy plate with held opposite corners

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use calor_engine::{HeldCell, SimulationConfig, StopCriteria, TimeStep};
use calor_grid::{Conductivity, GridDims, InitialField, Spacing};
use calor_solver::{BoundaryPolicy, EdgeValues};

fn plate(side: usize, seed: u64, steps: u64) -> SimulationConfig {
    let mut config = SimulationConfig::new(GridDims::plane(side, side), Spacing::uniform(1.0), 0.1);
    config.initial = InitialField::Noise {
        base: 20.0,
        amplitude: 5.0,
        seed,
    };
    config.boundary = BoundaryPolicy::Dirichlet(EdgeValues {
        x_min: 100.0,
        x_max: 0.0,
        y_min: 20.0,
        y_max: 20.0,
    });
    config.time_step = TimeStep::Auto;
    config.stop = StopCriteria {
        max_iterations: Some(steps),
        ..StopCriteria::default()
    };
    config
}

/// 100x100 plate, alpha 0.1, auto `dt` (2.5, the explicit bound).
pub fn reference_profile(seed: u64, steps: u64) -> SimulationConfig {
    plate(100, seed, steps)
}

/// Same as [`reference_profile`] at 10x the cell count.
pub fn stress_profile(seed: u64, steps: u64) -> SimulationConfig {
    plate(316, seed, steps)
}

/// 10K-cell insulated rod heated from one end.
pub fn rod_profile(steps: u64) -> SimulationConfig {
    let mut config = SimulationConfig::new(GridDims::line(10_000), Spacing::uniform(0.01), 1e-4);
    config.boundary = BoundaryPolicy::Neumann;
    config.held = vec![HeldCell::new([0].into_iter().collect(), 500.0)];
    config.stop.max_iterations = Some(steps);
    config
}

/// 100x100 three-metal alloy plate, insulated, with the top-left corner
/// held hot and the bottom-right corner held cold.
pub fn alloy_profile(seed: u64, steps: u64) -> SimulationConfig {
    let mut config = SimulationConfig::new(GridDims::plane(100, 100), Spacing::uniform(1.0), 0.1);
    config.conductivity = Conductivity::alloy(seed);
    config.boundary = BoundaryPolicy::Neumann;
    config.held = vec![
        HeldCell::new([0, 0].into_iter().collect(), 1000.0),
        HeldCell::new([99, 99].into_iter().collect(), 0.0),
    ];
    config.stop.max_iterations = Some(steps);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        reference_profile(42, 10).validate().unwrap();
        stress_profile(42, 10).validate().unwrap();
        rod_profile(10).validate().unwrap();
        alloy_profile(42, 10).validate().unwrap();
    }

    #[test]
    fn reference_profile_cell_count() {
        assert_eq!(reference_profile(1, 1).dims.cell_count(), 10_000);
        assert_eq!(stress_profile(1, 1).dims.cell_count(), 99_856);
    }
}
