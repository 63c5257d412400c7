//! Mutable run state.

use calor_core::Iteration;
use calor_grid::Grid;

/// The live field plus simulated time and step count.
///
/// The only mutable entity during a run. `Iteration(0)` with
/// `elapsed == 0.0` is the initial condition; each successful
/// [`Stepper::step`](crate::Stepper::step) adds one iteration and `dt` of
/// simulated time.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub(crate) grid: Grid,
    pub(crate) elapsed: f64,
    pub(crate) iteration: Iteration,
}

impl SimulationState {
    /// Wrap an initial grid at time zero.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            elapsed: 0.0,
            iteration: Iteration::default(),
        }
    }

    /// The current field.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Simulated time so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Steps completed so far.
    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    /// Pin simulated time to `target` after a step clipped to land on it.
    ///
    /// Absorbs the rounding left by `elapsed += dt`. Ignored unless
    /// `target` is within one part in 10^9 of the current time.
    pub fn align_elapsed(&mut self, target: f64) {
        if (self.elapsed - target).abs() <= 1e-9 * target.abs().max(1.0) {
            self.elapsed = target;
        }
    }

    /// Give up the grid.
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}
