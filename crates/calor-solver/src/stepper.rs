//! One discrete time advance over a [`SimulationState`].

use crate::boundary::BoundaryPolicy;
use crate::context::StepContext;
use crate::scheme::{ForwardEuler, Scheme};
use crate::stability::StabilityController;
use crate::state::SimulationState;
use crate::stencil::Stencil;
use calor_core::StepError;
use calor_grid::Grid;
use std::time::Instant;

/// Outcome of a successful [`Stepper::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Time step taken.
    pub dt: f64,
    /// Largest absolute change of any cell (L-infinity norm).
    pub max_delta: f64,
    /// Solver iterations used by the scheme.
    pub sweeps: u32,
    /// Wall time spent in the scheme, in microseconds.
    pub stencil_us: u64,
    /// Wall time spent in divergence inspection, in microseconds.
    pub inspect_us: u64,
}

/// Advances the field by one time step.
///
/// Per step:
/// 1. reject invalid `dt`, and with the stability check on, any `dt`
///    above the scheme's limit (state untouched)
/// 2. the scheme fills the staging buffer from the frozen current field,
///    held cells included
/// 3. the buffers swap, `elapsed += dt`, `iteration += 1`
/// 4. the new field is inspected for divergence
pub struct Stepper {
    alpha: f64,
    policy: BoundaryPolicy,
    stencil: Stencil,
    controller: StabilityController,
    scheme: Box<dyn Scheme>,
    held: Vec<(usize, f64)>,
    stability_check: bool,
    parallel: bool,
}

impl Stepper {
    /// Explicit stepper for `grid` with the stability check enabled.
    ///
    /// The runaway limit is scaled to the grid's current magnitude and the
    /// policy's Dirichlet values.
    pub fn new(alpha: f64, policy: BoundaryPolicy, grid: &Grid) -> Self {
        let controller = StabilityController::new(alpha, &grid.dims(), &grid.spacing())
            .with_reference_magnitude(grid.max_abs().max(policy.max_abs()));
        Self {
            alpha,
            policy,
            stencil: Stencil::new(grid.dims(), grid.spacing()),
            controller,
            scheme: Box::new(ForwardEuler),
            held: Vec::new(),
            stability_check: true,
            parallel: false,
        }
    }

    /// Use a different time-integration scheme.
    pub fn with_scheme(mut self, scheme: Box<dyn Scheme>) -> Self {
        self.scheme = scheme;
        self
    }

    /// Replace the stability controller.
    pub fn with_controller(mut self, controller: StabilityController) -> Self {
        self.controller = controller;
        self
    }

    /// Per-cell conductivity factors, one finite positive value per cell.
    ///
    /// Also tightens the stability bound to the largest factor, so call it
    /// after [`with_controller`](Self::with_controller).
    pub fn with_conductivity(mut self, factors: Vec<f64>) -> Self {
        let peak = factors.iter().fold(0.0f64, |m, k| m.max(*k));
        self.controller = self.controller.with_peak_conductivity(peak);
        self.stencil = self.stencil.with_conductivity(factors);
        self
    }

    /// Cells pinned to fixed values, as `(flat index, value)`.
    ///
    /// The caller guarantees every index is in range.
    pub fn with_held(mut self, held: Vec<(usize, f64)>) -> Self {
        self.held = held;
        self
    }

    /// Enable or disable the pre-step `dt` bound.
    pub fn with_stability_check(mut self, enabled: bool) -> Self {
        self.stability_check = enabled;
        self
    }

    /// Compute cell updates on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The stability controller.
    pub fn controller(&self) -> &StabilityController {
        &self.controller
    }

    /// The active scheme.
    pub fn scheme(&self) -> &dyn Scheme {
        self.scheme.as_ref()
    }

    /// The boundary policy.
    pub fn policy(&self) -> &BoundaryPolicy {
        &self.policy
    }

    /// Largest admissible `dt` for the active scheme, if bounded.
    pub fn max_dt(&self) -> Option<f64> {
        self.scheme.max_dt(&self.controller)
    }

    /// Advance `state` by `dt`.
    ///
    /// # Errors
    ///
    /// - [`StepError::InvalidTimeStep`] / [`StepError::NumericalInstability`]
    ///   before stepping; `state` is unchanged
    /// - [`StepError::NotConverged`] from an implicit solve; `state` is
    ///   unchanged
    /// - [`StepError::Diverged`] after the step; `state` holds the
    ///   diverged field
    pub fn step(&mut self, state: &mut SimulationState, dt: f64) -> Result<StepReport, StepError> {
        match self.scheme.max_dt(&self.controller) {
            Some(_) if self.stability_check => self.controller.validate(dt)?,
            _ => StabilityController::check_time_step(dt)?,
        }

        let stencil_start = Instant::now();
        let (sweeps, max_delta) = {
            let (prev, next) = state.grid.stage();
            let ctx = StepContext::new(
                prev,
                &self.stencil,
                &self.policy,
                &self.held,
                self.alpha,
                dt,
                self.parallel,
            );
            let sweeps = self.scheme.advance(&ctx, next)?;
            let max_delta = prev
                .iter()
                .zip(next.iter())
                .fold(0.0f64, |m, (a, b)| m.max((a - b).abs()));
            (sweeps, max_delta)
        };
        state.grid.publish();
        state.elapsed += dt;
        state.iteration = state.iteration.next();
        let stencil_us = stencil_start.elapsed().as_micros() as u64;

        let inspect_start = Instant::now();
        self.controller.inspect(&state.grid, state.iteration)?;
        let inspect_us = inspect_start.elapsed().as_micros() as u64;

        Ok(StepReport {
            dt,
            max_delta,
            sweeps,
            stencil_us,
            inspect_us,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::EdgeValues;
    use crate::scheme::BackwardEuler;
    use calor_core::{ErrorKind, Iteration};
    use calor_grid::{GridDims, InitialField, Spacing};

    fn spike() -> (Stepper, SimulationState) {
        let policy = BoundaryPolicy::Dirichlet(EdgeValues::uniform(0.0));
        let grid = Grid::new(
            GridDims::line(5),
            Spacing::uniform(1.0),
            policy.edge_behavior(),
            &InitialField::Values(vec![0.0, 0.0, 100.0, 0.0, 0.0]),
        )
        .unwrap();
        let stepper = Stepper::new(0.5, policy, &grid);
        (stepper, SimulationState::new(grid))
    }

    #[test]
    fn step_advances_time_and_iteration() {
        let (mut stepper, mut state) = spike();
        let report = stepper.step(&mut state, 0.5).unwrap();
        assert_eq!(state.grid().values(), &[0.0, 25.0, 50.0, 25.0, 0.0]);
        assert_eq!(state.iteration(), Iteration(1));
        assert_eq!(state.elapsed(), 0.5);
        assert_eq!(report.max_delta, 50.0);
        assert_eq!(report.sweeps, 1);
    }

    #[test]
    fn unstable_dt_leaves_state_untouched() {
        let (mut stepper, mut state) = spike();
        let err = stepper.step(&mut state, 1.5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericalInstability);
        assert_eq!(state.iteration(), Iteration(0));
        assert_eq!(state.elapsed(), 0.0);
        assert_eq!(state.grid().values(), &[0.0, 0.0, 100.0, 0.0, 0.0]);
    }

    #[test]
    fn disabled_check_still_rejects_non_positive_dt() {
        let (stepper, mut state) = spike();
        let mut stepper = stepper.with_stability_check(false);
        let err = stepper.step(&mut state, 0.0).unwrap_err();
        assert_eq!(err, StepError::InvalidTimeStep { dt: 0.0 });
    }

    #[test]
    fn implicit_scheme_ignores_explicit_bound() {
        let (stepper, mut state) = spike();
        let mut stepper = stepper.with_scheme(Box::new(BackwardEuler::default()));
        assert_eq!(stepper.max_dt(), None);
        let report = stepper.step(&mut state, 10.0).unwrap();
        assert!(report.sweeps > 1);
        assert!(state.grid().max_abs() <= 100.0);
    }

    #[test]
    fn conductivity_scales_the_bound_and_the_update() {
        let (stepper, mut state) = spike();
        let mut stepper = stepper.with_conductivity(vec![1.0, 1.0, 2.0, 1.0, 1.0]);
        assert_eq!(stepper.controller().suggest(), 0.5);
        assert_eq!(
            stepper.step(&mut state, 0.75).unwrap_err().kind(),
            ErrorKind::NumericalInstability
        );
        // Faces next to the centre conduct at 4/3: r = 0.25 * 4/3 = 1/3.
        stepper.step(&mut state, 0.5).unwrap();
        let v = state.grid().values();
        assert!((v[2] - 100.0 / 3.0).abs() < 1e-9, "{v:?}");
        assert!((v[1] - 100.0 / 3.0).abs() < 1e-9, "{v:?}");
        assert_eq!(v[1], v[3]);
    }

    #[test]
    fn divergence_is_detected_after_the_step() {
        let (stepper, mut state) = spike();
        let mut stepper = stepper
            .with_stability_check(false)
            .with_controller(
                StabilityController::new(0.5, &GridDims::line(5), &Spacing::uniform(1.0))
                    .with_runaway_limit(120.0),
            );
        // r = 2.5: the centre swings to 100 - 2.5 * 200 = -400.
        let err = stepper.step(&mut state, 5.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivergedSimulation);
        assert_eq!(state.iteration(), Iteration(1));
    }
}
