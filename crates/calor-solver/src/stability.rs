//! Time-step bound and divergence detection.

use calor_core::{Iteration, StepError};
use calor_grid::{Grid, GridDims, Spacing};

/// Guards the explicit scheme's step size and watches the field for
/// blow-up.
///
/// The explicit bound is
///
/// ```text
/// dt_max = 0.5 * dx^2 / alpha                    (1D)
/// dt_max = 1 / (2 * alpha * (1/dx^2 + 1/dy^2))   (2D)
/// ```
///
/// With per-cell conductivity, `alpha` is scaled by the largest factor
/// (see [`with_peak_conductivity`](Self::with_peak_conductivity)).
///
/// After every step [`inspect`](Self::inspect) rejects non-finite values
/// and magnitudes beyond the runaway limit.
#[derive(Clone, Debug, PartialEq)]
pub struct StabilityController {
    unit_dt_max: f64,
    peak_conductivity: f64,
    runaway_limit: f64,
}

impl StabilityController {
    /// Multiplier applied to the reference magnitude for the default
    /// runaway limit.
    pub const RUNAWAY_FACTOR: f64 = 1e6;

    /// Controller for a grid shape, spacing, and diffusivity.
    ///
    /// The runaway limit starts at [`RUNAWAY_FACTOR`](Self::RUNAWAY_FACTOR);
    /// use [`with_reference_magnitude`](Self::with_reference_magnitude) or
    /// [`with_runaway_limit`](Self::with_runaway_limit) to adjust it.
    pub fn new(alpha: f64, dims: &GridDims, spacing: &Spacing) -> Self {
        let inv_dx2 = 1.0 / (spacing.dx * spacing.dx);
        let inv_sum = match dims.ndim() {
            1 => inv_dx2,
            _ => inv_dx2 + 1.0 / (spacing.dy * spacing.dy),
        };
        Self {
            unit_dt_max: 1.0 / (2.0 * alpha * inv_sum),
            peak_conductivity: 1.0,
            runaway_limit: Self::RUNAWAY_FACTOR,
        }
    }

    /// Tighten the bound for per-cell conductivity whose largest factor is
    /// `peak`.
    ///
    /// Face conductances never exceed the larger of their two cells, so
    /// `dt_max / peak` keeps every explicit update a convex combination.
    pub fn with_peak_conductivity(mut self, peak: f64) -> Self {
        self.peak_conductivity = peak;
        self
    }

    /// Scale the runaway limit to `RUNAWAY_FACTOR * max(1, reference)`.
    ///
    /// `reference` is the largest magnitude the physics can justify: the
    /// initial field, Dirichlet edges, and held cells.
    pub fn with_reference_magnitude(mut self, reference: f64) -> Self {
        self.runaway_limit = Self::RUNAWAY_FACTOR * reference.abs().max(1.0);
        self
    }

    /// Replace the runaway limit outright.
    pub fn with_runaway_limit(mut self, limit: f64) -> Self {
        self.runaway_limit = limit;
        self
    }

    /// Largest stable explicit time step.
    pub fn suggest(&self) -> f64 {
        self.unit_dt_max / self.peak_conductivity
    }

    /// Magnitude above which the field counts as diverged.
    pub fn runaway_limit(&self) -> f64 {
        self.runaway_limit
    }

    /// Accept `0 < dt <= dt_max`.
    ///
    /// # Errors
    ///
    /// - [`StepError::InvalidTimeStep`] for NaN, infinite, zero, or
    ///   negative `dt`
    /// - [`StepError::NumericalInstability`] for `dt > dt_max`
    pub fn validate(&self, dt: f64) -> Result<(), StepError> {
        Self::check_time_step(dt)?;
        let dt_max = self.suggest();
        if dt > dt_max {
            return Err(StepError::NumericalInstability { dt, dt_max });
        }
        Ok(())
    }

    /// Reject NaN, infinite, zero, or negative `dt` regardless of scheme.
    pub fn check_time_step(dt: f64) -> Result<(), StepError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(StepError::InvalidTimeStep { dt });
        }
        Ok(())
    }

    /// Scan the field produced by step `iteration`.
    ///
    /// Reports the first cell (row-major) that is non-finite or whose
    /// magnitude exceeds the runaway limit.
    pub fn inspect(&self, grid: &Grid, iteration: Iteration) -> Result<(), StepError> {
        let bad = grid
            .values()
            .iter()
            .position(|v| !v.is_finite() || v.abs() > self.runaway_limit);
        match bad {
            None => Ok(()),
            Some(i) => Err(StepError::Diverged {
                iteration,
                coord: grid.coord_of(i).unwrap_or_default(),
                value: grid.values()[i],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_core::ErrorKind;
    use calor_grid::InitialField;
    use calor_space::EdgeBehavior;
    use proptest::prelude::*;
    use smallvec::smallvec;

    #[test]
    fn suggest_1d() {
        let c = StabilityController::new(0.5, &GridDims::line(5), &Spacing::uniform(1.0));
        assert_eq!(c.suggest(), 1.0);
    }

    #[test]
    fn suggest_2d_mixed_spacing() {
        let c = StabilityController::new(1.0, &GridDims::plane(4, 4), &Spacing::new(1.0, 2.0));
        // 1 / (2 * (1 + 0.25))
        assert!((c.suggest() - 0.4).abs() < 1e-15);
    }

    #[test]
    fn peak_conductivity_tightens_the_bound() {
        let c = StabilityController::new(0.5, &GridDims::line(5), &Spacing::uniform(1.0))
            .with_peak_conductivity(1.25);
        assert_eq!(c.suggest(), 0.8);
        assert!(c.validate(0.8).is_ok());
        assert_eq!(c.validate(1.0).unwrap_err().kind(), ErrorKind::NumericalInstability);
    }

    #[test]
    fn validate_boundaries() {
        let c = StabilityController::new(0.5, &GridDims::line(5), &Spacing::uniform(1.0));
        assert!(c.validate(1.0).is_ok());
        assert!(c.validate(0.5).is_ok());
        assert_eq!(
            c.validate(1.5),
            Err(StepError::NumericalInstability {
                dt: 1.5,
                dt_max: 1.0
            })
        );
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = c.validate(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        }
    }

    #[test]
    fn inspect_reports_first_bad_cell() {
        let grid = Grid::new(
            GridDims::plane(3, 2),
            Spacing::uniform(1.0),
            EdgeBehavior::Absorb,
            &InitialField::Values(vec![0.0, 1.0, 2.0, 3.0, 5e7, 1e9]),
        )
        .unwrap();
        let c = StabilityController::new(1.0, &grid.dims(), &grid.spacing())
            .with_reference_magnitude(10.0);
        assert_eq!(c.runaway_limit(), 1e7);
        match c.inspect(&grid, Iteration(4)) {
            Err(StepError::Diverged {
                iteration,
                coord,
                value,
            }) => {
                assert_eq!(iteration, Iteration(4));
                assert_eq!(coord, { let c: calor_core::Coord = smallvec![1, 1]; c });
                assert_eq!(value, 5e7);
            }
            other => panic!("expected Diverged, got {other:?}"),
        }
    }

    #[test]
    fn inspect_accepts_bounded_field() {
        let grid = Grid::new(
            GridDims::line(4),
            Spacing::uniform(1.0),
            EdgeBehavior::Absorb,
            &InitialField::Uniform(100.0),
        )
        .unwrap();
        let c = StabilityController::new(1.0, &grid.dims(), &grid.spacing())
            .with_reference_magnitude(grid.max_abs());
        assert!(c.inspect(&grid, Iteration(1)).is_ok());
        assert!(c
            .clone()
            .with_runaway_limit(50.0)
            .inspect(&grid, Iteration(1))
            .is_err());
    }

    proptest! {
        #[test]
        fn suggest_is_accepted_and_anything_above_rejected(
            alpha in 1e-3f64..1e3,
            dx in 1e-2f64..1e2,
            dy in 1e-2f64..1e2,
            two_d in any::<bool>(),
            excess in 1e-9f64..10.0,
        ) {
            let dims = if two_d { GridDims::plane(4, 4) } else { GridDims::line(4) };
            let c = StabilityController::new(alpha, &dims, &Spacing::new(dx, dy));
            let dt = c.suggest();
            prop_assert!(c.validate(dt).is_ok());
            prop_assert!(c.validate(dt * (1.0 + excess)).is_err());
        }
    }
}
