//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the builder-input for a run.
//! [`validate()`](SimulationConfig::validate) checks every parameter before
//! anything is allocated; [`SimulationRunner::start`](crate::SimulationRunner::start)
//! calls it and then builds the grid.

use std::error::Error;
use std::fmt;

use calor_core::{Coord, ErrorKind, GridError};
use calor_grid::{Conductivity, GridDims, InitialField, Spacing};
use calor_solver::{BackwardEuler, BoundaryPolicy, Edge, EdgeValues};

// ── TimeStep ───────────────────────────────────────────────────────

/// How the runner chooses `dt` for each step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeStep {
    /// The same step every time.
    Fixed(f64),
    /// The stability controller's suggested step.
    Auto,
}

// ── SchemeKind ─────────────────────────────────────────────────────

/// Time-integration scheme selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SchemeKind {
    /// Explicit forward Euler. Bounded by the stability limit.
    Explicit,
    /// Implicit backward Euler solved by Jacobi relaxation.
    Implicit {
        /// Convergence tolerance relative to the field magnitude.
        tolerance: f64,
        /// Sweep budget per step.
        max_sweeps: u32,
    },
}

impl SchemeKind {
    /// Implicit scheme with default convergence settings.
    pub fn implicit() -> Self {
        Self::Implicit {
            tolerance: BackwardEuler::DEFAULT_TOLERANCE,
            max_sweeps: BackwardEuler::DEFAULT_MAX_SWEEPS,
        }
    }
}

// ── StopCriteria ───────────────────────────────────────────────────

/// When a run completes. At least one criterion must be set.
///
/// Checked after every step in field order: iterations, then time, then
/// steady state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StopCriteria {
    /// Complete after this many steps.
    pub max_iterations: Option<u64>,
    /// Complete once simulated time reaches this value. The last step is
    /// shortened to land on it exactly.
    pub max_time: Option<f64>,
    /// Complete once no cell changes by this much or more in one step.
    pub tolerance: Option<f64>,
}

impl StopCriteria {
    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.max_iterations.is_none() && self.max_time.is_none() && self.tolerance.is_none()
    }
}

// ── HeldCell ───────────────────────────────────────────────────────

/// A cell pinned to a fixed temperature for the whole run.
#[derive(Clone, Debug, PartialEq)]
pub struct HeldCell {
    /// Cell coordinate (`[i]` or `[row, col]`).
    pub coord: Coord,
    /// Temperature it is held at.
    pub value: f64,
}

impl HeldCell {
    /// Hold `coord` at `value`.
    pub fn new(coord: Coord, value: f64) -> Self {
        Self { coord, value }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`SimulationConfig`] or building
/// the grid it describes.
///
/// Every variant maps to [`ErrorKind::InvalidConfiguration`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Diffusivity is NaN, infinite, zero, or negative.
    InvalidDiffusivity {
        /// The rejected value.
        value: f64,
    },
    /// Grid extents, spacing, or initial field are invalid.
    Grid(GridError),
    /// A fixed time step is NaN, infinite, zero, or negative.
    InvalidTimeStep {
        /// The rejected value.
        value: f64,
    },
    /// No stop criterion was configured.
    NoStopCriterion,
    /// A stop criterion has an unusable value.
    InvalidStopCriterion {
        /// Criterion name (`"max_iterations"`, `"max_time"`, `"tolerance"`).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A Dirichlet edge value is NaN or infinite.
    InvalidBoundaryValue {
        /// The offending edge.
        edge: Edge,
        /// The rejected value.
        value: f64,
    },
    /// A held cell lies outside the grid.
    HeldCellOutOfBounds(GridError),
    /// A held cell's value is NaN or infinite.
    InvalidHeldValue {
        /// The held coordinate.
        coord: Coord,
        /// The rejected value.
        value: f64,
    },
    /// A numeric solver or initial-field setting is out of range.
    InvalidSetting {
        /// Setting name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl ConfigError {
    /// Always [`ErrorKind::InvalidConfiguration`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidConfiguration
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDiffusivity { value } => {
                write!(f, "alpha must be finite and positive, got {value}")
            }
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::InvalidTimeStep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::NoStopCriterion => write!(
                f,
                "at least one of max_iterations, max_time, tolerance is required"
            ),
            Self::InvalidStopCriterion { name, value } => {
                write!(f, "{name} must be positive, got {value}")
            }
            Self::InvalidBoundaryValue { edge, value } => {
                write!(f, "boundary value for {edge:?} must be finite, got {value}")
            }
            Self::HeldCellOutOfBounds(e) => write!(f, "held cell: {e}"),
            Self::InvalidHeldValue { coord, value } => {
                write!(f, "held cell {coord:?} value must be finite, got {value}")
            }
            Self::InvalidSetting { name, value } => {
                write!(f, "{name} is out of range: {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) | Self::HeldCellOutOfBounds(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration for one simulation run.
///
/// Immutable once the run starts.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Thermal diffusivity `alpha`.
    pub alpha: f64,
    /// Grid extents.
    pub dims: GridDims,
    /// Cell spacing.
    pub spacing: Spacing,
    /// Initial temperatures.
    pub initial: InitialField,
    /// Per-cell conductivity relative to `alpha`. Default: uniform.
    pub conductivity: Conductivity,
    /// Edge behaviour.
    pub boundary: BoundaryPolicy,
    /// Fixed or automatic time step.
    pub time_step: TimeStep,
    /// When the run completes.
    pub stop: StopCriteria,
    /// Reject explicit steps above the stability bound. Default: on.
    pub stability_check: bool,
    /// Time-integration scheme. Default: explicit.
    pub scheme: SchemeKind,
    /// Cells pinned to fixed temperatures.
    pub held: Vec<HeldCell>,
    /// Override for the divergence magnitude limit.
    pub runaway_limit: Option<f64>,
    /// Compute cell updates on the rayon pool. Default: off.
    pub parallel: bool,
}

impl SimulationConfig {
    /// Config with defaults: zero initial field, Dirichlet 0 edges, auto
    /// time step, explicit scheme, stability check on, no stop criterion.
    pub fn new(dims: GridDims, spacing: Spacing, alpha: f64) -> Self {
        Self {
            alpha,
            dims,
            spacing,
            initial: InitialField::Uniform(0.0),
            conductivity: Conductivity::Uniform,
            boundary: BoundaryPolicy::Dirichlet(EdgeValues::uniform(0.0)),
            time_step: TimeStep::Auto,
            stop: StopCriteria::default(),
            stability_check: true,
            scheme: SchemeKind::Explicit,
            held: Vec::new(),
            runaway_limit: None,
            parallel: false,
        }
    }

    /// Validate every parameter that can be checked without building the
    /// grid.
    ///
    /// Held-cell bounds are checked when the grid is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Physics.
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(ConfigError::InvalidDiffusivity { value: self.alpha });
        }
        // 2. Geometry.
        self.dims.validate()?;
        self.spacing.validate(&self.dims)?;
        // 3. Initial field.
        match &self.initial {
            InitialField::Uniform(v) if !v.is_finite() => {
                return Err(ConfigError::InvalidSetting {
                    name: "initial",
                    value: *v,
                });
            }
            InitialField::Values(values) if values.len() != self.dims.cell_count() => {
                return Err(GridError::DimensionMismatch {
                    expected: self.dims.cell_count(),
                    actual: values.len(),
                }
                .into());
            }
            InitialField::Noise {
                base, amplitude, ..
            } => {
                if !base.is_finite() {
                    return Err(ConfigError::InvalidSetting {
                        name: "initial",
                        value: *base,
                    });
                }
                if !amplitude.is_finite() || *amplitude < 0.0 {
                    return Err(ConfigError::InvalidSetting {
                        name: "noise",
                        value: *amplitude,
                    });
                }
            }
            _ => {}
        }
        // 4. Boundary.
        if let BoundaryPolicy::Dirichlet(values) = &self.boundary {
            if let Some((edge, value)) = values.first_non_finite() {
                return Err(ConfigError::InvalidBoundaryValue { edge, value });
            }
        }
        // 5. Time step.
        if let TimeStep::Fixed(dt) = self.time_step {
            if !dt.is_finite() || dt <= 0.0 {
                return Err(ConfigError::InvalidTimeStep { value: dt });
            }
        }
        // 6. Stop criteria.
        let stop = &self.stop;
        if stop.is_empty() {
            return Err(ConfigError::NoStopCriterion);
        }
        if stop.max_iterations == Some(0) {
            return Err(ConfigError::InvalidStopCriterion {
                name: "max_iterations",
                value: 0.0,
            });
        }
        for (name, value) in [("max_time", stop.max_time), ("tolerance", stop.tolerance)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(ConfigError::InvalidStopCriterion { name, value: v });
                }
            }
        }
        // 7. Solver settings.
        if let SchemeKind::Implicit {
            tolerance,
            max_sweeps,
        } = self.scheme
        {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(ConfigError::InvalidSetting {
                    name: "implicit tolerance",
                    value: tolerance,
                });
            }
            if max_sweeps == 0 {
                return Err(ConfigError::InvalidSetting {
                    name: "max_sweeps",
                    value: 0.0,
                });
            }
        }
        if let Some(limit) = self.runaway_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ConfigError::InvalidSetting {
                    name: "runaway_limit",
                    value: limit,
                });
            }
        }
        // 8. Held values (bounds are checked against the built grid).
        for cell in &self.held {
            if !cell.value.is_finite() {
                return Err(ConfigError::InvalidHeldValue {
                    coord: cell.coord.clone(),
                    value: cell.value,
                });
            }
        }
        // 9. Conductivity.
        match &self.conductivity {
            Conductivity::Uniform => {}
            Conductivity::Values(k) if k.len() != self.dims.cell_count() => {
                return Err(GridError::DimensionMismatch {
                    expected: self.dims.cell_count(),
                    actual: k.len(),
                }
                .into());
            }
            Conductivity::Values(k) => {
                if let Some((index, &value)) = k
                    .iter()
                    .enumerate()
                    .find(|(_, v)| !v.is_finite() || **v <= 0.0)
                {
                    return Err(GridError::InvalidConductivity { index, value }.into());
                }
            }
            Conductivity::Alloy { constants, .. } => {
                if let Some(&value) = constants.iter().find(|c| !c.is_finite() || **c <= 0.0) {
                    return Err(ConfigError::InvalidSetting {
                        name: "alloy constant",
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Largest magnitude the configured physics can justify: initial
    /// field, Dirichlet edges, and held cells.
    pub fn reference_magnitude(&self) -> f64 {
        self.held
            .iter()
            .fold(self.initial.max_abs().max(self.boundary.max_abs()), |m, c| {
                m.max(c.value.abs())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn valid() -> SimulationConfig {
        let mut c = SimulationConfig::new(GridDims::line(5), Spacing::uniform(1.0), 0.5);
        c.stop.max_iterations = Some(10);
        c
    }

    #[test]
    fn defaults_validate_once_a_stop_criterion_is_set() {
        assert_eq!(
            SimulationConfig::new(GridDims::line(5), Spacing::uniform(1.0), 0.5).validate(),
            Err(ConfigError::NoStopCriterion)
        );
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_bad_conductivity() {
        let mut c = valid();
        c.conductivity = Conductivity::Values(vec![1.0; 4]);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Grid(GridError::DimensionMismatch { .. }))
        ));

        c.conductivity = Conductivity::Values(vec![1.0, 1.0, f64::NAN, 1.0, 1.0]);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Grid(GridError::InvalidConductivity { index: 2, .. }))
        ));

        c.conductivity = Conductivity::Alloy {
            constants: [0.75, 0.0, 1.25],
            seed: 3,
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::InvalidSetting {
                name: "alloy constant",
                value: 0.0
            })
        );

        c.conductivity = Conductivity::alloy(3);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_alpha() {
        for alpha in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut c = valid();
            c.alpha = alpha;
            assert!(matches!(
                c.validate(),
                Err(ConfigError::InvalidDiffusivity { .. })
            ));
        }
    }

    #[test]
    fn rejects_bad_geometry() {
        let mut c = valid();
        c.dims = GridDims::line(0);
        assert!(matches!(c.validate(), Err(ConfigError::Grid(_))));

        let mut c = valid();
        c.spacing = Spacing::uniform(-1.0);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Grid(GridError::InvalidSpacing { axis: "dx", .. }))
        ));
    }

    #[test]
    fn rejects_initial_length_mismatch() {
        let mut c = valid();
        c.initial = InitialField::Values(vec![1.0; 4]);
        assert_eq!(
            c.validate(),
            Err(ConfigError::Grid(GridError::DimensionMismatch {
                expected: 5,
                actual: 4
            }))
        );
    }

    #[test]
    fn rejects_bad_time_step_and_stop() {
        let mut c = valid();
        c.time_step = TimeStep::Fixed(0.0);
        assert_eq!(
            c.validate(),
            Err(ConfigError::InvalidTimeStep { value: 0.0 })
        );

        let mut c = valid();
        c.stop.max_time = Some(-2.0);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidStopCriterion {
                name: "max_time",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_finite_edge_and_held_values() {
        let mut c = valid();
        c.boundary = BoundaryPolicy::Dirichlet(EdgeValues {
            x_min: 0.0,
            x_max: f64::INFINITY,
            y_min: 0.0,
            y_max: 0.0,
        });
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidBoundaryValue {
                edge: Edge::XMax,
                ..
            })
        ));

        let mut c = valid();
        c.held.push(HeldCell::new(smallvec![1], f64::NAN));
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidHeldValue { .. })
        ));
    }

    #[test]
    fn every_error_is_invalid_configuration() {
        assert_eq!(
            ConfigError::NoStopCriterion.kind(),
            ErrorKind::InvalidConfiguration
        );
        let e = ConfigError::HeldCellOutOfBounds(GridError::IndexOutOfBounds {
            coord: smallvec![9],
            bounds: "[0, 5)".into(),
        });
        assert_eq!(e.kind(), ErrorKind::InvalidConfiguration);
        assert!(e.source().is_some());
    }

    #[test]
    fn reference_magnitude_covers_all_sources() {
        let mut c = valid();
        c.initial = InitialField::Uniform(20.0);
        c.boundary = BoundaryPolicy::Dirichlet(EdgeValues::uniform(-300.0));
        c.held.push(HeldCell::new(smallvec![2], 150.0));
        assert_eq!(c.reference_magnitude(), 300.0);
    }
}
