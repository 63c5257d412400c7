//! JSON run descriptions.
//!
//! A [`ConfigFile`] mirrors [`SimulationConfig`] in a shape that is easy to
//! write by hand:
//!
//! ```json
//! {
//!   "grid": { "nx": 40, "ny": 20, "dx": 0.5 },
//!   "alpha": 1.0,
//!   "dt": "auto",
//!   "boundary": { "type": "dirichlet", "value": 0.0, "x_min": 100.0 },
//!   "initial": { "uniform": 20.0 },
//!   "conductivity": { "type": "alloy", "seed": 7 },
//!   "held": [ { "coord": [10, 20], "value": 250.0 } ],
//!   "stop": { "max_time": 50.0 },
//!   "scheme": { "type": "implicit" }
//! }
//! ```
//!
//! Only `grid.nx` and one stop criterion are required. Values are checked
//! by [`SimulationConfig::validate`] when the run starts, not here.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use calor_engine::{HeldCell, SchemeKind, SimulationConfig, StopCriteria, TimeStep};
use calor_grid::{Conductivity, GridDims, InitialField, Spacing, ALLOY_CONSTANTS};
use calor_solver::{BackwardEuler, BoundaryPolicy, EdgeValues};
use serde::Deserialize;

/// Top-level config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Grid extents and spacing.
    pub grid: GridSpec,
    /// Thermal diffusivity. Default: 1.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Time step. Default: `"auto"`.
    #[serde(default)]
    pub dt: DtSpec,
    /// Edge treatment. Default: Dirichlet 0.
    #[serde(default)]
    pub boundary: BoundarySpec,
    /// Initial temperatures. Default: uniform 0.
    #[serde(default)]
    pub initial: InitialSpec,
    /// Per-cell conductivity. Default: uniform.
    #[serde(default)]
    pub conductivity: ConductivitySpec,
    /// Cells pinned to fixed temperatures.
    #[serde(default)]
    pub held: Vec<HeldSpec>,
    /// Stop criteria; at least one is required to start.
    #[serde(default)]
    pub stop: StopSpec,
    /// Time-integration scheme. Default: explicit.
    #[serde(default)]
    pub scheme: SchemeSpec,
    /// Reject explicit steps above the stability bound. Default: true.
    #[serde(default = "default_true")]
    pub stability_check: bool,
    /// Row-parallel updates. Default: false.
    #[serde(default)]
    pub parallel: bool,
    /// Override for the divergence magnitude limit.
    pub runaway_limit: Option<f64>,
}

/// Grid extents and spacing. `dy` defaults to `dx`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSpec {
    /// Columns.
    pub nx: usize,
    /// Rows; absent for a 1D grid.
    pub ny: Option<usize>,
    /// Column spacing. Default: 1.
    #[serde(default = "default_spacing")]
    pub dx: f64,
    /// Row spacing.
    pub dy: Option<f64>,
}

/// A fixed step or the `"auto"` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DtSpec {
    /// The same step every time.
    Fixed(f64),
    /// The stability controller's suggestion.
    Auto(AutoKeyword),
}

impl Default for DtSpec {
    fn default() -> Self {
        Self::Auto(AutoKeyword::Auto)
    }
}

/// The literal string `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoKeyword {
    /// `"auto"`
    Auto,
}

/// Edge treatment. Dirichlet edges default to `value`, each overridable.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundarySpec {
    /// Fixed edge temperatures.
    Dirichlet {
        /// Value for every edge not set individually.
        #[serde(default)]
        value: f64,
        /// Left edge.
        x_min: Option<f64>,
        /// Right edge.
        x_max: Option<f64>,
        /// Top edge (row 0).
        y_min: Option<f64>,
        /// Bottom edge.
        y_max: Option<f64>,
    },
    /// Insulated edges.
    Neumann,
    /// Opposite edges wrap.
    Periodic,
}

impl Default for BoundarySpec {
    fn default() -> Self {
        Self::Dirichlet {
            value: 0.0,
            x_min: None,
            x_max: None,
            y_min: None,
            y_max: None,
        }
    }
}

/// Initial temperatures.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialSpec {
    /// Every cell at one value.
    Uniform(f64),
    /// Explicit values in row-major order.
    Values(Vec<f64>),
    /// Seeded uniform noise around `base`.
    Noise {
        /// Centre value.
        #[serde(default)]
        base: f64,
        /// Half-width of the noise band.
        amplitude: f64,
        /// Generator seed.
        #[serde(default)]
        seed: u64,
    },
}

impl Default for InitialSpec {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

/// Per-cell conductivity relative to `alpha`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConductivitySpec {
    /// Every cell conducts at `alpha`.
    #[default]
    Uniform,
    /// Explicit factors in row-major order.
    Values {
        /// One factor per cell.
        values: Vec<f64>,
    },
    /// Three-metal alloy with a seeded composition per cell.
    Alloy {
        /// Thermal constants of the three metals. Default: 0.75, 1, 1.25.
        #[serde(default = "default_alloy_constants")]
        constants: [f64; 3],
        /// Composition seed.
        #[serde(default)]
        seed: u64,
    },
}

/// A pinned cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeldSpec {
    /// `[i]` or `[row, col]`.
    pub coord: Vec<i32>,
    /// Temperature the cell is held at.
    pub value: f64,
}

/// Stop criteria.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StopSpec {
    /// Step limit.
    pub max_iterations: Option<u64>,
    /// Simulated time limit.
    pub max_time: Option<f64>,
    /// Steady-state threshold on the per-step change.
    pub tolerance: Option<f64>,
}

/// Scheme selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemeSpec {
    /// Forward Euler.
    #[default]
    Explicit,
    /// Backward Euler with Jacobi sweeps.
    Implicit {
        /// Convergence tolerance relative to the field magnitude.
        #[serde(default = "default_implicit_tolerance")]
        tolerance: f64,
        /// Sweep budget per step.
        #[serde(default = "default_max_sweeps")]
        max_sweeps: u32,
    },
}

const fn default_alpha() -> f64 {
    1.0
}

const fn default_spacing() -> f64 {
    1.0
}

const fn default_true() -> bool {
    true
}

const fn default_alloy_constants() -> [f64; 3] {
    ALLOY_CONSTANTS
}

const fn default_implicit_tolerance() -> f64 {
    BackwardEuler::DEFAULT_TOLERANCE
}

const fn default_max_sweeps() -> u32 {
    BackwardEuler::DEFAULT_MAX_SWEEPS
}

impl ConfigFile {
    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid config file")
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Convert to an (unvalidated) [`SimulationConfig`].
    pub fn into_config(self) -> SimulationConfig {
        let dims = match self.grid.ny {
            Some(ny) => GridDims::plane(self.grid.nx, ny),
            None => GridDims::line(self.grid.nx),
        };
        let spacing = Spacing::new(self.grid.dx, self.grid.dy.unwrap_or(self.grid.dx));

        let mut config = SimulationConfig::new(dims, spacing, self.alpha);
        config.time_step = match self.dt {
            DtSpec::Fixed(dt) => TimeStep::Fixed(dt),
            DtSpec::Auto(_) => TimeStep::Auto,
        };
        config.boundary = self.boundary.into_policy();
        config.initial = match self.initial {
            InitialSpec::Uniform(v) => InitialField::Uniform(v),
            InitialSpec::Values(values) => InitialField::Values(values),
            InitialSpec::Noise {
                base,
                amplitude,
                seed,
            } => InitialField::Noise {
                base,
                amplitude,
                seed,
            },
        };
        config.conductivity = match self.conductivity {
            ConductivitySpec::Uniform => Conductivity::Uniform,
            ConductivitySpec::Values { values } => Conductivity::Values(values),
            ConductivitySpec::Alloy { constants, seed } => Conductivity::Alloy { constants, seed },
        };
        config.held = self
            .held
            .into_iter()
            .map(|h| HeldCell::new(h.coord.into_iter().collect(), h.value))
            .collect();
        config.stop = StopCriteria {
            max_iterations: self.stop.max_iterations,
            max_time: self.stop.max_time,
            tolerance: self.stop.tolerance,
        };
        config.scheme = match self.scheme {
            SchemeSpec::Explicit => SchemeKind::Explicit,
            SchemeSpec::Implicit {
                tolerance,
                max_sweeps,
            } => SchemeKind::Implicit {
                tolerance,
                max_sweeps,
            },
        };
        config.stability_check = self.stability_check;
        config.parallel = self.parallel;
        config.runaway_limit = self.runaway_limit;
        config
    }
}

impl BoundarySpec {
    fn into_policy(self) -> BoundaryPolicy {
        match self {
            Self::Dirichlet {
                value,
                x_min,
                x_max,
                y_min,
                y_max,
            } => BoundaryPolicy::Dirichlet(EdgeValues {
                x_min: x_min.unwrap_or(value),
                x_max: x_max.unwrap_or(value),
                y_min: y_min.unwrap_or(value),
                y_max: y_max.unwrap_or(value),
            }),
            Self::Neumann => BoundaryPolicy::Neumann,
            Self::Periodic => BoundaryPolicy::Periodic,
        }
    }
}
