//! Calor: a heat propagation simulator for 1D and 2D grids.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Calor sub-crates, plus the pieces behind the `calor` binary: the
//! argument parser, the JSON config file format, and the snapshot writers.
//!
//! # Quick start
//!
//! ```rust
//! use calor::prelude::*;
//!
//! // A hot spike in the middle of a cold rod.
//! let mut config = SimulationConfig::new(GridDims::line(5), Spacing::uniform(1.0), 0.5);
//! config.initial = InitialField::Values(vec![0.0, 0.0, 100.0, 0.0, 0.0]);
//! config.boundary = BoundaryPolicy::Dirichlet(EdgeValues::uniform(0.0));
//! config.time_step = TimeStep::Fixed(0.5);
//! config.stop.max_iterations = Some(1);
//!
//! let mut runner = SimulationRunner::new(config);
//! let outcome = runner.run(&mut NullSink).unwrap();
//! assert_eq!(outcome.final_snapshot.field, vec![0.0, 25.0, 50.0, 25.0, 0.0]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `calor-core` | IDs and the error taxonomy |
//! | [`space`] | `calor-space` | Lattice topology |
//! | [`grid`] | `calor-grid` | Field storage and initial conditions |
//! | [`solver`] | `calor-solver` | Boundaries, schemes, stepping, stability |
//! | [`engine`] | `calor-engine` | Runner, config, snapshots, sinks |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config_file;
pub mod report;

/// Identifiers and error types (`calor-core`).
pub use calor_core as types;

/// Lattice topology (`calor-space`).
///
/// [`space::Line1D`] and [`space::Square4`] back 1D and 2D grids.
pub use calor_space as space;

/// Field storage (`calor-grid`).
pub use calor_grid as grid;

/// Finite-difference stepping (`calor-solver`).
///
/// [`solver::Stepper`] advances a [`solver::SimulationState`] with a
/// [`solver::Scheme`] under a [`solver::BoundaryPolicy`].
pub use calor_solver as solver;

/// The run state machine (`calor-engine`).
pub use calor_engine as engine;

/// Common imports for typical Calor usage.
///
/// ```rust
/// use calor::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use calor_core::{Coord, ErrorKind, GridError, Iteration, StepError};

    // Space
    pub use calor_space::EdgeBehavior;

    // Grid
    pub use calor_grid::{Conductivity, Grid, GridDims, InitialField, Spacing};

    // Solver
    pub use calor_solver::{BoundaryPolicy, Edge, EdgeValues, StabilityController};

    // Engine
    pub use calor_engine::{
        ChannelSink, ConfigError, HeldCell, NullSink, Outcome, RunError, RunState, SchemeKind,
        SimulationConfig, SimulationRunner, Snapshot, SnapshotSink, StepMetrics, StopHandle,
        StopReason, TimeStep, VecSink,
    };
}
