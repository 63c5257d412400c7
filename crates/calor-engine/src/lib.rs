//! Simulation runner for the Calor heat simulator.
//!
//! [`SimulationRunner`] owns the live field for the duration of a run and
//! drives the [`Stepper`](calor_solver::Stepper) until a stop criterion,
//! a cooperative stop request, or a failure ends it:
//!
//! ```text
//! Configured --start()--> Running --advance()*--> Completed(StopReason)
//!                  \                        \
//!                   +------------------------+--> Failed(ErrorKind)
//! ```
//!
//! After every step an owned [`Snapshot`] goes to a [`SnapshotSink`], and a
//! final snapshot follows on completion.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod runner;
pub mod sink;
pub mod snapshot;
pub mod status;
pub mod stop;

pub use config::{ConfigError, HeldCell, SchemeKind, SimulationConfig, StopCriteria, TimeStep};
pub use metrics::{RunMetrics, StepMetrics};
pub use runner::{Outcome, RunError, SimulationRunner};
pub use sink::{ChannelSink, NullSink, SinkError, SnapshotEvent, SnapshotSink, VecSink};
pub use snapshot::Snapshot;
pub use status::{RunState, StopReason};
pub use stop::StopHandle;
