//! The run state machine.
//!
//! [`SimulationRunner`] is the primary user-facing API. It is created from
//! a [`SimulationConfig`], started once, and then advanced one step at a
//! time (or driven to completion with [`run()`](SimulationRunner::run)).
//!
//! # Ownership model
//!
//! The runner exclusively owns the live field; sinks only ever see owned
//! [`Snapshot`] copies. `SimulationRunner` is [`Send`], so a run can be
//! moved onto a worker thread and observed through a
//! [`ChannelSink`](crate::ChannelSink) and stopped through a
//! [`StopHandle`].

use std::error::Error;
use std::fmt;
use std::time::Instant;

use calor_core::{ErrorKind, StepError};
use calor_grid::Grid;
use calor_solver::{
    BackwardEuler, ForwardEuler, Scheme, SimulationState, StabilityController, Stepper,
};

use crate::config::{ConfigError, SchemeKind, SimulationConfig, TimeStep};
use crate::metrics::{RunMetrics, StepMetrics};
use crate::sink::{SinkError, SnapshotSink};
use crate::snapshot::Snapshot;
use crate::status::{RunState, StopReason};
use crate::stop::StopHandle;

// Compile-time assertion: SimulationRunner is Send.
// Fails to compile if any field is !Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<SimulationRunner>();
    }
};

// ── RunError ───────────────────────────────────────────────────────

/// Errors from [`SimulationRunner`] operations.
#[derive(Debug)]
pub enum RunError {
    /// The configuration was rejected at [`start()`](SimulationRunner::start).
    InvalidConfiguration(ConfigError),
    /// A step failed: unstable `dt`, divergence, or a stalled implicit solve.
    Step(StepError),
    /// The sink rejected a snapshot.
    Sink(SinkError),
    /// The operation is not allowed in the runner's current state.
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// The state the runner was in.
        state: RunState,
    },
}

impl RunError {
    /// Coarse classification, used for exit codes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration(e) => e.kind(),
            Self::Step(e) => e.kind(),
            Self::Sink(_) => ErrorKind::Reporting,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(e) => write!(f, "invalid configuration: {e}"),
            Self::Step(e) => write!(f, "step failed: {e}"),
            Self::Sink(e) => write!(f, "snapshot sink failed: {e}"),
            Self::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while {state}")
            }
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfiguration(e) => Some(e),
            Self::Step(e) => Some(e),
            Self::Sink(e) => Some(e),
            Self::InvalidState { .. } => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfiguration(e)
    }
}

impl From<StepError> for RunError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

impl From<SinkError> for RunError {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

// ── Outcome ────────────────────────────────────────────────────────

/// Result of a completed [`SimulationRunner::run`].
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Which criterion ended the run.
    pub reason: StopReason,
    /// The field at completion.
    pub final_snapshot: Snapshot,
    /// Totals over the run.
    pub metrics: RunMetrics,
}

// ── SimulationRunner ───────────────────────────────────────────────

struct Live {
    stepper: Stepper,
    sim: SimulationState,
}

/// Drives one simulation from configuration to completion.
///
/// # Example
///
/// ```
/// use calor_engine::{SimulationConfig, SimulationRunner, StopReason, VecSink};
/// use calor_grid::{GridDims, InitialField, Spacing};
///
/// let mut config = SimulationConfig::new(GridDims::line(5), Spacing::uniform(1.0), 0.5);
/// config.initial = InitialField::Values(vec![0.0, 0.0, 100.0, 0.0, 0.0]);
/// config.stop.max_iterations = Some(3);
///
/// let mut runner = SimulationRunner::new(config);
/// let mut sink = VecSink::new();
/// let outcome = runner.run(&mut sink).unwrap();
/// assert_eq!(outcome.reason, StopReason::MaxIterations);
/// assert_eq!(sink.steps.len(), 3);
/// ```
pub struct SimulationRunner {
    config: SimulationConfig,
    state: RunState,
    live: Option<Live>,
    stop: StopHandle,
    last_metrics: StepMetrics,
    run_metrics: RunMetrics,
    final_snapshot: Option<Snapshot>,
}

impl SimulationRunner {
    /// A runner in the [`Configured`](RunState::Configured) state.
    ///
    /// Nothing is validated or allocated until [`start()`](Self::start).
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            state: RunState::Configured,
            live: None,
            stop: StopHandle::new(),
            last_metrics: StepMetrics::default(),
            run_metrics: RunMetrics::default(),
            final_snapshot: None,
        }
    }

    /// A handle that can stop this run from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The configuration this runner was built from.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Metrics from the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Totals over all steps so far.
    pub fn run_metrics(&self) -> &RunMetrics {
        &self.run_metrics
    }

    /// Copy of the current field, once started.
    ///
    /// After a divergence this is the diverged field.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.live.as_ref().map(|live| Snapshot::capture(&live.sim))
    }

    /// Validate the configuration and build the grid, stepper, and
    /// stability controller.
    ///
    /// # Errors
    ///
    /// - [`RunError::InvalidState`] unless the runner is
    ///   [`Configured`](RunState::Configured)
    /// - [`RunError::InvalidConfiguration`] for any rejected parameter; the
    ///   runner is then [`Failed`](RunState::Failed) and no step has run
    pub fn start(&mut self) -> Result<(), RunError> {
        if self.state != RunState::Configured {
            return Err(self.invalid_state("start"));
        }
        match build(&self.config) {
            Ok(live) => {
                self.live = Some(live);
                self.state = RunState::Running;
                Ok(())
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Run one loop iteration.
    ///
    /// 1. Honour a pending stop request.
    /// 2. Choose `dt`; the last step is clipped to land on `max_time`.
    /// 3. Step.
    /// 4. Hand the snapshot to `sink`.
    /// 5. Check the stop criteria: iterations, then time, then steady state.
    ///
    /// Returns the state after the iteration: [`Running`](RunState::Running)
    /// or [`Completed`](RunState::Completed). On completion the final
    /// snapshot goes to [`SnapshotSink::on_complete`].
    ///
    /// # Errors
    ///
    /// - [`RunError::InvalidState`] outside the `Running` state
    /// - [`RunError::Step`] or [`RunError::Sink`]; the runner is then
    ///   [`Failed`](RunState::Failed) with no retry
    pub fn advance<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunState, RunError> {
        if self.state != RunState::Running {
            return Err(self.invalid_state("advance"));
        }
        if self.stop.is_requested() {
            return self.complete(StopReason::StopRequested, sink);
        }

        let start = Instant::now();
        let max_time = self.config.stop.max_time;
        let Some(live) = self.live.as_mut() else {
            return Err(self.invalid_state("advance"));
        };

        let mut dt = match self.config.time_step {
            TimeStep::Fixed(dt) => dt,
            TimeStep::Auto => live.stepper.controller().suggest(),
        };
        if let Some(t) = max_time {
            let remaining = t - live.sim.elapsed();
            if dt > remaining {
                dt = remaining;
            }
        }

        let report = match live.stepper.step(&mut live.sim, dt) {
            Ok(report) => report,
            Err(e) => return Err(self.fail(e.into())),
        };
        if let Some(t) = max_time {
            live.sim.align_elapsed(t);
        }
        let elapsed = live.sim.elapsed();
        let iteration = live.sim.iteration();

        let sink_start = Instant::now();
        let snapshot = Snapshot::capture(&live.sim);
        if let Err(e) = sink.on_step(&snapshot) {
            return Err(self.fail(e.into()));
        }
        let sink_us = sink_start.elapsed().as_micros() as u64;

        self.last_metrics = StepMetrics {
            total_us: start.elapsed().as_micros() as u64,
            stencil_us: report.stencil_us,
            inspect_us: report.inspect_us,
            sink_us,
            dt: report.dt,
            max_delta: report.max_delta,
            sweeps: report.sweeps,
        };
        self.run_metrics.record(&self.last_metrics);

        let stop = self.config.stop;
        let reason = if stop.max_iterations.is_some_and(|n| iteration.0 >= n) {
            Some(StopReason::MaxIterations)
        } else if max_time.is_some_and(|t| elapsed >= t) {
            Some(StopReason::MaxTime)
        } else if stop.tolerance.is_some_and(|tol| report.max_delta < tol) {
            Some(StopReason::SteadyState)
        } else {
            None
        };
        match reason {
            Some(reason) => self.complete(reason, sink),
            None => Ok(RunState::Running),
        }
    }

    /// Start if needed, then advance until the run completes.
    ///
    /// # Errors
    ///
    /// Any error from [`start()`](Self::start) or
    /// [`advance()`](Self::advance).
    pub fn run<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> Result<Outcome, RunError> {
        if self.state == RunState::Configured {
            self.start()?;
        }
        loop {
            if let RunState::Completed(reason) = self.advance(sink)? {
                let final_snapshot = match &self.final_snapshot {
                    Some(s) => s.clone(),
                    None => return Err(self.invalid_state("report outcome")),
                };
                return Ok(Outcome {
                    reason,
                    final_snapshot,
                    metrics: self.run_metrics.clone(),
                });
            }
        }
    }

    fn complete<S: SnapshotSink + ?Sized>(
        &mut self,
        reason: StopReason,
        sink: &mut S,
    ) -> Result<RunState, RunError> {
        let Some(snapshot) = self.snapshot() else {
            return Err(self.invalid_state("complete"));
        };
        if let Err(e) = sink.on_complete(&snapshot, reason) {
            return Err(self.fail(e.into()));
        }
        self.final_snapshot = Some(snapshot);
        self.state = RunState::Completed(reason);
        Ok(self.state)
    }

    fn fail(&mut self, err: RunError) -> RunError {
        self.state = RunState::Failed(err.kind());
        err
    }

    fn invalid_state(&self, operation: &'static str) -> RunError {
        RunError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

impl fmt::Debug for SimulationRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("SimulationRunner");
        d.field("state", &self.state).field("dims", &self.config.dims);
        if let Some(live) = &self.live {
            d.field("iteration", &live.sim.iteration())
                .field("elapsed", &live.sim.elapsed())
                .field("scheme", &live.stepper.scheme().name());
        }
        d.finish()
    }
}

/// Build the live state for a validated configuration.
fn build(config: &SimulationConfig) -> Result<Live, ConfigError> {
    config.validate()?;

    let mut grid = Grid::new(
        config.dims,
        config.spacing,
        config.boundary.edge_behavior(),
        &config.initial,
    )?;

    let mut held = Vec::with_capacity(config.held.len());
    for cell in &config.held {
        let index = grid
            .index_of(&cell.coord)
            .map_err(ConfigError::HeldCellOutOfBounds)?;
        grid.set(&cell.coord, cell.value)?;
        held.push((index, cell.value));
    }

    let mut controller = StabilityController::new(config.alpha, &config.dims, &config.spacing)
        .with_reference_magnitude(config.reference_magnitude());
    if let Some(limit) = config.runaway_limit {
        controller = controller.with_runaway_limit(limit);
    }

    let scheme: Box<dyn Scheme> = match config.scheme {
        SchemeKind::Explicit => Box::new(ForwardEuler),
        SchemeKind::Implicit {
            tolerance,
            max_sweeps,
        } => Box::new(BackwardEuler::new(tolerance, max_sweeps)),
    };

    let mut stepper = Stepper::new(config.alpha, config.boundary, &grid)
        .with_scheme(scheme)
        .with_controller(controller)
        .with_held(held)
        .with_stability_check(config.stability_check)
        .with_parallel(config.parallel);
    if !config.conductivity.is_uniform() {
        let factors = config.conductivity.materialize(grid.cell_count())?;
        stepper = stepper.with_conductivity(factors);
    }

    Ok(Live {
        stepper,
        sim: SimulationState::new(grid),
    })
}
