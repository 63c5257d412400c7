//! Run lifecycle states.

use calor_core::ErrorKind;
use std::fmt;

/// Why a run completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The iteration limit was reached.
    MaxIterations,
    /// Simulated time reached `max_time`.
    MaxTime,
    /// No cell changed by `tolerance` or more in the last step.
    SteadyState,
    /// A [`StopHandle`](crate::StopHandle) requested the stop.
    StopRequested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MaxIterations => "max-iterations",
            Self::MaxTime => "max-time",
            Self::SteadyState => "steady-state",
            Self::StopRequested => "stop-requested",
        };
        f.write_str(s)
    }
}

/// Where a [`SimulationRunner`](crate::SimulationRunner) is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Created, not yet started.
    Configured,
    /// Started; `advance()` may be called.
    Running,
    /// Finished normally.
    Completed(StopReason),
    /// Finished with an error of the given kind.
    Failed(ErrorKind),
}

impl RunState {
    /// Whether the run can make no further progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => f.write_str("configured"),
            Self::Running => f.write_str("running"),
            Self::Completed(reason) => write!(f, "completed ({reason})"),
            Self::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!RunState::Configured.is_terminal());
        assert!(!RunState::Running.is_terminal());
        assert!(RunState::Completed(StopReason::MaxTime).is_terminal());
        assert!(RunState::Failed(ErrorKind::DivergedSimulation).is_terminal());
    }

    #[test]
    fn display_names_reason() {
        assert_eq!(
            RunState::Completed(StopReason::SteadyState).to_string(),
            "completed (steady-state)"
        );
        assert_eq!(
            RunState::Failed(ErrorKind::NumericalInstability).to_string(),
            "failed (numerical instability)"
        );
    }
}
