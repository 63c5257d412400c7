//! Error types for the Calor simulator.
//!
//! Every concrete error maps onto one [`ErrorKind`], the coarse taxonomy
//! used for exit codes and for matching in tests. Variants carry enough
//! context (parameter, coordinate, iteration) to diagnose a failure
//! without rerunning.

use crate::id::{Coord, Iteration};
use std::error::Error;
use std::fmt;

/// Coarse failure classification shared by all Calor errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A physical or structural parameter is invalid; the simulation
    /// never starts.
    InvalidConfiguration,
    /// The requested time step exceeds the scheme's stability bound.
    NumericalInstability,
    /// Non-finite or runaway values appeared after a step.
    DivergedSimulation,
    /// Direct grid access with a coordinate outside the grid.
    IndexOutOfBounds,
    /// An iterative solve did not reach its tolerance.
    NotConverged,
    /// An operation was called in the wrong run state.
    InvalidState,
    /// The snapshot consumer failed.
    Reporting,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidConfiguration => "invalid configuration",
            Self::NumericalInstability => "numerical instability",
            Self::DivergedSimulation => "diverged simulation",
            Self::IndexOutOfBounds => "index out of bounds",
            Self::NotConverged => "not converged",
            Self::InvalidState => "invalid state",
            Self::Reporting => "reporting failure",
        };
        f.write_str(s)
    }
}

/// Errors from grid construction and direct cell access.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A coordinate lies outside the grid, or has the wrong number of axes.
    IndexOutOfBounds {
        /// The offending coordinate.
        coord: Coord,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// Attempted to store NaN or an infinity in a cell.
    NonFiniteValue {
        /// Target cell.
        coord: Coord,
        /// The rejected value.
        value: f64,
    },
    /// Supplied field data does not match the grid's cell count.
    DimensionMismatch {
        /// Cells in the grid.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },
    /// A grid axis has zero cells or is too large to address.
    InvalidDimension {
        /// Axis name (`"nx"` or `"ny"`).
        axis: &'static str,
        /// The rejected extent.
        value: usize,
    },
    /// A grid spacing is non-positive or non-finite.
    InvalidSpacing {
        /// Axis name (`"dx"` or `"dy"`).
        axis: &'static str,
        /// The rejected spacing.
        value: f64,
    },
    /// A cell's conductivity factor is non-positive or non-finite.
    InvalidConductivity {
        /// Flat index of the cell.
        index: usize,
        /// The rejected factor.
        value: f64,
    },
}

impl GridError {
    /// The taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
            Self::NonFiniteValue { .. }
            | Self::DimensionMismatch { .. }
            | Self::InvalidDimension { .. }
            | Self::InvalidSpacing { .. }
            | Self::InvalidConductivity { .. } => ErrorKind::InvalidConfiguration,
        }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { coord, bounds } => {
                write!(f, "coordinate {coord:?} out of bounds: {bounds}")
            }
            Self::NonFiniteValue { coord, value } => {
                write!(f, "non-finite value {value} for cell {coord:?}")
            }
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "field has {actual} values, grid has {expected} cells")
            }
            Self::InvalidDimension { axis, value } => {
                write!(f, "{axis} must be in [1, i32::MAX], got {value}")
            }
            Self::InvalidSpacing { axis, value } => {
                write!(f, "{axis} must be finite and positive, got {value}")
            }
            Self::InvalidConductivity { index, value } => {
                write!(f, "conductivity of cell {index} must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from advancing the field by one time step.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// `dt` exceeds the stability bound of the explicit scheme.
    NumericalInstability {
        /// The rejected step.
        dt: f64,
        /// Largest admissible step.
        dt_max: f64,
    },
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidTimeStep {
        /// The rejected step.
        dt: f64,
    },
    /// Non-finite or runaway values were found after a step.
    Diverged {
        /// The step that produced the value.
        iteration: Iteration,
        /// The first offending cell.
        coord: Coord,
        /// The offending value.
        value: f64,
    },
    /// The implicit solve ran out of relaxation sweeps.
    NotConverged {
        /// Sweeps performed.
        sweeps: u32,
        /// Max-norm residual of the last iterate.
        residual: f64,
    },
}

impl StepError {
    /// The taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NumericalInstability { .. } => ErrorKind::NumericalInstability,
            Self::InvalidTimeStep { .. } => ErrorKind::InvalidConfiguration,
            Self::Diverged { .. } => ErrorKind::DivergedSimulation,
            Self::NotConverged { .. } => ErrorKind::NotConverged,
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumericalInstability { dt, dt_max } => {
                write!(f, "dt {dt} exceeds stability bound {dt_max}")
            }
            Self::InvalidTimeStep { dt } => {
                write!(f, "dt must be finite and positive, got {dt}")
            }
            Self::Diverged {
                iteration,
                coord,
                value,
            } => {
                write!(
                    f,
                    "simulation diverged at iteration {iteration}: cell {coord:?} = {value}"
                )
            }
            Self::NotConverged { sweeps, residual } => {
                write!(
                    f,
                    "implicit solve did not converge after {sweeps} sweeps (residual {residual:e})"
                )
            }
        }
    }
}

impl Error for StepError {}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn grid_error_kinds() {
        let oob = GridError::IndexOutOfBounds {
            coord: smallvec![9],
            bounds: "[0, 5)".into(),
        };
        assert_eq!(oob.kind(), ErrorKind::IndexOutOfBounds);
        let mismatch = GridError::DimensionMismatch {
            expected: 5,
            actual: 4,
        };
        assert_eq!(mismatch.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn step_error_kinds() {
        let unstable = StepError::NumericalInstability {
            dt: 2.0,
            dt_max: 1.0,
        };
        assert_eq!(unstable.kind(), ErrorKind::NumericalInstability);
        let diverged = StepError::Diverged {
            iteration: Iteration(12),
            coord: smallvec![3],
            value: f64::INFINITY,
        };
        assert_eq!(diverged.kind(), ErrorKind::DivergedSimulation);
        assert_eq!(
            StepError::InvalidTimeStep { dt: -1.0 }.kind(),
            ErrorKind::InvalidConfiguration
        );
    }

    #[test]
    fn display_carries_context() {
        let err = StepError::Diverged {
            iteration: Iteration(12),
            coord: smallvec![1, 4],
            value: f64::NAN,
        };
        let msg = err.to_string();
        assert!(msg.contains("iteration 12"), "{msg}");
        assert!(msg.contains("[1, 4]"), "{msg}");

        let err = GridError::InvalidSpacing {
            axis: "dx",
            value: 0.0,
        };
        assert!(err.to_string().starts_with("dx must be"));
    }
}
