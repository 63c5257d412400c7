//! Owned copies of the field handed to sinks.

use calor_core::Iteration;
use calor_grid::GridDims;
use calor_solver::SimulationState;

/// The field at one point in a run.
///
/// An owned copy: holding it never blocks the runner, and snapshots
/// emitted before a failure stay valid afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Steps completed when the snapshot was taken.
    pub iteration: Iteration,
    /// Simulated time when the snapshot was taken.
    pub elapsed_time: f64,
    /// Grid extents, for reshaping `field`.
    pub dims: GridDims,
    /// Temperatures in row-major order.
    pub field: Vec<f64>,
}

impl Snapshot {
    /// Copy the current state.
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            iteration: state.iteration(),
            elapsed_time: state.elapsed(),
            dims: state.grid().dims(),
            field: state.grid().values().to_vec(),
        }
    }

    /// Rows of the field (one row for a 1D grid).
    pub fn rows(&self) -> std::slice::Chunks<'_, f64> {
        self.field.chunks(self.dims.nx().max(1))
    }

    /// Smallest temperature.
    pub fn min(&self) -> f64 {
        self.field.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest temperature.
    pub fn max(&self) -> f64 {
        self.field.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean temperature.
    pub fn mean(&self) -> f64 {
        if self.field.is_empty() {
            return 0.0;
        }
        self.field.iter().sum::<f64>() / self.field.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap() -> Snapshot {
        Snapshot {
            iteration: Iteration(3),
            elapsed_time: 1.5,
            dims: GridDims::plane(3, 2),
            field: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        }
    }

    #[test]
    fn rows_split_by_nx() {
        let s = snap();
        let rows: Vec<&[f64]> = s.rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0, 3.0][..], &[4.0, 5.0, 6.0][..]]);
    }

    #[test]
    fn summary_statistics() {
        let s = snap();
        assert_eq!(s.min(), 1.0);
        assert_eq!(s.max(), 6.0);
        assert_eq!(s.mean(), 3.5);
    }
}
