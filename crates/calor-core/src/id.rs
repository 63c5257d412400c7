//! Strongly-typed identifiers and the [`Coord`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Monotonically increasing step counter.
///
/// `Iteration(0)` is the initial condition; each completed time step
/// advances the counter by one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iteration(pub u64);

impl Iteration {
    /// The counter after one more step.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Iteration {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A cell coordinate on the grid.
///
/// `[i]` on a 1D line, `[row, col]` on a 2D plane. Uses
/// `SmallVec<[i32; 4]>` so coordinates never touch the heap.
pub type Coord = SmallVec<[i32; 4]>;
