//! 1D line lattice with configurable edge behavior.

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use crate::space::Space;
use calor_core::Coord;
use smallvec::{smallvec, SmallVec};

/// A one-dimensional line lattice.
///
/// Each cell has coordinate `[i]` where `0 <= i < len`.
/// Boundary handling is controlled by [`EdgeBehavior`]:
/// - **Absorb**: edge cells have a single neighbour
/// - **Wrap**: periodic boundary (a ring)
///
/// # Examples
///
/// ```
/// use calor_space::{Line1D, EdgeBehavior, Space};
///
/// let line = Line1D::new(5, EdgeBehavior::Absorb).unwrap();
/// assert_eq!(line.len(), 5);
/// assert_eq!(line.cell_count(), 5);
/// assert_eq!(line.ndim(), 1);
///
/// // Interior cell has two neighbours.
/// let coord: calor_core::Coord = vec![2i32].into();
/// assert_eq!(line.neighbours(&coord).len(), 2);
///
/// // Edge cell (absorb) has only one neighbour.
/// let edge: calor_core::Coord = vec![0i32].into();
/// assert_eq!(line.neighbours(&edge).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line1D {
    len: u32,
    edge: EdgeBehavior,
}

impl Line1D {
    /// Maximum length: coordinates use `i32`, so `len` must fit.
    pub const MAX_LEN: u32 = i32::MAX as u32;

    /// Create a new 1D line with `len` cells and the given edge behavior.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if `len == 0`, or
    /// `Err(SpaceError::DimensionTooLarge)` if `len > i32::MAX`.
    pub fn new(len: u32, edge: EdgeBehavior) -> Result<Self, SpaceError> {
        if len == 0 {
            return Err(SpaceError::EmptySpace);
        }
        if len > Self::MAX_LEN {
            return Err(SpaceError::DimensionTooLarge {
                name: "len",
                value: len,
                max: Self::MAX_LEN,
            });
        }
        Ok(Self { len, edge })
    }

    /// Number of cells.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Always returns `false`: construction rejects `len == 0`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Space for Line1D {
    fn ndim(&self) -> usize {
        1
    }

    fn cell_count(&self) -> usize {
        self.len as usize
    }

    fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }

    fn neighbours(&self, coord: &Coord) -> SmallVec<[Coord; 4]> {
        let i = coord[0];
        let n = self.len as i32;
        match self.edge {
            EdgeBehavior::Absorb => {
                let mut result = SmallVec::new();
                if i > 0 {
                    result.push(smallvec![i - 1]);
                }
                if i < n - 1 {
                    result.push(smallvec![i + 1]);
                }
                result
            }
            EdgeBehavior::Wrap => {
                let left = (i - 1 + n) % n;
                let right = (i + 1) % n;
                smallvec![smallvec![left], smallvec![right]]
            }
        }
    }

    fn check_bounds(&self, coord: &Coord) -> Result<usize, SpaceError> {
        if coord.len() != 1 {
            return Err(SpaceError::CoordOutOfBounds {
                coord: coord.clone(),
                bounds: format!("expected 1D coordinate, got {}D", coord.len()),
            });
        }
        let i = coord[0];
        if i < 0 || i >= self.len as i32 {
            return Err(SpaceError::CoordOutOfBounds {
                coord: coord.clone(),
                bounds: format!("[0, {})", self.len),
            });
        }
        Ok(i as usize)
    }

    fn coord_at(&self, rank: usize) -> Option<Coord> {
        (rank < self.len as usize).then(|| smallvec![rank as i32])
    }
}
