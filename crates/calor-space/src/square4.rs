//! 2D square grid with 4-connected neighbourhood (N/S/W/E).

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use crate::grid2d;
use crate::space::Space;
use calor_core::Coord;
use smallvec::{smallvec, SmallVec};

/// A two-dimensional square grid with 4-connected neighbourhood.
///
/// Each cell has coordinate `[row, col]` where `0 <= row < rows` and
/// `0 <= col < cols`. Rows run along y and columns along x; the flat
/// index is `row * cols + col`.
///
/// Boundary handling is controlled by [`EdgeBehavior`]:
/// - **Absorb**: edge cells have fewer neighbours (corners have 2, edges have 3)
/// - **Wrap**: periodic boundary (torus topology)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Square4 {
    rows: u32,
    cols: u32,
    edge: EdgeBehavior,
}

impl Square4 {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a new 2D grid with `rows * cols` cells and the given edge behavior.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds `i32::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use calor_space::{Square4, EdgeBehavior, Space};
    ///
    /// let grid = Square4::new(16, 16, EdgeBehavior::Absorb).unwrap();
    /// assert_eq!(grid.cell_count(), 256);
    /// assert_eq!(grid.ndim(), 2);
    /// ```
    pub fn new(rows: u32, cols: u32, edge: EdgeBehavior) -> Result<Self, SpaceError> {
        if rows == 0 || cols == 0 {
            return Err(SpaceError::EmptySpace);
        }
        if rows > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "rows",
                value: rows,
                max: Self::MAX_DIM,
            });
        }
        if cols > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "cols",
                value: cols,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self { rows, cols, edge })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }
}

impl Space for Square4 {
    fn ndim(&self) -> usize {
        2
    }

    fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }

    fn neighbours(&self, coord: &Coord) -> SmallVec<[Coord; 4]> {
        let r = coord[0];
        let c = coord[1];
        let offsets: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        let mut result = SmallVec::new();
        for (dr, dc) in offsets {
            let nr = grid2d::resolve_axis(r + dr, self.rows, self.edge);
            let nc = grid2d::resolve_axis(c + dc, self.cols, self.edge);
            if let (Some(nr), Some(nc)) = (nr, nc) {
                result.push(smallvec![nr, nc]);
            }
        }
        result
    }

    fn check_bounds(&self, coord: &Coord) -> Result<usize, SpaceError> {
        let (r, c) = grid2d::check_2d_bounds(coord, self.rows, self.cols)?;
        Ok(r as usize * self.cols as usize + c as usize)
    }

    fn coord_at(&self, rank: usize) -> Option<Coord> {
        if rank >= self.cell_count() {
            return None;
        }
        let cols = self.cols as usize;
        Some(smallvec![(rank / cols) as i32, (rank % cols) as i32])
    }
}
