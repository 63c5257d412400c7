//! The core `Space` trait.

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use calor_core::Coord;
use smallvec::SmallVec;

/// Neighbourhood abstraction for Calor lattices.
///
/// The grid answers `neighbors()` queries and translates between
/// coordinates and flat indices through this trait. Concrete backends
/// ([`Line1D`](crate::Line1D), [`Square4`](crate::Square4)) define the
/// topology.
///
/// # Thread Safety
///
/// `Sync` is required because the row-parallel stepper shares the grid
/// (and therefore its space) across rayon workers.
pub trait Space: Send + Sync + 'static {
    /// Number of spatial dimensions.
    fn ndim(&self) -> usize;

    /// Total number of cells in the space.
    fn cell_count(&self) -> usize;

    /// Edge topology of this space.
    fn edge_behavior(&self) -> EdgeBehavior;

    /// Enumerate the neighbours of a cell.
    ///
    /// Returns coordinates in a deterministic, backend-defined order:
    /// the lower neighbour before the upper one, axis by axis. The
    /// caller guarantees `coord` is in bounds.
    fn neighbours(&self, coord: &Coord) -> SmallVec<[Coord; 4]>;

    /// Flat row-major index of an in-bounds coordinate.
    ///
    /// Fails with [`SpaceError::CoordOutOfBounds`] for coordinates outside
    /// the space or with the wrong number of axes.
    fn check_bounds(&self, coord: &Coord) -> Result<usize, SpaceError>;

    /// Coordinate at a flat row-major index, or `None` past the end.
    fn coord_at(&self, rank: usize) -> Option<Coord>;

    /// All cells in row-major order.
    ///
    /// Two calls on the same space must return the same sequence.
    fn canonical_ordering(&self) -> Vec<Coord> {
        (0..self.cell_count()).filter_map(|r| self.coord_at(r)).collect()
    }

    /// Position of a coordinate in the canonical ordering.
    fn canonical_rank(&self, coord: &Coord) -> Option<usize> {
        self.check_bounds(coord).ok()
    }
}
