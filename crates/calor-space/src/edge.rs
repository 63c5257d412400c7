//! Spatial edge behavior for lattice backends.

/// How a lattice handles neighbours at its edges.
///
/// This controls *topology* only, i.e. which cells count as neighbours
/// of a boundary cell. The value a stencil substitutes for a missing
/// neighbour is decided by the solver's boundary policy.
///
/// # Examples
///
/// ```
/// use calor_space::{Square4, EdgeBehavior, Space};
///
/// // Absorb: corner has 2 neighbours, interior has 4.
/// let absorb = Square4::new(4, 4, EdgeBehavior::Absorb).unwrap();
/// let corner: calor_core::Coord = vec![0i32, 0].into();
/// let interior: calor_core::Coord = vec![1i32, 1].into();
/// assert_eq!(absorb.neighbours(&corner).len(), 2);
/// assert_eq!(absorb.neighbours(&interior).len(), 4);
///
/// // Wrap: all cells have exactly 4 neighbours (torus).
/// let wrap = Square4::new(4, 4, EdgeBehavior::Wrap).unwrap();
/// assert_eq!(wrap.neighbours(&corner).len(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds neighbour wraps to the opposite side (periodic).
    Wrap,
    /// Out-of-bounds neighbour is omitted (fewer neighbours at edges).
    Absorb,
}
