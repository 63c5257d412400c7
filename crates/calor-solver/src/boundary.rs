//! Boundary conditions.
//!
//! The stencil never reads outside the field. Where a neighbour would lie
//! beyond an edge it asks the [`BoundaryPolicy`] for a ghost value instead.

use crate::stencil::Layout;
use calor_space::EdgeBehavior;
use std::fmt;

/// One side of the domain.
///
/// x runs along columns, y along rows. A 1D grid only has x edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Column 0.
    XMin,
    /// Column `nx - 1`.
    XMax,
    /// Row 0.
    YMin,
    /// Row `ny - 1`.
    YMax,
}

/// Fixed temperature per edge for [`BoundaryPolicy::Dirichlet`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeValues {
    /// Value beyond column 0.
    pub x_min: f64,
    /// Value beyond the last column.
    pub x_max: f64,
    /// Value beyond row 0.
    pub y_min: f64,
    /// Value beyond the last row.
    pub y_max: f64,
}

impl EdgeValues {
    /// The same value on every edge.
    pub fn uniform(value: f64) -> Self {
        Self {
            x_min: value,
            x_max: value,
            y_min: value,
            y_max: value,
        }
    }

    /// The value held beyond `edge`.
    pub fn get(&self, edge: Edge) -> f64 {
        match edge {
            Edge::XMin => self.x_min,
            Edge::XMax => self.x_max,
            Edge::YMin => self.y_min,
            Edge::YMax => self.y_max,
        }
    }

    /// The first edge whose value is NaN or infinite.
    pub fn first_non_finite(&self) -> Option<(Edge, f64)> {
        [Edge::XMin, Edge::XMax, Edge::YMin, Edge::YMax]
            .into_iter()
            .map(|e| (e, self.get(e)))
            .find(|(_, v)| !v.is_finite())
    }
}

/// How cells on the domain edge see the outside world.
///
/// Fixed for the whole run and consulted for every boundary cell on every
/// step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryPolicy {
    /// Fixed temperature beyond each edge.
    Dirichlet(EdgeValues),
    /// Insulated: zero heat flux across the edge.
    ///
    /// Face-centred mirror: the ghost cell takes the boundary cell's own
    /// value, not the nearest interior neighbour's. The gradient across the
    /// edge face is zero and total energy is conserved up to rounding.
    Neumann,
    /// The domain wraps; each edge sees the opposite one.
    Periodic,
}

impl BoundaryPolicy {
    /// Lattice topology matching this policy.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        match self {
            Self::Periodic => EdgeBehavior::Wrap,
            Self::Dirichlet(_) | Self::Neumann => EdgeBehavior::Absorb,
        }
    }

    /// Value of the ghost cell just beyond `edge`, next to boundary cell
    /// `(row, col)`.
    ///
    /// - Dirichlet: the edge's constant
    /// - Neumann: the boundary cell itself, so the face gradient is zero
    /// - Periodic: the cell on the opposite side of the same row or column
    pub fn ghost_value(
        &self,
        edge: Edge,
        row: usize,
        col: usize,
        field: &[f64],
        layout: &Layout,
    ) -> f64 {
        match self {
            Self::Dirichlet(values) => values.get(edge),
            Self::Neumann => field[layout.index(row, col)],
            Self::Periodic => {
                let (r, c) = match edge {
                    Edge::XMin => (row, layout.nx - 1),
                    Edge::XMax => (row, 0),
                    Edge::YMin => (layout.rows - 1, col),
                    Edge::YMax => (0, col),
                };
                field[layout.index(r, c)]
            }
        }
    }

    /// Largest magnitude a Dirichlet edge imposes, 0 otherwise.
    pub fn max_abs(&self) -> f64 {
        match self {
            Self::Dirichlet(v) => v
                .x_min
                .abs()
                .max(v.x_max.abs())
                .max(v.y_min.abs())
                .max(v.y_max.abs()),
            Self::Neumann | Self::Periodic => 0.0,
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dirichlet(_) => f.write_str("dirichlet"),
            Self::Neumann => f.write_str("neumann"),
            Self::Periodic => f.write_str("periodic"),
        }
    }
}
