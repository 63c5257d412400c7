//! Finite-difference Laplacian with ghost-cell boundaries.

use crate::boundary::{BoundaryPolicy, Edge};
use calor_grid::{face_conductance, GridDims, Spacing};

/// Row-major field shape: `rows` rows of `nx` cells.
///
/// A 1D grid is a single row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Cells per row.
    pub nx: usize,
    /// Number of rows.
    pub rows: usize,
}

impl Layout {
    /// Flat index of `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.nx + col
    }

    /// `(row, col)` of a flat index.
    #[inline]
    pub fn split(&self, index: usize) -> (usize, usize) {
        (index / self.nx, index % self.nx)
    }

    /// Total cell count.
    pub fn len(&self) -> usize {
        self.nx * self.rows
    }

    /// Always `false` for a validated grid.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The four values around a cell, ghosts substituted at edges.
///
/// Also used for the four face conductances around a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbours {
    /// Left (`col - 1`).
    pub x_lo: f64,
    /// Right (`col + 1`).
    pub x_hi: f64,
    /// Up (`row - 1`). Unused on a 1D grid.
    pub y_lo: f64,
    /// Down (`row + 1`). Unused on a 1D grid.
    pub y_hi: f64,
}

/// 3-point (1D) or 5-point (2D) discrete Laplacian.
///
/// ```text
/// L(u)[i] = (u[i-1] - 2u[i] + u[i+1]) / dx^2            (1D)
///         + (u[i-nx] - 2u[i] + u[i+nx]) / dy^2          (2D only)
/// ```
///
/// With per-cell conductivity `k` each face term is weighted by the
/// harmonic mean of the two cells' factors:
///
/// ```text
/// L(u)[i] = sum over faces f of  w_f * (u_f - u[i]) / h_f^2
/// ```
///
/// A face towards a ghost cell uses `k[i]`; a periodic face uses the
/// wrapped neighbour's factor.
#[derive(Clone, Debug, PartialEq)]
pub struct Stencil {
    layout: Layout,
    two_d: bool,
    inv_dx2: f64,
    inv_dy2: f64,
    conductivity: Option<Vec<f64>>,
}

impl Stencil {
    /// Build the stencil for a grid shape and spacing.
    pub fn new(dims: GridDims, spacing: Spacing) -> Self {
        let two_d = dims.ndim() == 2;
        Self {
            layout: Layout {
                nx: dims.nx(),
                rows: dims.rows(),
            },
            two_d,
            inv_dx2: 1.0 / (spacing.dx * spacing.dx),
            inv_dy2: if two_d {
                1.0 / (spacing.dy * spacing.dy)
            } else {
                0.0
            },
            conductivity: None,
        }
    }

    /// Weight faces by per-cell conductivity factors.
    ///
    /// `factors` must hold one finite, positive value per cell.
    pub fn with_conductivity(mut self, factors: Vec<f64>) -> Self {
        self.conductivity = Some(factors);
        self
    }

    /// Per-cell conductivity factors, if any.
    pub fn conductivity(&self) -> Option<&[f64]> {
        self.conductivity.as_deref()
    }

    /// Field shape.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Values around `(row, col)`, taken from `field` or from `policy` at
    /// the edges.
    pub fn neighbours(
        &self,
        field: &[f64],
        row: usize,
        col: usize,
        policy: &BoundaryPolicy,
    ) -> Neighbours {
        let l = &self.layout;
        let x_lo = if col > 0 {
            field[l.index(row, col - 1)]
        } else {
            policy.ghost_value(Edge::XMin, row, col, field, l)
        };
        let x_hi = if col + 1 < l.nx {
            field[l.index(row, col + 1)]
        } else {
            policy.ghost_value(Edge::XMax, row, col, field, l)
        };
        let (y_lo, y_hi) = if self.two_d {
            let lo = if row > 0 {
                field[l.index(row - 1, col)]
            } else {
                policy.ghost_value(Edge::YMin, row, col, field, l)
            };
            let hi = if row + 1 < l.rows {
                field[l.index(row + 1, col)]
            } else {
                policy.ghost_value(Edge::YMax, row, col, field, l)
            };
            (lo, hi)
        } else {
            (0.0, 0.0)
        };
        Neighbours {
            x_lo,
            x_hi,
            y_lo,
            y_hi,
        }
    }

    /// Conductances of the four faces around `(row, col)`, or `None` on a
    /// uniform grid.
    fn face_weights(&self, row: usize, col: usize, policy: &BoundaryPolicy) -> Option<Neighbours> {
        let k = self.conductivity.as_deref()?;
        let l = &self.layout;
        let ki = k[l.index(row, col)];
        let wrap = matches!(policy, BoundaryPolicy::Periodic);
        let face = |inside: bool, wrapped: usize, near: usize| {
            if inside {
                face_conductance(ki, k[near])
            } else if wrap {
                face_conductance(ki, k[wrapped])
            } else {
                ki
            }
        };
        let x_lo = face(col > 0, l.index(row, l.nx - 1), l.index(row, col.saturating_sub(1)));
        let x_hi = face(col + 1 < l.nx, l.index(row, 0), l.index(row, (col + 1).min(l.nx - 1)));
        let (y_lo, y_hi) = if self.two_d {
            (
                face(row > 0, l.index(l.rows - 1, col), l.index(row.saturating_sub(1), col)),
                face(
                    row + 1 < l.rows,
                    l.index(0, col),
                    l.index((row + 1).min(l.rows - 1), col),
                ),
            )
        } else {
            (0.0, 0.0)
        };
        Some(Neighbours {
            x_lo,
            x_hi,
            y_lo,
            y_hi,
        })
    }

    /// Discrete Laplacian of `field` at flat index `i`.
    #[inline]
    pub fn laplacian(&self, field: &[f64], i: usize, policy: &BoundaryPolicy) -> f64 {
        let (row, col) = self.layout.split(i);
        let n = self.neighbours(field, row, col, policy);
        let u = field[i];
        let Some(w) = self.face_weights(row, col, policy) else {
            let mut lap = (n.x_lo - 2.0 * u + n.x_hi) * self.inv_dx2;
            if self.two_d {
                lap += (n.y_lo - 2.0 * u + n.y_hi) * self.inv_dy2;
            }
            return lap;
        };
        let mut lap = (w.x_lo * (n.x_lo - u) + w.x_hi * (n.x_hi - u)) * self.inv_dx2;
        if self.two_d {
            lap += (w.y_lo * (n.y_lo - u) + w.y_hi * (n.y_hi - u)) * self.inv_dy2;
        }
        lap
    }

    /// Weighted neighbour sum `sum(w_f * u_f / h_f^2)`: the off-diagonal
    /// part of the Laplacian.
    #[inline]
    pub fn coupling(&self, field: &[f64], i: usize, policy: &BoundaryPolicy) -> f64 {
        let (row, col) = self.layout.split(i);
        let n = self.neighbours(field, row, col, policy);
        let w = self.face_weights(row, col, policy).unwrap_or(Neighbours {
            x_lo: 1.0,
            x_hi: 1.0,
            y_lo: 1.0,
            y_hi: 1.0,
        });
        let mut sum = (w.x_lo * n.x_lo + w.x_hi * n.x_hi) * self.inv_dx2;
        if self.two_d {
            sum += (w.y_lo * n.y_lo + w.y_hi * n.y_hi) * self.inv_dy2;
        }
        sum
    }

    /// Magnitude of the Laplacian's diagonal on a uniform grid:
    /// `2/dx^2 (+ 2/dy^2)`.
    pub fn diagonal(&self) -> f64 {
        2.0 * (self.inv_dx2 + self.inv_dy2)
    }

    /// Magnitude of the Laplacian's diagonal at flat index `i`: the sum of
    /// the cell's face conductances over `h^2`.
    #[inline]
    pub fn diagonal_at(&self, i: usize, policy: &BoundaryPolicy) -> f64 {
        let (row, col) = self.layout.split(i);
        match self.face_weights(row, col, policy) {
            None => self.diagonal(),
            Some(w) => {
                let mut d = (w.x_lo + w.x_hi) * self.inv_dx2;
                if self.two_d {
                    d += (w.y_lo + w.y_hi) * self.inv_dy2;
                }
                d
            }
        }
    }

    /// Work unit for the row-parallel update: one row in 2D, a fixed
    /// block of cells in 1D.
    pub fn chunk_len(&self) -> usize {
        const LINE_BLOCK: usize = 1024;
        if self.two_d {
            self.layout.nx
        } else {
            self.layout.nx.min(LINE_BLOCK)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::EdgeValues;

    #[test]
    fn laplacian_1d_interior() {
        let s = Stencil::new(GridDims::line(5), Spacing::uniform(1.0));
        let field = [0.0, 0.0, 100.0, 0.0, 0.0];
        let p = BoundaryPolicy::Dirichlet(EdgeValues::uniform(0.0));
        assert_eq!(s.laplacian(&field, 2, &p), -200.0);
        assert_eq!(s.laplacian(&field, 1, &p), 100.0);
        assert_eq!(s.laplacian(&field, 0, &p), 0.0);
    }

    #[test]
    fn laplacian_2d_uses_both_spacings() {
        let s = Stencil::new(GridDims::plane(3, 3), Spacing::new(1.0, 2.0));
        let mut field = [0.0; 9];
        field[4] = 8.0;
        let p = BoundaryPolicy::Neumann;
        // x: (0 - 16 + 0) / 1, y: (0 - 16 + 0) / 4
        assert_eq!(s.laplacian(&field, 4, &p), -16.0 - 4.0);
        assert_eq!(s.diagonal(), 2.0 + 0.5);
    }

    #[test]
    fn neumann_edge_has_zero_face_gradient() {
        let s = Stencil::new(GridDims::line(3), Spacing::uniform(1.0));
        let field = [5.0, 5.0, 5.0];
        assert_eq!(s.laplacian(&field, 0, &BoundaryPolicy::Neumann), 0.0);
        assert_eq!(s.laplacian(&field, 2, &BoundaryPolicy::Neumann), 0.0);
    }

    #[test]
    fn periodic_corner_wraps_both_axes() {
        let s = Stencil::new(GridDims::plane(2, 2), Spacing::uniform(1.0));
        // 1 2
        // 3 4
        let field = [1.0, 2.0, 3.0, 4.0];
        let n = s.neighbours(&field, 0, 0, &BoundaryPolicy::Periodic);
        assert_eq!(
            n,
            Neighbours {
                x_lo: 2.0,
                x_hi: 2.0,
                y_lo: 3.0,
                y_hi: 3.0
            }
        );
    }

    #[test]
    fn coupling_plus_diagonal_is_laplacian() {
        let s = Stencil::new(GridDims::plane(4, 3), Spacing::new(0.5, 0.25));
        let field: Vec<f64> = (0..12).map(|i| (i * i) as f64).collect();
        let p = BoundaryPolicy::Dirichlet(EdgeValues::uniform(3.0));
        for i in 0..12 {
            let lhs = s.laplacian(&field, i, &p);
            let rhs = s.coupling(&field, i, &p) - s.diagonal() * field[i];
            assert!((lhs - rhs).abs() < 1e-9, "cell {i}: {lhs} vs {rhs}");
        }
    }

    #[test]
    fn unit_conductivity_matches_uniform_stencil() {
        let plain = Stencil::new(GridDims::plane(4, 3), Spacing::new(0.5, 0.25));
        let weighted = plain.clone().with_conductivity(vec![1.0; 12]);
        let field: Vec<f64> = (0..12).map(|i| (i as f64).sin() * 10.0).collect();
        for p in [
            BoundaryPolicy::Dirichlet(EdgeValues::uniform(2.0)),
            BoundaryPolicy::Neumann,
            BoundaryPolicy::Periodic,
        ] {
            for i in 0..12 {
                let a = plain.laplacian(&field, i, &p);
                let b = weighted.laplacian(&field, i, &p);
                assert!((a - b).abs() < 1e-9, "cell {i}: {a} vs {b}");
                assert_eq!(weighted.diagonal_at(i, &p), plain.diagonal());
            }
        }
    }

    #[test]
    fn faces_use_harmonic_mean() {
        // k = [1, 3, 1]; faces 0|1 and 1|2 conduct at 1.5.
        let s = Stencil::new(GridDims::line(3), Spacing::uniform(1.0))
            .with_conductivity(vec![1.0, 3.0, 1.0]);
        let field = [0.0, 10.0, 0.0];
        let p = BoundaryPolicy::Dirichlet(EdgeValues::uniform(0.0));
        assert_eq!(s.laplacian(&field, 1, &p), -30.0);
        assert_eq!(s.laplacian(&field, 0, &p), 15.0);
        // Ghost face of cell 0 uses k[0].
        assert_eq!(s.diagonal_at(0, &p), 1.0 + 1.5);
        assert_eq!(s.diagonal_at(1, &p), 3.0);
    }

    #[test]
    fn weighted_coupling_plus_diagonal_is_laplacian() {
        let k: Vec<f64> = (0..12).map(|i| 0.5 + (i % 5) as f64 * 0.3).collect();
        let s = Stencil::new(GridDims::plane(4, 3), Spacing::new(0.5, 0.25)).with_conductivity(k);
        let field: Vec<f64> = (0..12).map(|i| (i * i) as f64).collect();
        for p in [
            BoundaryPolicy::Dirichlet(EdgeValues::uniform(3.0)),
            BoundaryPolicy::Neumann,
            BoundaryPolicy::Periodic,
        ] {
            for i in 0..12 {
                let lhs = s.laplacian(&field, i, &p);
                let rhs = s.coupling(&field, i, &p) - s.diagonal_at(i, &p) * field[i];
                assert!((lhs - rhs).abs() < 1e-9, "cell {i}: {lhs} vs {rhs}");
            }
        }
    }

    #[test]
    fn chunk_len_is_row_in_2d() {
        assert_eq!(
            Stencil::new(GridDims::plane(7, 3), Spacing::uniform(1.0)).chunk_len(),
            7
        );
        assert_eq!(
            Stencil::new(GridDims::line(10), Spacing::uniform(1.0)).chunk_len(),
            10
        );
    }
}
