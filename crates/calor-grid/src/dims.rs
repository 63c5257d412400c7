//! Grid extents and cell spacing.

use calor_core::GridError;
use std::fmt;

/// Number of cells along each axis.
///
/// A line has `nx` cells. A plane has `ny` rows of `nx` columns, stored
/// row-major so cell `[row, col]` sits at `row * nx + col`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    nx: usize,
    ny: Option<usize>,
}

impl GridDims {
    /// Largest extent on any axis: coordinates are `i32`.
    pub const MAX_EXTENT: usize = i32::MAX as usize;

    /// A 1D line of `nx` cells.
    pub fn line(nx: usize) -> Self {
        Self { nx, ny: None }
    }

    /// A 2D plane of `ny` rows by `nx` columns.
    pub fn plane(nx: usize, ny: usize) -> Self {
        Self { nx, ny: Some(ny) }
    }

    /// Cells along x (columns).
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Cells along y (rows), or `None` for a line.
    pub fn ny(&self) -> Option<usize> {
        self.ny
    }

    /// Number of rows: `ny` on a plane, 1 on a line.
    pub fn rows(&self) -> usize {
        self.ny.unwrap_or(1)
    }

    /// Number of spatial dimensions (1 or 2).
    pub fn ndim(&self) -> usize {
        if self.ny.is_some() {
            2
        } else {
            1
        }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.nx.saturating_mul(self.rows())
    }

    /// Check every extent is in `[1, MAX_EXTENT]`.
    pub fn validate(&self) -> Result<(), GridError> {
        check_extent("nx", self.nx)?;
        if let Some(ny) = self.ny {
            check_extent("ny", ny)?;
        }
        Ok(())
    }
}

fn check_extent(axis: &'static str, value: usize) -> Result<(), GridError> {
    if value == 0 || value > GridDims::MAX_EXTENT {
        return Err(GridError::InvalidDimension { axis, value });
    }
    Ok(())
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ny {
            None => write!(f, "{}", self.nx),
            Some(ny) => write!(f, "{}x{}", ny, self.nx),
        }
    }
}

/// Physical distance between adjacent cell centres.
///
/// `dy` is only consulted on 2D grids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
    /// Spacing along x.
    pub dx: f64,
    /// Spacing along y.
    pub dy: f64,
}

impl Spacing {
    /// Square cells of side `h`.
    pub fn uniform(h: f64) -> Self {
        Self { dx: h, dy: h }
    }

    /// Rectangular cells.
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Length (1D) or area (2D) of one cell.
    pub fn cell_measure(&self, dims: &GridDims) -> f64 {
        match dims.ndim() {
            1 => self.dx,
            _ => self.dx * self.dy,
        }
    }

    /// Check the spacings used by `dims` are finite and positive.
    pub fn validate(&self, dims: &GridDims) -> Result<(), GridError> {
        check_spacing("dx", self.dx)?;
        if dims.ndim() == 2 {
            check_spacing("dy", self.dy)?;
        }
        Ok(())
    }
}

fn check_spacing(axis: &'static str, value: f64) -> Result<(), GridError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GridError::InvalidSpacing { axis, value });
    }
    Ok(())
}
