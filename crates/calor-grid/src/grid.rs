//! The temperature field.

use crate::buffer::PingPong;
use crate::dims::{GridDims, Spacing};
use crate::init::InitialField;
use calor_core::{Coord, GridError};
use calor_space::{EdgeBehavior, Line1D, Space, SpaceError, Square4};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// A dense 1D or 2D temperature field.
///
/// All cell values are finite and the dimensions never change after
/// construction. Direct access with an out-of-range coordinate fails with
/// [`GridError::IndexOutOfBounds`]; coordinates are never clamped.
///
/// # Examples
///
/// ```
/// use calor_grid::{Grid, GridDims, InitialField, Spacing};
/// use calor_space::EdgeBehavior;
///
/// let mut grid = Grid::new(
///     GridDims::line(5),
///     Spacing::uniform(1.0),
///     EdgeBehavior::Absorb,
///     &InitialField::Uniform(0.0),
/// )
/// .unwrap();
/// let centre: calor_core::Coord = vec![2i32].into();
/// grid.set(&centre, 100.0).unwrap();
/// assert_eq!(grid.get(&centre).unwrap(), 100.0);
///
/// let edge: calor_core::Coord = vec![0i32].into();
/// assert_eq!(grid.neighbors(&edge).unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct Grid {
    dims: GridDims,
    spacing: Spacing,
    space: Arc<dyn Space>,
    buffers: PingPong,
}

impl Grid {
    /// Build a grid and fill it from `init`.
    ///
    /// Fails if an extent is zero, a spacing is non-positive, explicit
    /// initial values have the wrong length, or any initial value is
    /// non-finite.
    pub fn new(
        dims: GridDims,
        spacing: Spacing,
        edge: EdgeBehavior,
        init: &InitialField,
    ) -> Result<Self, GridError> {
        dims.validate()?;
        spacing.validate(&dims)?;
        let space: Arc<dyn Space> = match dims.ny() {
            None => Arc::new(Line1D::new(dims.nx() as u32, edge).map_err(map_space_error)?),
            Some(ny) => Arc::new(
                Square4::new(ny as u32, dims.nx() as u32, edge).map_err(map_space_error)?,
            ),
        };
        let values = init.materialize(dims.cell_count())?;
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(GridError::NonFiniteValue {
                coord: space.coord_at(i).unwrap_or_default(),
                value: values[i],
            });
        }
        Ok(Self {
            dims,
            spacing,
            space,
            buffers: PingPong::new(values),
        })
    }

    /// Grid extents.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Cell spacing.
    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Number of spatial dimensions.
    pub fn ndim(&self) -> usize {
        self.dims.ndim()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the lattice wraps at its edges.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.space.edge_behavior()
    }

    /// The underlying lattice topology.
    pub fn space(&self) -> &dyn Space {
        self.space.as_ref()
    }

    /// Flat row-major index of `coord`.
    pub fn index_of(&self, coord: &Coord) -> Result<usize, GridError> {
        self.space.check_bounds(coord).map_err(map_space_error)
    }

    /// Coordinate of a flat index, or `None` past the end.
    pub fn coord_of(&self, index: usize) -> Option<Coord> {
        self.space.coord_at(index)
    }

    /// Temperature at `coord`.
    pub fn get(&self, coord: &Coord) -> Result<f64, GridError> {
        let i = self.index_of(coord)?;
        Ok(self.buffers.front()[i])
    }

    /// Overwrite the temperature at `coord`.
    ///
    /// Rejects non-finite values. Touches no other cell.
    pub fn set(&mut self, coord: &Coord, value: f64) -> Result<(), GridError> {
        let i = self.index_of(coord)?;
        if !value.is_finite() {
            return Err(GridError::NonFiniteValue {
                coord: coord.clone(),
                value,
            });
        }
        self.buffers.front_mut()[i] = value;
        Ok(())
    }

    /// Adjacent cells of `coord`, lower neighbour first on each axis.
    ///
    /// Two entries per axis for interior cells, fewer at an absorbing edge.
    pub fn neighbors(&self, coord: &Coord) -> Result<SmallVec<[Coord; 4]>, GridError> {
        self.index_of(coord)?;
        Ok(self.space.neighbours(coord))
    }

    /// The current field in row-major order.
    pub fn values(&self) -> &[f64] {
        self.buffers.front()
    }

    /// Sum of temperature times cell length or area.
    pub fn total_energy(&self) -> f64 {
        let measure = self.spacing.cell_measure(&self.dims);
        self.values().iter().sum::<f64>() * measure
    }

    /// Largest absolute temperature in the field.
    pub fn max_abs(&self) -> f64 {
        self.values().iter().fold(0.0, |m, v| m.max(v.abs()))
    }

    /// Borrow `(current, next)` buffers for one stencil pass.
    pub fn stage(&mut self) -> (&[f64], &mut [f64]) {
        self.buffers.stage()
    }

    /// Make the buffer written by the last [`stage`](Self::stage) current.
    pub fn publish(&mut self) {
        self.buffers.publish();
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("dims", &self.dims)
            .field("spacing", &self.spacing)
            .field("edge", &self.space.edge_behavior())
            .field("generation", &self.buffers.generation())
            .finish()
    }
}

fn map_space_error(err: SpaceError) -> GridError {
    match err {
        SpaceError::CoordOutOfBounds { coord, bounds } => {
            GridError::IndexOutOfBounds { coord, bounds }
        }
        SpaceError::EmptySpace => GridError::InvalidDimension {
            axis: "nx",
            value: 0,
        },
        SpaceError::DimensionTooLarge { name, value, .. } => GridError::InvalidDimension {
            axis: if name == "rows" { "ny" } else { "nx" },
            value: value as usize,
        },
    }
}
