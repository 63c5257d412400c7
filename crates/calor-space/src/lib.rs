//! Lattice topologies for Calor simulations.
//!
//! This crate defines the [`Space`] trait, the neighbourhood abstraction
//! the grid and solver build on, along with the two fixed-topology
//! backends the simulator supports.
//!
//! # Backends
//!
//! - [`Line1D`]: 1D line, `[i]` coordinates
//! - [`Square4`]: 2D grid with 4-connected neighbourhood, `[row, col]` coordinates
//!
//! Both honour an [`EdgeBehavior`] that decides whether edge cells lose
//! neighbours ([`EdgeBehavior::Absorb`]) or wrap to the opposite side
//! ([`EdgeBehavior::Wrap`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
mod grid2d;
pub mod line1d;
pub mod space;
pub mod square4;

#[cfg(test)]
pub(crate) mod compliance;

pub use edge::EdgeBehavior;
pub use error::SpaceError;
pub use line1d::Line1D;
pub use space::Space;
pub use square4::Square4;
