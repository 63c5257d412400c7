//! Temperature field storage for Calor simulations.
//!
//! A [`Grid`] owns the discretized temperature field together with its
//! geometry ([`GridDims`], [`Spacing`]) and the lattice topology that
//! answers neighbour queries. The field lives in a [`PingPong`] double
//! buffer so a time step can read the previous field while writing the
//! next one.
//!
//! Initial conditions are described by [`InitialField`], and per-cell
//! conductivity by [`Conductivity`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod dims;
pub mod grid;
pub mod init;
pub mod material;

pub use buffer::PingPong;
pub use dims::{GridDims, Spacing};
pub use grid::Grid;
pub use init::InitialField;
pub use material::{face_conductance, Conductivity, ALLOY_CONSTANTS};
