//! Core types for the Calor heat-propagation simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! coordinate and iteration identifiers shared by every other crate, and
//! the error taxonomy that the grid, solver, and engine report through.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;

pub use error::{ErrorKind, GridError, StepError};
pub use id::{Coord, Iteration};
