//! Numerical core of the Calor heat simulator.
//!
//! Advances a [`Grid`](calor_grid::Grid) by one time step of the heat
//! equation `du/dt = alpha * laplacian(u)`:
//!
//! - [`BoundaryPolicy`] supplies ghost values beyond the domain edges
//! - [`Stencil`] evaluates the 3-point (1D) or 5-point (2D) Laplacian
//! - [`Scheme`] implementations turn the Laplacian into a time advance:
//!   explicit [`ForwardEuler`] or implicit [`BackwardEuler`]
//! - [`StabilityController`] bounds the explicit step and detects
//!   divergence after each step
//! - [`Stepper`] ties them together over a [`SimulationState`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod context;
pub mod scheme;
pub mod stability;
pub mod state;
pub mod stencil;
pub mod stepper;

pub use boundary::{BoundaryPolicy, Edge, EdgeValues};
pub use context::StepContext;
pub use scheme::{BackwardEuler, ForwardEuler, Scheme};
pub use stability::StabilityController;
pub use state::SimulationState;
pub use stencil::{Layout, Stencil};
pub use stepper::{StepReport, Stepper};
