//! Execution context passed to a [`Scheme`](crate::Scheme) for one step.

use crate::boundary::BoundaryPolicy;
use crate::stencil::Stencil;
use rayon::prelude::*;

/// Read-only inputs for one time step.
///
/// `prev` is the frozen field at the start of the step. Schemes read
/// neighbours only from `prev` (or from their own scratch iterate), never
/// from the buffer they are writing, so every cell sees the same
/// snapshot.
pub struct StepContext<'a> {
    prev: &'a [f64],
    stencil: &'a Stencil,
    policy: &'a BoundaryPolicy,
    held: &'a [(usize, f64)],
    alpha: f64,
    dt: f64,
    parallel: bool,
}

impl<'a> StepContext<'a> {
    /// Construct a new step context.
    ///
    /// Typically called by the [`Stepper`](crate::Stepper); tests build
    /// one directly to drive a scheme.
    pub fn new(
        prev: &'a [f64],
        stencil: &'a Stencil,
        policy: &'a BoundaryPolicy,
        held: &'a [(usize, f64)],
        alpha: f64,
        dt: f64,
        parallel: bool,
    ) -> Self {
        Self {
            prev,
            stencil,
            policy,
            held,
            alpha,
            dt,
            parallel,
        }
    }

    /// Field at the start of the step.
    pub fn prev(&self) -> &[f64] {
        self.prev
    }

    /// The discrete Laplacian for this grid.
    pub fn stencil(&self) -> &Stencil {
        self.stencil
    }

    /// Boundary condition supplying ghost values.
    pub fn policy(&self) -> &BoundaryPolicy {
        self.policy
    }

    /// Thermal diffusivity.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Time step being taken.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Whether cell updates run on the rayon pool.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Evaluate `f(i)` for every cell and store it in `out[i]`.
    ///
    /// With `parallel` set, chunks from [`Stencil::chunk_len`] are
    /// processed on the rayon pool. `f` must only read shared data, so the
    /// result is identical either way. Returning from this call is the
    /// barrier: all chunks are complete.
    pub fn fill<F>(&self, out: &mut [f64], f: F)
    where
        F: Fn(usize) -> f64 + Sync,
    {
        let chunk = self.stencil.chunk_len().max(1);
        let kernel = |(k, cells): (usize, &mut [f64])| {
            let base = k * chunk;
            for (j, v) in cells.iter_mut().enumerate() {
                *v = f(base + j);
            }
        };
        if self.parallel {
            out.par_chunks_mut(chunk).enumerate().for_each(kernel);
        } else {
            out.chunks_mut(chunk).enumerate().for_each(kernel);
        }
    }

    /// Overwrite held cells with their fixed values.
    pub fn apply_held(&self, out: &mut [f64]) {
        for &(i, v) in self.held {
            out[i] = v;
        }
    }
}
