//! Time-integration schemes.
//!
//! A [`Scheme`] turns the discrete Laplacian into one time advance. Two
//! are provided:
//!
//! - [`ForwardEuler`]: explicit FTCS, cheap but bounded by
//!   [`StabilityController::suggest`]
//! - [`BackwardEuler`]: implicit, unconditionally stable, solved with
//!   Jacobi relaxation sweeps

use crate::context::StepContext;
use crate::stability::StabilityController;
use calor_core::StepError;

/// A time-integration scheme for the heat equation.
///
/// # Contract
///
/// - `advance()` fills every cell of `next` from `ctx.prev()` and writes
///   held cells before returning.
/// - `advance()` must be deterministic: same inputs, identical outputs,
///   whether or not `ctx.parallel()` is set.
/// - On error, `next` may hold garbage; the caller discards it.
///
/// # Object safety
///
/// This trait is object-safe; the stepper stores `Box<dyn Scheme>`.
pub trait Scheme: Send + 'static {
    /// Short name for reports (`"explicit"`, `"implicit"`).
    fn name(&self) -> &str;

    /// Largest admissible time step, or `None` when unconditionally
    /// stable.
    fn max_dt(&self, controller: &StabilityController) -> Option<f64>;

    /// Compute the field one step after `ctx.prev()` into `next`.
    ///
    /// Returns the number of solver iterations used (1 for explicit
    /// schemes).
    fn advance(&mut self, ctx: &StepContext<'_>, next: &mut [f64]) -> Result<u32, StepError>;
}

/// Explicit forward-time, centred-space scheme.
///
/// ```text
/// next[i] = prev[i] + alpha * dt * L(prev)[i]
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForwardEuler;

impl Scheme for ForwardEuler {
    fn name(&self) -> &str {
        "explicit"
    }

    fn max_dt(&self, controller: &StabilityController) -> Option<f64> {
        Some(controller.suggest())
    }

    fn advance(&mut self, ctx: &StepContext<'_>, next: &mut [f64]) -> Result<u32, StepError> {
        let prev = ctx.prev();
        let stencil = ctx.stencil();
        let policy = ctx.policy();
        let r = ctx.alpha() * ctx.dt();
        ctx.fill(next, |i| prev[i] + r * stencil.laplacian(prev, i, policy));
        ctx.apply_held(next);
        Ok(1)
    }
}

/// Implicit backward-Euler scheme.
///
/// Solves `(I - alpha * dt * L) next = prev` by Jacobi relaxation:
///
/// ```text
/// x'[i] = (prev[i] + alpha * dt * coupling(x)[i]) / (1 + alpha * dt * diag[i])
/// ```
///
/// starting from `x = prev`, with ghost values taken from the current
/// iterate.
///
/// # Convergence
///
/// A sweep also yields the true residual of the iterate it started from:
///
/// ```text
/// |(I - alpha * dt * L) x - prev|[i] = (1 + alpha * dt * diag[i]) * |x'[i] - x[i]|
/// ```
///
/// The solve stops once the max-norm of that residual is at most
/// `tolerance * max(1, max|prev|)`, and returns the iterate it measured.
/// Held cells are excluded; they are pinned, not solved for.
#[derive(Clone, Debug, PartialEq)]
pub struct BackwardEuler {
    tolerance: f64,
    max_sweeps: u32,
    iterate: Vec<f64>,
}

impl BackwardEuler {
    /// Default convergence tolerance, relative to the field magnitude.
    pub const DEFAULT_TOLERANCE: f64 = 1e-10;

    /// Default sweep budget per step.
    pub const DEFAULT_MAX_SWEEPS: u32 = 10_000;

    /// Scheme with explicit convergence settings.
    pub fn new(tolerance: f64, max_sweeps: u32) -> Self {
        Self {
            tolerance,
            max_sweeps,
            iterate: Vec::new(),
        }
    }

    /// Convergence tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Sweep budget per step.
    pub fn max_sweeps(&self) -> u32 {
        self.max_sweeps
    }
}

impl Default for BackwardEuler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE, Self::DEFAULT_MAX_SWEEPS)
    }
}

impl Scheme for BackwardEuler {
    fn name(&self) -> &str {
        "implicit"
    }

    fn max_dt(&self, _controller: &StabilityController) -> Option<f64> {
        None
    }

    fn advance(&mut self, ctx: &StepContext<'_>, next: &mut [f64]) -> Result<u32, StepError> {
        let prev = ctx.prev();
        let stencil = ctx.stencil();
        let policy = ctx.policy();
        let r = ctx.alpha() * ctx.dt();
        let denom = |i: usize| 1.0 + r * stencil.diagonal_at(i, policy);
        let scale = prev.iter().fold(1.0f64, |m, v| m.max(v.abs()));
        let threshold = self.tolerance * scale;

        self.iterate.clear();
        self.iterate.extend_from_slice(prev);
        ctx.apply_held(&mut self.iterate);

        let mut residual = f64::INFINITY;
        for sweep in 1..=self.max_sweeps {
            let x = &self.iterate;
            ctx.fill(next, |i| (prev[i] + r * stencil.coupling(x, i, policy)) / denom(i));
            ctx.apply_held(next);
            // Held cells match in both buffers and contribute zero.
            residual = next
                .iter()
                .zip(x)
                .enumerate()
                .fold(0.0f64, |m, (i, (a, b))| m.max(denom(i) * (a - b).abs()));
            // NaN residual never converges; report it rather than loop.
            if residual.is_nan() {
                break;
            }
            if residual <= threshold {
                next.copy_from_slice(x);
                return Ok(sweep);
            }
            self.iterate.copy_from_slice(next);
        }
        Err(StepError::NotConverged {
            sweeps: self.max_sweeps,
            residual,
        })
    }
}
