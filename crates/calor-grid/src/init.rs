//! Initial conditions.

use calor_core::GridError;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// How to fill the field before the first step.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialField {
    /// Every cell holds the same temperature.
    Uniform(f64),
    /// Explicit per-cell temperatures in row-major order.
    Values(Vec<f64>),
    /// Deterministic uniform noise in `[base - amplitude, base + amplitude]`.
    ///
    /// Uses a ChaCha8 stream seeded from `seed`, so the same seed always
    /// yields the same field.
    Noise {
        /// Centre temperature.
        base: f64,
        /// Half-width of the perturbation.
        amplitude: f64,
        /// RNG seed.
        seed: u64,
    },
}

impl InitialField {
    /// Produce `cell_count` values.
    ///
    /// Fails with [`GridError::DimensionMismatch`] when explicit values do
    /// not match the cell count. Finiteness is checked by the grid, which
    /// knows the coordinates.
    pub fn materialize(&self, cell_count: usize) -> Result<Vec<f64>, GridError> {
        match self {
            Self::Uniform(v) => Ok(vec![*v; cell_count]),
            Self::Values(values) => {
                if values.len() != cell_count {
                    return Err(GridError::DimensionMismatch {
                        expected: cell_count,
                        actual: values.len(),
                    });
                }
                Ok(values.clone())
            }
            Self::Noise {
                base,
                amplitude,
                seed,
            } => {
                let mut rng = ChaCha8Rng::seed_from_u64(*seed);
                Ok((0..cell_count)
                    .map(|_| base + amplitude * (2.0 * unit_f64(&mut rng) - 1.0))
                    .collect())
            }
        }
    }

    /// Largest magnitude the field can start with, without materializing it.
    pub fn max_abs(&self) -> f64 {
        match self {
            Self::Uniform(v) => v.abs(),
            Self::Values(values) => values.iter().fold(0.0, |m, v| m.max(v.abs())),
            Self::Noise {
                base, amplitude, ..
            } => base.abs() + amplitude.abs(),
        }
    }
}

/// Uniform sample in `[0, 1)` from the top 53 bits of a `u64`.
pub(crate) fn unit_f64(rng: &mut ChaCha8Rng) -> f64 {
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}
