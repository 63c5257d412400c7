//! Per-cell thermal conductivity.
//!
//! A [`Conductivity`] scales the diffusivity cell by cell. The factor of
//! cell `i` multiplies `alpha`; the solver couples two neighbouring cells
//! through the harmonic mean of their factors.

use crate::init::unit_f64;
use calor_core::GridError;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Thermal constants of the three metals in the default alloy.
pub const ALLOY_CONSTANTS: [f64; 3] = [0.75, 1.0, 1.25];

/// How conductive each cell is, relative to the configured `alpha`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Conductivity {
    /// Every cell conducts at `alpha`.
    #[default]
    Uniform,
    /// Explicit per-cell factors in row-major order.
    Values(Vec<f64>),
    /// A three-metal alloy with a seeded random composition per cell.
    ///
    /// Each cell draws metal fractions `p1 + p2 + p3 = 1` from a ChaCha8
    /// stream and conducts at `p1*c1 + p2*c2 + p3*c3`.
    Alloy {
        /// Thermal constants `[c1, c2, c3]`.
        constants: [f64; 3],
        /// RNG seed for the composition.
        seed: u64,
    },
}

impl Conductivity {
    /// Default alloy ([`ALLOY_CONSTANTS`]) with the given seed.
    pub fn alloy(seed: u64) -> Self {
        Self::Alloy {
            constants: ALLOY_CONSTANTS,
            seed,
        }
    }

    /// `true` when no per-cell factors are needed.
    pub fn is_uniform(&self) -> bool {
        matches!(self, Self::Uniform)
    }

    /// Produce `cell_count` factors.
    ///
    /// # Errors
    ///
    /// - [`GridError::DimensionMismatch`] when explicit factors do not match
    ///   the cell count
    /// - [`GridError::InvalidConductivity`] for the first non-finite or
    ///   non-positive factor (an alloy constant fails at index 0)
    pub fn materialize(&self, cell_count: usize) -> Result<Vec<f64>, GridError> {
        let factors = match self {
            Self::Uniform => vec![1.0; cell_count],
            Self::Values(values) => {
                if values.len() != cell_count {
                    return Err(GridError::DimensionMismatch {
                        expected: cell_count,
                        actual: values.len(),
                    });
                }
                values.clone()
            }
            Self::Alloy { constants, seed } => {
                if let Some(&c) = constants.iter().find(|c| !c.is_finite() || **c <= 0.0) {
                    return Err(GridError::InvalidConductivity { index: 0, value: c });
                }
                let mut rng = ChaCha8Rng::seed_from_u64(*seed);
                (0..cell_count)
                    .map(|_| {
                        let w = [unit_f64(&mut rng), unit_f64(&mut rng), unit_f64(&mut rng)];
                        let total: f64 = w.iter().sum();
                        if total == 0.0 {
                            return constants.iter().sum::<f64>() / 3.0;
                        }
                        w.iter().zip(constants).map(|(p, c)| p * c).sum::<f64>() / total
                    })
                    .collect()
            }
        };
        if let Some((index, &value)) = factors
            .iter()
            .enumerate()
            .find(|(_, k)| !k.is_finite() || **k <= 0.0)
        {
            return Err(GridError::InvalidConductivity { index, value });
        }
        Ok(factors)
    }
}

/// Conductance of the face between two cells with factors `a` and `b`.
///
/// The harmonic mean: symmetric, and never above the larger factor.
#[inline]
pub fn face_conductance(a: f64, b: f64) -> f64 {
    2.0 * (a * b) / (a + b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn uniform_is_all_ones() {
        assert!(Conductivity::Uniform.is_uniform());
        assert_eq!(Conductivity::Uniform.materialize(3).unwrap(), vec![1.0; 3]);
    }

    #[test]
    fn values_are_checked() {
        let k = Conductivity::Values(vec![1.0, 0.0, 2.0]);
        assert_eq!(
            k.materialize(3),
            Err(GridError::InvalidConductivity {
                index: 1,
                value: 0.0
            })
        );
        assert!(matches!(
            Conductivity::Values(vec![1.0]).materialize(2),
            Err(GridError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn alloy_rejects_bad_constants() {
        let k = Conductivity::Alloy {
            constants: [0.75, -1.0, 1.25],
            seed: 1,
        };
        assert_eq!(
            k.materialize(4),
            Err(GridError::InvalidConductivity {
                index: 0,
                value: -1.0
            })
        );
    }

    #[test]
    fn alloy_is_deterministic_and_varies_across_cells() {
        let a = Conductivity::alloy(7).materialize(100).unwrap();
        assert_eq!(a, Conductivity::alloy(7).materialize(100).unwrap());
        assert_ne!(a, Conductivity::alloy(8).materialize(100).unwrap());
        assert!(a.iter().any(|k| (k - a[0]).abs() > 1e-6));
    }

    #[test]
    fn face_conductance_is_harmonic_mean() {
        assert_eq!(face_conductance(1.0, 1.0), 1.0);
        assert_eq!(face_conductance(1.0, 3.0), 1.5);
        assert_eq!(face_conductance(2.0, 0.5), face_conductance(0.5, 2.0));
    }

    proptest! {
        #[test]
        fn alloy_factors_stay_between_constants(
            seed in any::<u64>(),
            c1 in 0.1f64..3.0,
            c2 in 0.1f64..3.0,
            c3 in 0.1f64..3.0,
        ) {
            let lo = c1.min(c2).min(c3);
            let hi = c1.max(c2).max(c3);
            let k = Conductivity::Alloy { constants: [c1, c2, c3], seed }
                .materialize(32)
                .unwrap();
            for v in k {
                prop_assert!(v >= lo - 1e-12 && v <= hi + 1e-12, "{v} outside [{lo}, {hi}]");
            }
        }
    }
}
