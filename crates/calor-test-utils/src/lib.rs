//! Test fixtures and assertions for Calor development.
//!
//! Grid builders for the shapes the test suites keep reaching for, plus
//! float comparisons with readable failure messages.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::*;

/// Assert `|a - b| <= tol`, reporting both values on failure.
#[track_caller]
pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!(
        (a - b).abs() <= tol,
        "expected {a} to be within {tol} of {b} (diff {})",
        (a - b).abs()
    );
}

/// Assert two fields agree cell by cell within `tol`.
#[track_caller]
pub fn assert_fields_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "field length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tol,
            "cell {i}: {a} differs from {e} by more than {tol}"
        );
    }
}

/// Assert a 1D field reads the same forwards and backwards.
#[track_caller]
pub fn assert_mirror_symmetric(field: &[f64], tol: f64) {
    let n = field.len();
    for i in 0..n / 2 {
        let (l, r) = (field[i], field[n - 1 - i]);
        assert!(
            (l - r).abs() <= tol,
            "asymmetry at {i}/{}: {l} vs {r}",
            n - 1 - i
        );
    }
}
