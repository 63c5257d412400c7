//! Space trait compliance test helpers.
//!
//! These functions verify that a Space implementation satisfies the
//! invariants the grid and stepper rely on. Reused by both backend test
//! modules.

use crate::space::Space;
use std::collections::HashSet;

/// Assert that `b in neighbours(a)` implies `a in neighbours(b)`.
pub fn assert_neighbours_symmetric(space: &dyn Space) {
    for coord in space.canonical_ordering() {
        for nb in space.neighbours(&coord) {
            let nb_neighbours = space.neighbours(&nb);
            assert!(
                nb_neighbours.contains(&coord),
                "neighbour symmetry violated: {nb:?} in N({coord:?}) but {coord:?} not in N({nb:?})"
            );
        }
    }
}

/// Assert that every neighbour is itself an in-bounds cell.
pub fn assert_neighbours_in_bounds(space: &dyn Space) {
    for coord in space.canonical_ordering() {
        for nb in space.neighbours(&coord) {
            assert!(
                space.check_bounds(&nb).is_ok(),
                "neighbour {nb:?} of {coord:?} is out of bounds"
            );
        }
    }
}

/// Assert that two calls to `canonical_ordering` return the same result.
pub fn assert_canonical_ordering_deterministic(space: &dyn Space) {
    let a = space.canonical_ordering();
    let b = space.canonical_ordering();
    assert_eq!(a, b, "canonical_ordering is non-deterministic");
}

/// Assert that `canonical_ordering` returns exactly `cell_count` unique coords.
pub fn assert_canonical_ordering_complete(space: &dyn Space) {
    let ordering = space.canonical_ordering();
    assert_eq!(
        ordering.len(),
        space.cell_count(),
        "canonical_ordering length ({}) != cell_count ({})",
        ordering.len(),
        space.cell_count()
    );
    let unique: HashSet<_> = ordering.iter().collect();
    assert_eq!(
        unique.len(),
        space.cell_count(),
        "canonical_ordering has duplicates"
    );
}

/// Assert that the canonical rank of the i-th coordinate is i.
pub fn assert_rank_matches_ordering(space: &dyn Space) {
    for (i, coord) in space.canonical_ordering().iter().enumerate() {
        assert_eq!(
            space.canonical_rank(coord),
            Some(i),
            "canonical_rank({coord:?}) != {i}"
        );
    }
}

/// Run all compliance checks on a space.
pub fn run_full_compliance(space: &dyn Space) {
    assert_neighbours_symmetric(space);
    assert_neighbours_in_bounds(space);
    assert_canonical_ordering_deterministic(space);
    assert_canonical_ordering_complete(space);
    assert_rank_matches_ordering(space);
}
