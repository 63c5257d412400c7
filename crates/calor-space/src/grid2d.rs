//! Shared helpers for the 2D grid backend.

use crate::edge::EdgeBehavior;
use crate::error::SpaceError;
use calor_core::Coord;

/// Check that a 2D coordinate is in bounds and return `(row, col)`.
pub(crate) fn check_2d_bounds(
    coord: &Coord,
    rows: u32,
    cols: u32,
) -> Result<(i32, i32), SpaceError> {
    if coord.len() != 2 {
        return Err(SpaceError::CoordOutOfBounds {
            coord: coord.clone(),
            bounds: format!("expected 2D coordinate, got {}D", coord.len()),
        });
    }
    let r = coord[0];
    let c = coord[1];
    if r < 0 || r >= rows as i32 || c < 0 || c >= cols as i32 {
        return Err(SpaceError::CoordOutOfBounds {
            coord: coord.clone(),
            bounds: format!("[0, {}) x [0, {})", rows, cols),
        });
    }
    Ok((r, c))
}

/// Resolve a single axis value under the given edge behavior.
/// Returns `Some(resolved)` or `None` for Absorb out-of-bounds.
pub(crate) fn resolve_axis(val: i32, len: u32, edge: EdgeBehavior) -> Option<i32> {
    let n = len as i32;
    if val >= 0 && val < n {
        return Some(val);
    }
    match edge {
        EdgeBehavior::Absorb => None,
        EdgeBehavior::Wrap => Some(((val % n) + n) % n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn resolve_axis_in_bounds() {
        assert_eq!(resolve_axis(2, 5, EdgeBehavior::Absorb), Some(2));
        assert_eq!(resolve_axis(0, 5, EdgeBehavior::Wrap), Some(0));
    }

    #[test]
    fn resolve_axis_absorb_out_of_bounds() {
        assert_eq!(resolve_axis(-1, 5, EdgeBehavior::Absorb), None);
        assert_eq!(resolve_axis(5, 5, EdgeBehavior::Absorb), None);
    }

    #[test]
    fn resolve_axis_wrap() {
        assert_eq!(resolve_axis(-1, 5, EdgeBehavior::Wrap), Some(4));
        assert_eq!(resolve_axis(5, 5, EdgeBehavior::Wrap), Some(0));
        assert_eq!(resolve_axis(7, 5, EdgeBehavior::Wrap), Some(2));
    }

    #[test]
    fn check_2d_bounds_reports_range() {
        assert_eq!(check_2d_bounds(&smallvec![1, 2], 3, 4), Ok((1, 2)));
        match check_2d_bounds(&smallvec![3, 0], 3, 4) {
            Err(SpaceError::CoordOutOfBounds { bounds, .. }) => {
                assert_eq!(bounds, "[0, 3) x [0, 4)");
            }
            other => panic!("expected CoordOutOfBounds, got {other:?}"),
        }
    }
}
