//! Parity-based solvability checks.
//!
//! Every legal move preserves a parity invariant of the configuration: the
//! inversion parity of the non-blank tiles for odd dimensions, and the parity
//! of `inversions + blank row` for even dimensions. Two configurations are
//! mutually reachable iff they share that parity.
use crate::engine::{Grid, Tile, BLANK};

/// Counts inversions in `values` with a merge sort.
///
/// An inversion is a pair `(i, j)` with `i < j` and `values[i] > values[j]`.
/// Runs in `O(n log n)`.
///
/// # Examples
/// ```
/// use npuzzle_solver::solvability::count_inversions;
/// assert_eq!(count_inversions(&[1, 2, 3]), 0);
/// assert_eq!(count_inversions(&[3, 1, 2]), 2);
/// assert_eq!(count_inversions(&[4, 3, 2, 1]), 6);
/// ```
pub fn count_inversions(values: &[Tile]) -> usize {
    let mut buffer = values.to_vec();
    let mut scratch = vec![0; values.len()];
    sort_and_count(&mut buffer, &mut scratch)
}

fn sort_and_count(values: &mut [Tile], scratch: &mut [Tile]) -> usize {
    let len = values.len();
    if len < 2 {
        return 0;
    }
    let mid = len / 2;
    let mut inversions = {
        let (left, right) = values.split_at_mut(mid);
        let (left_scratch, right_scratch) = scratch.split_at_mut(mid);
        sort_and_count(left, left_scratch) + sort_and_count(right, right_scratch)
    };

    let (mut l, mut r, mut out) = (0, mid, 0);
    while l < mid && r < len {
        if values[l] <= values[r] {
            scratch[out] = values[l];
            l += 1;
        } else {
            scratch[out] = values[r];
            r += 1;
            // The right element jumps ahead of every remaining left element.
            inversions += mid - l;
        }
        out += 1;
    }
    scratch[out..out + (mid - l)].copy_from_slice(&values[l..mid]);
    out += mid - l;
    scratch[out..out + (len - r)].copy_from_slice(&values[r..len]);

    values.copy_from_slice(&scratch[..len]);
    inversions
}

/// Returns the parity invariant of `grid`: `true` for odd, `false` for even.
///
/// For odd dimensions this is the parity of the inversion count of the
/// row-major non-blank tiles; for even dimensions it is the parity of that
/// count plus the zero-indexed row of the blank.
pub fn parity_class(grid: &Grid) -> bool {
    let tiles: Vec<Tile> = grid.cells().iter().copied().filter(|&t| t != BLANK).collect();
    let inversions = count_inversions(&tiles);
    if grid.dimension() % 2 == 1 {
        inversions % 2 == 1
    } else {
        let (blank_row, _) = grid.blank_position();
        (inversions + blank_row) % 2 == 1
    }
}

/// Decides whether `grid` can reach the canonical ordered arrangement.
///
/// # Arguments
/// * `grid`: The configuration to test.
///
/// # Returns
/// * For odd `N`: `true` iff the inversion count is even.
/// * For even `N`: `true` iff `inversions + blank row` is odd.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Grid;
/// use npuzzle_solver::solvability::is_solvable;
///
/// let solvable = Grid::from_rows(&[[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap();
/// assert!(is_solvable(&solvable));
///
/// let swapped = Grid::from_rows(&[[1, 2, 3], [4, 5, 6], [8, 7, 0]]).unwrap();
/// assert!(!is_solvable(&swapped));
/// ```
pub fn is_solvable(grid: &Grid) -> bool {
    if grid.dimension() % 2 == 1 {
        !parity_class(grid)
    } else {
        parity_class(grid)
    }
}

/// Decides whether `goal` can be reached from `initial`.
///
/// Both grids must have the same dimension; grids of different dimension are
/// never reachable from each other. Unlike [`is_solvable`] this handles goals
/// whose blank or tile order differs from the canonical arrangement.
pub fn is_reachable(initial: &Grid, goal: &Grid) -> bool {
    initial.dimension() == goal.dimension() && parity_class(initial) == parity_class(goal)
}
