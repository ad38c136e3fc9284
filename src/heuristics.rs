use crate::engine::{Grid, BLANK};
use crate::error::MalformedInput;

/// Computes the Manhattan distance between `current` and `goal`.
///
/// For every non-blank tile, the L1 distance between its position in `current`
/// and its position in `goal` is accumulated. Each move shifts exactly one tile
/// by one cell, so the result never exceeds the true number of moves left.
///
/// # Arguments
/// * `current`: The configuration being evaluated.
/// * `goal`: The target configuration. Must have the same dimension as `current`.
///
/// # Returns
/// The total distance, or [`MalformedInput::DimensionMismatch`] if the two
/// grids are not the same size.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Grid;
/// use npuzzle_solver::heuristics::manhattan_distance;
///
/// let goal = Grid::solved(3).unwrap();
/// let current = Grid::from_rows(&[[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap();
/// assert_eq!(manhattan_distance(&current, &goal), Ok(2));
/// assert_eq!(manhattan_distance(&goal, &goal), Ok(0));
/// assert!(manhattan_distance(&Grid::solved(2).unwrap(), &goal).is_err());
/// ```
pub fn manhattan_distance(current: &Grid, goal: &Grid) -> Result<u32, MalformedInput> {
    ManhattanEvaluator::new(goal).estimate(current)
}

/// Manhattan-distance estimator with the goal positions precomputed.
///
/// The solver evaluates every generated state against the same goal, so the
/// goal is indexed once: `goal_positions[tile]` is `(row, col)` of `tile` in the goal.
#[derive(Clone, Debug)]
pub struct ManhattanEvaluator {
    dimension: usize,
    goal_positions: Vec<(usize, usize)>,
}

impl ManhattanEvaluator {
    pub fn new(goal: &Grid) -> Self {
        let dimension = goal.dimension();
        let mut goal_positions = vec![(0, 0); goal.cells().len()];
        for (idx, &tile) in goal.cells().iter().enumerate() {
            goal_positions[tile as usize] = (idx / dimension, idx % dimension);
        }
        ManhattanEvaluator {
            dimension,
            goal_positions,
        }
    }

    /// Dimension of the goal this evaluator was built for.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Lower bound on the number of moves from `current` to the goal.
    ///
    /// Fails with [`MalformedInput::DimensionMismatch`] if `current` is not the
    /// size of the goal.
    pub fn estimate(&self, current: &Grid) -> Result<u32, MalformedInput> {
        self.check_dimension(current)?;
        Ok(self.estimate_unchecked(current))
    }

    pub(crate) fn check_dimension(&self, current: &Grid) -> Result<(), MalformedInput> {
        if current.dimension() != self.dimension {
            return Err(MalformedInput::DimensionMismatch {
                initial: current.dimension(),
                goal: self.dimension,
            });
        }
        Ok(())
    }

    /// [`estimate`](Self::estimate) for a grid already known to match the goal.
    pub(crate) fn estimate_unchecked(&self, current: &Grid) -> u32 {
        debug_assert_eq!(current.dimension(), self.dimension);
        let mut distance = 0;
        for (idx, &tile) in current.cells().iter().enumerate() {
            if tile == BLANK {
                continue;
            }
            let (r, c) = (idx / self.dimension, idx % self.dimension);
            let (goal_r, goal_c) = self.goal_positions[tile as usize];
            distance += (r.abs_diff(goal_r) + c.abs_diff(goal_c)) as u32;
        }
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Direction;

    #[test]
    fn test_distance_to_self_is_zero() {
        for n in 2..=5 {
            let goal = Grid::solved(n).unwrap();
            let scrambled = goal.scrambled(30, n as u64);
            assert_eq!(manhattan_distance(&goal, &goal), Ok(0));
            assert_eq!(manhattan_distance(&scrambled, &scrambled), Ok(0));
        }
    }

    #[test]
    fn test_known_distances() {
        let goal = Grid::solved(3).unwrap();
        let reversed = Grid::from_rows(&[[8, 7, 6], [5, 4, 3], [2, 1, 0]]).unwrap();
        // 8:(0,0)->(2,1)=3, 7:(0,1)->(2,0)=3, 6:(0,2)->(1,2)=1, 5:(1,0)->(1,1)=1,
        // 4:(1,1)->(1,0)=1, 3:(1,2)->(0,2)=1, 2:(2,0)->(0,1)=3, 1:(2,1)->(0,0)=3
        assert_eq!(manhattan_distance(&reversed, &goal), Ok(16));
    }

    #[test]
    fn test_blank_is_not_counted() {
        let goal = Grid::solved(2).unwrap();
        let moved = goal.apply_move(Direction::Up).unwrap();
        // Only tile 2 moved, by a single cell.
        assert_eq!(manhattan_distance(&moved, &goal), Ok(1));
    }

    #[test]
    fn test_consistency_across_one_move() {
        let goal = Grid::solved(4).unwrap();
        let evaluator = ManhattanEvaluator::new(&goal);
        for seed in 0..25 {
            let grid = goal.scrambled(50, seed);
            let h = evaluator.estimate(&grid).unwrap();
            for (_, next) in grid.neighbours() {
                let h_next = evaluator.estimate(&next).unwrap();
                assert!(h <= 1 + h_next, "seed {}: {} > 1 + {}", seed, h, h_next);
                assert!(h_next <= 1 + h);
            }
        }
    }

    #[test]
    fn test_non_canonical_goal() {
        let goal = Grid::solved_with_blank_at(3, 4).unwrap();
        let evaluator = ManhattanEvaluator::new(&goal);
        assert_eq!(evaluator.dimension(), 3);
        assert_eq!(evaluator.estimate(&goal), Ok(0));
        assert_eq!(evaluator.estimate(&goal.apply_move(Direction::Left).unwrap()), Ok(1));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let goal = Grid::solved(3).unwrap();
        let small = Grid::solved(2).unwrap();
        let large = Grid::solved(4).unwrap();
        let evaluator = ManhattanEvaluator::new(&goal);

        assert_eq!(
            manhattan_distance(&small, &goal),
            Err(MalformedInput::DimensionMismatch { initial: 2, goal: 3 })
        );
        assert_eq!(
            evaluator.estimate(&large),
            Err(MalformedInput::DimensionMismatch { initial: 4, goal: 3 })
        );
    }
}
