//! Successor generation for the search.

use crate::error::MalformedInput;
use crate::heuristics::ManhattanEvaluator;
use crate::state::{BoardState, StateId};

/// Lazily produces the children of `parent`, stored in the arena under `parent_id`.
///
/// Directions are tried in `Direction::ALL` order (up, down, left, right) and
/// moves that would push the blank off the grid are skipped, so between zero and
/// four children are produced. Each child gets `g = parent.g() + 1`,
/// `f = g + h` and a predecessor link back to `parent_id`. The parent's grid is
/// never modified.
///
/// Fails with [`MalformedInput::DimensionMismatch`] if the parent's grid is not
/// the size of the evaluator's goal.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::{Direction, Grid};
/// use npuzzle_solver::heuristics::ManhattanEvaluator;
/// use npuzzle_solver::moves::successors;
/// use npuzzle_solver::state::BoardState;
///
/// let goal = Grid::solved(2).unwrap();
/// let evaluator = ManhattanEvaluator::new(&goal);
/// let root = BoardState::initial(goal.clone(), 0);
///
/// let children: Vec<BoardState> = successors(0, &root, &evaluator).unwrap().collect();
/// assert_eq!(children.len(), 2);
/// assert_eq!(children[0].predecessor(), Some((0, Direction::Up)));
/// assert_eq!(children[0].f(), 2);
/// ```
pub fn successors<'a>(
    parent_id: StateId,
    parent: &'a BoardState,
    evaluator: &'a ManhattanEvaluator,
) -> Result<impl Iterator<Item = BoardState> + 'a, MalformedInput> {
    evaluator.check_dimension(parent.grid())?;
    let g = parent.g() + 1;
    Ok(parent.grid().neighbours().map(move |(direction, grid)| {
        let h = evaluator.estimate_unchecked(&grid);
        BoardState::child(grid, g, h, parent_id, direction)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Direction, Grid};

    #[test]
    fn test_successors_of_center_blank() {
        let goal = Grid::solved(3).unwrap();
        let evaluator = ManhattanEvaluator::new(&goal);
        let start = Grid::from_rows(&[[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap();
        let h = evaluator.estimate(&start).unwrap();
        let parent = BoardState::child(start, 3, h, 2, Direction::Left);

        let children: Vec<BoardState> = successors(7, &parent, &evaluator).unwrap().collect();
        let dirs: Vec<Direction> = children
            .iter()
            .filter_map(|c| c.predecessor().map(|(_, d)| d))
            .collect();
        assert_eq!(dirs, Direction::ALL.to_vec());

        for child in &children {
            assert_eq!(child.g(), 4);
            assert_eq!(child.f(), 4 + evaluator.estimate(child.grid()).unwrap());
            assert_eq!(child.predecessor().map(|(p, _)| p), Some(7));
        }
        // Moving the blank down puts tile 5 in place.
        assert_eq!(children[1].h(), 1);
    }

    #[test]
    fn test_successors_respect_edges() {
        let goal = Grid::solved(3).unwrap();
        let evaluator = ManhattanEvaluator::new(&goal);
        let parent = BoardState::initial(goal.clone(), 0);
        let dirs: Vec<Direction> = successors(0, &parent, &evaluator)
            .unwrap()
            .filter_map(|c| c.predecessor().map(|(_, d)| d))
            .collect();
        assert_eq!(dirs, vec![Direction::Up, Direction::Left]);
    }

    #[test]
    fn test_successors_do_not_mutate_parent() {
        let goal = Grid::solved(4).unwrap();
        let evaluator = ManhattanEvaluator::new(&goal);
        let start = goal.scrambled(20, 11);
        let parent = BoardState::initial(start.clone(), evaluator.estimate(&start).unwrap());

        let count = successors(0, &parent, &evaluator).unwrap().count();
        assert!((2..=4).contains(&count));
        assert_eq!(parent.grid(), &start);
        assert_eq!(parent.g(), 0);
    }

    #[test]
    fn test_successors_reject_foreign_dimension() {
        let evaluator = ManhattanEvaluator::new(&Grid::solved(3).unwrap());
        let parent = BoardState::initial(Grid::solved(4).unwrap(), 0);
        assert!(matches!(
            successors(0, &parent, &evaluator),
            Err(MalformedInput::DimensionMismatch { initial: 4, goal: 3 })
        ));
    }
}
