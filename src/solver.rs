use crate::engine::{Direction, Grid};
use crate::error::{ExhaustedLimit, MalformedInput, PuzzleError};
use crate::heuristics::ManhattanEvaluator;
use crate::moves::successors;
use crate::solvability::is_reachable;
use crate::state::{BoardState, StateArena, StateId};
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often (in expansions) the wall clock is consulted when a time limit is set.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// Optional bounds on a search. The default is unbounded: run to completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of bounded rounds (threshold values) to try.
    pub max_rounds: Option<u32>,
    /// Maximum number of state expansions, summed over all rounds.
    pub max_expansions: Option<u64>,
    /// Maximum wall-clock time for the whole search.
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    pub fn with_max_expansions(mut self, expansions: u64) -> Self {
        self.max_expansions = Some(expansions);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Counters collected while solving.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of bounded rounds started.
    pub rounds: u32,
    /// States popped from the frontier and expanded, over all rounds.
    pub expanded: u64,
    /// Successor states pushed onto the frontier, over all rounds.
    pub generated: u64,
    /// Threshold of the last round.
    pub final_threshold: u32,
}

/// An optimal move sequence from the initial grid to the goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Number of moves; always equal to `moves.len()`.
    pub move_count: usize,
    /// Displacements of the blank, in execution order.
    pub moves: Vec<Direction>,
    pub stats: SearchStats,
}

/// Result of a completed search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    /// No sequence of moves connects the initial grid to the goal.
    Unsolvable,
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::Unsolvable => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }
}

/// What a single bounded round ended with.
enum RoundResult {
    Found(Vec<Direction>),
    /// The cheapest state left on the frontier had this `f`, above the threshold.
    Exceeded(u32),
    /// Every reachable state was expanded without meeting the goal.
    Drained,
}

/// Min-priority frontier ordered by `(f, insertion order)`.
///
/// The insertion counter makes ties between equal `f` values resolve in the
/// order states were generated, which keeps the search deterministic.
struct Frontier {
    heap: BinaryHeap<Reverse<(u32, u64, StateId)>>,
    next_seq: u64,
}

impl Frontier {
    fn new() -> Self {
        Frontier {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, f: u32, id: StateId) {
        self.heap.push(Reverse((f, self.next_seq, id)));
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<(u32, StateId)> {
        self.heap.pop().map(|Reverse((f, _, id))| (f, id))
    }
}

/// IDA*-style solver for a fixed goal configuration.
///
/// Each round is a best-first expansion bounded by a cost threshold. A round
/// stops as soon as the cheapest frontier state exceeds the threshold, and that
/// state's `f` becomes the next threshold. The first round uses the heuristic
/// value of the initial grid. Every round restarts from the initial grid with an
/// empty visited set.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::{Direction, Grid};
/// use npuzzle_solver::solver::{Outcome, Solver};
///
/// let goal = Grid::solved(3).unwrap();
/// let start = Grid::from_rows(&[[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap();
///
/// let outcome = Solver::new(goal).solve(&start).unwrap();
/// let solution = outcome.solution().unwrap();
/// assert_eq!(solution.move_count, 2);
/// assert_eq!(solution.moves, vec![Direction::Down, Direction::Right]);
/// ```
#[derive(Clone, Debug)]
pub struct Solver {
    goal: Grid,
    evaluator: ManhattanEvaluator,
    limits: SearchLimits,
}

impl Solver {
    pub fn new(goal: Grid) -> Self {
        let evaluator = ManhattanEvaluator::new(&goal);
        Solver {
            goal,
            evaluator,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn goal(&self) -> &Grid {
        &self.goal
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Finds a shortest move sequence from `initial` to the goal.
    ///
    /// # Returns
    /// * `Ok(Outcome::Solved(_))` with an optimal solution.
    /// * `Ok(Outcome::Unsolvable)` if the parity check rules the goal out. No
    ///   round is run in that case.
    /// * `Err(PuzzleError::Malformed(_))` if the grids differ in dimension.
    /// * `Err(PuzzleError::SearchExhausted { .. })` if a [`SearchLimits`] bound is hit.
    pub fn solve(&self, initial: &Grid) -> Result<Outcome, PuzzleError> {
        if initial.dimension() != self.goal.dimension() {
            return Err(MalformedInput::DimensionMismatch {
                initial: initial.dimension(),
                goal: self.goal.dimension(),
            }
            .into());
        }

        if !is_reachable(initial, &self.goal) {
            info!(dimension = initial.dimension(), "parity check failed, puzzle is not solvable");
            return Ok(Outcome::Unsolvable);
        }

        let started = Instant::now();
        let mut stats = SearchStats::default();
        let mut threshold = self.evaluator.estimate(initial)?;

        loop {
            if let Some(max_rounds) = self.limits.max_rounds {
                if stats.rounds >= max_rounds {
                    return Err(self.exhausted(ExhaustedLimit::Rounds, &stats));
                }
            }
            stats.rounds += 1;
            stats.final_threshold = threshold;
            debug!(round = stats.rounds, threshold, "starting bounded round");

            match self.bounded_round(initial, threshold, &mut stats, started)? {
                RoundResult::Found(moves) => {
                    info!(
                        moves = moves.len(),
                        rounds = stats.rounds,
                        expanded = stats.expanded,
                        "solution found"
                    );
                    return Ok(Outcome::Solved(Solution {
                        move_count: moves.len(),
                        moves,
                        stats,
                    }));
                }
                RoundResult::Exceeded(next_threshold) => {
                    debug_assert!(next_threshold > threshold);
                    debug!(from = threshold, to = next_threshold, "raising threshold");
                    threshold = next_threshold;
                }
                RoundResult::Drained => {
                    warn!(
                        expanded = stats.expanded,
                        "frontier drained without reaching the goal"
                    );
                    return Ok(Outcome::Unsolvable);
                }
            }
        }
    }

    fn bounded_round(
        &self,
        initial: &Grid,
        threshold: u32,
        stats: &mut SearchStats,
        started: Instant,
    ) -> Result<RoundResult, PuzzleError> {
        let mut arena = StateArena::new();
        let mut frontier = Frontier::new();
        let mut visited: FxHashSet<Grid> = FxHashSet::default();

        let h = self.evaluator.estimate(initial)?;
        let root = arena.push(BoardState::initial(initial.clone(), h));
        frontier.push(h, root);

        while let Some((f, id)) = frontier.pop() {
            if f > threshold {
                return Ok(RoundResult::Exceeded(f));
            }

            let state = arena.get(id);
            if *state.grid() == self.goal {
                return Ok(RoundResult::Found(arena.path_to(id)));
            }
            if visited.contains(state.grid()) {
                continue;
            }

            self.check_budget(stats, started)?;
            stats.expanded += 1;
            visited.insert(state.grid().clone());

            let children: Vec<BoardState> = successors(id, state, &self.evaluator)?
                .filter(|child| !visited.contains(child.grid()))
                .collect();
            for child in children {
                let f = child.f();
                let child_id = arena.push(child);
                frontier.push(f, child_id);
                stats.generated += 1;
            }
        }

        Ok(RoundResult::Drained)
    }

    fn check_budget(&self, stats: &SearchStats, started: Instant) -> Result<(), PuzzleError> {
        if let Some(max_expansions) = self.limits.max_expansions {
            if stats.expanded >= max_expansions {
                return Err(self.exhausted(ExhaustedLimit::Expansions, stats));
            }
        }
        if let Some(limit) = self.limits.time_limit {
            if stats.expanded % TIME_CHECK_INTERVAL == 0 && started.elapsed() >= limit {
                return Err(self.exhausted(ExhaustedLimit::Time, stats));
            }
        }
        Ok(())
    }

    fn exhausted(&self, limit: ExhaustedLimit, stats: &SearchStats) -> PuzzleError {
        warn!(%limit, rounds = stats.rounds, expanded = stats.expanded, "search limit reached");
        PuzzleError::SearchExhausted {
            limit,
            rounds: stats.rounds,
            expansions: stats.expanded,
        }
    }
}

/// Solves `initial` towards `goal` without search limits.
///
/// Shorthand for `Solver::new(goal.clone()).solve(initial)`.
pub fn solve(initial: &Grid, goal: &Grid) -> Result<Outcome, PuzzleError> {
    Solver::new(goal.clone()).solve(initial)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[[u16; 3]; 3]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_two_move_scenario() {
        let start = grid(&[[1, 2, 3], [4, 0, 6], [7, 5, 8]]);
        let goal = Grid::solved(3).unwrap();

        let outcome = solve(&start, &goal).unwrap();
        let sol = outcome.solution().unwrap();
        assert_eq!(sol.move_count, 2);
        assert_eq!(sol.moves, vec![Direction::Down, Direction::Right]);
        assert_eq!(start.apply_moves(&sol.moves), Some(goal));
        assert_eq!(sol.stats.rounds, 1);
        assert_eq!(sol.stats.final_threshold, 2);
    }

    #[test]
    fn test_unsolvable_runs_no_round() {
        let start = grid(&[[1, 2, 3], [4, 5, 6], [8, 7, 0]]);
        let goal = Grid::solved(3).unwrap();
        // A round limit of zero would fail on the first round, so getting
        // `Unsolvable` back proves no round was attempted.
        let solver = Solver::new(goal).with_limits(SearchLimits::unbounded().with_max_rounds(0));
        assert_eq!(solver.solve(&start).unwrap(), Outcome::Unsolvable);
    }

    #[test]
    fn test_already_solved_2x2() {
        let goal = Grid::solved(2).unwrap();
        let outcome = solve(&goal, &goal).unwrap();
        let sol = outcome.solution().unwrap();
        assert_eq!(sol.move_count, 0);
        assert!(sol.moves.is_empty());
        assert!(outcome.is_solved());
    }

    #[test]
    fn test_dimension_mismatch_is_malformed() {
        let err = solve(&Grid::solved(2).unwrap(), &Grid::solved(3).unwrap()).unwrap_err();
        assert!(err.is_malformed());
        assert!(matches!(
            err,
            PuzzleError::Malformed(MalformedInput::DimensionMismatch { initial: 2, goal: 3 })
        ));
    }

    #[test]
    fn test_thresholds_increase_across_rounds() {
        // Needs more moves than its Manhattan estimate, so several rounds run.
        let start = grid(&[[8, 6, 7], [2, 5, 4], [3, 0, 1]]);
        let goal = Grid::solved(3).unwrap();
        let evaluator = ManhattanEvaluator::new(&goal);

        let outcome = solve(&start, &goal).unwrap();
        let sol = outcome.solution().unwrap();
        assert_eq!(sol.move_count, 31);
        assert!(sol.stats.rounds > 1);
        assert!(sol.stats.final_threshold > evaluator.estimate(&start).unwrap());
        assert_eq!(sol.stats.final_threshold as usize, sol.move_count);
        assert_eq!(start.apply_moves(&sol.moves), Some(goal));
    }

    #[test]
    fn test_non_canonical_goal() {
        let goal = Grid::solved_with_blank_at(3, 4).unwrap();
        let start = goal
            .apply_moves(&[Direction::Up, Direction::Left, Direction::Down, Direction::Down])
            .unwrap();
        let outcome = solve(&start, &goal).unwrap();
        let sol = outcome.solution().unwrap();
        assert_eq!(sol.move_count, 4);
        assert_eq!(start.apply_moves(&sol.moves), Some(goal));
    }

    #[test]
    fn test_expansion_limit() {
        let start = grid(&[[8, 6, 7], [2, 5, 4], [3, 0, 1]]);
        let goal = Grid::solved(3).unwrap();
        let solver = Solver::new(goal).with_limits(SearchLimits::unbounded().with_max_expansions(10));
        let err = solver.solve(&start).unwrap_err();
        assert!(matches!(
            err,
            PuzzleError::SearchExhausted {
                limit: ExhaustedLimit::Expansions,
                expansions: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_round_limit() {
        let start = grid(&[[8, 6, 7], [2, 5, 4], [3, 0, 1]]);
        let goal = Grid::solved(3).unwrap();
        let solver = Solver::new(goal).with_limits(SearchLimits::unbounded().with_max_rounds(1));
        let err = solver.solve(&start).unwrap_err();
        assert!(matches!(
            err,
            PuzzleError::SearchExhausted {
                limit: ExhaustedLimit::Rounds,
                rounds: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_time_limit() {
        let start = grid(&[[8, 6, 7], [2, 5, 4], [3, 0, 1]]);
        let goal = Grid::solved(3).unwrap();
        let solver = Solver::new(goal)
            .with_limits(SearchLimits::unbounded().with_time_limit(Duration::ZERO));
        let err = solver.solve(&start).unwrap_err();
        assert!(matches!(
            err,
            PuzzleError::SearchExhausted {
                limit: ExhaustedLimit::Time,
                ..
            }
        ));
    }

    #[test]
    fn test_frontier_breaks_ties_by_insertion_order() {
        let mut frontier = Frontier::new();
        frontier.push(5, 10);
        frontier.push(3, 11);
        frontier.push(5, 12);
        frontier.push(3, 13);
        assert_eq!(frontier.pop(), Some((3, 11)));
        assert_eq!(frontier.pop(), Some((3, 13)));
        assert_eq!(frontier.pop(), Some((5, 10)));
        assert_eq!(frontier.pop(), Some((5, 12)));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_search_is_deterministic() {
        let goal = Grid::solved(3).unwrap();
        let start = goal.scrambled(30, 99);
        let a = solve(&start, &goal).unwrap();
        let b = solve(&start, &goal).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_drains_when_goal_is_out_of_reach() {
        // Tiles 1 and 2 swapped: the other parity class, 12 configurations reachable.
        let start = Grid::from_rows(&[[2, 1], [3, 0]]).unwrap();
        let solver = Solver::new(Grid::solved(2).unwrap());
        let mut stats = SearchStats::default();

        let result = solver
            .bounded_round(&start, u32::MAX, &mut stats, Instant::now())
            .unwrap();
        assert!(matches!(result, RoundResult::Drained));
        assert_eq!(stats.expanded, 12);
        assert!(stats.generated >= 11);
    }
}
