//! # N-Puzzle Solver Library
//!
//! This library solves sliding-tile puzzles (the 8-puzzle, the 15-puzzle and
//! their `N x N` generalisations) optimally. A parity check first decides
//! whether the goal is reachable at all; if it is, an iterative-deepening search
//! guided by the Manhattan distance returns a shortest sequence of blank moves.
//!
//! It is used by two binaries:
//! - `solve_puzzle`: Reads a puzzle file and prints the optimal move sequence.
//! - `scramble_bench`: Solves a series of seeded random scrambles and reports
//!   search statistics.
//!
//! ## Modules
//! - `engine`: The grid representation (`Grid`), tile labels (`Tile`), blank
//!   moves (`Direction`), scrambling and rendering.
//! - `solvability`: Inversion counting and the parity decision procedure.
//! - `heuristics`: The Manhattan-distance estimator.
//! - `state`: Search nodes (`BoardState`) and the per-round `StateArena`.
//! - `moves`: Successor generation.
//! - `solver`: The iterative-deepening driver (`Solver`, `solve`) and `SearchLimits`.
//! - `utils`: Parsing grids and puzzle files from text.
//! - `error`: `PuzzleError` and `MalformedInput`.
//!
//! ## Example
//! ```
//! use npuzzle_solver::{solve, Grid, Outcome};
//!
//! let start = Grid::from_rows(&[[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap();
//! let goal = Grid::solved(3).unwrap();
//!
//! match solve(&start, &goal).unwrap() {
//!     Outcome::Solved(solution) => assert_eq!(solution.move_count, 2),
//!     Outcome::Unsolvable => unreachable!(),
//! }
//! ```

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod moves;
pub mod solvability;
pub mod solver;
pub mod state;
pub mod utils;

pub use crate::engine::{Direction, Grid, Tile, BLANK};
pub use crate::error::{MalformedInput, PuzzleError};
pub use crate::solver::{solve, Outcome, SearchLimits, Solution, Solver};
