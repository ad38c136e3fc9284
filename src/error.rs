//! Error types shared by the parser, the grid constructors and the solver.
//!
//! An unsolvable puzzle is *not* an error: it is reported through
//! [`crate::solver::Outcome::Unsolvable`]. Everything here is a failure the
//! caller has to handle.

use std::io;

use thiserror::Error;

use crate::engine::Tile;

/// Reasons a grid (or a pair of grids) is rejected before any search starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("grid has no rows")]
    Empty,
    #[error("grid dimension {0} is too small, at least 2x2 is required")]
    TooSmall(usize),
    #[error("grid dimension {0} is too large, at most 255x255 is supported")]
    TooLarge(usize),
    #[error("row {row} has {found} tiles, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("tile {tile} is out of range, tiles must lie in 0..={max}")]
    TileOutOfRange { tile: Tile, max: usize },
    #[error("tile {0} appears more than once")]
    DuplicateTile(Tile),
    #[error("initial grid is {initial}x{initial} but goal grid is {goal}x{goal}")]
    DimensionMismatch { initial: usize, goal: usize },
    #[error("blank index {index} is outside a grid of {cells} cells")]
    BlankIndexOutOfRange { index: usize, cells: usize },
    #[error("blank index {0} is invalid, expected -1 or a cell index")]
    InvalidBlankIndex(i64),
}

/// Which [`crate::solver::SearchLimits`] bound stopped the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustedLimit {
    Rounds,
    Expansions,
    Time,
}

impl std::fmt::Display for ExhaustedLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExhaustedLimit::Rounds => "round limit",
            ExhaustedLimit::Expansions => "expansion limit",
            ExhaustedLimit::Time => "time limit",
        };
        write!(f, "{}", name)
    }
}

/// Top-level error for every fallible operation in this crate.
#[derive(Error, Debug)]
pub enum PuzzleError {
    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInput),

    #[error("line {line}: cannot parse {token:?} as a tile")]
    Parse { line: usize, token: String },

    #[error("line {line}: unexpected content after the goal grid")]
    TrailingContent { line: usize },

    #[error("search exhausted ({limit}) after {rounds} rounds and {expansions} expansions")]
    SearchExhausted {
        limit: ExhaustedLimit,
        rounds: u32,
        expansions: u64,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl PuzzleError {
    /// Returns `true` when the error was caused by the shape or contents of the input grids.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            PuzzleError::Malformed(_)
                | PuzzleError::Parse { .. }
                | PuzzleError::TrailingContent { .. }
        )
    }
}
