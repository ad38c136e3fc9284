//! Core puzzle representation for the sliding-tile puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Tile`: the label of a single cell, with `BLANK` (`0`) marking the empty cell.
//! - `Direction`: one of the four displacements of the blank.
//! - `Grid`: an immutable `N x N` configuration with pure move application,
//!   seeded scrambling and text rendering.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;

use crate::error::MalformedInput;

/// Label of a single cell. Valid labels for an `N x N` grid are `0..N*N`.
pub type Tile = u16;

/// The label reserved for the empty cell.
pub const BLANK: Tile = 0;

/// Largest supported grid dimension (so that every label fits in a `Tile`).
pub const MAX_DIMENSION: usize = 255;

/// A move of the blank: the blank exchanges places with its neighbour in this direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Every direction, in the fixed order used for successor generation.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column delta applied to the blank.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The direction that undoes this one.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::Direction;
    /// assert_eq!(Direction::Up.opposite(), Direction::Down);
    /// assert_eq!(Direction::Left.opposite(), Direction::Right);
    /// ```
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!("Unrecognized direction '{}'", other)),
        }
    }
}

/// An `N x N` puzzle configuration.
///
/// Tiles are stored row-major. A `Grid` is only ever built through the validating
/// constructors, so every label in `0..N*N` appears exactly once and the blank
/// position is always known. Moves never mutate a grid; they return a new one.
/// Equality and hashing compare the full configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    dimension: usize,
    cells: Vec<Tile>,
    blank: usize,
}

impl Grid {
    /// Builds a grid from a slice of rows.
    ///
    /// # Arguments
    /// * `rows`: The rows of the grid, top to bottom. Every row must have as many
    ///   tiles as there are rows.
    ///
    /// # Returns
    /// * `Ok(Grid)` if the rows form a square of side at least 2 holding every
    ///   label `0..N*N` exactly once.
    /// * `Err(MalformedInput)` describing the first problem found otherwise.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::Grid;
    ///
    /// let grid = Grid::from_rows(&[[1, 2], [3, 0]]).unwrap();
    /// assert_eq!(grid.dimension(), 2);
    /// assert_eq!(grid.blank_position(), (1, 1));
    ///
    /// assert!(Grid::from_rows(&[[1, 1], [3, 0]]).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, MalformedInput> {
        let dimension = rows.len();
        if dimension == 0 {
            return Err(MalformedInput::Empty);
        }
        let mut cells = Vec::with_capacity(dimension * dimension);
        for (row, tiles) in rows.iter().enumerate() {
            let tiles = tiles.as_ref();
            if tiles.len() != dimension {
                return Err(MalformedInput::NotSquare {
                    row,
                    expected: dimension,
                    found: tiles.len(),
                });
            }
            cells.extend_from_slice(tiles);
        }
        Self::from_cells(dimension, cells)
    }

    /// Builds a grid from row-major cells.
    ///
    /// Fails if `cells.len()` is not `dimension * dimension` or the labels are not
    /// a permutation of `0..dimension * dimension`.
    pub fn from_cells(dimension: usize, cells: Vec<Tile>) -> Result<Self, MalformedInput> {
        check_dimension(dimension)?;
        if cells.len() != dimension * dimension {
            // Report the first row that does not fit.
            let row = (cells.len() / dimension).min(dimension - 1);
            return Err(MalformedInput::NotSquare {
                row,
                expected: dimension,
                found: cells.len().saturating_sub(row * dimension),
            });
        }

        let max = cells.len() - 1;
        let mut seen = vec![false; cells.len()];
        for &tile in &cells {
            let idx = tile as usize;
            if idx > max {
                return Err(MalformedInput::TileOutOfRange { tile, max });
            }
            if seen[idx] {
                return Err(MalformedInput::DuplicateTile(tile));
            }
            seen[idx] = true;
        }

        // Every label is present exactly once, so the blank exists.
        let blank = cells.iter().position(|&t| t == BLANK).unwrap_or_default();
        Ok(Grid {
            dimension,
            cells,
            blank,
        })
    }

    /// The ordered grid `1, 2, …, N*N-1` with the blank in the bottom-right corner.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::Grid;
    /// let goal = Grid::solved(3).unwrap();
    /// assert_eq!(goal.cells(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
    /// ```
    pub fn solved(dimension: usize) -> Result<Self, MalformedInput> {
        check_dimension(dimension)?;
        Self::solved_with_blank_at(dimension, dimension * dimension - 1)
    }

    /// The ordered grid with the blank inserted at row-major `index`.
    ///
    /// Tiles keep their ascending order around the blank, so for a 3x3 grid and
    /// `index = 4` the result is `1 2 3 / 4 0 5 / 6 7 8`.
    pub fn solved_with_blank_at(dimension: usize, index: usize) -> Result<Self, MalformedInput> {
        check_dimension(dimension)?;
        let cells_count = dimension * dimension;
        if index >= cells_count {
            return Err(MalformedInput::BlankIndexOutOfRange {
                index,
                cells: cells_count,
            });
        }
        let mut cells: Vec<Tile> = (1..cells_count as Tile).collect();
        cells.insert(index, BLANK);
        Ok(Grid {
            dimension,
            cells,
            blank: index,
        })
    }

    /// Side length `N` of the grid.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Row-major view of all cells.
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.cells.chunks(self.dimension)
    }

    /// Returns the tile at row `r`, column `c`, or `None` outside the grid.
    pub fn get_tile(&self, r: usize, c: usize) -> Option<Tile> {
        if r >= self.dimension || c >= self.dimension {
            return None;
        }
        Some(self.cells[r * self.dimension + c])
    }

    /// `(row, column)` of the blank.
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.dimension, self.blank % self.dimension)
    }

    /// `(row, column)` of `tile`, or `None` if the label is not on this grid.
    pub fn position_of(&self, tile: Tile) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&t| t == tile)
            .map(|idx| (idx / self.dimension, idx % self.dimension))
    }

    /// Returns the grid reached by moving the blank in `direction`.
    ///
    /// `self` is left untouched. Returns `None` when the move would take the blank
    /// outside the grid.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::{Direction, Grid};
    ///
    /// let grid = Grid::from_rows(&[[1, 2], [3, 0]]).unwrap();
    /// let moved = grid.apply_move(Direction::Up).unwrap();
    /// assert_eq!(moved.cells(), &[1, 0, 3, 2]);
    /// assert!(grid.apply_move(Direction::Down).is_none());
    /// ```
    pub fn apply_move(&self, direction: Direction) -> Option<Grid> {
        let target = self.blank_target(direction)?;
        let mut cells = self.cells.clone();
        cells.swap(self.blank, target);
        Some(Grid {
            dimension: self.dimension,
            cells,
            blank: target,
        })
    }

    /// Replays `moves` in order, returning the final grid or `None` if any move is illegal.
    pub fn apply_moves(&self, moves: &[Direction]) -> Option<Grid> {
        moves
            .iter()
            .try_fold(self.clone(), |grid, &direction| grid.apply_move(direction))
    }

    /// Directions in which the blank can currently move, in `Direction::ALL` order.
    pub fn legal_moves(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |&d| self.blank_target(d).is_some())
    }

    /// Lazily yields every `(direction, grid)` one move away from `self`.
    pub fn neighbours(&self) -> impl Iterator<Item = (Direction, Grid)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.apply_move(d).map(|grid| (d, grid)))
    }

    /// Produces a reproducible scramble of `self` by a random walk of the blank.
    ///
    /// The walk never immediately undoes its previous move, so short walks stay
    /// meaningful. Since every step is a legal move, the result is always
    /// solvable back to `self`.
    ///
    /// # Arguments
    /// * `steps`: Number of blank moves in the walk.
    /// * `seed`: Seed for the `SmallRng` driving the walk.
    pub fn scrambled(&self, steps: usize, seed: u64) -> Grid {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut grid = self.clone();
        let mut last: Option<Direction> = None;
        for _ in 0..steps {
            let options: Vec<Direction> = grid
                .legal_moves()
                .filter(|d| last.map_or(true, |l| *d != l.opposite()))
                .collect();
            // A grid of dimension >= 2 always has at least two legal moves.
            let Some(&direction) = options.choose(&mut rng) else {
                break;
            };
            if let Some(next) = grid.apply_move(direction) {
                grid = next;
                last = Some(direction);
            }
        }
        grid
    }

    fn blank_target(&self, direction: Direction) -> Option<usize> {
        let (r, c) = self.blank_position();
        let (dr, dc) = direction.offset();
        let nr = r.checked_add_signed(dr).filter(|&v| v < self.dimension)?;
        let nc = c.checked_add_signed(dc).filter(|&v| v < self.dimension)?;
        Some(nr * self.dimension + nc)
    }
}

fn check_dimension(dimension: usize) -> Result<(), MalformedInput> {
    if dimension == 0 {
        Err(MalformedInput::Empty)
    } else if dimension < 2 {
        Err(MalformedInput::TooSmall(dimension))
    } else if dimension > MAX_DIMENSION {
        Err(MalformedInput::TooLarge(dimension))
    } else {
        Ok(())
    }
}

impl fmt::Display for Grid {
    /// Renders the grid one row per line, right-aligned, with `.` for the blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cells.len() - 1).to_string().len() + 1;
        for (r_idx, row) in self.rows().enumerate() {
            for &tile in row {
                if tile == BLANK {
                    write!(f, "{:>width$}", ".", width = width)?;
                } else {
                    write!(f, "{:>width$}", tile, width = width)?;
                }
            }
            if r_idx < self.dimension - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
