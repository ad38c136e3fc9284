use crate::engine::{Grid, Tile};
use crate::error::{MalformedInput, PuzzleError};
use std::fs;
use std::path::Path;

/// A puzzle as read from text: the initial grid and, optionally, its goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    pub initial: Grid,
    /// `None` when the input only described the initial grid.
    pub goal: Option<Grid>,
}

impl Puzzle {
    /// Returns the explicit goal, or the ordered grid with the blank at `blank_index`.
    ///
    /// `blank_index` is a row-major cell index; `None` puts the blank in the
    /// bottom-right corner.
    pub fn goal_or_default(&self, blank_index: Option<usize>) -> Result<Grid, PuzzleError> {
        if let Some(goal) = &self.goal {
            return Ok(goal.clone());
        }
        let dimension = self.initial.dimension();
        let index = blank_index.unwrap_or(dimension * dimension - 1);
        Ok(Grid::solved_with_blank_at(dimension, index)?)
    }
}

/// Converts a signed blank index as given on the command line.
///
/// `-1` (like no value at all) selects the default bottom-right blank; other
/// negative values are rejected. Whether a non-negative index fits the grid is
/// checked later, once the dimension is known.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::blank_index_from_arg;
///
/// assert_eq!(blank_index_from_arg(None), Ok(None));
/// assert_eq!(blank_index_from_arg(Some(-1)), Ok(None));
/// assert_eq!(blank_index_from_arg(Some(4)), Ok(Some(4)));
/// assert!(blank_index_from_arg(Some(-2)).is_err());
/// ```
pub fn blank_index_from_arg(value: Option<i64>) -> Result<Option<usize>, MalformedInput> {
    match value {
        None | Some(-1) => Ok(None),
        Some(index) => usize::try_from(index)
            .map(Some)
            .map_err(|_| MalformedInput::InvalidBlankIndex(index)),
    }
}

/// Parses one grid from text, one row per line.
///
/// Tiles are whitespace-separated non-negative integers with `0` for the blank.
/// Empty lines and lines starting with `#` are ignored.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::parse_grid;
///
/// let grid = parse_grid("1 2 3\n4 0 6\n7 5 8\n").unwrap();
/// assert_eq!(grid.dimension(), 3);
/// assert_eq!(grid.blank_position(), (1, 1));
///
/// assert!(parse_grid("1 2\n3 x\n").is_err());
/// assert!(parse_grid("1 2 3\n4 0\n").is_err());
/// ```
pub fn parse_grid(text: &str) -> Result<Grid, PuzzleError> {
    let rows = parse_rows(text.lines().enumerate())?;
    Ok(Grid::from_rows(&rows)?)
}

/// Parses a puzzle: the initial grid, a blank line, then an optional goal grid.
///
/// # Arguments
/// * `text`: The puzzle description. Rows hold whitespace-separated tiles;
///   lines starting with `#` are comments and may appear anywhere.
///
/// # Returns
/// * `Ok(Puzzle)` with `goal` set if a second block of rows was present.
/// * `Err(PuzzleError::Parse)` for a token that is not a tile.
/// * `Err(PuzzleError::TrailingContent)` if a third block of rows follows.
/// * `Err(PuzzleError::Malformed)` if either block is not a valid grid, or the
///   goal's dimension differs from the initial grid's.
pub fn parse_puzzle(text: &str) -> Result<Puzzle, PuzzleError> {
    let mut blocks: Vec<Vec<(usize, &str)>> = vec![Vec::new()];
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            // Consecutive empty lines only close one block.
            if blocks.last().map_or(false, |b| !b.is_empty()) {
                blocks.push(Vec::new());
            }
            continue;
        }
        if blocks.len() > 2 {
            return Err(PuzzleError::TrailingContent { line: idx + 1 });
        }
        if let Some(block) = blocks.last_mut() {
            block.push((idx, line));
        }
    }
    blocks.retain(|b| !b.is_empty());

    let mut grids = Vec::with_capacity(blocks.len());
    for block in blocks {
        let rows = parse_rows(block.into_iter())?;
        grids.push(Grid::from_rows(&rows)?);
    }

    let mut grids = grids.into_iter();
    let initial = match grids.next() {
        Some(grid) => grid,
        None => return Err(MalformedInput::Empty.into()),
    };
    let goal = grids.next();
    if let Some(goal) = &goal {
        if goal.dimension() != initial.dimension() {
            return Err(MalformedInput::DimensionMismatch {
                initial: initial.dimension(),
                goal: goal.dimension(),
            }
            .into());
        }
    }
    Ok(Puzzle { initial, goal })
}

/// Reads and parses a puzzle file. See [`parse_puzzle`] for the format.
pub fn read_puzzle_file(path: &Path) -> Result<Puzzle, PuzzleError> {
    let content = fs::read_to_string(path)?;
    parse_puzzle(&content)
}

fn parse_rows<'a>(
    lines: impl Iterator<Item = (usize, &'a str)>,
) -> Result<Vec<Vec<Tile>>, PuzzleError> {
    let mut rows = Vec::new();
    for (idx, line) in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<Tile>().map_err(|_| PuzzleError::Parse {
                    line: idx + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<Tile>, PuzzleError>>()?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_puzzle_with_goal() {
        let text = "\
# start
1 2 3
4 0 6
7 5 8

# goal
1 2 3
4 5 6
7 8 0
";
        let puzzle = parse_puzzle(text).unwrap();
        assert_eq!(puzzle.initial.cells(), &[1, 2, 3, 4, 0, 6, 7, 5, 8]);
        assert_eq!(puzzle.goal, Some(Grid::solved(3).unwrap()));
    }

    #[test]
    fn test_parse_puzzle_without_goal_uses_default() {
        let puzzle = parse_puzzle("3 1\n2 0\n\n\n").unwrap();
        assert!(puzzle.goal.is_none());
        assert_eq!(puzzle.goal_or_default(None).unwrap(), Grid::solved(2).unwrap());
        assert_eq!(puzzle.goal_or_default(Some(0)).unwrap().cells(), &[0, 1, 2, 3]);
        assert!(puzzle.goal_or_default(Some(4)).is_err());
    }

    #[test]
    fn test_blank_index_from_arg() {
        assert_eq!(blank_index_from_arg(None), Ok(None));
        assert_eq!(blank_index_from_arg(Some(-1)), Ok(None));
        assert_eq!(blank_index_from_arg(Some(0)), Ok(Some(0)));
        assert_eq!(blank_index_from_arg(Some(8)), Ok(Some(8)));
        assert_eq!(
            blank_index_from_arg(Some(-2)),
            Err(MalformedInput::InvalidBlankIndex(-2))
        );
        assert_eq!(
            blank_index_from_arg(Some(i64::MIN)),
            Err(MalformedInput::InvalidBlankIndex(i64::MIN))
        );

        // -1 falls back to the bottom-right blank, like an absent flag.
        let puzzle = parse_puzzle("3 1\n2 0\n").unwrap();
        let index = blank_index_from_arg(Some(-1)).unwrap();
        assert_eq!(puzzle.goal_or_default(index).unwrap(), Grid::solved(2).unwrap());
    }

    #[test]
    fn test_parse_puzzle_bad_token_reports_line() {
        let err = parse_puzzle("1 2\n3 -1\n").unwrap_err();
        match err {
            PuzzleError::Parse { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "-1");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_puzzle_trailing_block() {
        let err = parse_puzzle("1 2\n3 0\n\n1 2\n3 0\n\n1 2\n3 0\n").unwrap_err();
        assert!(matches!(err, PuzzleError::TrailingContent { line: 7 }));
    }

    #[test]
    fn test_parse_puzzle_dimension_mismatch() {
        let err = parse_puzzle("1 2\n3 0\n\n1 2 3\n4 5 6\n7 8 0\n").unwrap_err();
        assert!(matches!(
            err,
            PuzzleError::Malformed(MalformedInput::DimensionMismatch { initial: 2, goal: 3 })
        ));
    }

    #[test]
    fn test_parse_puzzle_empty_input() {
        let err = parse_puzzle("# nothing here\n\n").unwrap_err();
        assert!(matches!(err, PuzzleError::Malformed(MalformedInput::Empty)));
    }

    #[test]
    fn test_parse_grid_duplicate_tile() {
        let err = parse_grid("1 1\n2 0").unwrap_err();
        assert!(matches!(err, PuzzleError::Malformed(MalformedInput::DuplicateTile(1))));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_puzzle_file(Path::new("definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, PuzzleError::Io(_)));
    }
}
