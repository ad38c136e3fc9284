//! Search nodes and their per-round storage.

use crate::engine::{Direction, Grid};

/// Index of a [`BoardState`] inside the [`StateArena`] of the current round.
pub type StateId = usize;

/// A configuration reached during search, together with its bookkeeping.
///
/// The grid is owned by the state and never changes after creation. The
/// predecessor is an index into the arena of the same round, so it does not own
/// the parent and is only followed to rebuild the path.
#[derive(Clone, Debug)]
pub struct BoardState {
    grid: Grid,
    g: u32,
    f: u32,
    predecessor: Option<(StateId, Direction)>,
}

impl BoardState {
    /// Creates the seed state of a round: `g = 0`, no predecessor.
    pub fn initial(grid: Grid, h: u32) -> Self {
        BoardState {
            grid,
            g: 0,
            f: h,
            predecessor: None,
        }
    }

    /// Creates a state reached from `parent` by moving the blank in `direction`.
    pub fn child(grid: Grid, g: u32, h: u32, parent: StateId, direction: Direction) -> Self {
        BoardState {
            grid,
            g,
            f: g + h,
            predecessor: Some((parent, direction)),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of moves from the initial configuration.
    pub fn g(&self) -> u32 {
        self.g
    }

    /// `g` plus the heuristic estimate to the goal.
    pub fn f(&self) -> u32 {
        self.f
    }

    /// The state this one was expanded from and the move that produced it.
    pub fn predecessor(&self) -> Option<(StateId, Direction)> {
        self.predecessor
    }

    /// Heuristic part of `f`.
    pub fn h(&self) -> u32 {
        self.f - self.g
    }
}

/// Arena holding every state created during one bounded round.
///
/// Dropping the arena at the end of a round releases all its states at once.
pub struct StateArena {
    states: Vec<BoardState>,
}

impl StateArena {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn push(&mut self, state: BoardState) -> StateId {
        let id = self.states.len();
        self.states.push(state);
        id
    }

    pub fn get(&self, id: StateId) -> &BoardState {
        &self.states[id]
    }

    /// Walks predecessor links back from `id` and returns the moves in forward order.
    pub fn path_to(&self, id: StateId) -> Vec<Direction> {
        let mut moves = Vec::new();
        let mut current = self.get(id);
        while let Some((parent, direction)) = current.predecessor() {
            moves.push(direction);
            current = self.get(parent);
        }
        moves.reverse();
        moves
    }
}

impl Default for StateArena {
    fn default() -> Self {
        Self::new()
    }
}
