//! Grid game rules for the collection game.
//!
//! This module defines the game's fundamental components:
//! - `Move`: The four directional actions plus `Stop`.
//! - `ItemGrid`: Row-major boolean grid marking the cells that still hold an item.
//! - `Layout`: The immutable wall map shared by every state of one game.
//! - `GameState`: Actor position plus remaining items, with successor generation
//!   and win detection. It implements `PlanningState`, the only view the search has of it.
use crate::solver::PlanningState;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::Arc;

/// A `(row, col)` cell coordinate. Row 0 is the top row.
pub type Position = (usize, usize);

/// An action the actor can take on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// One row up.
    North,
    /// One row down.
    South,
    /// One column right.
    East,
    /// One column left.
    West,
    /// Stay in place.
    Stop,
}

impl Move {
    /// The moves that actually change the actor's position, in expansion order.
    pub const DIRECTIONS: [Move; 4] = [Move::North, Move::South, Move::East, Move::West];

    /// Returns the cell reached by taking this move from `pos`, or `None` if it
    /// would leave a `rows` x `cols` grid. Walls are not considered here.
    ///
    /// # Examples
    ///
    /// ```
    /// use grid_planner::engine::Move;
    /// assert_eq!(Move::East.step_from((0, 0), 1, 4), Some((0, 1)));
    /// assert_eq!(Move::North.step_from((0, 0), 1, 4), None);
    /// assert_eq!(Move::Stop.step_from((0, 2), 1, 4), Some((0, 2)));
    /// ```
    pub fn step_from(self, pos: Position, rows: usize, cols: usize) -> Option<Position> {
        let (r, c) = pos;
        let next = match self {
            Move::North => (r.checked_sub(1)?, c),
            Move::South => (r + 1, c),
            Move::East => (r, c + 1),
            Move::West => (r, c.checked_sub(1)?),
            Move::Stop => (r, c),
        };
        if next.0 < rows && next.1 < cols {
            Some(next)
        } else {
            None
        }
    }

    /// Single-letter form used when printing plans.
    pub fn to_char(self) -> char {
        match self {
            Move::North => 'N',
            Move::South => 'S',
            Move::East => 'E',
            Move::West => 'W',
            Move::Stop => '-',
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::North => "North",
            Move::South => "South",
            Move::East => "East",
            Move::West => "West",
            Move::Stop => "Stop",
        };
        f.write_str(name)
    }
}

/// Row-major grid of item flags (`true` = an item is still on that cell).
///
/// Equality and hashing are by value, which is what lets the grid take part in
/// [`crate::solver::StateKey`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl ItemGrid {
    /// Creates a `rows` x `cols` grid with no items.
    pub fn new(rows: usize, cols: usize) -> Self {
        ItemGrid {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether an item sits on `pos`. Out-of-bounds cells hold nothing.
    pub fn get(&self, pos: Position) -> bool {
        self.index(pos).map_or(false, |i| self.cells[i])
    }

    /// Places or removes an item. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, present: bool) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = present;
        }
    }

    /// Number of items left on the grid.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&present| present).count()
    }

    /// Positions of all remaining items, in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &present)| present)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    fn index(&self, (r, c): Position) -> Option<usize> {
        if r < self.rows && c < self.cols {
            Some(r * self.cols + c)
        } else {
            None
        }
    }
}

/// The wall map of a game. It never changes during play, so every
/// `GameState` of one game shares it through an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    rows: usize,
    cols: usize,
    walls: Vec<bool>,
}

impl Layout {
    /// Creates an open `rows` x `cols` layout without walls.
    pub fn new(rows: usize, cols: usize) -> Self {
        Layout {
            rows,
            cols,
            walls: vec![false; rows * cols],
        }
    }

    /// Creates a layout where each cell is a wall with probability `wall_density`.
    ///
    /// The same seed always yields the same layout. `wall_density` is clamped to `[0, 1]`.
    pub fn random_with_seed(rows: usize, cols: usize, wall_density: f64, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        Self::random_with_rng(rows, cols, wall_density, &mut rng)
    }

    fn random_with_rng(rows: usize, cols: usize, wall_density: f64, rng: &mut impl Rng) -> Self {
        let p = wall_density.clamp(0.0, 1.0);
        let walls = (0..rows * cols).map(|_| rng.gen_bool(p)).collect();
        Layout { rows, cols, walls }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `pos` is blocked. Cells outside the grid count as walls.
    pub fn is_wall(&self, (r, c): Position) -> bool {
        if r < self.rows && c < self.cols {
            self.walls[r * self.cols + c]
        } else {
            true
        }
    }

    /// Turns a cell into a wall (or back into floor). Out-of-bounds writes are ignored.
    pub fn set_wall(&mut self, (r, c): Position, wall: bool) {
        if r < self.rows && c < self.cols {
            self.walls[r * self.cols + c] = wall;
        }
    }

    /// All walkable cells in row-major order.
    pub fn floor_cells(&self) -> Vec<Position> {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .filter(|&pos| !self.is_wall(pos))
            .collect()
    }

    /// The cell reached from `pos` by `mv`, if it is inside the grid and not a wall.
    pub fn target(&self, pos: Position, mv: Move) -> Option<Position> {
        mv.step_from(pos, self.rows, self.cols)
            .filter(|&next| !self.is_wall(next))
    }
}

/// One snapshot of the game: where the actor stands and which items remain.
///
/// States are values; `successor` and `generate_successors` never modify `self`.
#[derive(Clone, Debug)]
pub struct GameState {
    layout: Arc<Layout>,
    position: Position,
    items: ItemGrid,
    steps: u32,
}

impl GameState {
    /// Creates a state with the actor on `position`.
    ///
    /// An item placed under the actor's starting cell counts as already collected,
    /// and is removed.
    pub fn new(layout: Arc<Layout>, position: Position, mut items: ItemGrid) -> Self {
        items.set(position, false);
        GameState {
            layout,
            position,
            items,
            steps: 0,
        }
    }

    /// Creates a reproducible random game: a random layout (see
    /// [`Layout::random_with_seed`]), the actor on a random floor cell and up to
    /// `item_count` items on other distinct floor cells.
    ///
    /// If the random layout has no floor at all, the top-left cell is opened for
    /// the actor. Fewer than `item_count` items are placed when the layout does
    /// not have enough free floor.
    pub fn random_with_seed(
        rows: usize,
        cols: usize,
        wall_density: f64,
        item_count: usize,
        seed: u64,
    ) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut layout = Layout::random_with_rng(rows, cols, wall_density, &mut rng);

        let mut floor = layout.floor_cells();
        if floor.is_empty() {
            layout.set_wall((0, 0), false);
            floor.push((0, 0));
        }
        floor.shuffle(&mut rng);

        let position = floor[0];
        let mut items = ItemGrid::new(rows, cols);
        for &pos in floor.iter().skip(1).take(item_count) {
            items.set(pos, true);
        }

        GameState::new(Arc::new(layout), position, items)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn items(&self) -> &ItemGrid {
        &self.items
    }

    /// Number of items left to collect.
    pub fn item_count(&self) -> usize {
        self.items.count()
    }

    /// Number of position-changing moves applied since the state was created.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// The game is won once every item has been collected.
    pub fn is_win(&self) -> bool {
        self.items.count() == 0
    }

    /// Directions the actor can move in from its current cell.
    ///
    /// `Stop` is always legal but is not listed: it never leads to a new state.
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::DIRECTIONS
            .into_iter()
            .filter(|&mv| self.layout.target(self.position, mv).is_some())
            .collect()
    }

    /// Returns the state after taking `mv`, or `None` if `mv` runs into a wall or
    /// off the grid. Entering a cell collects the item on it.
    pub fn successor(&self, mv: Move) -> Option<GameState> {
        if mv == Move::Stop {
            return Some(self.clone());
        }
        let next = self.layout.target(self.position, mv)?;
        let mut items = self.items.clone();
        items.set(next, false);
        Some(GameState {
            layout: Arc::clone(&self.layout),
            position: next,
            items,
            steps: self.steps + 1,
        })
    }

    /// All `(state, move)` pairs reachable in one legal move.
    pub fn generate_successors(&self) -> Vec<(GameState, Move)> {
        self.legal_moves()
            .into_iter()
            .filter_map(|mv| self.successor(mv).map(|next| (next, mv)))
            .collect()
    }

    /// Applies `mv` in place.
    ///
    /// # Returns
    /// `true` if the move was legal (including `Stop`), `false` if it was
    /// blocked, in which case the state is unchanged.
    pub fn apply_move(&mut self, mv: Move) -> bool {
        match self.successor(mv) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }
}

impl PlanningState for GameState {
    fn position(&self) -> Position {
        self.position
    }

    fn item_grid(&self) -> &ItemGrid {
        &self.items
    }

    fn is_win(&self) -> bool {
        GameState::is_win(self)
    }

    fn successors(&self) -> Vec<(Self, Move)> {
        self.generate_successors()
    }
}

impl fmt::Display for GameState {
    /// Renders the state in the text layout format accepted by
    /// [`crate::utils::state_from_str_array`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.layout.rows() {
            if r > 0 {
                writeln!(f)?;
            }
            for c in 0..self.layout.cols() {
                let ch = if (r, c) == self.position {
                    'P'
                } else if self.layout.is_wall((r, c)) {
                    '%'
                } else if self.items.get((r, c)) {
                    'F'
                } else {
                    '.'
                };
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}
