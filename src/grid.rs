//! Grid data model shared by the generator and the solver.
//!
//! A [`Grid`] is a square array of [`Cell`]s stored row-major. Each cell carries its four wall
//! flags, a visited flag reused by both algorithms, and the scratch fields needed by the search
//! strategies to rebuild a path.

use std::fmt;

use crate::error::MazeError;

/// Smallest grid side accepted by the core.
pub const MIN_SIZE: usize = 1;

/// Largest grid side accepted by the core.
pub const MAX_SIZE: usize = 50;

/// Coordinates of a cell, `x` being the column and `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Column of the cell.
    pub x: usize,
    /// Row of the cell.
    pub y: usize,
}

impl Position {
    /// Builds a position from a column and a row.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|dx| + |dy|` to another position.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the position one cell away on the given side, if it stays inside a grid whose side
    /// is `bound` cells long.
    #[must_use]
    pub fn step(self, side: Side, bound: usize) -> Option<Self> {
        let (x, y) = match side {
            Side::Top => (Some(self.x), self.y.checked_sub(1)),
            Side::Right => (self.x.checked_add(1), Some(self.y)),
            Side::Bottom => (Some(self.x), self.y.checked_add(1)),
            Side::Left => (self.x.checked_sub(1), Some(self.y)),
        };

        Some(Self::new(x?, y?)).filter(|next| next.x < bound && next.y < bound)
    }

    /// Side of `self` that faces `other`, or [`None`] when both are not grid-adjacent.
    #[must_use]
    pub fn side_towards(self, other: Self) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| self.step(*side, usize::MAX) == Some(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four boundaries of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Boundary shared with the row above.
    Top,
    /// Boundary shared with the next column.
    Right,
    /// Boundary shared with the row below.
    Bottom,
    /// Boundary shared with the previous column.
    Left,
}

impl Side {
    /// Every side, in the order neighbors are checked.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The side a neighboring cell sees this boundary from.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Bit used for this side inside [`Walls`].
    const fn bit(self) -> u8 {
        match self {
            Self::Top => 0b0001,
            Self::Right => 0b0010,
            Self::Bottom => 0b0100,
            Self::Left => 0b1000,
        }
    }
}

/// Set of walls standing around a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Walls(u8);

impl Walls {
    /// Every wall standing.
    const CLOSED: Self = Self(0b1111);

    /// Whether the wall on `side` is present.
    #[must_use]
    pub const fn has(self, side: Side) -> bool {
        self.0 & side.bit() != 0
    }

    /// Knocks down the wall on `side`.
    const fn remove(&mut self, side: Side) {
        self.0 &= !side.bit();
    }
}

/// A single maze cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Location of the cell inside its grid.
    pub(crate) position: Position,
    /// Walls still standing around the cell.
    pub(crate) walls: Walls,
    /// Carved during generation, discovered during a solve.
    pub(crate) visited: bool,
    /// Cell this one was discovered from during a solve.
    pub(crate) parent: Option<Position>,
    /// Cost from the start; [`None`] stands for an unreached cell.
    pub(crate) cost: Option<usize>,
    /// Estimated remaining cost to the goal.
    pub(crate) heuristic: usize,
    /// Sum of cost and heuristic; [`None`] until the cell is reached by A*.
    pub(crate) total: Option<usize>,
}

impl Cell {
    /// Builds a fully walled, unvisited cell.
    const fn new(position: Position) -> Self {
        Self {
            position,
            walls: Walls::CLOSED,
            visited: false,
            parent: None,
            cost: None,
            heuristic: 0,
            total: None,
        }
    }

    /// Restores every search scratch field, including the visited flag.
    const fn reset_search(&mut self) {
        self.visited = false;
        self.parent = None;
        self.cost = None;
        self.heuristic = 0;
        self.total = None;
    }

    /// Location of the cell.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Walls standing around the cell.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    /// Whether the cell has been carved or discovered.
    #[must_use]
    pub const fn visited(&self) -> bool {
        self.visited
    }

    /// Back-pointer recorded by the solver.
    #[must_use]
    pub const fn parent(&self) -> Option<Position> {
        self.parent
    }

    /// Cost from the start as computed by A*.
    #[must_use]
    pub const fn cost(&self) -> Option<usize> {
        self.cost
    }

    /// Heuristic estimate to the goal as computed by A*.
    #[must_use]
    pub const fn heuristic(&self) -> usize {
        self.heuristic
    }

    /// Total estimated cost as computed by A*.
    #[must_use]
    pub const fn total(&self) -> Option<usize> {
        self.total
    }
}

/// Square array of cells, indexed `[row][col]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of cells along each side.
    size: usize,
    /// Cells in row-major order.
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates a `size × size` grid with every wall standing.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidConfiguration`] when `size` is outside
    /// [`MIN_SIZE`]`..=`[`MAX_SIZE`]; nothing is allocated in that case.
    pub fn new(size: usize) -> Result<Self, MazeError> {
        let size = check_size(size, MIN_SIZE, MAX_SIZE)?;
        let cells = (0..size)
            .flat_map(|y| (0..size).map(move |x| Cell::new(Position::new(x, y))))
            .collect();

        Ok(Self { size, cells })
    }

    /// Number of cells along each side.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Top-left cell, where every run starts.
    #[must_use]
    pub const fn start(&self) -> Position {
        Position::new(0, 0)
    }

    /// Bottom-right cell, where every solve ends.
    #[must_use]
    pub const fn goal(&self) -> Position {
        let last = self.size.saturating_sub(1);
        Position::new(last, last)
    }

    /// Whether `position` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x < self.size && position.y < self.size
    }

    /// Flat index of `position`.
    const fn index(&self, position: Position) -> Option<usize> {
        if self.contains(position) {
            Some(position.y * self.size + position.x)
        } else {
            None
        }
    }

    /// Cell at `position`, if inside the grid.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).and_then(|index| self.cells.get(index))
    }

    /// Mutable cell at `position`, if inside the grid.
    pub(crate) fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.index(position)
            .and_then(move |index| self.cells.get_mut(index))
    }

    /// Every cell in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rows of cells from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }

    /// Whether a wall stands on `side` of the cell at `position`. Positions outside the grid are
    /// solid.
    #[must_use]
    pub fn has_wall(&self, position: Position, side: Side) -> bool {
        self.cell(position).is_none_or(|cell| cell.walls.has(side))
    }

    /// Whether the cell at `position` has been visited.
    #[must_use]
    pub fn is_visited(&self, position: Position) -> bool {
        self.cell(position).is_some_and(|cell| cell.visited)
    }

    /// Flags the cell at `position` as visited.
    pub(crate) fn mark_visited(&mut self, position: Position) {
        if let Some(cell) = self.cell_mut(position) {
            cell.visited = true;
        }
    }

    /// Unvisited grid-adjacent cells, ignoring walls, checked top, right, bottom, left.
    #[must_use]
    pub fn neighbors4(&self, position: Position) -> Vec<Position> {
        Side::ALL
            .into_iter()
            .filter_map(|side| position.step(side, self.size))
            .filter(|next| !self.is_visited(*next))
            .collect()
    }

    /// Cells reachable from `position` through an open side, checked top, right, bottom, left.
    #[must_use]
    pub fn passable_neighbors(&self, position: Position) -> Vec<Position> {
        Side::ALL
            .into_iter()
            .filter(|side| !self.has_wall(position, *side))
            .filter_map(|side| position.step(side, self.size))
            .collect()
    }

    /// Knocks down the wall shared by two adjacent cells, on both sides.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidAdjacency`] when the cells are not at Manhattan distance one or
    /// either of them lies outside the grid. The grid is left untouched in that case.
    pub fn connect(&mut self, first: Position, second: Position) -> Result<(), MazeError> {
        let invalid = MazeError::InvalidAdjacency { first, second };
        if !self.contains(first) || !self.contains(second) {
            return Err(invalid);
        }
        let side = first.side_towards(second).ok_or(invalid)?;

        if let Some(cell) = self.cell_mut(first) {
            cell.walls.remove(side);
        }
        if let Some(cell) = self.cell_mut(second) {
            cell.walls.remove(side.opposite());
        }

        Ok(())
    }

    /// Number of wall pairs that have been knocked down.
    #[must_use]
    pub fn open_connections(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Side::Right, Side::Bottom]
                    .into_iter()
                    .filter(|side| {
                        !cell.walls.has(*side) && cell.position.step(*side, self.size).is_some()
                    })
                    .count()
            })
            .sum()
    }

    /// Checks that every wall between adjacent cells is seen identically from both sides.
    #[must_use]
    pub fn walls_mirrored(&self) -> bool {
        self.cells.iter().all(|cell| {
            Side::ALL.into_iter().all(|side| {
                cell.position
                    .step(side, self.size)
                    .is_none_or(|next| cell.walls.has(side) == self.has_wall(next, side.opposite()))
            })
        })
    }

    /// Clears visited flags and search scratch fields, leaving the walls alone.
    pub fn reset_search_state(&mut self) {
        for cell in &mut self.cells {
            cell.reset_search();
        }
    }
}

/// Validates a grid side against inclusive bounds.
///
/// # Errors
///
/// Returns [`MazeError::InvalidConfiguration`] when `size` is outside `min..=max`.
pub const fn check_size(size: usize, min: usize, max: usize) -> Result<usize, MazeError> {
    if size < min || size > max {
        Err(MazeError::InvalidConfiguration { size, min, max })
    } else {
        Ok(size)
    }
}
