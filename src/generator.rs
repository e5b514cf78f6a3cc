//! Perfect maze generation by randomized depth-first carving.
//!
//! The generator is an explicit step machine: each call to [`Generator::step`] performs exactly
//! one unit of work (carve into a random unvisited neighbor, or backtrack one cell), so the host can
//! render the grid between steps. The random source is a type parameter, which lets tests inject a
//! seeded generator.

use log::{debug, trace};
use rand::{rngs::StdRng, seq::IndexedRandom as _, Rng};

use crate::{
    error::MazeError,
    grid::{Grid, Position},
};

/// Lifecycle of a [`Generator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[expect(
    clippy::module_name_repetitions,
    reason = "The state is read next to solver and scheduler states, where a bare name is unclear."
)]
pub enum GeneratorState {
    /// Created, no step taken yet.
    Idle,
    /// At least one step taken, cells left to carve or backtrack through.
    Running,
    /// Every cell carved; the grid is a spanning tree.
    Done,
}

/// Outcome of a single generation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationStep {
    /// The wall between two cells was knocked down and the generator moved forward.
    Carved {
        /// Cell the generator was on.
        from: Position,
        /// Freshly carved cell, now current.
        to: Position,
    },
    /// A dead end was reached and the generator went back to this cell.
    Backtracked(Position),
    /// Nothing left to do.
    Finished,
}

/// Randomized backtracking maze generator.
///
/// This structure holds the grid being carved together with the walk that carves it. The walk
/// state lives here rather than on the call stack, so the carving can stop after any step.
#[derive(Debug)]
pub struct Generator<R = StdRng> {
    /// Grid being carved.
    ///
    /// This field starts fully walled and ends as a spanning tree of its cells. Its visited flags
    /// mark the carved cells.
    grid: Grid,
    /// Cells to come back to once the current branch dead-ends.
    ///
    /// This field holds the path from the start to the cell before the head of the walk, oldest
    /// first. Backtracking pops from it; an empty stack at a dead end means the maze is done.
    stack: Vec<Position>,
    /// Head of the carving walk.
    current: Position,
    /// Where the generator is in its lifecycle.
    state: GeneratorState,
    /// Number of steps taken, the final one included.
    ///
    /// This field reaches `2 * size * size - 1` once the maze is done: one step per carved cell,
    /// one per backtrack and the final one.
    steps: usize,
    /// Source of the neighbor choices.
    ///
    /// This field holds any [`Rng`], so tests can pass a seeded generator and get the same maze
    /// every time.
    rng: R,
}

impl<R: Rng> Generator<R> {
    /// Allocates a fresh, fully walled grid and positions the walk on its top-left cell.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidConfiguration`] if the grid cannot be allocated with that size.
    pub fn new(size: usize, rng: R) -> Result<Self, MazeError> {
        let mut grid = Grid::new(size)?;
        let current = grid.start();
        grid.mark_visited(current);

        Ok(Self {
            grid,
            stack: Vec::new(),
            current,
            state: GeneratorState::Idle,
            steps: 0,
            rng,
        })
    }

    /// Performs one unit of generation work.
    ///
    /// Once the generator is [`GeneratorState::Done`] this keeps returning
    /// [`GenerationStep::Finished`] without touching the grid.
    ///
    /// # Errors
    ///
    /// Propagates [`MazeError::InvalidAdjacency`] from [`Grid::connect`], which only happens if the
    /// grid neighbor query is broken.
    pub fn step(&mut self) -> Result<GenerationStep, MazeError> {
        if self.state == GeneratorState::Done {
            return Ok(GenerationStep::Finished);
        }
        self.state = GeneratorState::Running;
        self.steps += 1;

        let from = self.current;
        let neighbors = self.grid.neighbors4(from);

        let step = if let Some(&to) = neighbors.choose(&mut self.rng) {
            self.stack.push(from);
            self.grid.connect(from, to)?;
            self.grid.mark_visited(to);
            self.current = to;
            GenerationStep::Carved { from, to }
        } else if let Some(previous) = self.stack.pop() {
            self.current = previous;
            GenerationStep::Backtracked(previous)
        } else {
            self.state = GeneratorState::Done;
            debug!(
                "carved a {size}x{size} maze in {steps} steps",
                size = self.grid.size(),
                steps = self.steps
            );
            GenerationStep::Finished
        };
        trace!("generation step {}: {step:?}", self.steps);

        Ok(step)
    }

    /// Steps until the maze is finished and returns the number of steps taken.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Generator::step`].
    pub fn run(&mut self) -> Result<usize, MazeError> {
        while self.step()? != GenerationStep::Finished {}

        Ok(self.steps)
    }

    /// Grid as carved so far.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Hands over the carved grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Head of the carving walk.
    #[must_use]
    pub const fn current(&self) -> Position {
        self.current
    }

    /// Cells waiting to be backtracked to, oldest first.
    #[must_use]
    pub fn stack(&self) -> &[Position] {
        &self.stack
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GeneratorState {
        self.state
    }

    /// Steps taken so far.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    /// Builds a generator with a seeded random source.
    fn seeded(size: usize, seed: u64) -> Generator {
        Generator::new(size, StdRng::seed_from_u64(seed)).expect("size should be accepted")
    }

    /// Counts the cells reachable from the start by following open walls.
    fn reachable(grid: &Grid) -> usize {
        let mut seen = vec![grid.start()];
        let mut pending = vec![grid.start()];
        while let Some(position) = pending.pop() {
            for next in grid.passable_neighbors(position) {
                if !seen.contains(&next) {
                    seen.push(next);
                    pending.push(next);
                }
            }
        }

        seen.len()
    }

    #[test]
    fn test_generated_maze_is_spanning_tree() {
        for size in 1..=8 {
            for seed in 0..5 {
                let mut generator = seeded(size, seed);
                let _ = generator.run().expect("generation should succeed");
                let grid = generator.into_grid();

                assert_eq!(
                    grid.open_connections(),
                    size * size - 1,
                    "a spanning tree has one edge less than it has cells"
                );
                assert_eq!(
                    reachable(&grid),
                    size * size,
                    "every cell should be reachable from the start"
                );
                assert!(grid.cells().iter().all(|cell| cell.visited()));
            }
        }
    }

    #[test]
    fn test_walls_stay_mirrored_at_every_step() {
        let mut generator = seeded(6, 11);

        loop {
            let step = generator.step().expect("generation should succeed");
            assert!(
                generator.grid().walls_mirrored(),
                "walls should be mirrored after {step:?}"
            );
            if step == GenerationStep::Finished {
                break;
            }
        }
    }

    #[test]
    fn test_step_count_is_twice_cells_minus_one() {
        for size in 1..=6 {
            let mut generator = seeded(size, 3);
            let steps = generator.run().expect("generation should succeed");

            assert_eq!(steps, 2 * size * size - 1);
        }
    }

    #[test]
    fn test_same_seed_gives_same_maze() {
        let mut first = seeded(12, 42);
        let mut second = seeded(12, 42);
        let _ = first.run().expect("generation should succeed");
        let _ = second.run().expect("generation should succeed");

        assert_eq!(first.into_grid(), second.into_grid());
    }

    #[test]
    fn test_different_seeds_give_different_mazes() {
        let mut first = seeded(12, 1);
        let mut second = seeded(12, 2);
        let _ = first.run().expect("generation should succeed");
        let _ = second.run().expect("generation should succeed");

        assert_ne!(first.into_grid(), second.into_grid());
    }

    #[test]
    fn test_state_transitions() {
        let mut generator = seeded(3, 5);
        assert_eq!(generator.state(), GeneratorState::Idle);
        assert_eq!(generator.current(), Position::new(0, 0));
        assert!(generator.grid().is_visited(Position::new(0, 0)));

        let first = generator.step().expect("generation should succeed");
        assert_eq!(generator.state(), GeneratorState::Running);
        assert!(matches!(
            first,
            GenerationStep::Carved { from, .. } if from == Position::new(0, 0)
        ));
        assert_eq!(generator.stack(), &[Position::new(0, 0)]);

        let _ = generator.run().expect("generation should succeed");
        assert_eq!(generator.state(), GeneratorState::Done);
        assert!(generator.stack().is_empty());
        assert_eq!(generator.current(), Position::new(0, 0));
    }

    #[test]
    fn test_step_after_done_is_noop() {
        let mut generator = seeded(2, 8);
        let steps = generator.run().expect("generation should succeed");
        let carved = generator.grid().clone();

        assert_eq!(
            generator.step().expect("finished generator should not fail"),
            GenerationStep::Finished
        );
        assert_eq!(generator.steps(), steps);
        assert_eq!(generator.grid(), &carved);
    }

    #[test]
    fn test_single_cell_maze_finishes_immediately() {
        let mut generator = seeded(1, 0);

        assert_eq!(
            generator.step().expect("generation should succeed"),
            GenerationStep::Finished
        );
        assert_eq!(generator.grid().open_connections(), 0);
    }

    #[test]
    fn test_invalid_size_is_rejected() {
        let result = Generator::new(0, StdRng::seed_from_u64(0));

        assert!(matches!(
            result,
            Err(MazeError::InvalidConfiguration { size: 0, .. })
        ));
    }
}
