//! Cooperative frame scheduler for generation and solving.
//!
//! The [`Animator`] owns the grid through its current [`Activity`] and advances whichever run is
//! active by one unit of work per tick. Because the grid lives inside exactly one phase at a time,
//! a solve can never start while a generation is carving, and a new request cancels the run in
//! flight before its next step.

use std::{
    mem,
    time::{Duration, Instant},
};

use log::{info, warn};
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};

use crate::{
    error::MazeError,
    generator::{GenerationStep, Generator},
    grid::{check_size, Grid, Position, MAX_SIZE, MIN_SIZE},
    solver::{Algorithm, SolveStep, Solver},
};

/// Slowest animation speed.
pub const MIN_SPEED: u8 = 1;

/// Fastest animation speed.
pub const MAX_SPEED: u8 = 100;

/// Longest delay between two cells while the found path is traced.
pub const PATH_FRAME_DELAY_MS: u64 = 16;

/// Delay between two steps for a speed in [`MIN_SPEED`]`..=`[`MAX_SPEED`].
///
/// Out-of-range speeds are clamped, so the delay always lies between 1 and 100 milliseconds.
#[must_use]
pub fn delay_for_speed(speed: u8) -> Duration {
    let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    Duration::from_millis(u64::from(MAX_SPEED + 1 - speed))
}

/// What the scheduler is busy with, without the data it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    /// No maze yet.
    Idle,
    /// A maze is being carved.
    Generating,
    /// A finished maze is waiting for a solve request.
    Ready,
    /// A solve is exploring the maze.
    Solving(Algorithm),
    /// The found path is being revealed cell by cell.
    Tracing,
}

/// Signal emitted when a run completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Generation finished; carries the carved maze.
    Generated(Grid),
    /// A solve reached the goal.
    Solved {
        /// Algorithm that found the path.
        algorithm: Algorithm,
        /// Cells from the start to the goal.
        path: Vec<Position>,
        /// Cells expanded before the goal was extracted.
        expanded: usize,
    },
    /// A solve ran out of cells to explore.
    NoSolution {
        /// Algorithm that gave up.
        algorithm: Algorithm,
    },
}

/// Internal state of the scheduler; each variant holding a grid is its sole owner.
#[derive(Debug)]
enum Phase {
    /// Nothing generated yet.
    Idle,
    /// Carving in progress.
    Generating(Box<Generator>),
    /// Maze ready to be solved.
    Ready(Grid),
    /// Search in progress.
    Solving {
        /// Maze being searched.
        grid: Grid,
        /// Search lending the maze step by step.
        solver: Solver,
    },
    /// Path reveal in progress.
    Tracing(Grid),
}

/// Step scheduler for the maze generator and the solvers.
///
/// This structure holds the run in flight and the timing information needed to pace it, which is
/// to say everything the interface reads from when drawing a frame.
#[derive(Debug)]
pub struct Animator {
    /// Current phase, owner of the grid.
    ///
    /// This field holds the grid inside whichever phase is active. Moving the grid from one
    /// variant to the next is the only way to switch phases.
    phase: Phase,
    /// Master random source.
    ///
    /// This field holds the random source every generation seed is drawn from. It is only advanced
    /// by accepted generation requests, so a seeded session always yields the same mazes.
    seeds: StdRng,
    /// Delay between two steps.
    ///
    /// This field holds the delay derived from the speed setting. Path tracing caps it at
    /// [`PATH_FRAME_DELAY_MS`].
    delay: Duration,
    /// Time of the last step.
    ///
    /// This field holds the instant at which [`Animator::update`] last executed a step. It is
    /// [`None`] right after a new run starts, which makes the next update step immediately.
    last_update_time: Option<Instant>,
    /// Number of steps executed since the scheduler was created.
    ticks: usize,
    /// Last cell expanded by the active solve.
    last_expanded: Option<Position>,
    /// Whether the grid's visited flags describe a search.
    ///
    /// This field tells apart the two meanings of the visited flag: carved cells after a
    /// generation, discovered cells once a solve has started.
    searched: bool,
    /// Path found by the last successful solve.
    path: Vec<Position>,
    /// Number of path cells revealed so far.
    ///
    /// This field grows by one per step while tracing and only the first `revealed` cells of
    /// [`Animator::path`] are shown.
    revealed: usize,
    /// Human-readable description of the current state.
    status: String,
}

impl Animator {
    /// Creates an idle scheduler.
    ///
    /// With a `master_seed`, the sequence of generated mazes is reproducible; without one the
    /// master random source is seeded from the operating system.
    #[must_use]
    pub fn new(master_seed: Option<u64>, speed: u8) -> Self {
        Self {
            phase: Phase::Idle,
            seeds: master_seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64),
            delay: delay_for_speed(speed),
            last_update_time: None,
            ticks: 0,
            last_expanded: None,
            searched: false,
            path: Vec::new(),
            revealed: 0,
            status: "Press (g) to generate a maze".to_owned(),
        }
    }

    /// Cancels whatever is running and starts carving a new `size × size` maze.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidConfiguration`] for an unsupported size; the current state is
    /// kept in that case.
    pub fn generate(&mut self, size: usize) -> Result<(), MazeError> {
        let size = check_size(size, MIN_SIZE, MAX_SIZE)?;
        let seed = self.seeds.random::<u64>();
        let generator = Generator::new(size, StdRng::seed_from_u64(seed))?;

        if self.is_busy() {
            info!("cancelling {:?} for a new generation", self.activity());
        }
        info!("generating a {size}x{size} maze with seed {seed}");

        self.phase = Phase::Generating(Box::new(generator));
        self.clear_search();
        self.last_update_time = None;
        "Generating Maze...".clone_into(&mut self.status);

        Ok(())
    }

    /// Starts solving the current maze, cancelling a solve or path trace in flight.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::NoMaze`] when no finished maze exists, which includes the time a maze
    /// is still being carved.
    pub fn solve(&mut self, algorithm: Algorithm) -> Result<(), MazeError> {
        let mut grid = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Ready(grid) | Phase::Tracing(grid) | Phase::Solving { grid, .. } => grid,
            phase @ (Phase::Idle | Phase::Generating(_)) => {
                self.phase = phase;
                warn!("{algorithm} requested without a finished maze");
                return Err(MazeError::NoMaze);
            }
        };

        info!("solving with {algorithm}");
        self.clear_search();
        let solver = Solver::new(&mut grid, algorithm);
        self.phase = Phase::Solving { grid, solver };
        self.searched = true;
        self.last_update_time = None;
        self.status = format!("Solving with {algorithm}...");

        Ok(())
    }

    /// Halts the run in flight before its next step.
    ///
    /// A stopped generation discards its partial maze. A stopped solve keeps the maze so it can
    /// be solved again; a stopped trace reveals the whole path at once.
    pub fn stop(&mut self) {
        self.phase = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Generating(_) => {
                info!("generation cancelled");
                "Generation cancelled.".clone_into(&mut self.status);
                Phase::Idle
            }
            Phase::Solving { grid, solver } => {
                info!("{} cancelled", solver.algorithm());
                self.last_expanded = None;
                "Solve cancelled.".clone_into(&mut self.status);
                Phase::Ready(grid)
            }
            Phase::Tracing(grid) => {
                self.revealed = self.path.len();
                Phase::Ready(grid)
            }
            phase @ (Phase::Idle | Phase::Ready(_)) => phase,
        };
    }

    /// Executes one unit of work right away.
    ///
    /// Returns the completion signal when this step finished a generation or a solve.
    ///
    /// # Errors
    ///
    /// Propagates generator errors, which indicate a broken grid invariant.
    pub fn step(&mut self) -> Result<Option<Completion>, MazeError> {
        if self.is_busy() {
            self.ticks += 1;
        }

        let completion = match &mut self.phase {
            Phase::Idle | Phase::Ready(_) => None,
            Phase::Generating(generator) => {
                if generator.step()? == GenerationStep::Finished {
                    self.finish_generation()
                } else {
                    None
                }
            }
            Phase::Solving { grid, solver } => match solver.step(grid) {
                SolveStep::Expanded { cell, .. } => {
                    self.last_expanded = Some(cell);
                    None
                }
                SolveStep::Solved(path) => {
                    let algorithm = solver.algorithm();
                    let expanded = solver.expanded();
                    self.finish_solve(Completion::Solved {
                        algorithm,
                        path,
                        expanded,
                    })
                }
                SolveStep::NoSolution => {
                    let algorithm = solver.algorithm();
                    self.finish_solve(Completion::NoSolution { algorithm })
                }
            },
            Phase::Tracing(_) => {
                self.revealed = (self.revealed + 1).min(self.path.len());
                if self.revealed == self.path.len() {
                    self.stop();
                }
                None
            }
        };

        Ok(completion)
    }

    /// Executes one step if the delay since the previous step has elapsed at `now`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Animator::step`].
    pub fn update(&mut self, now: Instant) -> Result<Option<Completion>, MazeError> {
        if self.time_until_next_step(now) != Some(Duration::ZERO) {
            return Ok(None);
        }
        self.last_update_time = Some(now);

        self.step()
    }

    /// Time left at `now` before the next step is due, or [`None`] when nothing is running.
    #[must_use]
    pub fn time_until_next_step(&self, now: Instant) -> Option<Duration> {
        if !self.is_busy() {
            return None;
        }

        Some(self.last_update_time.map_or(Duration::ZERO, |last| {
            self.current_delay()
                .saturating_sub(now.saturating_duration_since(last))
        }))
    }

    /// Changes the animation speed, see [`delay_for_speed`].
    pub fn set_speed(&mut self, speed: u8) {
        self.delay = delay_for_speed(speed);
    }

    /// Delay between two steps of the active run.
    #[must_use]
    pub fn current_delay(&self) -> Duration {
        if matches!(self.phase, Phase::Tracing(_)) {
            self.delay.min(Duration::from_millis(PATH_FRAME_DELAY_MS))
        } else {
            self.delay
        }
    }

    /// Public view of the current phase.
    #[must_use]
    pub const fn activity(&self) -> Activity {
        match &self.phase {
            Phase::Idle => Activity::Idle,
            Phase::Generating(_) => Activity::Generating,
            Phase::Ready(_) => Activity::Ready,
            Phase::Solving { solver, .. } => Activity::Solving(solver.algorithm()),
            Phase::Tracing(_) => Activity::Tracing,
        }
    }

    /// Whether a run is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            Phase::Generating(_) | Phase::Solving { .. } | Phase::Tracing(_)
        )
    }

    /// Snapshot of the grid for rendering.
    #[must_use]
    pub fn grid(&self) -> Option<&Grid> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Generating(generator) => Some(generator.grid()),
            Phase::Ready(grid) | Phase::Tracing(grid) | Phase::Solving { grid, .. } => Some(grid),
        }
    }

    /// Cell the active run is working on: the carving head or the last expanded cell.
    #[must_use]
    pub fn current(&self) -> Option<Position> {
        match &self.phase {
            Phase::Generating(generator) => Some(generator.current()),
            Phase::Solving { .. } => self.last_expanded,
            Phase::Idle | Phase::Ready(_) | Phase::Tracing(_) => None,
        }
    }

    /// Open set of the active solve.
    #[must_use]
    pub fn frontier(&self) -> Vec<Position> {
        match &self.phase {
            Phase::Solving { solver, .. } => solver.frontier(),
            Phase::Idle | Phase::Generating(_) | Phase::Ready(_) | Phase::Tracing(_) => Vec::new(),
        }
    }

    /// Whether the visited flags of the grid mark explored cells rather than carved ones.
    #[must_use]
    pub const fn searched(&self) -> bool {
        self.searched
    }

    /// Part of the last found path revealed so far.
    #[must_use]
    pub fn path(&self) -> &[Position] {
        self.path.get(..self.revealed).unwrap_or_default()
    }

    /// Human-readable status line.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Steps executed so far.
    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }

    /// Forgets everything about the previous solve.
    fn clear_search(&mut self) {
        self.searched = false;
        self.last_expanded = None;
        self.path.clear();
        self.revealed = 0;
    }

    /// Moves the carved grid into the ready phase.
    fn finish_generation(&mut self) -> Option<Completion> {
        let Phase::Generating(generator) = mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };

        info!("maze generated in {} steps", generator.steps());
        let grid = generator.into_grid();
        self.phase = Phase::Ready(grid.clone());
        "Ready to Solve!".clone_into(&mut self.status);

        Some(Completion::Generated(grid))
    }

    /// Moves the searched grid into the tracing or ready phase.
    fn finish_solve(&mut self, completion: Completion) -> Option<Completion> {
        let Phase::Solving { grid, .. } = mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };
        self.last_expanded = None;

        match &completion {
            Completion::Solved {
                algorithm,
                path,
                expanded,
            } => {
                info!(
                    "{algorithm} found a path of {} cells after expanding {expanded} cells",
                    path.len()
                );
                path.clone_into(&mut self.path);
                self.revealed = 0;
                self.phase = Phase::Tracing(grid);
                "Solved!".clone_into(&mut self.status);
            }
            Completion::NoSolution { algorithm } => {
                warn!("{algorithm} found no path");
                self.phase = Phase::Ready(grid);
                "No solution found!".clone_into(&mut self.status);
            }
            Completion::Generated(_) => self.phase = Phase::Ready(grid),
        }

        Some(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs the scheduler until it is no longer busy and collects the completion signals.
    fn drain(animator: &mut Animator) -> Vec<Completion> {
        let mut completions = Vec::new();
        while animator.is_busy() {
            if let Some(completion) = animator.step().expect("steps should succeed") {
                completions.push(completion);
            }
        }
        completions
    }

    #[test]
    fn test_new_animator_is_idle() {
        let mut animator = Animator::new(Some(1), 50);

        assert_eq!(animator.activity(), Activity::Idle);
        assert!(animator.grid().is_none());
        assert_eq!(animator.step().expect("idle step should succeed"), None);
        assert_eq!(animator.ticks(), 0);
        assert_eq!(animator.time_until_next_step(Instant::now()), None);
    }

    #[test]
    fn test_generation_completes_with_grid() {
        let mut animator = Animator::new(Some(3), 50);
        animator.generate(5).expect("size 5 should be accepted");
        assert_eq!(animator.activity(), Activity::Generating);
        assert_eq!(animator.status(), "Generating Maze...");

        let completions = drain(&mut animator);

        assert_eq!(animator.ticks(), 2 * 25 - 1);
        assert_eq!(animator.activity(), Activity::Ready);
        assert_eq!(animator.status(), "Ready to Solve!");
        match completions.as_slice() {
            [Completion::Generated(grid)] => {
                assert_eq!(Some(grid), animator.grid());
                assert_eq!(grid.open_connections(), 24);
            }
            other => panic!("unexpected completions {other:?}"),
        }
    }

    #[test]
    fn test_fixed_seed_reproduces_maze_sequence() {
        let mut first = Animator::new(Some(77), 50);
        let mut second = Animator::new(Some(77), 50);

        for _ in 0..3 {
            first.generate(8).expect("size 8 should be accepted");
            second.generate(8).expect("size 8 should be accepted");

            assert_eq!(drain(&mut first), drain(&mut second));
        }
    }

    #[test]
    fn test_invalid_size_keeps_state() {
        let mut animator = Animator::new(Some(3), 50);
        animator.generate(4).expect("size 4 should be accepted");
        let _ = drain(&mut animator);

        assert_eq!(
            animator.generate(0),
            Err(MazeError::InvalidConfiguration {
                size: 0,
                min: 1,
                max: 50,
            })
        );
        assert_eq!(animator.activity(), Activity::Ready);
    }

    #[test]
    fn test_rejected_size_keeps_maze_sequence() {
        let mut first = Animator::new(Some(41), 50);
        let mut second = Animator::new(Some(41), 50);

        assert!(first.generate(0).is_err());
        assert!(first.generate(MAX_SIZE + 1).is_err());
        first.generate(6).expect("size 6 should be accepted");
        second.generate(6).expect("size 6 should be accepted");
        let _ = drain(&mut first);
        let _ = drain(&mut second);

        assert_eq!(first.grid(), second.grid());
    }

    #[test]
    fn test_solve_requires_finished_maze() {
        let mut animator = Animator::new(Some(3), 50);
        assert_eq!(animator.solve(Algorithm::Bfs), Err(MazeError::NoMaze));

        animator.generate(4).expect("size 4 should be accepted");
        let _ = animator.step().expect("steps should succeed");
        assert_eq!(animator.solve(Algorithm::Bfs), Err(MazeError::NoMaze));
        assert_eq!(animator.activity(), Activity::Generating);
    }

    #[test]
    fn test_solve_then_trace_path() {
        let mut animator = Animator::new(Some(5), 50);
        animator.generate(6).expect("size 6 should be accepted");
        let _ = drain(&mut animator);

        animator.solve(Algorithm::AStar).expect("maze is ready");
        assert_eq!(animator.activity(), Activity::Solving(Algorithm::AStar));
        assert_eq!(animator.status(), "Solving with A*...");
        assert!(animator.searched());

        let mut completion = None;
        while completion.is_none() {
            completion = animator.step().expect("steps should succeed");
        }
        let Some(Completion::Solved { path, .. }) = completion else {
            panic!("a perfect maze is always solvable");
        };
        assert_eq!(animator.activity(), Activity::Tracing);
        assert_eq!(animator.status(), "Solved!");
        assert!(animator.path().is_empty());

        let _ = animator.step().expect("steps should succeed");
        assert_eq!(animator.path().len(), 1);

        let _ = drain(&mut animator);
        assert_eq!(animator.activity(), Activity::Ready);
        assert_eq!(animator.path(), path.as_slice());
    }

    #[test]
    fn test_stop_generation_discards_maze() {
        let mut animator = Animator::new(Some(9), 50);
        animator.generate(5).expect("size 5 should be accepted");
        let _ = animator.step().expect("steps should succeed");

        animator.stop();

        assert_eq!(animator.activity(), Activity::Idle);
        assert!(animator.grid().is_none());
        assert_eq!(animator.status(), "Generation cancelled.");
    }

    #[test]
    fn test_stopped_solve_can_restart() {
        let mut animator = Animator::new(Some(9), 50);
        animator.generate(7).expect("size 7 should be accepted");
        let _ = drain(&mut animator);

        animator.solve(Algorithm::Dfs).expect("maze is ready");
        let _ = animator.step().expect("steps should succeed");
        let _ = animator.step().expect("steps should succeed");
        animator.stop();
        assert_eq!(animator.activity(), Activity::Ready);
        assert_eq!(animator.status(), "Solve cancelled.");

        animator.solve(Algorithm::Dfs).expect("maze is ready");
        let restarted = drain(&mut animator);
        animator.solve(Algorithm::Dfs).expect("maze is ready");
        let again = drain(&mut animator);

        assert_eq!(restarted, again);
        assert!(matches!(restarted.as_slice(), [Completion::Solved { .. }]));
    }

    #[test]
    fn test_switching_solver_cancels_previous() {
        let mut animator = Animator::new(Some(2), 50);
        animator.generate(6).expect("size 6 should be accepted");
        let _ = drain(&mut animator);

        animator.solve(Algorithm::Dfs).expect("maze is ready");
        let _ = animator.step().expect("steps should succeed");
        animator.solve(Algorithm::Bfs).expect("maze is ready");

        assert_eq!(animator.activity(), Activity::Solving(Algorithm::Bfs));
        assert_eq!(animator.frontier(), vec![Position::new(0, 0)]);
    }

    #[test]
    fn test_generate_cancels_solve() {
        let mut animator = Animator::new(Some(2), 50);
        animator.generate(4).expect("size 4 should be accepted");
        let _ = drain(&mut animator);
        animator.solve(Algorithm::Bfs).expect("maze is ready");
        let _ = animator.step().expect("steps should succeed");

        animator.generate(3).expect("size 3 should be accepted");

        assert_eq!(animator.activity(), Activity::Generating);
        assert!(!animator.searched());
        assert!(animator.path().is_empty());
        assert_eq!(animator.grid().map(Grid::size), Some(3));
    }

    #[test]
    fn test_update_waits_for_delay() {
        let mut animator = Animator::new(Some(4), MIN_SPEED);
        animator.generate(5).expect("size 5 should be accepted");
        let start = Instant::now();

        let _ = animator.update(start).expect("update should succeed");
        assert_eq!(animator.ticks(), 1, "first step runs immediately");

        let _ = animator
            .update(start + Duration::from_millis(50))
            .expect("update should succeed");
        assert_eq!(animator.ticks(), 1, "step is not due yet");
        assert_eq!(
            animator.time_until_next_step(start + Duration::from_millis(50)),
            Some(Duration::from_millis(50))
        );

        let _ = animator
            .update(start + Duration::from_millis(100))
            .expect("update should succeed");
        assert_eq!(animator.ticks(), 2);
    }

    #[test]
    fn test_speed_to_delay() {
        assert_eq!(delay_for_speed(50), Duration::from_millis(51));
        assert_eq!(delay_for_speed(MAX_SPEED), Duration::from_millis(1));
        assert_eq!(delay_for_speed(MIN_SPEED), Duration::from_millis(100));
        assert_eq!(delay_for_speed(0), Duration::from_millis(100));
        assert_eq!(delay_for_speed(200), Duration::from_millis(1));
    }

    #[test]
    fn test_trace_uses_short_delay() {
        let mut animator = Animator::new(Some(4), MIN_SPEED);
        animator.generate(3).expect("size 3 should be accepted");
        let _ = drain(&mut animator);
        animator.solve(Algorithm::Bfs).expect("maze is ready");
        assert_eq!(animator.current_delay(), Duration::from_millis(100));

        while animator.activity() != Activity::Tracing {
            let _ = animator.step().expect("steps should succeed");
        }

        assert_eq!(
            animator.current_delay(),
            Duration::from_millis(PATH_FRAME_DELAY_MS)
        );
    }

    #[test]
    fn test_single_cell_maze() {
        let mut animator = Animator::new(Some(0), 50);
        animator.generate(1).expect("size 1 should be accepted");
        let _ = drain(&mut animator);
        animator.solve(Algorithm::Bfs).expect("maze is ready");

        let completions = drain(&mut animator);

        assert_eq!(
            completions,
            vec![Completion::Solved {
                algorithm: Algorithm::Bfs,
                path: vec![Position::new(0, 0)],
                expanded: 0,
            }]
        );
        assert_eq!(animator.path(), &[Position::new(0, 0)]);
    }
}
