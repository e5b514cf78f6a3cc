//! Step-wise maze solving with breadth-first search, depth-first search and A*.
//!
//! The three strategies share one skeleton and only differ in how the open set hands back the next
//! cell: first in first out, last in first out, or lowest estimated total cost. Cells are marked
//! visited as soon as they enter the open set, so no cell is ever queued twice.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
    fmt, iter,
};

use clap::ValueEnum;
use log::{debug, trace};

use crate::grid::{Cell, Grid, Position};

/// Search strategy used to solve a maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    /// Breadth-first search, shortest path.
    Bfs,
    /// Depth-first search, some path.
    Dfs,
    /// A* with a Manhattan heuristic, shortest path.
    #[value(name = "astar")]
    AStar,
}

impl Algorithm {
    /// Every algorithm, in the order they are offered to the user.
    pub const ALL: [Self; 3] = [Self::Bfs, Self::Dfs, Self::AStar];

    /// Short human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::AStar => "A*",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Entry of the A* priority queue.
///
/// The derived ordering compares the total first and the insertion sequence second, so equal
/// totals come out in the order they went in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    /// Estimated total cost through this cell.
    total: usize,
    /// Insertion counter.
    sequence: u64,
    /// Queued cell.
    position: Position,
}

/// Frontier of discovered but not yet expanded cells.
#[derive(Debug)]
enum OpenSet {
    /// FIFO queue for breadth-first search.
    Queue(VecDeque<Position>),
    /// LIFO stack for depth-first search.
    Stack(Vec<Position>),
    /// Min-heap on the estimated total for A*.
    Heap {
        /// Queued entries.
        heap: BinaryHeap<Reverse<Entry>>,
        /// Next insertion sequence number.
        sequence: u64,
    },
}

impl OpenSet {
    /// Builds the empty open set matching the algorithm.
    const fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Bfs => Self::Queue(VecDeque::new()),
            Algorithm::Dfs => Self::Stack(Vec::new()),
            Algorithm::AStar => Self::Heap {
                heap: BinaryHeap::new(),
                sequence: 0,
            },
        }
    }

    /// Inserts a cell; `total` is only looked at by the heap.
    fn push(&mut self, position: Position, total: usize) {
        match self {
            Self::Queue(queue) => queue.push_back(position),
            Self::Stack(stack) => stack.push(position),
            Self::Heap { heap, sequence } => {
                heap.push(Reverse(Entry {
                    total,
                    sequence: *sequence,
                    position,
                }));
                *sequence += 1;
            }
        }
    }

    /// Extracts the next cell according to the discipline.
    fn pop(&mut self) -> Option<Position> {
        match self {
            Self::Queue(queue) => queue.pop_front(),
            Self::Stack(stack) => stack.pop(),
            Self::Heap { heap, .. } => heap.pop().map(|Reverse(entry)| entry.position),
        }
    }

    /// Cells currently waiting, in no particular order.
    fn positions(&self) -> Vec<Position> {
        match self {
            Self::Queue(queue) => queue.iter().copied().collect(),
            Self::Stack(stack) => stack.clone(),
            Self::Heap { heap, .. } => heap.iter().map(|Reverse(entry)| entry.position).collect(),
        }
    }
}

/// Terminal result of a solve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Path from the start to the goal, both included.
    Solved(Vec<Position>),
    /// The open set ran dry before the goal was reached.
    NoSolution,
}

/// Outcome of a single solve step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveStep {
    /// A cell was taken from the open set and its unvisited passable neighbors were queued.
    Expanded {
        /// Cell that was expanded.
        cell: Position,
        /// Neighbors queued by this step.
        discovered: Vec<Position>,
    },
    /// The goal was extracted; the path runs from the start to the goal.
    Solved(Vec<Position>),
    /// The open set is empty and the goal was never reached.
    NoSolution,
}

impl From<SolveOutcome> for SolveStep {
    fn from(outcome: SolveOutcome) -> Self {
        match outcome {
            SolveOutcome::Solved(path) => Self::Solved(path),
            SolveOutcome::NoSolution => Self::NoSolution,
        }
    }
}

/// Search run from the top-left to the bottom-right cell of a grid.
///
/// The solver does not own the grid; the scheduler lends it for every step, which keeps a single
/// owner for the grid at all times.
#[derive(Debug)]
pub struct Solver {
    /// Strategy in use.
    algorithm: Algorithm,
    /// Cell the search is looking for.
    goal: Position,
    /// Discovered cells waiting to be expanded.
    ///
    /// This field holds the frontier of the search. Its discipline is the only thing that tells
    /// the three algorithms apart.
    open: OpenSet,
    /// Number of cells expanded so far.
    expanded: usize,
    /// Terminal result, once reached.
    ///
    /// This field stays [`None`] while the search runs. Once set, [`Solver::step`] returns it
    /// without touching the grid again.
    outcome: Option<SolveOutcome>,
}

impl Solver {
    /// Resets the grid's search state and seeds the open set with the start cell.
    pub fn new(grid: &mut Grid, algorithm: Algorithm) -> Self {
        grid.reset_search_state();

        let start = grid.start();
        let goal = grid.goal();
        let heuristic = start.manhattan(goal);
        if let Some(cell) = grid.cell_mut(start) {
            cell.visited = true;
            if algorithm == Algorithm::AStar {
                cell.cost = Some(0);
                cell.heuristic = heuristic;
                cell.total = Some(heuristic);
            }
        }

        let mut open = OpenSet::new(algorithm);
        open.push(start, heuristic);

        Self {
            algorithm,
            goal,
            open,
            expanded: 0,
            outcome: None,
        }
    }

    /// Performs one unit of solve work on `grid`.
    ///
    /// After a terminal step ([`SolveStep::Solved`] or [`SolveStep::NoSolution`]) every further
    /// call returns that same result and leaves the grid alone.
    pub fn step(&mut self, grid: &mut Grid) -> SolveStep {
        if let Some(outcome) = &self.outcome {
            return outcome.clone().into();
        }

        let Some(current) = self.open.pop() else {
            return self.finish(SolveOutcome::NoSolution);
        };

        if current == self.goal {
            return self.finish(SolveOutcome::Solved(reconstruct_path(grid, current)));
        }

        self.expanded += 1;
        let cost = grid.cell(current).and_then(Cell::cost).unwrap_or(0);
        let mut discovered = Vec::new();

        for next in grid.passable_neighbors(current) {
            if grid.is_visited(next) {
                continue;
            }

            let next_cost = cost + 1;
            let heuristic = next.manhattan(self.goal);
            let total = next_cost + heuristic;
            if let Some(cell) = grid.cell_mut(next) {
                cell.visited = true;
                cell.parent = Some(current);
                if self.algorithm == Algorithm::AStar {
                    cell.cost = Some(next_cost);
                    cell.heuristic = heuristic;
                    cell.total = Some(total);
                }
            }

            self.open.push(next, total);
            discovered.push(next);
        }
        trace!("{} expanded {current}, queued {discovered:?}", self.algorithm);

        SolveStep::Expanded {
            cell: current,
            discovered,
        }
    }

    /// Records the terminal outcome and returns it as a step.
    fn finish(&mut self, outcome: SolveOutcome) -> SolveStep {
        match &outcome {
            SolveOutcome::Solved(path) => debug!(
                "{} reached the goal with a path of {} cells after expanding {} cells",
                self.algorithm,
                path.len(),
                self.expanded
            ),
            SolveOutcome::NoSolution => debug!(
                "{} exhausted the open set after expanding {} cells",
                self.algorithm, self.expanded
            ),
        }
        self.outcome = Some(outcome.clone());

        outcome.into()
    }

    /// Strategy in use.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of cells expanded so far.
    #[must_use]
    pub const fn expanded(&self) -> usize {
        self.expanded
    }

    /// Cells currently in the open set.
    #[must_use]
    pub fn frontier(&self) -> Vec<Position> {
        self.open.positions()
    }

    /// Terminal result, once reached.
    #[must_use]
    pub const fn outcome(&self) -> Option<&SolveOutcome> {
        self.outcome.as_ref()
    }
}

/// Solves `grid` in one go.
pub fn solve(grid: &mut Grid, algorithm: Algorithm) -> SolveOutcome {
    let mut solver = Solver::new(grid, algorithm);
    loop {
        match solver.step(grid) {
            SolveStep::Expanded { .. } => {}
            SolveStep::Solved(path) => return SolveOutcome::Solved(path),
            SolveStep::NoSolution => return SolveOutcome::NoSolution,
        }
    }
}

/// Follows parent pointers from `end` back to the start and returns the path in walking order.
fn reconstruct_path(grid: &Grid, end: Position) -> Vec<Position> {
    let mut path: Vec<Position> = iter::successors(Some(end), |position| {
        grid.cell(*position).and_then(Cell::parent)
    })
    .take(grid.cells().len())
    .collect();
    path.reverse();

    path
}
