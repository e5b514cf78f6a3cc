//! Error taxonomy of the maze core.
//!
//! The algorithmic modules return [`MazeError`] so callers can tell apart programming errors from
//! rejected configuration. The application layers wrap it into [`color_eyre::eyre::Report`] through
//! the `?` operator.

use std::fmt;

use crate::grid::Position;

/// Failures reported by the grid, the generator, the solver and the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[expect(
    clippy::module_name_repetitions,
    reason = "The error is re-exported at the crate root, where the bare name would be ambiguous."
)]
pub enum MazeError {
    /// Two cells were asked to be connected although they are not grid-adjacent.
    ///
    /// Correct callers never produce this; it is surfaced instead of panicking so the host can
    /// report it and bail out.
    InvalidAdjacency {
        /// First cell of the requested connection.
        first: Position,
        /// Second cell of the requested connection.
        second: Position,
    },
    /// The requested grid size lies outside the supported bounds.
    InvalidConfiguration {
        /// Size that was requested.
        size: usize,
        /// Smallest accepted size.
        min: usize,
        /// Largest accepted size.
        max: usize,
    },
    /// A solve was requested while no finished maze is available.
    NoMaze,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAdjacency { first, second } => {
                write!(f, "cells {first} and {second} are not adjacent")
            }
            Self::InvalidConfiguration { size, min, max } => {
                write!(
                    f,
                    "grid size {size} is out of bounds (expected {min} to {max})"
                )
            }
            Self::NoMaze => write!(f, "no maze has been generated yet"),
        }
    }
}

impl std::error::Error for MazeError {}
