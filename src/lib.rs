//! Maze generation and solving, animated step by step in the terminal.
//!
//! A maze is carved by a randomized depth-first search over a square [`grid::Grid`] and then
//! solved from the top-left corner to the bottom-right corner with breadth-first search,
//! depth-first search or A*. Every algorithm runs one unit of work at a time under the
//! [`animator::Animator`], so each intermediate state can be rendered.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

pub mod animator;
pub mod ascii;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod headless;
pub mod logging;
pub mod solver;

mod app;
mod events;
mod types;
mod ui;

pub use app::App;
pub use config::Config;
pub use error::MazeError;
