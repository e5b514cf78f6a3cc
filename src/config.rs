//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    animator::{MAX_SPEED, MIN_SPEED},
    error::MazeError,
    grid::{self, MAX_SIZE},
    solver::Algorithm,
};

/// Smallest maze side the user can pick.
pub const MIN_USER_SIZE: usize = 2;

/// Maze side used when none is given.
pub const DEFAULT_SIZE: usize = 20;

/// Animation speed used when none is given.
pub const DEFAULT_SPEED: u8 = 50;

/// Settings gathered from the command line.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(version, about)]
pub struct Config {
    /// Number of cells along each side of the maze.
    #[arg(short, long, default_value_t = DEFAULT_SIZE, value_parser = parse_size)]
    pub size: usize,
    /// Animation speed, from 1 (slowest) to 100 (fastest).
    #[arg(long, default_value_t = DEFAULT_SPEED, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub speed: u8,
    /// Seed for reproducible mazes.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Algorithm run in headless mode; all three when omitted.
    #[arg(short, long, value_enum)]
    pub algorithm: Option<Algorithm>,
    /// Print the maze and the solve results instead of starting the terminal interface.
    #[arg(long)]
    pub headless: bool,
    /// File receiving the log output.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            speed: DEFAULT_SPEED,
            seed: None,
            algorithm: None,
            headless: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Checks values that did not go through the command-line parser, such as a hand-built
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidConfiguration`] when the size is outside the user bounds.
    pub const fn validate(&self) -> Result<(), MazeError> {
        match check_user_size(self.size) {
            Ok(_) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Speed clamped to the supported range.
    #[must_use]
    pub fn clamped_speed(&self) -> u8 {
        self.speed.clamp(MIN_SPEED, MAX_SPEED)
    }
}

/// Validates a maze side chosen by the user.
///
/// # Errors
///
/// Returns [`MazeError::InvalidConfiguration`] outside [`MIN_USER_SIZE`]`..=`[`MAX_SIZE`].
pub const fn check_user_size(size: usize) -> Result<usize, MazeError> {
    grid::check_size(size, MIN_USER_SIZE, MAX_SIZE)
}

/// Parses and validates the `--size` argument.
fn parse_size(value: &str) -> Result<usize, String> {
    let size = value
        .parse::<usize>()
        .map_err(|err| format!("`{value}` is not a number: {err}"))?;

    check_user_size(size).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["tracemaze"]).expect("no arguments should parse");

        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_all_arguments() {
        let config = Config::try_parse_from([
            "tracemaze",
            "--size",
            "12",
            "--speed",
            "90",
            "--seed",
            "7",
            "--algorithm",
            "astar",
            "--headless",
            "--log-file",
            "maze.log",
        ])
        .expect("valid arguments should parse");

        assert_eq!(config.size, 12);
        assert_eq!(config.speed, 90);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.algorithm, Some(Algorithm::AStar));
        assert!(config.headless);
        assert_eq!(config.log_file, Some(PathBuf::from("maze.log")));
    }

    #[test]
    fn test_size_bounds_are_enforced() {
        assert!(Config::try_parse_from(["tracemaze", "--size", "1"]).is_err());
        assert!(Config::try_parse_from(["tracemaze", "--size", "51"]).is_err());
        assert!(Config::try_parse_from(["tracemaze", "--size", "abc"]).is_err());
        assert!(Config::try_parse_from(["tracemaze", "--size", "2"]).is_ok());
        assert!(Config::try_parse_from(["tracemaze", "-s", "50"]).is_ok());
    }

    #[test]
    fn test_speed_bounds_are_enforced() {
        assert!(Config::try_parse_from(["tracemaze", "--speed", "0"]).is_err());
        assert!(Config::try_parse_from(["tracemaze", "--speed", "101"]).is_err());
        assert!(Config::try_parse_from(["tracemaze", "--speed", "1"]).is_ok());
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        assert!(Config::try_parse_from(["tracemaze", "--algorithm", "dijkstra"]).is_err());
        assert!(Config::try_parse_from(["tracemaze", "-a", "dfs"]).is_ok());
    }

    #[test]
    fn test_validate_rejects_hand_built_values() {
        let too_small = Config {
            size: 1,
            ..Config::default()
        };
        let too_fast = Config {
            speed: 200,
            ..Config::default()
        };

        assert_eq!(
            too_small.validate(),
            Err(MazeError::InvalidConfiguration {
                size: 1,
                min: MIN_USER_SIZE,
                max: MAX_SIZE,
            })
        );
        assert!(too_fast.validate().is_ok());
        assert_eq!(too_fast.clamped_speed(), MAX_SPEED);
    }
}
