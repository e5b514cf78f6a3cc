//! Non-interactive mode: generate one maze, solve it, print everything.
//!
//! The run goes through the same [`Animator`] as the terminal interface, stepping it back to back
//! without any delay.

use std::io::Write;

use color_eyre::eyre::{bail, Result};
use log::info;

use crate::{
    animator::{Animator, Completion},
    ascii,
    config::Config,
    solver::Algorithm,
};

/// Steps the scheduler until the run in flight is over and returns the completion signals.
fn drive(animator: &mut Animator) -> Result<Vec<Completion>> {
    let mut completions = Vec::new();
    while animator.is_busy() {
        if let Some(completion) = animator.step()? {
            completions.push(completion);
        }
    }

    Ok(completions)
}

/// Generates a maze, runs the configured algorithms on it and writes the report to `out`.
///
/// # Errors
///
/// Fails on invalid configuration, on a broken generation and on write errors.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    config.validate()?;
    let mut animator = Animator::new(config.seed, config.clamped_speed());
    animator.generate(config.size)?;

    let Some(Completion::Generated(grid)) = drive(&mut animator)?.pop() else {
        bail!("generation ended without a maze");
    };
    writeln!(out, "{size}x{size} maze", size = grid.size())?;
    write!(out, "{}", ascii::render(&grid, &[]))?;

    let algorithms = config
        .algorithm
        .map_or_else(|| Algorithm::ALL.to_vec(), |algorithm| vec![algorithm]);
    let mut last_path = Vec::new();

    for algorithm in algorithms {
        animator.solve(algorithm)?;
        for completion in drive(&mut animator)? {
            match completion {
                Completion::Solved { path, expanded, .. } => {
                    writeln!(
                        out,
                        "{algorithm}: path of {} cells, {expanded} cells expanded",
                        path.len()
                    )?;
                    last_path = path;
                }
                Completion::NoSolution { .. } => writeln!(out, "{algorithm}: no solution found")?,
                Completion::Generated(_) => {}
            }
        }
    }

    if !last_path.is_empty() {
        write!(out, "{}", ascii::render(&grid, &last_path))?;
    }
    info!("headless run finished after {} steps", animator.ticks());

    Ok(())
}
