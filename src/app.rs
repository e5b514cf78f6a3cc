//! Core application state and logic for the interactive maze viewer.

use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;

use crate::{
    animator::{Animator, MAX_SPEED, MIN_SPEED},
    config::{Config, MIN_USER_SIZE},
    events,
    grid::MAX_SIZE,
    types::{MainMenuItem, Screen},
    ui,
};

/// Application state container for the maze viewer.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the interface and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// Side length used by the next generation.
    pub(crate) size: usize,
    /// Animation speed, from 1 to 100.
    pub(crate) speed: u8,
    /// Scheduler driving generation and solving.
    ///
    /// This field owns the maze and every run on it; the interface only reads its snapshot when
    /// drawing.
    pub(crate) animator: Animator,
    /// Short message about the last rejected command, cleared by the next accepted one.
    pub(crate) notice: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl App {
    /// Creates a new instance of the App structure from the command-line configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::StartGame),
            size: config.size.clamp(MIN_USER_SIZE, MAX_SIZE),
            speed: config.clamped_speed(),
            animator: Animator::new(config.seed, config.clamped_speed()),
            notice: None,
        }
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input, advances the animation and redraws the interface. The
    /// loop continues until the exit condition is `true`, after which the function returns to the
    /// call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    /// - [`crate::MazeError`] when a run breaks a grid invariant
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| ui::draw(self, frame).map_err(std::io::Error::other))?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Changes the animation speed, clamped to the supported range.
    pub(crate) fn set_speed(&mut self, speed: u8) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.animator.set_speed(self.speed);
    }

    /// Changes the side length of the next maze, clamped to the supported range.
    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size.clamp(MIN_USER_SIZE, MAX_SIZE);
    }
}
