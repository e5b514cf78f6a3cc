//! Event handling functions for user input and application state updates.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{
    error::MazeError,
    grid::Grid,
    solver::Algorithm,
    types::{MainMenuItem, OptionsMenuItem, Screen},
    App,
};

/// Longest time spent waiting for input before the animation gets a chance to advance.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Speed change applied by a single key press.
const SPEED_STEP: u8 = 5;

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to the appropriate handler
/// functions based on the key pressed. The poll only waits until the next animation step is due,
/// after which the animation is advanced.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    let timeout = app
        .animator
        .time_until_next_step(Instant::now())
        .map_or(POLL_TIMEOUT, |left| left.min(POLL_TIMEOUT));

    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code)?;
            }
        }
    }

    if app.screen == Screen::InGame {
        let _ = app.animator.update(Instant::now())?;
    }

    Ok(())
}

/// Dispatches a single key press.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char('j') => handle_j_events(app),
        KeyCode::Char('k') => handle_k_events(app),
        KeyCode::Char('l') => handle_l_events(app)?,
        KeyCode::Char('h') => handle_h_events(app),
        other if app.screen == Screen::InGame => handle_game_events(app, other)?,
        _ => {}
    }

    Ok(())
}

/// Handles 'j' key press events for downward navigation.
pub(crate) const fn handle_j_events(app: &mut App) {
    app.screen = match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => Screen::MainMenu(MainMenuItem::Options),
        Screen::MainMenu(MainMenuItem::Options) => Screen::MainMenu(MainMenuItem::Quit),
        Screen::OptionsMenu(OptionsMenuItem::Size) => Screen::OptionsMenu(OptionsMenuItem::Speed),
        Screen::OptionsMenu(OptionsMenuItem::Speed) => Screen::OptionsMenu(OptionsMenuItem::Back),
        screen => screen,
    };
}

/// Handles 'k' key press events for upward navigation.
pub(crate) const fn handle_k_events(app: &mut App) {
    app.screen = match app.screen {
        Screen::MainMenu(MainMenuItem::Quit) => Screen::MainMenu(MainMenuItem::Options),
        Screen::MainMenu(MainMenuItem::Options) => Screen::MainMenu(MainMenuItem::StartGame),
        Screen::OptionsMenu(OptionsMenuItem::Back) => Screen::OptionsMenu(OptionsMenuItem::Speed),
        Screen::OptionsMenu(OptionsMenuItem::Speed) => Screen::OptionsMenu(OptionsMenuItem::Size),
        screen => screen,
    };
}

/// Handles 'l' key press events for selection and increments.
///
/// In the main menu this selects the highlighted entry; entering the game generates a maze unless
/// one of the configured size is already on screen. In the options menu it increases the
/// highlighted value or returns to the main menu.
pub(crate) fn handle_l_events(app: &mut App) -> Result<()> {
    match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => {
            app.screen = Screen::InGame;
            if app.animator.grid().map(Grid::size) != Some(app.size) {
                app.animator.generate(app.size)?;
            }
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Size);
        }
        Screen::MainMenu(MainMenuItem::Quit) => {
            app.exit = true;
        }
        Screen::OptionsMenu(OptionsMenuItem::Size) => app.set_size(app.size.saturating_add(1)),
        Screen::OptionsMenu(OptionsMenuItem::Speed) => {
            app.set_speed(app.speed.saturating_add(SPEED_STEP));
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::InGame => {}
    }

    Ok(())
}

/// Handles 'h' key press events for backward navigation and decrements.
///
/// Leaving the game stops whatever run is in flight.
pub(crate) fn handle_h_events(app: &mut App) {
    match app.screen {
        Screen::InGame => {
            app.animator.stop();
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::OptionsMenu(OptionsMenuItem::Size) => app.set_size(app.size.saturating_sub(1)),
        Screen::OptionsMenu(OptionsMenuItem::Speed) => {
            app.set_speed(app.speed.saturating_sub(SPEED_STEP));
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::MainMenu(_) => {}
    }
}

/// Handles the in-game commands: generate, solve, stop and speed changes.
pub(crate) fn handle_game_events(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('g') => {
            app.notice = None;
            app.animator.generate(app.size)?;
        }
        KeyCode::Char('b') => request_solve(app, Algorithm::Bfs)?,
        KeyCode::Char('d') => request_solve(app, Algorithm::Dfs)?,
        KeyCode::Char('a') => request_solve(app, Algorithm::AStar)?,
        KeyCode::Char('s') => app.animator.stop(),
        KeyCode::Char('+' | '=') => app.set_speed(app.speed.saturating_add(SPEED_STEP)),
        KeyCode::Char('-') => app.set_speed(app.speed.saturating_sub(SPEED_STEP)),
        _ => {}
    }

    Ok(())
}

/// Starts a solve, turning a missing maze into a notice rather than an error.
fn request_solve(app: &mut App, algorithm: Algorithm) -> Result<()> {
    match app.animator.solve(algorithm) {
        Ok(()) => app.notice = None,
        Err(MazeError::NoMaze) => {
            app.notice = Some(format!("{algorithm} needs a finished maze"));
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
