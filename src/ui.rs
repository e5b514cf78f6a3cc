//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    animator::Animator,
    grid::{Grid, Position, Side},
    types::{MainMenuItem, MenuType, OptionsMenuItem, Screen},
    App,
};

/// Color of the maze walls.
const WALL_COLOR: Color = Color::Rgb(75, 85, 99);
/// Color of the start cell and of the found path.
const PATH_COLOR: Color = Color::Rgb(22, 163, 74);
/// Color of the goal cell.
const GOAL_COLOR: Color = Color::Rgb(220, 38, 38);
/// Color of the cell the active run is working on.
const CURRENT_COLOR: Color = Color::Rgb(59, 130, 246);
/// Color of the cells waiting in the open set.
const FRONTIER_COLOR: Color = Color::Rgb(202, 138, 4);
/// Color of the cells a search has already expanded.
const EXPLORED_COLOR: Color = Color::Rgb(217, 119, 6);

/// Vertical offsets, inside a cell, of the strokes used to fill it.
const FILL_ROWS: [f64; 3] = [0.3, 0.5, 0.7];

/// Key help shown under the maze.
const GAME_HINTS: &str = "(g) generate / (b) BFS / (d) DFS / (a) A* / (s) stop / (+/-) speed / (h) menu";

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from layout lookups or coordinate conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    match app.screen {
        Screen::MainMenu(item) => main_menu(frame, item),
        Screen::OptionsMenu(item) => options_menu(frame, item, app.size, app.speed),
        Screen::InGame => in_game(app, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Renders the generic layout structure for the main and options menus.
///
/// This function creates the common layout and block structure used by both menus. The generic
/// part includes the centered positioning, the border styling and the key hints, while the entries
/// themselves are rendered by the caller into the returned rows.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, menu: &MenuType) -> Rc<[Rect]> {
    let space = Layout::vertical([
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ])
    .split(space)[1];

    let layout = Layout::vertical([Constraint::Max(u16::from(menu.value()) + 2)])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(menu.repr())
        .title_bottom(menu.hints())
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); menu.value().into()]).split(inner_space)
}

/// Renders menu entries into the rows of a menu, highlighting the selected one.
fn render_entries(frame: &mut Frame, rows: &[Rect], entries: &[&str], selected: usize) {
    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    for (idx, (entry, row)) in entries.iter().zip(rows).enumerate() {
        let style = if idx == selected {
            active_content_style
        } else {
            content_style
        };
        frame.render_widget(Line::styled(*entry, style).centered(), *row);
    }
}

/// Renders the main menu screen with navigation options.
///
/// This function displays the main menu with options for "Start", "Options", and "Quit". It
/// highlights the currently selected option.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let rows = init_menu(frame, &MenuType::MainMenu(3));
    let selected = match item {
        MainMenuItem::StartGame => 0,
        MainMenuItem::Options => 1,
        MainMenuItem::Quit => 2,
    };

    render_entries(frame, &rows, &["Start", "Options", "Quit"], selected);
}

/// Renders the options menu screen with the adjustable settings.
///
/// The maze size and the animation speed are shown next to their labels, followed by the entry
/// returning to the main menu.
pub(crate) fn options_menu(frame: &mut Frame, item: OptionsMenuItem, size: usize, speed: u8) {
    clear(frame);

    let rows = init_menu(frame, &MenuType::OptionsMenu(3));
    let selected = match item {
        OptionsMenuItem::Size => 0,
        OptionsMenuItem::Speed => 1,
        OptionsMenuItem::Back => 2,
    };
    let size = format!("Size: {size}");
    let speed = format!("Speed: {speed}");

    render_entries(
        frame,
        &rows,
        &[size.as_str(), speed.as_str(), "Return"],
        selected,
    );
}

/// Color of every cell that is not left blank, in drawing order.
///
/// Later entries win: explored cells come first, then the frontier, the current cell, the revealed
/// path and finally the start and goal cells.
pub(crate) fn cell_colors(animator: &Animator) -> Vec<(Position, Color)> {
    let Some(grid) = animator.grid() else {
        return Vec::new();
    };

    let mut colors = Vec::new();
    if animator.searched() {
        colors.extend(
            grid.cells()
                .iter()
                .filter(|cell| cell.visited())
                .map(|cell| (cell.position(), EXPLORED_COLOR)),
        );
    }
    colors.extend(
        animator
            .frontier()
            .into_iter()
            .map(|position| (position, FRONTIER_COLOR)),
    );
    colors.extend(animator.current().map(|position| (position, CURRENT_COLOR)));
    colors.extend(animator.path().iter().map(|position| (*position, PATH_COLOR)));
    colors.push((grid.start(), PATH_COLOR));
    colors.push((grid.goal(), GOAL_COLOR));

    colors
}

/// Converts a grid coordinate into a canvas coordinate.
fn coord(value: usize) -> Result<f64> {
    Ok(f64::from(u32::try_from(value)?))
}

/// Canvas segments of every standing wall.
///
/// The canvas grows upwards, so row `y` of the grid spans `size - y - 1..size - y` on the canvas.
/// Each cell contributes its top and left walls; the last column and row also close the border.
fn wall_lines(grid: &Grid) -> Result<Vec<CanvasLine>> {
    let size = coord(grid.size())?;
    let last = grid.size().saturating_sub(1);
    let mut lines = Vec::new();

    for cell in grid.cells() {
        let Position { x, y } = cell.position();
        let left = coord(x)?;
        let right = left + 1.0;
        let top = size - coord(y)?;
        let bottom = top - 1.0;
        let walls = cell.walls();

        if walls.has(Side::Top) {
            lines.push(CanvasLine::new(left, top, right, top, WALL_COLOR));
        }
        if walls.has(Side::Left) {
            lines.push(CanvasLine::new(left, bottom, left, top, WALL_COLOR));
        }
        if x == last && walls.has(Side::Right) {
            lines.push(CanvasLine::new(right, bottom, right, top, WALL_COLOR));
        }
        if y == last && walls.has(Side::Bottom) {
            lines.push(CanvasLine::new(left, bottom, right, bottom, WALL_COLOR));
        }
    }

    Ok(lines)
}

/// Canvas strokes filling the colored cells.
fn fill_lines(grid: &Grid, colors: &[(Position, Color)]) -> Result<Vec<CanvasLine>> {
    let size = coord(grid.size())?;
    let mut lines = Vec::new();

    for (position, color) in colors {
        let left = coord(position.x)? + 0.25;
        let right = left + 0.5;
        let bottom = size - coord(position.y)? - 1.0;
        for offset in FILL_ROWS {
            lines.push(CanvasLine::new(
                left,
                bottom + offset,
                right,
                bottom + offset,
                *color,
            ));
        }
    }

    Ok(lines)
}

/// Largest area of roughly square look centered in `area`.
///
/// Terminal cells are about twice as tall as they are wide, so the width is twice the height.
fn square_area(area: Rect) -> Result<Rect> {
    let height = area.height.min(area.width / 2);
    let width = height.saturating_mul(2);
    let left = rounded_div::i32(i32::from(area.width) - i32::from(width), 2);
    let top = rounded_div::i32(i32::from(area.height) - i32::from(height), 2);

    Ok(Rect {
        x: area.x.saturating_add(u16::try_from(left.max(0))?),
        y: area.y.saturating_add(u16::try_from(top.max(0))?),
        width,
        height,
    })
}

/// Renders the in-game screen with the maze and the state of the active run.
///
/// Walls, explored cells, the frontier, the current cell and the revealed path are precomputed
/// into canvas lines before painting, so conversion errors surface outside the paint closure. The
/// bottom block carries the status line, the last notice and the key help.
///
/// # Errors
///
/// This function may return errors from layout lookups or coordinate conversion operations.
pub(crate) fn in_game(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let overall_layout = Layout::vertical([
        Constraint::Min(1),    // Maze area
        Constraint::Length(3), // Status block
    ])
    .split(frame.area());

    let maze_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get maze area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    if let Some(grid) = app.animator.grid() {
        let walls = wall_lines(grid)?;
        let fills = fill_lines(grid, &cell_colors(&app.animator))?;
        let size = coord(grid.size())?;

        let maze = Canvas::default()
            .x_bounds([0.0, size])
            .y_bounds([0.0, size])
            .marker(Marker::Braille)
            .paint(|ctx| {
                for line in &fills {
                    ctx.draw(line);
                }
                for line in &walls {
                    ctx.draw(line);
                }
            });

        frame.render_widget(maze, square_area(maze_area)?);
    }

    let mut title = app.animator.status().to_owned();
    if let Some(notice) = &app.notice {
        title.push_str(" / ");
        title.push_str(notice);
    }

    let status_block = Block::bordered()
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let inner_space = status_block.inner(status_area);
    frame.render_widget(status_block, status_area);

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner_space);
    let settings = format!("Size: {} / Speed: {}", app.size, app.speed);
    if let [settings_row, hints_row] = rows.as_ref() {
        frame.render_widget(Line::raw(settings).centered(), *settings_row);
        frame.render_widget(Line::raw(GAME_HINTS).centered(), *hints_row);
    }

    Ok(())
}
