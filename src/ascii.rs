//! Plain-text rendering of a maze, used by the headless mode.
//!
//! Every cell becomes a character surrounded by wall characters, so an `n × n` grid turns into a
//! `(2n + 1) × (2n + 1)` block of text.

use crate::grid::{Grid, Position, Side};

/// Character used for walls and wall corners.
const WALL: char = '#';
/// Character used for carved cells and knocked-down walls.
const OPEN: char = ' ';
/// Character used for the cells and passages of a path.
const PATH: char = '.';
/// Character marking the start cell.
const START: char = 'S';
/// Character marking the goal cell.
const GOAL: char = 'E';

/// Text coordinates (column, row) of the center of a cell.
const fn center(position: Position) -> (usize, usize) {
    (position.x * 2 + 1, position.y * 2 + 1)
}

/// Writes a character on the canvas, ignoring coordinates that fall outside it.
fn put(canvas: &mut [Vec<char>], (column, row): (usize, usize), character: char) {
    if let Some(slot) = canvas.get_mut(row).and_then(|line| line.get_mut(column)) {
        *slot = character;
    }
}

/// Renders `grid` with `path` drawn on top of it. Each line ends with a newline.
#[must_use]
pub fn render(grid: &Grid, path: &[Position]) -> String {
    let side = grid.size() * 2 + 1;
    let mut canvas = vec![vec![WALL; side]; side];

    for (cells, row) in grid.rows().zip((1..side).step_by(2)) {
        for (cell, column) in cells.iter().zip((1..side).step_by(2)) {
            put(&mut canvas, (column, row), OPEN);
            if !cell.walls().has(Side::Right) {
                put(&mut canvas, (column + 1, row), OPEN);
            }
            if !cell.walls().has(Side::Bottom) {
                put(&mut canvas, (column, row + 1), OPEN);
            }
        }
    }

    for pair in path.windows(2) {
        if let [from, to] = pair {
            let (from_column, from_row) = center(*from);
            let (to_column, to_row) = center(*to);
            put(
                &mut canvas,
                ((from_column + to_column) / 2, (from_row + to_row) / 2),
                PATH,
            );
        }
    }
    for position in path {
        put(&mut canvas, center(*position), PATH);
    }

    put(&mut canvas, center(grid.start()), START);
    put(&mut canvas, center(grid.goal()), GOAL);

    canvas
        .into_iter()
        .map(|line| {
            let mut text: String = line.into_iter().collect();
            text.push('\n');
            text
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a 2×2 maze shaped like an arch, open along the top.
    fn small_maze() -> Grid {
        let mut grid = Grid::new(2).expect("size 2 should be accepted");
        grid.connect(Position::new(0, 0), Position::new(1, 0))
            .expect("horizontal neighbors should connect");
        grid.connect(Position::new(1, 0), Position::new(1, 1))
            .expect("vertical neighbors should connect");
        grid.connect(Position::new(0, 0), Position::new(0, 1))
            .expect("vertical neighbors should connect");
        grid
    }

    #[test]
    fn test_render_without_path() {
        assert_eq!(
            render(&small_maze(), &[]),
            "#####\n#S  #\n# # #\n# #E#\n#####\n"
        );
    }

    #[test]
    fn test_render_with_path() {
        let path = [
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
        ];

        assert_eq!(
            render(&small_maze(), &path),
            "#####\n#S..#\n# #.#\n# #E#\n#####\n"
        );
    }

    #[test]
    fn test_render_places_rows_on_odd_lines() {
        let mut grid = Grid::new(3).expect("size 3 should be accepted");
        grid.connect(Position::new(2, 0), Position::new(2, 1))
            .expect("vertical neighbors should connect");
        grid.connect(Position::new(0, 2), Position::new(1, 2))
            .expect("horizontal neighbors should connect");

        assert_eq!(
            render(&grid, &[]),
            "#######\n#S# # #\n##### #\n# # # #\n#######\n#   #E#\n#######\n"
        );
    }

    #[test]
    fn test_render_uncarved_grid() {
        let grid = Grid::new(2).expect("size 2 should be accepted");

        assert_eq!(render(&grid, &[]), "#####\n#S# #\n#####\n# #E#\n#####\n");
    }

    #[test]
    fn test_render_single_cell() {
        let grid = Grid::new(1).expect("size 1 should be accepted");

        assert_eq!(render(&grid, &[Position::new(0, 0)]), "###\n#E#\n###\n");
    }
}
