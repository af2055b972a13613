//! Occupancy grid consumed by the search engine.
//!
//! Cells are stored row-major. The wire form is a list of rows of `0`
//! (passable) and `1` (wall) values; an ASCII form using `.` and `#` is
//! accepted for fixtures and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Integer coordinate on the grid. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Passable,
    Wall,
}

/// Rectangular occupancy grid, fixed in size for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Build a grid from rows of `0` (passable) / `1` (wall) values.
    ///
    /// Every row must match the width of the first row. An empty row list is
    /// accepted and produces a 0x0 grid.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(Error::RaggedGrid {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                let state = match value {
                    0 => CellState::Passable,
                    1 => CellState::Wall,
                    _ => return Err(Error::InvalidCellValue { x, y, value }),
                };
                cells.push(state);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Parse an ASCII grid: `.` is passable, `#` is a wall, one line per row.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (y, line) in text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let row = line
                .chars()
                .enumerate()
                .map(|(x, glyph)| match glyph {
                    '.' => Ok(0),
                    '#' => Ok(1),
                    _ => Err(Error::InvalidGlyph { x, y, glyph }),
                })
                .collect::<Result<Vec<u8>>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (`width * height`).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `cell` lies inside the grid bounds.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// State of `cell`, or `None` when out of bounds.
    pub fn state(&self, cell: Cell) -> Option<CellState> {
        self.index(cell).map(|idx| self.cells[idx])
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        self.state(cell) == Some(CellState::Wall)
    }

    pub fn is_passable(&self, cell: Cell) -> bool {
        self.state(cell) == Some(CellState::Passable)
    }

    /// Row-major index of `cell`, or `None` when out of bounds.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| cell.y * self.width + cell.x)
    }

    /// In-bounds, non-wall orthogonal neighbours of `cell` in the fixed
    /// order +x, +y, -x, -y.
    pub fn neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let candidates = [
            cell.x.checked_add(1).map(|x| Cell::new(x, cell.y)),
            cell.y.checked_add(1).map(|y| Cell::new(cell.x, y)),
            cell.x.checked_sub(1).map(|x| Cell::new(x, cell.y)),
            cell.y.checked_sub(1).map(|y| Cell::new(cell.x, y)),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(move |candidate| self.is_passable(*candidate))
    }

    /// Iterate rows as slices of cell states.
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> + '_ {
        // chunks(0) panics; an empty grid simply has no rows
        self.cells.chunks(self.width.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let rows = vec![vec![0, 0, 0], vec![0, 0]];
        let error = Grid::from_rows(&rows).expect_err("ragged");
        assert!(matches!(
            error,
            Error::RaggedGrid {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn from_rows_rejects_unknown_values() {
        let rows = vec![vec![0, 2]];
        let error = Grid::from_rows(&rows).expect_err("invalid value");
        assert!(matches!(
            error,
            Error::InvalidCellValue { x: 1, y: 0, value: 2 }
        ));
    }

    #[test]
    fn empty_rows_make_an_empty_grid() {
        let grid = Grid::from_rows(&[]).expect("empty grid is valid");
        assert!(grid.is_empty());
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.height(), 0);
        assert!(!grid.contains(Cell::new(0, 0)));
        assert_eq!(grid.rows().count(), 0);
    }

    #[test]
    fn neighbours_follow_fixed_order_and_skip_walls() {
        let grid = Grid::from_ascii(
            "...
             .#.
             ...",
        )
        .expect("grid parses");

        let around_centre_left: Vec<Cell> = grid.neighbours(Cell::new(0, 1)).collect();
        assert_eq!(around_centre_left, vec![Cell::new(0, 2), Cell::new(0, 0)]);

        let around_top_middle: Vec<Cell> = grid.neighbours(Cell::new(1, 0)).collect();
        assert_eq!(around_top_middle, vec![Cell::new(2, 0), Cell::new(0, 0)]);
    }

    #[test]
    fn corner_neighbours_stay_in_bounds() {
        let grid = Grid::from_ascii("..\n..").expect("grid parses");
        let corner: Vec<Cell> = grid.neighbours(Cell::new(1, 1)).collect();
        assert_eq!(corner, vec![Cell::new(0, 1), Cell::new(1, 0)]);
    }

    #[test]
    fn ascii_rejects_unknown_glyphs() {
        let error = Grid::from_ascii("..x").expect_err("bad glyph");
        assert!(matches!(error, Error::InvalidGlyph { x: 2, y: 0, glyph: 'x' }));
    }
}
