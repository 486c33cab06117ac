use std::fmt;

use super::{BOARD_HEIGHT, BOARD_WIDTH, piece::GamePiece};

/// A single board cell.
///
/// This is the 0/1 alphabet of the board: a cell is either lit or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Filled = 1,
}

impl Cell {
    /// Character used by the textual board format.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Filled => '#',
        }
    }
}

pub type Row = [Cell; BOARD_WIDTH];

/// A full `BOARD_HEIGHT` x `BOARD_WIDTH` cell matrix, indexed `[y][x]`.
pub type Matrix = [Row; BOARD_HEIGHT];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

/// The settled cells of a board: everything except the falling piece.
///
/// `SettledGrid` is a plain value. [`fill_piece`](Self::fill_piece) and
/// [`clear_lines`](Self::clear_lines) return new grids and leave the receiver
/// untouched, so a grid held by an older board never changes under it.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GamePiece, SettledGrid, ShapeKind};
///
/// let grid = SettledGrid::EMPTY;
/// let piece = GamePiece::new(ShapeKind::O);
/// assert!(grid.is_legal(&piece));
///
/// let merged = grid.fill_piece(&piece);
/// assert!(!merged.is_legal(&piece));
/// assert!(grid.is_legal(&piece));
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SettledGrid {
    rows: Matrix,
}

impl Default for SettledGrid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<Matrix> for SettledGrid {
    fn from(rows: Matrix) -> Self {
        Self { rows }
    }
}

impl SettledGrid {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    #[must_use]
    pub fn rows(&self) -> &Matrix {
        &self.rows
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = grid_index(x, y)?;
        Some(self.rows[y][x])
    }

    /// Returns a copy with the cell at `(x, y)` set to `cell`.
    ///
    /// Positions outside the grid are ignored.
    #[must_use]
    pub fn with_cell(&self, x: i32, y: i32, cell: Cell) -> Self {
        let mut grid = *self;
        if let Some((x, y)) = grid_index(x, y) {
            grid.rows[y][x] = cell;
        }
        grid
    }

    /// Returns a copy with row `y` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `y >= BOARD_HEIGHT`.
    #[must_use]
    pub fn with_row(&self, y: usize, row: Row) -> Self {
        let mut grid = *self;
        grid.rows[y] = row;
        grid
    }

    /// Returns whether `piece` may occupy its current placement.
    ///
    /// A placement is legal when every lit position is inside the grid and
    /// lands on an empty cell. Bounds are checked for the whole piece before
    /// any cell is read.
    #[must_use]
    pub fn is_legal(&self, piece: &GamePiece) -> bool {
        let in_bounds = piece
            .lit_positions()
            .all(|(x, y)| grid_index(x, y).is_some());
        if !in_bounds {
            return false;
        }
        piece
            .lit_positions()
            .filter_map(|(x, y)| grid_index(x, y))
            .all(|(x, y)| self.rows[y][x].is_empty())
    }

    /// Returns a copy with the piece's lit positions set to [`Cell::Filled`].
    ///
    /// Lit positions outside the grid are skipped.
    #[must_use]
    pub fn fill_piece(&self, piece: &GamePiece) -> Self {
        let mut grid = *self;
        for (x, y) in piece.lit_positions().filter_map(|(x, y)| grid_index(x, y)) {
            grid.rows[y][x] = Cell::Filled;
        }
        grid
    }

    /// Removes every full row and compacts the rest toward the bottom.
    ///
    /// All rows are judged against `self` in a single pass; rows that are
    /// not full keep their relative order and one empty row is added at the
    /// top for each row removed.
    ///
    /// # Returns
    ///
    /// The compacted grid and the number of rows cleared.
    #[must_use]
    pub fn clear_lines(&self) -> (Self, usize) {
        let mut rows = [EMPTY_ROW; BOARD_HEIGHT];
        let mut dest = BOARD_HEIGHT;
        for row in self.rows.iter().rev().filter(|row| !is_full(row)) {
            dest -= 1;
            rows[dest] = *row;
        }
        (Self { rows }, dest)
    }

    /// Returns a matrix with the piece overlaid on the settled cells.
    #[must_use]
    pub fn overlay(&self, piece: &GamePiece) -> Matrix {
        self.fill_piece(piece).rows
    }
}

fn is_full(row: &Row) -> bool {
    row.iter().all(|cell| cell.is_filled())
}

fn grid_index(x: i32, y: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok().filter(|&x| x < BOARD_WIDTH)?;
    let y = usize::try_from(y).ok().filter(|&y| y < BOARD_HEIGHT)?;
    Some((x, y))
}

impl fmt::Debug for SettledGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SettledGrid {{")?;
        for row in &self.rows {
            let line: String = row.iter().map(|cell| cell.as_char()).collect();
            writeln!(f, "    {line}")?;
        }
        write!(f, "}}")
    }
}
