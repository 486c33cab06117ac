use serde::{Deserialize, Serialize};

use crate::core::{GamePiece, Matrix, SettledGrid};

use super::shape_generator::ShapeSource;

/// Whether a board still accepts moves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BoardStatus {
    #[default]
    Playing,
    /// The piece spawned after the last lock overlapped settled cells.
    ///
    /// Terminal: every transition returns the board unchanged.
    GameOver,
}

/// The game state: settled cells plus the falling piece.
///
/// A `Board` is a value. Each transition borrows the receiver and returns a
/// new board, so a caller holding an earlier board (for replay, for a test
/// assertion) keeps seeing exactly what it saw before.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, ShapeGenerator};
///
/// let mut shapes = ShapeGenerator::new();
/// let board = Board::new(&mut shapes);
/// let next = board.left().rotate().down(&mut shapes);
///
/// // The first board is unaffected.
/// assert_eq!(board.piece().origin(), (3, 0));
/// assert_eq!(next.piece().origin().1, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    grid: SettledGrid,
    piece: GamePiece,
    status: BoardStatus,
    locked_pieces: usize,
    cleared_lines: usize,
}

impl Board {
    /// Creates a board with an empty grid and a freshly spawned piece.
    #[must_use]
    pub fn new<S>(mut source: S) -> Self
    where
        S: ShapeSource,
    {
        Self::with_piece(SettledGrid::EMPTY, GamePiece::new(source.next_shape()))
    }

    /// Creates a board from an existing grid and falling piece.
    ///
    /// The piece is not checked; a board built around an illegal piece is
    /// still `Playing` and simply rejects moves that stay illegal.
    #[must_use]
    pub fn with_piece(grid: SettledGrid, piece: GamePiece) -> Self {
        Self {
            grid,
            piece,
            status: BoardStatus::Playing,
            locked_pieces: 0,
            cleared_lines: 0,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &SettledGrid {
        &self.grid
    }

    #[must_use]
    pub fn piece(&self) -> &GamePiece {
        &self.piece
    }

    #[must_use]
    pub fn status(&self) -> BoardStatus {
        self.status
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Number of pieces merged into the grid since the board was created.
    #[must_use]
    pub fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    /// Number of rows cleared since the board was created.
    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// The settled grid with the falling piece overlaid.
    ///
    /// This is what a renderer paints. The board itself is not modified.
    #[must_use]
    pub fn current_matrix(&self) -> Matrix {
        self.grid.overlay(&self.piece)
    }

    /// Moves the piece down one row, or locks it if it cannot move.
    ///
    /// Locking merges the piece into a copy of the grid, clears full rows and
    /// spawns a new piece drawn from `source` at the spawn origin. If that new
    /// piece is already blocked, the returned board is
    /// [`BoardStatus::GameOver`].
    #[must_use]
    pub fn down<S>(&self, source: S) -> Self
    where
        S: ShapeSource,
    {
        if self.is_game_over() {
            return *self;
        }
        let candidate = self.piece.down();
        if self.grid.is_legal(&candidate) {
            return self.with_falling_piece(candidate);
        }
        self.lock(source)
    }

    /// Moves the piece one column left if the result is legal.
    #[must_use]
    pub fn left(&self) -> Self {
        self.try_replace(self.piece.left())
    }

    /// Moves the piece one column right if the result is legal.
    #[must_use]
    pub fn right(&self) -> Self {
        self.try_replace(self.piece.right())
    }

    /// Advances the piece to its next rotation frame if the result is legal.
    ///
    /// There are no wall kicks: a blocked rotation is simply rejected.
    #[must_use]
    pub fn rotate(&self) -> Self {
        self.try_replace(self.piece.rotate())
    }

    fn try_replace(&self, candidate: GamePiece) -> Self {
        if self.is_game_over() || !self.grid.is_legal(&candidate) {
            return *self;
        }
        self.with_falling_piece(candidate)
    }

    fn with_falling_piece(&self, piece: GamePiece) -> Self {
        Self { piece, ..*self }
    }

    fn lock<S>(&self, mut source: S) -> Self
    where
        S: ShapeSource,
    {
        let merged = self.grid.fill_piece(&self.piece);
        let (grid, cleared) = merged.clear_lines();
        let piece = GamePiece::new(source.next_shape());
        let status = if grid.is_legal(&piece) {
            BoardStatus::Playing
        } else {
            BoardStatus::GameOver
        };
        Self {
            grid,
            piece,
            status,
            locked_pieces: self.locked_pieces + 1,
            cleared_lines: self.cleared_lines + cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crate::core::{BOARD_HEIGHT, BOARD_WIDTH, Cell, ShapeKind};

    use super::*;

    /// Shape source that replays a fixed script.
    struct Scripted(VecDeque<ShapeKind>);

    impl Scripted {
        fn new(kinds: impl IntoIterator<Item = ShapeKind>) -> Self {
            Self(kinds.into_iter().collect())
        }

        fn empty() -> Self {
            Self(VecDeque::new())
        }
    }

    impl ShapeSource for Scripted {
        fn next_shape(&mut self) -> ShapeKind {
            self.0.pop_front().expect("script exhausted")
        }
    }

    fn filled_count(matrix: &Matrix) -> usize {
        matrix.iter().flatten().filter(|cell| cell.is_filled()).count()
    }

    #[test]
    fn test_new_board() {
        let board = Board::new(Scripted::new([ShapeKind::T]));
        assert_eq!(board.grid(), &SettledGrid::EMPTY);
        assert_eq!(board.piece(), &GamePiece::new(ShapeKind::T));
        assert_eq!(board.status(), BoardStatus::Playing);
        assert_eq!(filled_count(&board.current_matrix()), 4);
    }

    #[test]
    fn test_down_moves_piece() {
        let board = Board::with_piece(SettledGrid::EMPTY, GamePiece::new(ShapeKind::L));
        let mut source = Scripted::empty();
        let next = board.down(&mut source);
        assert_eq!(next.piece().origin(), (3, 1));
        assert_eq!(next.grid(), board.grid());
        assert_eq!(board.piece().origin(), (3, 0));
    }

    #[test]
    fn test_landing_merges_and_spawns() {
        let square = GamePiece::with_position(ShapeKind::O, 0, 3, 18);
        let board = Board::with_piece(SettledGrid::EMPTY, square);
        let next = board.down(Scripted::new([ShapeKind::I]));

        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(next.grid().cell(x, y), Some(Cell::Filled));
        }
        assert_eq!(next.piece(), &GamePiece::new(ShapeKind::I));
        assert_eq!(next.piece().origin(), (3, 0));
        assert_eq!(next.locked_pieces(), 1);
        assert_eq!(next.status(), BoardStatus::Playing);
        // The original grid was copied, not written through.
        assert_eq!(board.grid(), &SettledGrid::EMPTY);
    }

    #[test]
    fn test_landing_on_settled_cells() {
        let grid = SettledGrid::EMPTY.with_cell(4, 10, Cell::Filled);
        let square = GamePiece::with_position(ShapeKind::O, 0, 3, 8);
        let board = Board::with_piece(grid, square);
        let next = board.down(Scripted::new([ShapeKind::O]));
        assert_eq!(next.grid().cell(4, 9), Some(Cell::Filled));
        assert_eq!(next.grid().cell(5, 8), Some(Cell::Filled));
        assert_eq!(next.locked_pieces(), 1);
    }

    #[test]
    fn test_landing_clears_lines() {
        // Bottom row full except columns 4 and 5, which the square fills.
        let mut row = [Cell::Filled; BOARD_WIDTH];
        row[4] = Cell::Empty;
        row[5] = Cell::Empty;
        let grid = SettledGrid::EMPTY.with_row(BOARD_HEIGHT - 1, row);
        let square = GamePiece::with_position(ShapeKind::O, 0, 3, 18);
        let board = Board::with_piece(grid, square);

        let next = board.down(Scripted::new([ShapeKind::T]));
        assert_eq!(next.cleared_lines(), 1);
        // Upper half of the square drops into the bottom row.
        let bottom = next.grid().rows()[BOARD_HEIGHT - 1];
        let lit: Vec<_> = (0..BOARD_WIDTH).filter(|&x| bottom[x].is_filled()).collect();
        assert_eq!(lit, [4, 5]);
        assert!(next.grid().rows()[..BOARD_HEIGHT - 1]
            .iter()
            .flatten()
            .all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_left_right_blocked_by_wall() {
        let long = GamePiece::with_position(ShapeKind::I, 0, 0, 5);
        let board = Board::with_piece(SettledGrid::EMPTY, long);
        assert_eq!(board.left(), board);

        let long = GamePiece::with_position(ShapeKind::I, 0, 6, 5);
        let board = Board::with_piece(SettledGrid::EMPTY, long);
        assert_eq!(board.right(), board);
        assert_eq!(board.left().piece().origin(), (5, 5));
    }

    #[test]
    fn test_left_right_blocked_by_cell() {
        let grid = SettledGrid::EMPTY.with_cell(2, 1, Cell::Filled);
        let board = Board::with_piece(grid, GamePiece::new(ShapeKind::T));
        // T frame 0 at (3, 0) lights (3, 1); moving left would cover (2, 1).
        assert_eq!(board.left(), board);
        assert_eq!(board.right().piece().origin(), (4, 0));
    }

    #[test]
    fn test_rotate_advances_frame() {
        let board = Board::with_piece(
            SettledGrid::EMPTY,
            GamePiece::with_position(ShapeKind::T, 0, 3, 5),
        );
        let rotated = board.rotate();
        assert_eq!(rotated.piece().rotation(), 1);
        assert_eq!(rotated.piece().origin(), (3, 5));
    }

    #[test]
    fn test_rotate_blocked_without_kick() {
        // Horizontal long piece on the bottom row cannot stand up.
        let long = GamePiece::with_position(ShapeKind::I, 0, 3, 18);
        let board = Board::with_piece(SettledGrid::EMPTY, long);
        assert_eq!(board.rotate(), board);
    }

    #[test]
    fn test_rotation_cycle() {
        for kind in ShapeKind::ALL {
            let start = Board::with_piece(
                SettledGrid::EMPTY,
                GamePiece::with_position(kind, 0, 3, 5),
            );
            let mut board = start;
            for _ in 0..kind.shape().frame_count() {
                board = board.rotate();
            }
            assert_eq!(board, start, "{kind:?}");
        }
    }

    #[test]
    fn test_transitions_do_not_mutate_receiver() {
        let board = Board::with_piece(SettledGrid::EMPTY, GamePiece::new(ShapeKind::S));
        let before = board.current_matrix();
        let _ = board.left();
        let _ = board.right();
        let _ = board.rotate();
        let _ = board.down(Scripted::empty());
        assert_eq!(board.current_matrix(), before);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        // Square spawns lighting (4, 0), (5, 0), (4, 1), (5, 1).
        let grid = SettledGrid::EMPTY.with_cell(4, 1, Cell::Filled);
        let long = GamePiece::with_position(ShapeKind::I, 1, 7, 16);
        let board = Board::with_piece(grid, long);
        let over = board.down(Scripted::new([ShapeKind::O]));

        assert!(over.is_game_over());
        assert_eq!(over.piece(), &GamePiece::new(ShapeKind::O));
        assert_eq!(over.locked_pieces(), 1);

        // Terminal: every transition is the identity.
        assert_eq!(over.down(Scripted::empty()), over);
        assert_eq!(over.left(), over);
        assert_eq!(over.right(), over);
        assert_eq!(over.rotate(), over);
    }

    #[test]
    fn test_playing_when_spawn_clear() {
        let grid = SettledGrid::EMPTY.with_cell(0, 1, Cell::Filled);
        let square = GamePiece::with_position(ShapeKind::O, 0, 3, 18);
        let board = Board::with_piece(grid, square);
        let next = board.down(Scripted::new([ShapeKind::O]));
        assert_eq!(next.status(), BoardStatus::Playing);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&BoardStatus::GameOver).unwrap(),
            "\"game_over\""
        );
        assert_eq!(
            serde_json::from_str::<BoardStatus>("\"playing\"").unwrap(),
            BoardStatus::Playing
        );
    }
}
