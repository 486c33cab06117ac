use blockfall_engine::{Board, ShapeGenerator, ShapeSeed, ShapeSource};

/// One player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Down,
    Rotate,
}

impl Move {
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            'D' => Some(Self::Down),
            'U' => Some(Self::Rotate),
            _ => None,
        }
    }

    pub fn apply<S>(self, board: &Board, source: S) -> Board
    where
        S: ShapeSource,
    {
        match self {
            Self::Left => board.left(),
            Self::Right => board.right(),
            Self::Down => board.down(source),
            Self::Rotate => board.rotate(),
        }
    }
}

/// Error returned by [`parse_moves`] for a character that is not a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid move {found:?} at position {position} (expected one of L, R, D, U)")]
pub struct ParseMoveError {
    position: usize,
    found: char,
}

/// Parses a move string such as `"RRU DDDD"`.
///
/// Whitespace is ignored. Positions in errors count characters from zero.
pub fn parse_moves(s: &str) -> Result<Vec<Move>, ParseMoveError> {
    s.chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(position, found)| Move::from_char(found).ok_or(ParseMoveError { position, found }))
        .collect()
}

/// The current board together with the generator that feeds it.
///
/// Each move replaces the board with the next one.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    shapes: ShapeGenerator,
}

impl Game {
    pub fn new(seed: Option<ShapeSeed>) -> Self {
        let mut shapes = seed.map_or_else(ShapeGenerator::new, ShapeGenerator::with_seed);
        let board = Board::new(&mut shapes);
        Self { board, shapes }
    }

    pub fn seed(&self) -> ShapeSeed {
        self.shapes.seed()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn apply(&mut self, mv: Move) {
        self.board = mv.apply(&self.board, &mut self.shapes);
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{BoardStatus, GamePiece};

    use super::*;

    const SEED: ShapeSeed = ShapeSeed::from_bytes([3; 16]);

    #[test]
    fn test_parse_moves() {
        assert_eq!(
            parse_moves("LR D\tU\n").unwrap(),
            [Move::Left, Move::Right, Move::Down, Move::Rotate]
        );
        assert!(parse_moves("  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_moves_rejects_unknown_chars() {
        assert_eq!(
            parse_moves("LLx"),
            Err(ParseMoveError {
                position: 2,
                found: 'x'
            })
        );
        // Lowercase is not accepted.
        assert!(parse_moves("d").is_err());
        let message = parse_moves("D?").unwrap_err().to_string();
        assert!(message.contains("'?'"), "{message}");
        assert!(message.contains("position 1"), "{message}");
    }

    #[test]
    fn test_game_is_deterministic_for_seed() {
        let moves = parse_moves(&"D".repeat(100)).unwrap();
        let mut a = Game::new(Some(SEED));
        let mut b = Game::new(Some(SEED));
        for mv in moves {
            a.apply(mv);
            b.apply(mv);
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.seed(), SEED);
    }

    #[test]
    fn test_game_applies_moves() {
        let mut game = Game::new(Some(SEED));
        let start = *game.board().piece();
        assert_eq!(start.origin(), GamePiece::SPAWN_ORIGIN);

        game.apply(Move::Down);
        assert_eq!(game.board().piece().origin(), (3, 1));
        game.apply(Move::Left);
        assert_eq!(game.board().piece().origin(), (2, 1));
        game.apply(Move::Right);
        game.apply(Move::Right);
        assert_eq!(game.board().piece().origin(), (4, 1));
        assert_eq!(game.board().status(), BoardStatus::Playing);
    }

    #[test]
    fn test_game_reaches_game_over() {
        let mut game = Game::new(Some(SEED));
        // Dropping forever stacks pieces at the spawn column until it blocks.
        for _ in 0..10_000 {
            if game.board().is_game_over() {
                break;
            }
            game.apply(Move::Down);
        }
        assert!(game.board().is_game_over());
        let over = *game.board();
        game.apply(Move::Rotate);
        game.apply(Move::Down);
        assert_eq!(game.board(), &over);
    }
}
