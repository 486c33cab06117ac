use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{Board, BoardStatus, Cell, GamePiece, ShapeSeed};
use serde::Serialize;

use crate::{
    model::{Game, Move, parse_moves},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for the shape sequence, as 32 hex digits (random if omitted)
    #[clap(long)]
    seed: Option<ShapeSeed>,
    /// Moves to apply: L (left), R (right), D (down), U (rotate); whitespace is ignored
    #[clap(long, default_value = "")]
    moves: String,
    /// Output file path (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

/// Final state of a simulated game.
#[derive(Debug, Serialize)]
struct Snapshot {
    seed: ShapeSeed,
    moves_applied: usize,
    status: BoardStatus,
    piece: GamePiece,
    locked_pieces: usize,
    cleared_lines: usize,
    /// Rows top to bottom, `#` for filled cells and `.` for empty ones.
    matrix: Vec<String>,
}

impl Snapshot {
    fn new(seed: ShapeSeed, moves_applied: usize, board: &Board) -> Self {
        let matrix = board
            .current_matrix()
            .iter()
            .map(|row| row.iter().copied().map(Cell::as_char).collect())
            .collect();
        Self {
            seed,
            moves_applied,
            status: board.status(),
            piece: *board.piece(),
            locked_pieces: board.locked_pieces(),
            cleared_lines: board.cleared_lines(),
            matrix,
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        moves,
        output,
    } = arg;

    let moves = parse_moves(moves).context("Failed to parse --moves")?;
    let snapshot = simulate(*seed, &moves);
    util::save_json(&snapshot, output.as_deref())?;

    if let Some(path) = output {
        eprintln!(
            "Applied {} moves ({}), saved to {}",
            snapshot.moves_applied,
            if snapshot.status.is_game_over() { "game over" } else { "playing" },
            path.display()
        );
    }
    Ok(())
}

fn simulate(seed: Option<ShapeSeed>, moves: &[Move]) -> Snapshot {
    let mut game = Game::new(seed);
    let mut moves_applied = 0;
    for &mv in moves {
        if game.board().is_game_over() {
            break;
        }
        game.apply(mv);
        moves_applied += 1;
    }
    Snapshot::new(game.seed(), moves_applied, game.board())
}
