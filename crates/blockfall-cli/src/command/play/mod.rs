use std::{io, time::Duration};

use anyhow::Context as _;
use blockfall_engine::ShapeSeed;
use ratatui_runtime::Runtime;

use self::app::PlayApp;
use crate::model::Game;

mod app;

const DEFAULT_TICK_MS: u64 = 500;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the shape sequence, as 32 hex digits (random if omitted)
    #[clap(long)]
    pub(crate) seed: Option<ShapeSeed>,
    /// Milliseconds between automatic drops
    #[clap(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) tick_ms: u64,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let summary = play(arg, |app| Runtime::new().run(app))?;
    eprintln!("{summary}");
    Ok(())
}

/// Runs a game through `run_ui` and returns the summary line.
fn play<F>(arg: &PlayArg, run_ui: F) -> anyhow::Result<String>
where
    F: FnOnce(&mut PlayApp) -> io::Result<()>,
{
    let PlayArg { seed, tick_ms } = arg;

    let mut app = PlayApp::new(*seed, Duration::from_millis(*tick_ms));
    run_ui(&mut app).context("Failed to run terminal UI")?;
    Ok(summary(app.game()))
}

fn summary(game: &Game) -> String {
    let board = game.board();
    format!(
        "seed {}: {} pieces locked, {} lines cleared{}",
        game.seed(),
        board.locked_pieces(),
        board.cleared_lines(),
        if board.is_game_over() { " (game over)" } else { "" },
    )
}
