use std::time::Duration;

use blockfall_engine::{BoardStatus, ShapeSeed};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::{Line, Text},
    widgets::Block,
};
use ratatui_runtime::{App, Runtime};

use crate::{
    model::{Game, Move},
    ui::widgets::{BoardDisplay, color, style},
};

/// Interactive game screen.
///
/// Owns the current game; every tick and every move key replaces its board.
#[derive(Debug)]
pub struct PlayApp {
    game: Game,
    tick_interval: Duration,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(seed: Option<ShapeSeed>, tick_interval: Duration) -> Self {
        Self {
            game: Game::new(seed),
            tick_interval,
            is_exiting: false,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn apply(&mut self, runtime: &mut Runtime, mv: Move) {
        self.game.apply(mv);
        if self.game.board().is_game_over() {
            runtime.set_tick_interval(None);
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_interval(Some(self.tick_interval));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        let is_playing = !self.game.board().is_game_over();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.is_exiting = true;
            }
            KeyCode::Left if is_playing => self.apply(runtime, Move::Left),
            KeyCode::Right if is_playing => self.apply(runtime, Move::Right),
            KeyCode::Down if is_playing => self.apply(runtime, Move::Down),
            KeyCode::Up if is_playing => self.apply(runtime, Move::Rotate),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let board = self.game.board();
        let border_color = match board.status() {
            BoardStatus::Playing => color::WHITE,
            BoardStatus::GameOver => color::RED,
        };
        let title = match board.status() {
            BoardStatus::Playing => "BLOCKFALL",
            BoardStatus::GameOver => "GAME OVER",
        };
        let board_display = BoardDisplay::new(board.current_matrix()).block(
            Block::bordered()
                .title(Line::from(title).centered())
                .border_style(border_color)
                .style(style::DEFAULT),
        );
        let stats = Text::from(format!(
            "Pieces: {}  Lines: {}",
            board.locked_pieces(),
            board.cleared_lines()
        ))
        .centered();
        let help = match board.status() {
            BoardStatus::Playing => "← → (Move) | ↓ (Down) | ↑ (Rotate) | Q (Quit)",
            BoardStatus::GameOver => "Q (Quit)",
        };
        let help = Text::from(help).style(style::HELP).centered();

        let [board_area, stats_area, help_area] = Layout::vertical([
            Constraint::Length(board_display.height()),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [board_area] = Layout::horizontal([Constraint::Length(board_display.width())])
            .flex(Flex::Center)
            .areas(board_area);

        frame.render_widget(board_display, board_area);
        frame.render_widget(stats, stats_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, runtime: &mut Runtime) {
        if !self.game.board().is_game_over() {
            self.apply(runtime, Move::Down);
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::GamePiece;
    use crossterm::event::KeyEvent;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    const SEED: ShapeSeed = ShapeSeed::from_bytes([5; 16]);

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> PlayApp {
        PlayApp::new(Some(SEED), Duration::from_millis(500))
    }

    #[test]
    fn test_arrow_keys_move_piece() {
        let mut runtime = Runtime::new();
        let mut app = app();
        app.handle_event(&mut runtime, key(KeyCode::Down));
        app.handle_event(&mut runtime, key(KeyCode::Left));
        assert_eq!(app.game().board().piece().origin(), (2, 1));
        app.handle_event(&mut runtime, key(KeyCode::Right));
        assert_eq!(app.game().board().piece().origin(), (3, 1));

        let before = app.game().board().piece().rotation();
        app.handle_event(&mut runtime, key(KeyCode::Up));
        let piece = app.game().board().piece();
        assert_eq!(piece.rotation(), (before + 1) % piece.shape().frame_count());
        assert!(!app.should_exit());
    }

    #[test]
    fn test_tick_moves_down() {
        let mut runtime = Runtime::new();
        let mut app = app();
        app.update(&mut runtime);
        app.update(&mut runtime);
        assert_eq!(app.game().board().piece().origin(), (3, 2));
    }

    #[test]
    fn test_quit_keys() {
        let mut runtime = Runtime::new();
        for event in [
            key(KeyCode::Char('q')),
            key(KeyCode::Esc),
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        ] {
            let mut app = app();
            app.handle_event(&mut runtime, event);
            assert!(app.should_exit());
        }

        let mut app = app();
        app.handle_event(&mut runtime, key(KeyCode::Char('c')));
        assert!(!app.should_exit());
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut runtime = Runtime::new();
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.handle_event(&mut runtime, Event::Key(release));
        assert_eq!(app.game().board().piece().origin(), GamePiece::SPAWN_ORIGIN);
    }

    #[test]
    fn test_game_over_freezes_board() {
        let mut runtime = Runtime::new();
        let mut app = app();
        for _ in 0..10_000 {
            if app.game().board().is_game_over() {
                break;
            }
            app.update(&mut runtime);
        }
        let over = *app.game().board();
        assert!(over.is_game_over());

        app.update(&mut runtime);
        app.handle_event(&mut runtime, key(KeyCode::Left));
        app.handle_event(&mut runtime, key(KeyCode::Up));
        assert_eq!(app.game().board(), &over);
        app.handle_event(&mut runtime, key(KeyCode::Char('q')));
        assert!(app.should_exit());
    }

    #[test]
    fn test_draw() {
        let mut terminal = Terminal::new(TestBackend::new(40, 24)).unwrap();
        let app = app();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("BLOCKFALL"));
        assert!(text.contains("Pieces: 0  Lines: 0"));
    }
}
