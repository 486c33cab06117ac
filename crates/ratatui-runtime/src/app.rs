use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
/// Callbacks are never invoked concurrently.
pub trait App {
    /// Initializes the application.
    ///
    /// Called once at the start of `Runtime::run()`, before the first event.
    /// Use this to start the tick clock.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    ///
    /// Checked before waiting for each event.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen (called on each render).
    fn draw(&self, frame: &mut Frame);

    /// Advances the application by one tick.
    fn update(&mut self, runtime: &mut Runtime);
}
