//! Fixed-tick event loop for ratatui applications.
//!
//! [`Runtime`] interleaves three kinds of work on one thread:
//!
//! - **Tick**: [`App::update`] every tick interval (the game's gravity clock)
//! - **Input**: [`App::handle_event`] for every crossterm event
//! - **Render**: [`App::draw`] after each tick or input
//!
//! Because all three run sequentially on the calling thread, an application
//! never sees two of its callbacks in flight at once.

pub use self::{app::App, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
