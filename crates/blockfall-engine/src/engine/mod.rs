//! Game state transitions built on the core data structures.
//!
//! - [`Board`] - Settled grid plus the falling piece, with the `down`,
//!   `left`, `right` and `rotate` transitions
//! - [`ShapeSource`] - Where new pieces come from
//! - [`ShapeGenerator`] - Seeded uniform [`ShapeSource`]
//!
//! # Game Flow
//!
//! 1. Create a [`Board`] from a [`ShapeSource`]
//! 2. A driver calls `down` on a fixed interval and `left`/`right`/`rotate`/`down`
//!    on input, replacing its current board with each result
//! 3. When the piece cannot move down it is locked, full rows are cleared and a
//!    new piece spawns
//! 4. Repeat until the board reports game over
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Board, ShapeGenerator};
//!
//! let mut shapes = ShapeGenerator::new();
//! let mut board = Board::new(&mut shapes);
//!
//! while board.locked_pieces() == 0 {
//!     board = board.down(&mut shapes);
//! }
//! assert_eq!(board.piece().origin(), (3, 0));
//! ```

pub use self::{board::*, shape_generator::*};

mod board;
mod shape_generator;
