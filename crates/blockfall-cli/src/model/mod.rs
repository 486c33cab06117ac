pub use self::game::*;

mod game;
