pub mod board;
pub mod error;
pub mod game;
pub mod history;
pub mod moves;
pub mod web;

pub use board::*;
pub use error::*;
pub use game::*;
pub use history::*;
pub use moves::*;
