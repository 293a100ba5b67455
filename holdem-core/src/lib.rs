pub mod deck;
pub mod hand;
pub mod showdown;

pub use deck::{Card, Deck};
pub use hand::{Hand, HandClass, HandStrength};
pub use showdown::Showdown;

/// Seats a single 52 card deck can serve: 23x2(pockets)+5(board) = 51.
pub const MAX_PLAYERS: u8 = 23;

pub type PlayerId = i32;
