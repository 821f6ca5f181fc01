//! Доменная модель: карты, фишки, колода, улицы, игроки, конфиг стола.

pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod player;
pub mod table;

// Базовые идентификаторы.
pub type PlayerId = u64;
pub type GameId = u64;
pub type HandNumber = u64;

/// Номер места за столом (1..N).
pub type SeatIndex = u8;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use player::*;
pub use table::*;
