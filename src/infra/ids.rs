use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{GameId, PlayerId};

/// Простая генерация ID на основе монотонных счётчиков.
/// Удобно для локальных тестов и dev-CLI; в боевом лобби ID приходят снаружи.
#[derive(Debug)]
pub struct IdGenerator {
    game_counter: AtomicU64,
    player_counter: AtomicU64,
}

impl IdGenerator {
    /// Создать генератор с начальным значением 1 для всех сущностей.
    pub fn new() -> Self {
        Self {
            game_counter: AtomicU64::new(1),
            player_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_game_id(&self) -> GameId {
        self.game_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_player_id(&self) -> PlayerId {
        self.player_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
