use std::collections::BTreeMap;

use crate::domain::{GameId, HandNumber};
use crate::history::HandHistory;

/// Абстракция хранилища завершённых раздач.
///
/// Сессия стола складывает сюда каждую сыгранную раздачу;
/// реплей читает отсюда.
pub trait HistoryStorage {
    /// Сохранить историю (повторное сохранение той же раздачи перезаписывает её).
    fn save_history(&mut self, history: &HandHistory);

    /// Загрузить историю раздачи.
    fn load_history(&self, game_id: GameId, hand_number: HandNumber) -> Option<HandHistory>;

    /// Номера сохранённых раздач стола по возрастанию.
    fn hand_numbers(&self, game_id: GameId) -> Vec<HandNumber>;
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStorage {
    histories: BTreeMap<(GameId, HandNumber), HandHistory>,
}

impl InMemoryHistoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

impl HistoryStorage for InMemoryHistoryStorage {
    fn save_history(&mut self, history: &HandHistory) {
        self.histories
            .insert((history.game_id, history.hand_number), history.clone());
    }

    fn load_history(&self, game_id: GameId, hand_number: HandNumber) -> Option<HandHistory> {
        self.histories.get(&(game_id, hand_number)).cloned()
    }

    fn hand_numbers(&self, game_id: GameId) -> Vec<HandNumber> {
        self.histories
            .keys()
            .filter(|(g, _)| *g == game_id)
            .map(|(_, n)| *n)
            .collect()
    }
}
