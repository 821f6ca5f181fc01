use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, DECK_SIZE};

/// Колода карт: упорядоченный список, верх колоды в конце вектора.
/// Перемешивание делает engine (через RNG из infra), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке канонических индексов:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let cards = (0..DECK_SIZE)
            .filter_map(|idx| Card::from_index(idx).ok())
            .collect();
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Взять ровно n карт сверху. Если карт не хватает: None, колода не меняется.
    pub fn draw_exact(&mut self, n: usize) -> Option<Vec<Card>> {
        if self.cards.len() < n {
            return None;
        }
        let split_at = self.cards.len() - n;
        let mut taken = self.cards.split_off(split_at);
        // Сверху колоды = конец вектора.
        taken.reverse();
        Some(taken)
    }

    /// Убрать из колоды уже использованные карты
    /// (карты, подставленные снаружи при реплее/тестах).
    pub fn remove_cards(&mut self, to_remove: &[Card]) {
        self.cards.retain(|c| !to_remove.contains(c));
    }
}
