use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};

/// Состояние игрока за столом в рамках текущей раздачи.
///
/// Стек делится на две части:
/// - `chips`: ещё не поставленные фишки;
/// - `total_bet`: всё, что игрок внёс в банк за раздачу
///   (из них `current_bet`: на текущей улице).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Место за столом (1..N), не меняется в течение раздачи.
    pub seat: SeatIndex,
    pub chips: Chips,
    pub current_bet: Chips,
    pub total_bet: Chips,
    /// Карманные карты (0 или 2).
    pub hole_cards: Vec<Card>,
    pub folded: bool,
    pub all_in: bool,
    /// Сделал ли игрок действие на текущей улице.
    /// Блайнды действием не считаются, кроме BB в хедз-апе.
    pub has_acted: bool,
    /// Игрок попросил встать из-за стола: уйдёт перед следующей раздачей.
    pub leaving: bool,
    /// Игрок ушёл и в раздачах больше не участвует.
    pub left: bool,
    /// Игрок не участвует в текущей раздаче (нет фишек или ушёл).
    pub sitting_out: bool,
    /// Индексы карманных карт (0/1), которые игрок показал сам.
    pub revealed_indices: Vec<u8>,
}

impl Player {
    pub fn new(id: PlayerId, seat: SeatIndex, chips: Chips) -> Self {
        Self {
            id,
            seat,
            chips,
            current_bet: Chips::ZERO,
            total_bet: Chips::ZERO,
            hole_cards: Vec::new(),
            folded: false,
            all_in: false,
            has_acted: false,
            leaving: false,
            left: false,
            sitting_out: false,
            revealed_indices: Vec::new(),
        }
    }

    /// Игрок получил карты и ещё претендует на банк.
    pub fn is_contender(&self) -> bool {
        !self.sitting_out && !self.folded
    }

    /// Игрок может делать ставки: в раздаче, не в олл-ине, есть фишки.
    pub fn can_act(&self) -> bool {
        self.is_contender() && !self.all_in && !self.chips.is_zero()
    }

    /// Сколько нужно доплатить до `high_bet`.
    pub fn to_call(&self, high_bet: Chips) -> Chips {
        high_bet.saturating_sub(self.current_bet)
    }

    /// Сброс полей перед новой раздачей (стек переносится).
    pub(crate) fn reset_for_new_hand(&mut self) {
        self.current_bet = Chips::ZERO;
        self.total_bet = Chips::ZERO;
        self.hole_cards.clear();
        self.folded = false;
        self.all_in = false;
        self.has_acted = false;
        self.revealed_indices.clear();

        if self.leaving {
            self.left = true;
        }
        self.sitting_out = self.left || self.chips.is_zero();
        if self.sitting_out {
            self.folded = true;
        }
    }
}
