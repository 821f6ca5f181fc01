use serde::{Deserialize, Serialize};

use crate::domain::{Chips, SeatIndex};

/// Тип действия игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionType {
    Fold,
    Check,
    Call,
    /// Bet на улице, где ещё нет ставки. `amount` – сколько ставим.
    Bet,
    /// Raise существующей ставки. `amount` – итоговая ставка на улице («рейз до»).
    Raise,
    /// All-in – поставить весь стек.
    AllIn,
    /// Показать одну свою карманную карту. `index` – 0 или 1.
    Reveal,
}

impl ActionType {
    /// Действие торговли (всё, кроме показа карт).
    pub fn is_betting(self) -> bool {
        !matches!(self, ActionType::Reveal)
    }
}

/// Конкретное действие игрока.
///
/// Движок не знает, кто отправил запрос: транспорт обязан проверить,
/// что `seat` принадлежит отправителю.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    /// Место действующего игрока (1..N).
    pub seat: SeatIndex,
    /// Само действие.
    pub kind: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Chips>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u8>,
}

impl Action {
    fn plain(seat: SeatIndex, kind: ActionType) -> Self {
        Self {
            seat,
            kind,
            amount: None,
            index: None,
        }
    }

    pub fn fold(seat: SeatIndex) -> Self {
        Self::plain(seat, ActionType::Fold)
    }

    pub fn check(seat: SeatIndex) -> Self {
        Self::plain(seat, ActionType::Check)
    }

    pub fn call(seat: SeatIndex) -> Self {
        Self::plain(seat, ActionType::Call)
    }

    pub fn all_in(seat: SeatIndex) -> Self {
        Self::plain(seat, ActionType::AllIn)
    }

    pub fn bet(seat: SeatIndex, amount: Chips) -> Self {
        Self {
            amount: Some(amount),
            ..Self::plain(seat, ActionType::Bet)
        }
    }

    /// Raise до `raise_to` (итоговая ставка игрока на улице).
    pub fn raise(seat: SeatIndex, raise_to: Chips) -> Self {
        Self {
            amount: Some(raise_to),
            ..Self::plain(seat, ActionType::Raise)
        }
    }

    pub fn reveal(seat: SeatIndex, index: u8) -> Self {
        Self {
            index: Some(index),
            ..Self::plain(seat, ActionType::Reveal)
        }
    }
}
