//! Что движок сообщает наружу после каждого шага:
//! - `GameEvent` – факты для истории раздачи и клиентов;
//! - `Effect` – отложенная работа для вызывающей стороны (таймеры, переходы).

use serde::{Deserialize, Serialize};

use crate::domain::{Card, Chips, HandNumber, HandRank, PlayerId, SeatIndex, Street};
use crate::engine::actions::ActionType;
use crate::engine::context::GameContext;

/// Почему закончилась раздача (или игра за столом).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GameEndReason {
    /// Все, кроме одного, сфолдили.
    Uncontested,
    /// Банк разыгран на вскрытии.
    Showdown,
    /// За столом не осталось двух игроков с фишками.
    TableClosed,
}

/// Отложенная работа, которую движок сам не выполняет.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Effect {
    /// Через `delay_ms` вызвать `execute_transition(target_phase)`.
    ScheduleTransition { target_phase: Street, delay_ms: u64 },
    /// Запустить таймер хода для места.
    StartTimer { seat: SeatIndex, timeout_ms: u64 },
    /// Раздача закончилась.
    GameEnd { reason: GameEndReason },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BlindKind {
    Small,
    Big,
}

/// Место и стек игрока на старте раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatSnapshot {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub chips: Chips,
}

/// Событие раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameEvent {
    HandStarted {
        hand_number: HandNumber,
        button_seat: SeatIndex,
        sb_seat: SeatIndex,
        bb_seat: SeatIndex,
        small_blind: Chips,
        big_blind: Chips,
        ante: Chips,
        /// Участники раздачи по возрастанию места, стеки до анте и блайндов.
        seats: Vec<SeatSnapshot>,
    },
    AntePosted {
        seat: SeatIndex,
        amount: Chips,
    },
    BlindPosted {
        seat: SeatIndex,
        blind: BlindKind,
        amount: Chips,
    },
    HoleCardsDealt {
        seat: SeatIndex,
        cards: Vec<Card>,
    },
    PlayerActed {
        seat: SeatIndex,
        player_id: PlayerId,
        action: ActionType,
        /// Сколько фишек игрок доложил этим действием.
        paid: Chips,
        /// Ставка игрока на улице после действия.
        street_bet: Chips,
        all_in: bool,
    },
    CardRevealed {
        seat: SeatIndex,
        index: u8,
        card: Card,
    },
    StreetDealt {
        street: Street,
        cards: Vec<Card>,
    },
    HandShown {
        seat: SeatIndex,
        cards: Vec<Card>,
        rank: HandRank,
    },
    PotAwarded {
        pot_index: usize,
        seat: SeatIndex,
        player_id: PlayerId,
        amount: Chips,
    },
    HandFinished {
        hand_number: HandNumber,
        reason: GameEndReason,
    },
}

/// Результат успешного шага движка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepResult {
    /// Новое авторитетное состояние.
    pub state: GameContext,
    pub events: Vec<GameEvent>,
    pub effects: Vec<Effect>,
}

impl StepResult {
    /// Переход, который надо запланировать (если есть).
    pub fn scheduled_transition(&self) -> Option<Street> {
        self.effects.iter().find_map(|e| match e {
            Effect::ScheduleTransition { target_phase, .. } => Some(*target_phase),
            _ => None,
        })
    }

    pub fn game_end(&self) -> Option<GameEndReason> {
        self.effects.iter().find_map(|e| match e {
            Effect::GameEnd { reason } if *reason != GameEndReason::TableClosed => Some(*reason),
            _ => None,
        })
    }

    pub fn table_closed(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, Effect::GameEnd { reason: GameEndReason::TableClosed }))
    }
}
