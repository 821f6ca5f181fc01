use thiserror::Error;

use crate::domain::{PlayerId, SeatIndex, Street};
use crate::engine::context::GameStatus;
use crate::domain::chips::Chips;

/// Некорректное действие игрока. Контекст не меняется, можно повторить
/// запрос с исправленным действием.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Раздача не ждёт действий игроков")]
    NoActionExpected,

    #[error("Место {0} не участвует в раздаче")]
    UnknownSeat(SeatIndex),

    #[error("Сейчас ход места {expected:?}, а не {got}")]
    NotYourTurn { expected: Option<SeatIndex>, got: SeatIndex },

    #[error("Невозможно выполнить check – нужно хотя бы уравнять ставку")]
    CannotCheck,

    #[error("Невозможно выполнить call – нет ставки для уравнивания")]
    NothingToCall,

    #[error("Bet невозможен – на улице уже есть ставка, нужен raise")]
    BetFacingBet,

    #[error("Raise невозможен – на улице ещё нет ставки, нужен bet")]
    NothingToRaise,

    #[error("Для этого действия нужна сумма")]
    MissingAmount,

    #[error("Ставка слишком мала: минимум {min}")]
    BetTooSmall { min: Chips },

    #[error("Размер рейза слишком мал: минимум до {min_to}")]
    RaiseTooSmall { min_to: Chips },

    #[error("Недостаточно фишек для этой ставки")]
    InsufficientChips,

    #[error("Торговля не переоткрыта: после короткого олл-ина можно только call или fold")]
    ActionNotReopened,

    #[error("Некому отвечать на ставку: все соперники в олл-ине")]
    NoOpponentToBet,

    #[error("Нужен индекс карманной карты")]
    MissingIndex,

    #[error("Некорректный индекс карманной карты: {0}")]
    InvalidRevealIndex(u8),

    #[error("Карта с индексом {0} уже показана")]
    AlreadyRevealed(u8),

    #[error("Показывать нечего: карты не розданы")]
    NothingToReveal,
}

/// Переход фазы запрошен в неподходящем состоянии. Контекст не меняется.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Переход {from:?} → {to:?} недопустим (статус {status:?})")]
    InvalidTransition {
        status: GameStatus,
        from: Street,
        to: Street,
    },

    #[error("Раунд ставок ещё не закрыт")]
    RoundNotClosed,

    #[error("Недостаточно игроков с фишками для раздачи")]
    NotEnoughPlayers,

    #[error("Раздача уже идёт")]
    HandInProgress,

    #[error("Место {0} вне диапазона стола или уже занято")]
    SeatUnavailable(SeatIndex),

    #[error("Игрок {0} уже сидит за столом")]
    DuplicatePlayer(PlayerId),

    #[error("Игрок {0} не найден за столом")]
    UnknownPlayer(PlayerId),

    #[error("Некорректные внешние карты: {0}")]
    InvalidOverride(String),

    #[error("В колоде не осталось карт")]
    DeckExhausted,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}

/// Ошибки движка покера.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),
}
