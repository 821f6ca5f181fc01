//! Сессия стола: сериализация шагов движка, исполнение эффектов
//! (таймеры, отложенные переходы, ходы ботов) и запись истории.

mod table_session;

use thiserror::Error;

use crate::domain::{ConfigError, HandNumber};
use crate::engine::{Effect, EngineError, GameEndReason, GameEvent, StateError};

pub use table_session::TableSession;

/// Что рассылается подписчикам стола.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableUpdate {
    /// Применён шаг движка.
    Step {
        sequence: u64,
        events: Vec<GameEvent>,
        effects: Vec<Effect>,
    },
    HandFinished {
        hand_number: HandNumber,
        reason: GameEndReason,
    },
    Closed,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Стол закрыт")]
    Closed,
}

impl From<StateError> for SessionError {
    fn from(err: StateError) -> Self {
        SessionError::Engine(err.into())
    }
}
