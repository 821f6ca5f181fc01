//! Покерный движок: ставки, переход улиц, сайд-поты, шоудаун.
//!
//! Высокоуровневый объект: `Engine`
//! Основные операции:
//!   - `process_action` – применить действие игрока
//!   - `execute_transition` – перейти в фазу (старт раздачи, улица, шоудаун)
//!   - `player_context` – состояние стола глазами игрока

pub mod actions;
pub mod betting;
pub mod context;
pub mod effects;
pub mod errors;
pub mod game_loop;
pub mod invariants;
pub mod positions;
pub mod side_pots;
pub mod transitions;
pub mod validation;

pub use actions::{Action, ActionType};
pub use context::{GameContext, GameStatus, Pot, TransitionOverrides};
pub use effects::{BlindKind, Effect, GameEndReason, GameEvent, SeatSnapshot, StepResult};
pub use errors::{EngineError, StateError, ValidationError};
pub use game_loop::Engine;
pub use validation::{legal_options, LegalOptions};

/// RNG интерфейс для engine.
/// Реализации лежат в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
