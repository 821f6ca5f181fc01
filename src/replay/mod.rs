//! Детерминированный реплей сохранённой раздачи.
//!
//! Новый движок получает карманные карты и борд из истории, действия
//! игроков применяются по одному, после каждого шага все запланированные
//! переходы выполняются сразу. На каждое действие и каждый переход
//! снимается кадр.

pub mod normalize;
pub mod orchestrator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ConfigError, SeatIndex};
use crate::engine::EngineError;
use crate::history::CodecError;

pub use normalize::{normalize, NormalizedHand, ReplayStep, SeatSetup};
pub use orchestrator::{replay_hand, Frame, FrameCause, Replay, ReplayFailure};

/// Живой движок разошёлся с записью.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("рассинхрон на записи {entry_index}: в логе ходит место {history_seat}, в движке {engine_seat:?}")]
pub struct DesyncError {
    pub entry_index: usize,
    pub history_seat: SeatIndex,
    pub engine_seat: Option<SeatIndex>,
    /// Последний успешно снятый кадр.
    pub last_good_frame: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("История повреждена: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Desync(#[from] DesyncError),

    #[error("движок отклонил запись {entry_index:?}: {source}")]
    Engine {
        entry_index: Option<usize>,
        #[source]
        source: EngineError,
    },
}
