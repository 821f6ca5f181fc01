use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chips::Chips;

/// Минимально и максимально допустимое число мест за столом.
pub const MIN_SEATS: u8 = 2;
pub const MAX_SEATS: u8 = 10;

/// Ошибки конфигурации стола.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Некорректный JSON конфигурации: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_seats = {0}, допустимо {MIN_SEATS}..={MAX_SEATS}")]
    SeatCount(u8),

    #[error("small_blind = 0")]
    ZeroSmallBlind,

    #[error("big_blind ({big}) <= small_blind ({small})")]
    BlindOrder { small: Chips, big: Chips },

    #[error("starting_stack ({stack}) меньше big_blind ({big})")]
    StackTooSmall { stack: Chips, big: Chips },
}

/// Конфиг стола, который лобби передаёт при создании стола:
/// размеры блайндов/анте, стартовый стек, задержки автоматики.
///
/// Все задержки: в миллисекундах. Их исполняет вызывающая сторона
/// (сессия стола), движок только сообщает их в эффектах.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    /// Максимальное количество мест за столом (2–10).
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Классическое анте с каждого игрока (0: без анте).
    pub ante: Chips,
    pub starting_stack: Chips,
    /// Время на ход.
    pub turn_timeout_ms: u64,
    /// Пауза перед следующей улицей после закрытия раунда ставок.
    pub street_delay_ms: u64,
    /// Пауза между улицами при олл-ин ранауте.
    pub runout_delay_ms: u64,
    /// Пауза перед вскрытием / выплатой банка.
    pub showdown_delay_ms: u64,
    /// Пауза перед следующей раздачей.
    pub next_hand_delay_ms: u64,
    /// «Время на подумать» для ботов (чисто UX).
    pub bot_think_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_seats: 6,
            small_blind: Chips(1),
            big_blind: Chips(2),
            ante: Chips::ZERO,
            starting_stack: Chips(200),
            turn_timeout_ms: 30_000,
            street_delay_ms: 800,
            runout_delay_ms: 1_500,
            showdown_delay_ms: 1_000,
            next_hand_delay_ms: 3_000,
            bot_think_ms: 700,
        }
    }
}

impl TableConfig {
    /// Конфиг с заданными блайндами, остальное: по умолчанию.
    pub fn with_blinds(small_blind: Chips, big_blind: Chips) -> Self {
        Self {
            small_blind,
            big_blind,
            ..Self::default()
        }
    }

    /// Конфиг без задержек: для тестов и реплея.
    pub fn instant(mut self) -> Self {
        self.street_delay_ms = 0;
        self.runout_delay_ms = 0;
        self.showdown_delay_ms = 0;
        self.next_hand_delay_ms = 0;
        self.bot_think_ms = 0;
        self
    }

    /// Разобрать конфиг из JSON (пропущенные поля берутся по умолчанию) и проверить.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: TableConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.max_seats) {
            return Err(ConfigError::SeatCount(self.max_seats));
        }
        if self.small_blind.is_zero() {
            return Err(ConfigError::ZeroSmallBlind);
        }
        if self.big_blind <= self.small_blind {
            return Err(ConfigError::BlindOrder {
                small: self.small_blind,
                big: self.big_blind,
            });
        }
        if self.starting_stack < self.big_blind {
            return Err(ConfigError::StackTooSmall {
                stack: self.starting_stack,
                big: self.big_blind,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg = TableConfig::from_json_str(r#"{"small_blind": 5, "big_blind": 10, "starting_stack": 1000}"#)
            .expect("config должен разобраться");
        assert_eq!(cfg.big_blind, Chips(10));
        assert_eq!(cfg.max_seats, TableConfig::default().max_seats);
    }

    #[test]
    fn inverted_blinds_are_rejected() {
        let cfg = TableConfig::with_blinds(Chips(10), Chips(5));
        assert!(matches!(cfg.validate(), Err(ConfigError::BlindOrder { .. })));
    }
}
