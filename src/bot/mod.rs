//! Боты: чистая функция (контекст, место, стратегия) → одно допустимое действие.
//!
//! Стратегия выбирается один раз при посадке бота (`StrategyKind::build`),
//! дальше решения идут через трейт без разбора строк.

pub mod strategies;
pub mod strength;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::SeatIndex;
use crate::engine::{Action, GameContext};

pub use strategies::{
    threshold_decision, AggressiveBot, BalancedBot, CallingStationBot, LooseBot, StrategyProfile, TightBot,
};

/// Стратегия бота. Одинаковый контекст – всегда одинаковое действие.
pub trait BotStrategy {
    fn kind(&self) -> StrategyKind;

    fn profile(&self) -> StrategyProfile;

    /// Действие для `seat` или `None`, если сейчас не его ход.
    fn decide(&self, ctx: &GameContext, seat: SeatIndex) -> Option<Action> {
        threshold_decision(ctx, seat, &self.profile())
    }
}

/// Именованные стратегии ботов.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Aggressive,
    Balanced,
    Tight,
    Loose,
    CallingStation,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Aggressive,
        StrategyKind::Balanced,
        StrategyKind::Tight,
        StrategyKind::Loose,
        StrategyKind::CallingStation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Aggressive => "aggressive",
            StrategyKind::Balanced => "balanced",
            StrategyKind::Tight => "tight",
            StrategyKind::Loose => "loose",
            StrategyKind::CallingStation => "calling_station",
        }
    }

    pub fn build(self) -> Box<dyn BotStrategy + Send + Sync> {
        match self {
            StrategyKind::Aggressive => Box::new(AggressiveBot),
            StrategyKind::Balanced => Box::new(BalancedBot),
            StrategyKind::Tight => Box::new(TightBot),
            StrategyKind::Loose => Box::new(LooseBot),
            StrategyKind::CallingStation => Box::new(CallingStationBot),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Неизвестная стратегия бота: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        StrategyKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Решение бота для места `seat`.
pub fn decide(ctx: &GameContext, seat: SeatIndex, strategy: &dyn BotStrategy) -> Option<Action> {
    strategy.decide(ctx, seat)
}
