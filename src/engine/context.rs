use serde::{Deserialize, Serialize};

use crate::domain::{Card, Chips, GameId, HandNumber, Player, PlayerId, SeatIndex, Street, TableConfig};

/// Статус стола относительно раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Ни одной раздачи ещё не было.
    Waiting,
    /// Идёт раздача.
    Active,
    /// Раздача сыграна и выплачена, можно начинать следующую.
    Finished,
}

/// Банк (основной или сайд-пот).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    /// Кто претендует на этот банк (не сфолдившие, внёсшие не меньше уровня банка).
    pub eligible_players: Vec<PlayerId>,
}

/// Полное авторитетное состояние стола.
///
/// Движок владеет им и отдаёт копию в каждом `StepResult`.
/// Клиентам отдаётся только проекция (`api::projection`), где чужие
/// карманные карты скрыты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameContext {
    pub game_id: GameId,
    pub status: GameStatus,
    pub current_phase: Street,
    /// Игроки, отсортированные по месту.
    pub players: Vec<Player>,
    pub community_cards: Vec<Card>,
    pub pots: Vec<Pot>,
    pub current_actor_seat: Option<SeatIndex>,
    pub button_seat: Option<SeatIndex>,
    pub sb_seat: Option<SeatIndex>,
    pub bb_seat: Option<SeatIndex>,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    /// Самая большая ставка на текущей улице.
    pub high_bet: Chips,
    /// Минимальное приращение для полного рейза.
    pub min_raise: Chips,
    pub hand_number: HandNumber,
    /// Дедлайн хода в мс (ставит сессия, движок его только хранит).
    pub action_deadline: Option<u64>,
    /// Сумма стеков всех игроков на момент старта раздачи.
    pub hand_start_chips: Chips,
    pub config: TableConfig,
}

impl GameContext {
    pub fn new(game_id: GameId, config: TableConfig) -> Self {
        Self {
            game_id,
            status: GameStatus::Waiting,
            current_phase: Street::Preflop,
            players: Vec::new(),
            community_cards: Vec::new(),
            pots: Vec::new(),
            current_actor_seat: None,
            button_seat: None,
            sb_seat: None,
            bb_seat: None,
            small_blind: config.small_blind,
            big_blind: config.big_blind,
            ante: config.ante,
            high_bet: Chips::ZERO,
            min_raise: config.big_blind,
            hand_number: 0,
            action_deadline: None,
            hand_start_chips: Chips::ZERO,
            config,
        }
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&Player> {
        self.players.iter().find(|p| p.seat == seat)
    }

    pub fn player_mut(&mut self, seat: SeatIndex) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.seat == seat)
    }

    pub fn player_by_id(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Игроки, которые ещё претендуют на банк.
    pub fn contenders(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_contender())
    }

    pub fn contender_count(&self) -> usize {
        self.contenders().count()
    }

    /// Игроки, которые ещё могут делать ставки.
    pub fn actors(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.can_act())
    }

    /// Фишки, внесённые в банк за раздачу.
    pub fn total_committed(&self) -> Chips {
        self.players.iter().map(|p| p.total_bet).sum()
    }

    pub fn total_in_pots(&self) -> Chips {
        self.pots.iter().map(|p| p.amount).sum()
    }

    /// Все фишки за столом: стеки + внесённое в банк.
    pub fn total_chips(&self) -> Chips {
        self.players.iter().map(|p| p.chips + p.total_bet).sum()
    }

    /// Сколько фишек ставит игрок с этого места за текущую улицу.
    pub fn to_call(&self, seat: SeatIndex) -> Chips {
        self.player(seat)
            .map(|p| p.to_call(self.high_bet).min(p.chips))
            .unwrap_or(Chips::ZERO)
    }
}

/// Карты, подставляемые снаружи при переходе фазы (реплей, тесты).
///
/// - `hole_cards` – только для `Preflop`: по две карты на каждое место-участника;
/// - `community_cards` – для `Flop`/`Turn`/`River` ровно столько карт, сколько
///   открывается на улице; для `Preflop` – заранее заданный борд (до 5 карт),
///   который будет выдан по улицам.
/// - `button_seat` – только для `Preflop`: кнопка вместо обычного сдвига.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransitionOverrides {
    #[serde(default)]
    pub hole_cards: Vec<(SeatIndex, [Card; 2])>,
    #[serde(default)]
    pub community_cards: Vec<Card>,
    #[serde(default)]
    pub button_seat: Option<SeatIndex>,
}

impl TransitionOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn board(cards: Vec<Card>) -> Self {
        Self {
            community_cards: cards,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hole_cards.is_empty() && self.community_cards.is_empty() && self.button_seat.is_none()
    }
}
