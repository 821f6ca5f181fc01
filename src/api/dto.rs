use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::{GameId, HandNumber, PlayerId, SeatIndex};
use crate::engine::{GameStatus, Pot};

/// DTO игрока за столом глазами конкретного зрителя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectedPlayer {
    pub player_id: PlayerId,
    pub seat: SeatIndex,
    pub chips: Chips,
    pub current_bet: Chips,
    pub total_bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub has_acted: bool,
    pub sitting_out: bool,
    pub leaving: bool,
    /// Карманные карты:
    /// - пустой список – карт нет или игрок сфолдил, ничего не показав;
    /// - `None` на месте карты – карта скрыта.
    pub hole_cards: Vec<Option<Card>>,
    pub revealed_indices: Vec<u8>,
}

/// DTO стола для клиента.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectedState {
    pub game_id: GameId,
    /// Для кого построена проекция (`None` – зритель).
    pub viewer: Option<PlayerId>,
    pub status: GameStatus,
    pub phase: Street,
    pub hand_number: HandNumber,
    pub community_cards: Vec<Card>,
    pub pots: Vec<Pot>,
    pub current_actor_seat: Option<SeatIndex>,
    pub button_seat: Option<SeatIndex>,
    pub sb_seat: Option<SeatIndex>,
    pub bb_seat: Option<SeatIndex>,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub high_bet: Chips,
    pub min_raise: Chips,
    pub action_deadline: Option<u64>,
    /// Идёт олл-ин ранаут: карты претендентов открыты.
    pub runout: bool,
    pub players: Vec<ProjectedPlayer>,
}

impl ProjectedState {
    pub fn player(&self, seat: SeatIndex) -> Option<&ProjectedPlayer> {
        self.players.iter().find(|p| p.seat == seat)
    }
}
