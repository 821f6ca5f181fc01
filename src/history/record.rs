use serde::{Deserialize, Serialize};

use crate::domain::{Card, Chips, GameId, HandNumber, PlayerId, SeatIndex};

use super::codec::{decode_cards, CodecError, EncodedAction};

/// Вариант игры по умолчанию: безлимитный холдем.
pub const VARIANT_NLHE: &str = "nlhe";

/// Ставки раздачи.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
    #[serde(default)]
    pub ante: Chips,
}

/// Сохраняемая запись одной раздачи.
///
/// Места внутри истории – индексы манифеста: запись `i` относится к игроку
/// `manifest[i]`, которому при реплее достаётся место `i + 1`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub game_id: GameId,
    pub hand_number: HandNumber,
    pub variant: String,
    #[serde(default)]
    pub stakes: Stakes,
    pub manifest: Vec<PlayerId>,
    pub starting_stacks: Vec<Chips>,
    pub actions: Vec<EncodedAction>,
    /// Индексы карт борда.
    pub board: Vec<u8>,
    /// Индексы карманных карт по индексу манифеста.
    pub hole_cards: Vec<Vec<u8>>,
}

impl HandHistory {
    pub fn new(game_id: GameId, hand_number: HandNumber, stakes: Stakes) -> Self {
        Self {
            game_id,
            hand_number,
            variant: VARIANT_NLHE.to_string(),
            stakes,
            manifest: Vec::new(),
            starting_stacks: Vec::new(),
            actions: Vec::new(),
            board: Vec::new(),
            hole_cards: Vec::new(),
        }
    }

    pub fn seat_count(&self) -> usize {
        self.manifest.len()
    }

    /// Место игрока в реплее (1..N).
    pub fn replay_seat(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.manifest
            .iter()
            .position(|&id| id == player_id)
            .map(|i| i as SeatIndex + 1)
    }

    pub fn board_cards(&self) -> Result<Vec<Card>, CodecError> {
        decode_cards(&self.board)
    }

    pub fn hole_cards_of(&self, seat_index: usize) -> Result<Vec<Card>, CodecError> {
        decode_cards(self.hole_cards.get(seat_index).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(json)?)
    }
}
