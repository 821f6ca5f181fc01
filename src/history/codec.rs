//! Компактная запись действий и карт для истории раздачи.
//!
//! Карта ⇄ индекс 0..51 ⇄ строка вида "Ah". Действие ⇄ `EncodedAction`
//! с коротким тегом. Автоматические события движка (блайнды, анте,
//! выплаты, открытие улиц) пишутся отдельными тегами, чтобы лог
//! был полной записью раздачи.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Card, CardParseError, Chips, SeatIndex};
use crate::engine::{Action, ActionType};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Некорректная карта: {0}")]
    Card(#[from] CardParseError),

    #[error("Неизвестный код тега: {0}")]
    UnknownTag(u8),

    #[error("Тег {0:?} – не действие игрока")]
    NotPlayerAction(ActionTag),

    #[error("У записи {tag:?} нет поля {field}")]
    MissingField { tag: ActionTag, field: &'static str },

    #[error("Некорректный JSON истории: {0}")]
    Json(#[from] serde_json::Error),
}

/// Тег записи в логе раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionTag {
    #[serde(rename = "f")]
    Fold,
    #[serde(rename = "x")]
    Check,
    #[serde(rename = "c")]
    Call,
    #[serde(rename = "b")]
    Bet,
    #[serde(rename = "r")]
    Raise,
    #[serde(rename = "a")]
    AllIn,
    #[serde(rename = "v")]
    Reveal,
    #[serde(rename = "sb")]
    SmallBlind,
    #[serde(rename = "bb")]
    BigBlind,
    #[serde(rename = "an")]
    Ante,
    #[serde(rename = "pw")]
    PotAward,
    #[serde(rename = "st")]
    Street,
}

impl ActionTag {
    pub const ALL: [ActionTag; 12] = [
        ActionTag::Fold,
        ActionTag::Check,
        ActionTag::Call,
        ActionTag::Bet,
        ActionTag::Raise,
        ActionTag::AllIn,
        ActionTag::Reveal,
        ActionTag::SmallBlind,
        ActionTag::BigBlind,
        ActionTag::Ante,
        ActionTag::PotAward,
        ActionTag::Street,
    ];

    /// Однобайтовый код тега.
    pub fn code(self) -> u8 {
        match self {
            ActionTag::Fold => 0,
            ActionTag::Check => 1,
            ActionTag::Call => 2,
            ActionTag::Bet => 3,
            ActionTag::Raise => 4,
            ActionTag::AllIn => 5,
            ActionTag::Reveal => 6,
            ActionTag::SmallBlind => 10,
            ActionTag::BigBlind => 11,
            ActionTag::Ante => 12,
            ActionTag::PotAward => 13,
            ActionTag::Street => 14,
        }
    }

    pub fn from_code(code: u8) -> Result<ActionTag, CodecError> {
        ActionTag::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or(CodecError::UnknownTag(code))
    }

    /// Запись сделана движком, а не игроком: при реплее не применяется.
    pub fn is_automatic(self) -> bool {
        self.action_type().is_none()
    }

    pub fn action_type(self) -> Option<ActionType> {
        match self {
            ActionTag::Fold => Some(ActionType::Fold),
            ActionTag::Check => Some(ActionType::Check),
            ActionTag::Call => Some(ActionType::Call),
            ActionTag::Bet => Some(ActionType::Bet),
            ActionTag::Raise => Some(ActionType::Raise),
            ActionTag::AllIn => Some(ActionType::AllIn),
            ActionTag::Reveal => Some(ActionType::Reveal),
            _ => None,
        }
    }
}

impl From<ActionType> for ActionTag {
    fn from(kind: ActionType) -> Self {
        match kind {
            ActionType::Fold => ActionTag::Fold,
            ActionType::Check => ActionTag::Check,
            ActionType::Call => ActionTag::Call,
            ActionType::Bet => ActionTag::Bet,
            ActionType::Raise => ActionTag::Raise,
            ActionType::AllIn => ActionTag::AllIn,
            ActionType::Reveal => ActionTag::Reveal,
        }
    }
}

/// Одна запись лога раздачи.
///
/// `seat_index` – индекс в манифесте истории (0..N), не место за живым столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodedAction {
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub seat_index: Option<u8>,
    #[serde(rename = "t")]
    pub tag: ActionTag,
    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    /// Индекс показанной карманной карты (для `Reveal`).
    #[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u8>,
    #[serde(rename = "c", default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<u8>,
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub pot_index: Option<u32>,
    #[serde(rename = "st", default, skip_serializing_if = "Option::is_none")]
    pub street: Option<u8>,
    /// Пауза с предыдущей записи, мс.
    #[serde(rename = "dt", default, skip_serializing_if = "Option::is_none")]
    pub delta_time: Option<u64>,
}

impl EncodedAction {
    pub fn new(tag: ActionTag, seat_index: Option<u8>) -> Self {
        Self {
            seat_index,
            tag,
            amount: None,
            index: None,
            cards: Vec::new(),
            pot_index: None,
            street: None,
            delta_time: None,
        }
    }
}

pub fn card_to_index(card: Card) -> u8 {
    card.index()
}

pub fn index_to_card(index: u8) -> Result<Card, CodecError> {
    Ok(Card::from_index(index)?)
}

pub fn card_to_string(card: Card) -> String {
    card.to_string()
}

pub fn string_to_card(s: &str) -> Result<Card, CodecError> {
    Ok(s.parse::<Card>()?)
}

pub fn index_to_string(index: u8) -> Result<String, CodecError> {
    index_to_card(index).map(card_to_string)
}

pub fn string_to_index(s: &str) -> Result<u8, CodecError> {
    string_to_card(s).map(card_to_index)
}

pub fn encode_cards(cards: &[Card]) -> Vec<u8> {
    cards.iter().copied().map(card_to_index).collect()
}

pub fn decode_cards(indices: &[u8]) -> Result<Vec<Card>, CodecError> {
    indices.iter().copied().map(index_to_card).collect()
}

/// Закодировать действие игрока, сидящего под индексом `seat_index` в манифесте.
pub fn encode_action(action: &Action, seat_index: u8) -> EncodedAction {
    let mut encoded = EncodedAction::new(action.kind.into(), Some(seat_index));
    encoded.amount = action.amount.map(|c| c.0);
    encoded.index = action.index;
    encoded
}

/// Раскодировать действие игрока для места `seat` движка.
pub fn decode_action(encoded: &EncodedAction, seat: SeatIndex) -> Result<Action, CodecError> {
    let kind = encoded
        .tag
        .action_type()
        .ok_or(CodecError::NotPlayerAction(encoded.tag))?;
    let missing = |field| CodecError::MissingField {
        tag: encoded.tag,
        field,
    };

    let mut action = Action {
        seat,
        kind,
        amount: None,
        index: None,
    };
    match kind {
        ActionType::Bet | ActionType::Raise => {
            action.amount = Some(Chips(encoded.amount.ok_or_else(|| missing("amount"))?));
        }
        ActionType::Reveal => {
            action.index = Some(encoded.index.ok_or_else(|| missing("index"))?);
        }
        _ => action.amount = encoded.amount.map(Chips),
    }
    Ok(action)
}
