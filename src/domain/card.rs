use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Количество карт в стандартной колоде.
pub const DECK_SIZE: u8 = 52;

/// Масть карты. Порядок вариантов = порядок мастей в каноническом индексе.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Clubs,    // ♣
    Diamonds, // ♦
    Hearts,   // ♥
    Spades,   // ♠
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    fn ordinal(self) -> u8 {
        match self {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        }
    }

    fn symbol(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }

    fn from_symbol(ch: char) -> Option<Suit> {
        match ch {
            'c' | 'C' => Some(Suit::Clubs),
            'd' | 'D' => Some(Suit::Diamonds),
            'h' | 'H' => Some(Suit::Hearts),
            's' | 'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Ранг карты. Числовое значение: 2..=14.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// От двойки к тузу.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Числовое значение ранга (2..=14).
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Обратное к `value`.
    pub fn from_value(v: u8) -> Option<Rank> {
        Rank::ALL.get(v.checked_sub(2)? as usize).copied()
    }

    fn symbol(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    fn from_symbol(ch: char) -> Option<Rank> {
        Rank::ALL
            .iter()
            .copied()
            .find(|r| r.symbol() == ch.to_ascii_uppercase())
    }
}

/// Обычная покерная карта (52-карточная колода).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

/// Ошибки разбора карты из строки / индекса.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CardParseError {
    #[error("Строка карты должна состоять из 2 символов, получено {0:?}")]
    BadLength(String),

    #[error("Неизвестный ранг: {0}")]
    BadRank(char),

    #[error("Неизвестная масть: {0}")]
    BadSuit(char),

    #[error("Индекс карты вне диапазона 0..52: {0}")]
    BadIndex(u8),
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Канонический индекс 0..52: `масть * 13 + (ранг - 2)`,
    /// масти в порядке c, d, h, s.
    pub fn index(&self) -> u8 {
        self.suit.ordinal() * 13 + (self.rank.value() - 2)
    }

    /// Карта по каноническому индексу.
    pub fn from_index(index: u8) -> Result<Card, CardParseError> {
        if index >= DECK_SIZE {
            return Err(CardParseError::BadIndex(index));
        }
        let suit = Suit::ALL[(index / 13) as usize];
        let rank = Rank::ALL[(index % 13) as usize];
        Ok(Card { rank, suit })
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Card {
    /// Формат вида `Ah`, `Td`, `7c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Парсинг строки вида "Ah", "Td", "7c".
impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (r_ch, s_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => (r, s),
            _ => return Err(CardParseError::BadLength(s.to_string())),
        };

        let rank = Rank::from_symbol(r_ch).ok_or(CardParseError::BadRank(r_ch))?;
        let suit = Suit::from_symbol(s_ch).ok_or(CardParseError::BadSuit(s_ch))?;

        Ok(Card { rank, suit })
    }
}
