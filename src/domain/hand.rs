use serde::{Deserialize, Serialize};

/// Улица раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Следующая улица (после River: Showdown, после Showdown: ничего).
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => Some(Street::Showdown),
            Street::Showdown => None,
        }
    }

    /// Сколько общих карт открывается при входе на эту улицу.
    pub fn cards_to_deal(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }

    /// Сколько карт лежит на борде, когда улица уже открыта.
    pub fn board_len(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River | Street::Showdown => 5,
        }
    }

    /// Компактный код улицы для истории раздачи.
    pub fn code(self) -> u8 {
        match self {
            Street::Preflop => 0,
            Street::Flop => 1,
            Street::Turn => 2,
            Street::River => 3,
            Street::Showdown => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Street> {
        match code {
            0 => Some(Street::Preflop),
            1 => Some(Street::Flop),
            2 => Some(Street::Turn),
            3 => Some(Street::River),
            4 => Some(Street::Showdown),
            _ => None,
        }
    }
}

/// Ранг руки: чем больше значение, тем сильнее рука. Заполняется модулем eval.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(pub u32);
