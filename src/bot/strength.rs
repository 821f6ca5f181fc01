//! Оценка силы руки для ботов по шкале 0..=10.

use crate::domain::{Card, Chips};
use crate::eval::{evaluate_best_hand, evaluate_cards, HandCategory};

/// Сила стартовой руки:
/// - 9-10: AA, KK, QQ, JJ, AKs
/// - 7-8: TT-99, AK, AQ, KQs
/// - 5-6: 88-77, AJ, одномастные коннекторы
/// - 3-4: 66-22, Ax, бродвеи
/// - 0-2: всё остальное
pub fn preflop_strength(hole: &[Card]) -> u8 {
    let [c1, c2] = match hole {
        [a, b] => [*a, *b],
        _ => return 0,
    };
    let (r1, r2) = (c1.rank.value(), c2.rank.value());
    let (high, low) = if r1 >= r2 { (r1, r2) } else { (r2, r1) };
    let suited = c1.suit == c2.suit;
    let pick = |s: u8, o: u8| if suited { s } else { o };

    if high == low {
        return match high {
            13..=14 => 10,
            11..=12 => 9,
            10 => 8,
            9 => 7,
            8 => 6,
            7 => 5,
            _ => 4,
        };
    }

    match (high, low) {
        (14, 13) => pick(10, 8),
        (14, 12) => pick(8, 7),
        (14, 11) => pick(7, 6),
        (14, 10) => pick(6, 5),
        (14, _) => pick(5, 4),
        (13, 12) => pick(7, 6),
        (13, 11) => pick(6, 5),
        (13, 10) => pick(5, 4),
        (12, 11) => pick(6, 5),
        (12, 10) => pick(5, 4),
        _ if suited && high - low <= 2 => {
            if high >= 9 {
                5
            } else {
                4
            }
        }
        _ if high >= 11 && low >= 9 => 4,
        _ => 2,
    }
}

/// Сила готовой руки после флопа. `None`, если борд ещё не открыт.
///
/// Если вся комбинация лежит на борде, рука считается слабой.
pub fn postflop_strength(hole: &[Card], board: &[Card]) -> Option<u8> {
    if board.len() < 3 {
        return None;
    }
    let rank = evaluate_best_hand(hole, board)?;
    if board.len() == 5 && evaluate_cards(board) == Some(rank) {
        return Some(1);
    }

    let base = match rank.category() {
        HandCategory::HighCard => 1,
        HandCategory::OnePair => 3,
        HandCategory::TwoPair => 5,
        HandCategory::ThreeOfAKind => 6,
        HandCategory::Straight => 7,
        HandCategory::Flush => 8,
        HandCategory::FullHouse => 9,
        HandCategory::FourOfAKind | HandCategory::StraightFlush => 10,
    };
    let kicker_boost = u8::from(rank.top_rank_value() >= 12);
    Some((base + kicker_boost).min(10))
}

/// Сила руки на текущей улице.
pub fn hand_strength(hole: &[Card], board: &[Card]) -> u8 {
    postflop_strength(hole, board).unwrap_or_else(|| preflop_strength(hole))
}

/// Шансы банка: pot / (pot + call).
pub fn pot_odds(pot: Chips, to_call: Chips) -> f32 {
    if to_call.is_zero() {
        return 1.0;
    }
    pot.0 as f32 / (pot.0 + to_call.0) as f32
}
