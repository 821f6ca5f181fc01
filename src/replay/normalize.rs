//! Разбор истории в нормализованный поток шагов реплея.
//!
//! Автоматические записи (блайнды, анте, выплаты, улицы) движок при
//! реплее выводит сам, поэтому в поток попадают только действия игроков.

use crate::domain::{Card, Chips, PlayerId, SeatIndex, MAX_SEATS, MIN_SEATS};
use crate::engine::positions::seat_before;
use crate::engine::{Action, ActionType};
use crate::history::codec::{decode_action, ActionTag};
use crate::history::{HandHistory, Stakes};

use super::ReplayError;

/// Игрок в реплее: место 1..N, id из манифеста, стек на старте раздачи.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatSetup {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub chips: Chips,
}

/// Действие игрока, которое нужно применить к движку.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayStep {
    /// Индекс записи в `HandHistory::actions`.
    pub entry_index: usize,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedHand {
    pub seats: Vec<SeatSetup>,
    pub stakes: Stakes,
    pub button_seat: SeatIndex,
    pub hole_cards: Vec<(SeatIndex, [Card; 2])>,
    pub board: Vec<Card>,
    pub steps: Vec<ReplayStep>,
}

pub fn normalize(history: &HandHistory) -> Result<NormalizedHand, ReplayError> {
    let n = history.seat_count();
    if !(MIN_SEATS as usize..=MAX_SEATS as usize).contains(&n) {
        return Err(ReplayError::Corrupt(format!("в манифесте {n} игроков")));
    }
    if history.starting_stacks.len() != n || history.hole_cards.len() != n {
        return Err(ReplayError::Corrupt("размеры манифеста, стеков и карт не совпадают".into()));
    }

    let mut seats = Vec::with_capacity(n);
    let mut hole_cards = Vec::with_capacity(n);
    for (i, (&player_id, &chips)) in history.manifest.iter().zip(&history.starting_stacks).enumerate() {
        let seat = i as SeatIndex + 1;
        if chips.is_zero() {
            return Err(ReplayError::Corrupt(format!("у места {seat} нулевой стек")));
        }
        let cards: [Card; 2] = history
            .hole_cards_of(i)?
            .try_into()
            .map_err(|_| ReplayError::Corrupt(format!("у места {seat} не две карманные карты")))?;
        seats.push(SeatSetup { seat, player_id, chips });
        hole_cards.push((seat, cards));
    }

    let stakes = resolve_stakes(history);
    let button_seat = find_button(history)?;

    let mut steps = Vec::new();
    for (entry_index, entry) in history.actions.iter().enumerate() {
        if entry.tag.is_automatic() {
            continue;
        }
        let seat_index = entry
            .seat_index
            .filter(|&i| (i as usize) < n)
            .ok_or_else(|| ReplayError::Corrupt(format!("запись {entry_index}: нет места игрока")))?;
        let seat = seat_index + 1;

        let mut action = if entry.tag == ActionTag::Reveal && entry.index.is_none() {
            // Запись без индекса: ищем карту среди карманных.
            let card = entry
                .cards
                .first()
                .copied()
                .ok_or_else(|| ReplayError::Corrupt(format!("запись {entry_index}: показ без карты")))?;
            let index = history.hole_cards[seat_index as usize]
                .iter()
                .position(|&c| c == card)
                .ok_or_else(|| ReplayError::Corrupt(format!("запись {entry_index}: показана чужая карта")))?;
            Action::reveal(seat, index as u8)
        } else {
            decode_action(entry, seat)?
        };

        if action.kind == ActionType::Reveal {
            let index = action.index.unwrap_or_default();
            let expected = history.hole_cards[seat_index as usize].get(index as usize);
            if let (Some(&shown), Some(&held)) = (entry.cards.first(), expected) {
                if shown != held {
                    return Err(ReplayError::Corrupt(format!(
                        "запись {entry_index}: показанная карта не совпадает с карманной"
                    )));
                }
            }
        } else {
            // Сумма call/all-in в логе справочная, движок считает её сам.
            if matches!(action.kind, ActionType::Call | ActionType::AllIn | ActionType::Fold | ActionType::Check) {
                action.amount = None;
            }
        }

        steps.push(ReplayStep { entry_index, action });
    }

    Ok(NormalizedHand {
        seats,
        stakes,
        button_seat,
        hole_cards,
        board: history.board_cards()?,
        steps,
    })
}

/// Ставки берутся из записи; если их нет, – из сумм блайндов в логе.
fn resolve_stakes(history: &HandHistory) -> Stakes {
    if !history.stakes.big_blind.is_zero() {
        return history.stakes.clone();
    }
    let max_of = |tag: ActionTag| {
        history
            .actions
            .iter()
            .filter(|e| e.tag == tag)
            .filter_map(|e| e.amount)
            .max()
            .map(Chips)
            .unwrap_or(Chips::ZERO)
    };
    Stakes {
        small_blind: max_of(ActionTag::SmallBlind),
        big_blind: max_of(ActionTag::BigBlind),
        ante: max_of(ActionTag::Ante),
    }
}

/// Кнопка по первой записи блайнда.
///
/// Хедз-ап: кнопка ставит малый блайнд. За полным столом кнопка сидит
/// перед малым блайндом.
fn find_button(history: &HandHistory) -> Result<SeatIndex, ReplayError> {
    let n = history.seat_count() as SeatIndex;
    let first_blind = history
        .actions
        .iter()
        .find(|e| matches!(e.tag, ActionTag::SmallBlind | ActionTag::BigBlind))
        .ok_or_else(|| ReplayError::Corrupt("в логе нет блайндов".into()))?;
    let seat = first_blind
        .seat_index
        .filter(|&i| i < n)
        .map(|i| i + 1)
        .ok_or_else(|| ReplayError::Corrupt("блайнд без места".into()))?;

    let sb_seat = if first_blind.tag == ActionTag::SmallBlind {
        seat
    } else {
        seat_before(seat, n)
    };
    Ok(if n == 2 { sb_seat } else { seat_before(sb_seat, n) })
}
