use log::warn;

use crate::domain::{GameId, SeatIndex};
use crate::engine::{ActionType, BlindKind, GameEvent};

use super::codec::{encode_cards, ActionTag, EncodedAction};
use super::record::{HandHistory, Stakes};

/// Раздача, которая сейчас записывается.
#[derive(Debug)]
struct OpenHand {
    history: HandHistory,
    /// Живое место за столом для каждого индекса манифеста.
    seats: Vec<SeatIndex>,
    finished: bool,
}

impl OpenHand {
    fn seat_index(&self, seat: SeatIndex) -> Option<u8> {
        self.seats.iter().position(|&s| s == seat).map(|i| i as u8)
    }
}

/// Собирает `HandHistory` из событий движка.
///
/// Завершённая раздача остаётся открытой для показов карт
/// до старта следующей или до `take_finished`.
#[derive(Debug)]
pub struct HistoryRecorder {
    game_id: GameId,
    open: Option<OpenHand>,
    completed: Vec<HandHistory>,
    last_at_ms: Option<u64>,
}

impl HistoryRecorder {
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            open: None,
            completed: Vec::new(),
            last_at_ms: None,
        }
    }

    /// Записать события одного шага движка. `at_ms` – время шага (если известно).
    pub fn observe(&mut self, events: &[GameEvent], at_ms: Option<u64>) {
        let mut delta = match (at_ms, self.last_at_ms) {
            (Some(now), Some(prev)) => Some(now.saturating_sub(prev)),
            _ => None,
        };
        if at_ms.is_some() {
            self.last_at_ms = at_ms;
        }

        for event in events {
            if let Some(mut entry) = self.apply(event) {
                entry.delta_time = delta.take();
                if let Some(open) = self.open.as_mut() {
                    open.history.actions.push(entry);
                }
            }
        }
    }

    /// Текущая (возможно, ещё не завершённая) раздача.
    pub fn current(&self) -> Option<&HandHistory> {
        self.open.as_ref().map(|h| &h.history)
    }

    /// Забрать все завершённые раздачи.
    pub fn take_finished(&mut self) -> Vec<HandHistory> {
        if self.open.as_ref().map(|h| h.finished).unwrap_or(false) {
            if let Some(open) = self.open.take() {
                self.completed.push(open.history);
            }
        }
        std::mem::take(&mut self.completed)
    }

    fn apply(&mut self, event: &GameEvent) -> Option<EncodedAction> {
        if let GameEvent::HandStarted {
            hand_number,
            small_blind,
            big_blind,
            ante,
            seats,
            ..
        } = event
        {
            self.close_open_hand();
            let stakes = Stakes {
                small_blind: *small_blind,
                big_blind: *big_blind,
                ante: *ante,
            };
            let mut history = HandHistory::new(self.game_id, *hand_number, stakes);
            history.manifest = seats.iter().map(|s| s.player_id).collect();
            history.starting_stacks = seats.iter().map(|s| s.chips).collect();
            history.hole_cards = vec![Vec::new(); seats.len()];
            self.open = Some(OpenHand {
                history,
                seats: seats.iter().map(|s| s.seat).collect(),
                finished: false,
            });
            return None;
        }

        let open = self.open.as_mut()?;
        let entry = match event {
            GameEvent::HandStarted { .. } | GameEvent::HandShown { .. } => return None,
            GameEvent::AntePosted { seat, amount } => {
                let mut e = EncodedAction::new(ActionTag::Ante, open.seat_index(*seat));
                e.amount = Some(amount.0);
                e
            }
            GameEvent::BlindPosted { seat, blind, amount } => {
                let tag = match blind {
                    BlindKind::Small => ActionTag::SmallBlind,
                    BlindKind::Big => ActionTag::BigBlind,
                };
                let mut e = EncodedAction::new(tag, open.seat_index(*seat));
                e.amount = Some(amount.0);
                e
            }
            GameEvent::HoleCardsDealt { seat, cards } => {
                let idx = open.seat_index(*seat)? as usize;
                if let Some(slot) = open.history.hole_cards.get_mut(idx) {
                    *slot = encode_cards(cards);
                }
                return None;
            }
            GameEvent::PlayerActed {
                seat,
                action,
                paid,
                street_bet,
                ..
            } => {
                let mut e = EncodedAction::new((*action).into(), open.seat_index(*seat));
                e.amount = match action {
                    ActionType::Bet | ActionType::Raise => Some(street_bet.0),
                    ActionType::Call | ActionType::AllIn => Some(paid.0),
                    _ => None,
                };
                e
            }
            GameEvent::CardRevealed { seat, index, card } => {
                let mut e = EncodedAction::new(ActionTag::Reveal, open.seat_index(*seat));
                e.index = Some(*index);
                e.cards = encode_cards(&[*card]);
                e
            }
            GameEvent::StreetDealt { street, cards } => {
                let encoded = encode_cards(cards);
                open.history.board.extend_from_slice(&encoded);
                let mut e = EncodedAction::new(ActionTag::Street, None);
                e.street = Some(street.code());
                e.cards = encoded;
                e
            }
            GameEvent::PotAwarded {
                pot_index,
                seat,
                amount,
                ..
            } => {
                let mut e = EncodedAction::new(ActionTag::PotAward, open.seat_index(*seat));
                e.amount = Some(amount.0);
                e.pot_index = Some(*pot_index as u32);
                e
            }
            GameEvent::HandFinished { .. } => {
                open.finished = true;
                return None;
            }
        };
        Some(entry)
    }

    fn close_open_hand(&mut self) {
        match self.open.take() {
            Some(open) if open.finished => self.completed.push(open.history),
            Some(open) => warn!(
                "game {}: раздача #{} не завершена, история отброшена",
                self.game_id, open.history.hand_number
            ),
            None => {}
        }
    }
}
