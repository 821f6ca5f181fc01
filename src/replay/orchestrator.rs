use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::dto::ProjectedState;
use crate::api::projection::project;
use crate::domain::{Card, PlayerId, Street, TableConfig};
use crate::engine::{Action, ActionType, Effect, Engine, GameContext, GameStatus, StepResult, TransitionOverrides};
use crate::history::HandHistory;
use crate::infra::DeterministicRng;

use super::normalize::{normalize, NormalizedHand};
use super::{DesyncError, ReplayError};

/// Что привело к кадру.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum FrameCause {
    Transition(Street),
    Action { entry_index: usize, action: Action },
}

/// Снимок авторитетного состояния после одного шага.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub cause: FrameCause,
    pub state: GameContext,
}

impl Frame {
    /// Кадр глазами зрителя.
    pub fn view(&self, viewer: Option<PlayerId>) -> ProjectedState {
        project(&self.state, viewer)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Replay {
    pub frames: Vec<Frame>,
    /// Раздача доиграна до конца.
    pub finished: bool,
}

impl Replay {
    pub fn final_state(&self) -> Option<&GameContext> {
        self.frames.last().map(|f| &f.state)
    }

    pub fn views(&self, viewer: Option<PlayerId>) -> Vec<ProjectedState> {
        self.frames.iter().map(|f| f.view(viewer)).collect()
    }
}

/// Реплей прерван. `frames` – всё, что успели снять до ошибки.
#[derive(Debug)]
pub struct ReplayFailure {
    pub error: ReplayError,
    pub frames: Vec<Frame>,
}

/// Проиграть раздачу заново.
pub fn replay_hand(history: &HandHistory) -> Result<Replay, ReplayFailure> {
    let hand = normalize(history).map_err(|error| ReplayFailure {
        error,
        frames: Vec::new(),
    })?;

    let mut replayer = match Replayer::new(history, &hand) {
        Ok(r) => r,
        Err(error) => {
            return Err(ReplayFailure {
                error,
                frames: Vec::new(),
            })
        }
    };
    match replayer.run(&hand) {
        Ok(()) => {
            let finished = replayer.engine.context().status == GameStatus::Finished;
            Ok(Replay {
                frames: replayer.frames,
                finished,
            })
        }
        Err(error) => Err(ReplayFailure {
            error,
            frames: replayer.frames,
        }),
    }
}

struct Replayer {
    engine: Engine<DeterministicRng>,
    board: Vec<Card>,
    frames: Vec<Frame>,
}

impl Replayer {
    fn new(history: &HandHistory, hand: &NormalizedHand) -> Result<Self, ReplayError> {
        let max_stack = hand.seats.iter().map(|s| s.chips).max().unwrap_or_default();
        let config = TableConfig {
            max_seats: hand.seats.len() as u8,
            small_blind: hand.stakes.small_blind,
            big_blind: hand.stakes.big_blind,
            ante: hand.stakes.ante,
            starting_stack: max_stack.max(hand.stakes.big_blind),
            ..TableConfig::default()
        }
        .instant();

        let mut engine = Engine::new(history.game_id, config, DeterministicRng::from_seed(history.hand_number))?;
        for s in &hand.seats {
            engine
                .seat_player(s.player_id, s.seat, s.chips)
                .map_err(|e| ReplayError::Engine {
                    entry_index: None,
                    source: e.into(),
                })?;
        }

        Ok(Self {
            engine,
            board: hand.board.clone(),
            frames: Vec::new(),
        })
    }

    fn run(&mut self, hand: &NormalizedHand) -> Result<(), ReplayError> {
        let overrides = TransitionOverrides {
            hole_cards: hand.hole_cards.clone(),
            community_cards: Vec::new(),
            button_seat: Some(hand.button_seat),
        };
        // Если блайнды или анте уже поставили всех в олл-ин,
        // префлоп сам планирует ранаут.
        let effects = self.transition(Street::Preflop, overrides)?;
        self.drain(effects)?;

        for step in &hand.steps {
            let ctx = self.engine.context();
            let is_reveal = step.action.kind == ActionType::Reveal;
            let expected = ctx.current_actor_seat;
            if !is_reveal && (ctx.status != GameStatus::Active || expected != Some(step.action.seat)) {
                return Err(DesyncError {
                    entry_index: step.entry_index,
                    history_seat: step.action.seat,
                    engine_seat: expected,
                    last_good_frame: self.frames.len().checked_sub(1),
                }
                .into());
            }

            let result = self
                .engine
                .process_action(step.action.clone())
                .map_err(|source| ReplayError::Engine {
                    entry_index: Some(step.entry_index),
                    source,
                })?;
            self.capture(
                FrameCause::Action {
                    entry_index: step.entry_index,
                    action: step.action.clone(),
                },
                &result,
            );
            self.drain(result.effects)?;
        }

        debug!(
            "реплей game {} раздача #{}: {} кадров",
            self.engine.context().game_id,
            self.engine.context().hand_number,
            self.frames.len()
        );
        Ok(())
    }

    /// Выполнить все запланированные переходы, включая цепочку ранаута.
    fn drain(&mut self, effects: Vec<Effect>) -> Result<(), ReplayError> {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            if let Effect::ScheduleTransition { target_phase, .. } = effect {
                let overrides = TransitionOverrides::board(self.board_slice(target_phase)?);
                let effects = self.transition(target_phase, overrides)?;
                queue.extend(effects);
            }
        }
        Ok(())
    }

    fn transition(&mut self, target: Street, overrides: TransitionOverrides) -> Result<Vec<Effect>, ReplayError> {
        let result = self
            .engine
            .execute_transition(target, overrides)
            .map_err(|source| ReplayError::Engine {
                entry_index: None,
                source,
            })?;
        self.capture(FrameCause::Transition(target), &result);
        Ok(result.effects)
    }

    /// Карты борда, которые открываются на улице `street`.
    fn board_slice(&self, street: Street) -> Result<Vec<Card>, ReplayError> {
        let count = street.cards_to_deal();
        if count == 0 {
            return Ok(Vec::new());
        }
        let end = street.board_len();
        self.board
            .get(end - count..end)
            .map(<[Card]>::to_vec)
            .ok_or_else(|| ReplayError::Corrupt(format!("на борде нет карт для {street:?}")))
    }

    fn capture(&mut self, cause: FrameCause, result: &StepResult) {
        self.frames.push(Frame {
            index: self.frames.len(),
            cause,
            state: result.state.clone(),
        });
    }
}
