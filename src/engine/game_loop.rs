use log::{debug, error, warn};

use crate::api::dto::ProjectedState;
use crate::api::projection::project;
use crate::domain::{Chips, ConfigError, Deck, GameId, Player, PlayerId, SeatIndex, Street, TableConfig};
use crate::engine::actions::{Action, ActionType};
use crate::engine::context::{GameContext, GameStatus, TransitionOverrides};
use crate::engine::effects::{Effect, GameEvent, StepResult};
use crate::engine::errors::{EngineError, StateError, ValidationError};
use crate::engine::invariants;
use crate::engine::side_pots::build_pots;
use crate::engine::transitions::{deal_street, open_round, showdown, start_hand};
use crate::engine::validation::{legal_options, validate_betting_action, validate_reveal, LegalOptions, RaiseKind};
use crate::engine::RandomSource;

/// Движок одного стола.
///
/// Владеет авторитетным `GameContext`, колодой и RNG. Таймеров и задержек
/// не знает: всё отложенное возвращается как `Effect`, исполняет его
/// вызывающая сторона (сессия стола, реплей, тесты).
///
/// При ошибке состояние не меняется.
pub struct Engine<R: RandomSource> {
    ctx: GameContext,
    deck: Deck,
    rng: R,
    /// Счётчик успешных шагов, нужен, чтобы отличать устаревшие таймеры.
    sequence: u64,
}

impl<R: RandomSource> Engine<R> {
    pub fn new(game_id: GameId, config: TableConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ctx: GameContext::new(game_id, config),
            deck: Deck::standard_52(),
            rng,
            sequence: 0,
        })
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Посадить игрока (только между раздачами).
    pub fn seat_player(&mut self, id: PlayerId, seat: SeatIndex, chips: Chips) -> Result<(), StateError> {
        if self.ctx.status == GameStatus::Active {
            return Err(StateError::HandInProgress);
        }
        if seat == 0 || seat > self.ctx.config.max_seats || self.ctx.player(seat).is_some() {
            return Err(StateError::SeatUnavailable(seat));
        }
        if self.ctx.player_by_id(id).is_some() {
            return Err(StateError::DuplicatePlayer(id));
        }

        let pos = self.ctx.players.partition_point(|p| p.seat < seat);
        self.ctx.players.insert(pos, Player::new(id, seat, chips));
        self.ctx.hand_start_chips += chips;
        Ok(())
    }

    /// Игрок встаёт из-за стола: доигрывает текущую раздачу
    /// (обычно фолдом) и в следующей уже не участвует.
    pub fn mark_leaving(&mut self, id: PlayerId) -> Result<(), StateError> {
        let player = self
            .ctx
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StateError::UnknownPlayer(id))?;
        player.leaving = true;
        Ok(())
    }

    /// Дедлайн хода выставляет сессия (движок часов не знает).
    pub fn set_action_deadline(&mut self, deadline: Option<u64>) {
        self.ctx.action_deadline = deadline;
    }

    pub fn legal_options(&self, seat: SeatIndex) -> Option<LegalOptions> {
        if self.ctx.current_actor_seat != Some(seat) {
            return None;
        }
        legal_options(&self.ctx, seat)
    }

    /// Состояние стола глазами `viewer` (`None` – зритель).
    pub fn player_context(&self, viewer: Option<PlayerId>) -> ProjectedState {
        project(&self.ctx, viewer)
    }

    /// Применить действие игрока.
    pub fn process_action(&mut self, action: Action) -> Result<StepResult, EngineError> {
        let mut events = Vec::new();
        let mut effects = Vec::new();

        // Изменения идут в копию и попадают в контекст только целиком.
        let mut ctx = self.ctx.clone();
        let applied = if action.kind == ActionType::Reveal {
            apply_reveal(&mut ctx, &action, &mut events)
        } else {
            apply_betting_action(&mut ctx, &action, &mut events, &mut effects)
        };
        if let Err(err) = applied {
            warn!("game {}: {:?} отклонено: {err}", self.ctx.game_id, action);
            return Err(err);
        }

        self.ctx = ctx;
        debug!("game {}: {:?}", self.ctx.game_id, action);
        Ok(self.finish_step(events, effects))
    }

    /// Выполнить переход фазы (обычно по `Effect::ScheduleTransition`).
    pub fn execute_transition(
        &mut self,
        target: Street,
        overrides: TransitionOverrides,
    ) -> Result<StepResult, EngineError> {
        let mut ctx = self.ctx.clone();
        let mut deck = self.deck.clone();
        let mut events = Vec::new();
        let mut effects = Vec::new();

        match target {
            Street::Preflop => start_hand(&mut ctx, &mut deck, &mut self.rng, &overrides, &mut events, &mut effects)?,
            Street::Flop | Street::Turn | Street::River => {
                deal_street(&mut ctx, &mut deck, target, &overrides, &mut events, &mut effects)?
            }
            Street::Showdown => showdown(&mut ctx, &mut events, &mut effects)?,
        }

        self.ctx = ctx;
        self.deck = deck;
        Ok(self.finish_step(events, effects))
    }

    fn finish_step(&mut self, events: Vec<GameEvent>, effects: Vec<Effect>) -> StepResult {
        self.sequence += 1;
        if let Err(violation) = invariants::check(&self.ctx) {
            error!("game {}: нарушен инвариант: {violation}", self.ctx.game_id);
        }
        StepResult {
            state: self.ctx.clone(),
            events,
            effects,
        }
    }
}

fn apply_reveal(ctx: &mut GameContext, action: &Action, events: &mut Vec<GameEvent>) -> Result<(), EngineError> {
    let player = ctx
        .player(action.seat)
        .ok_or(ValidationError::UnknownSeat(action.seat))?;
    let index = validate_reveal(ctx, player, action)?;
    let card = *player
        .hole_cards
        .get(index as usize)
        .ok_or(ValidationError::InvalidRevealIndex(index))?;

    if let Some(p) = ctx.player_mut(action.seat) {
        p.revealed_indices.push(index);
    }
    events.push(GameEvent::CardRevealed {
        seat: action.seat,
        index,
        card,
    });
    Ok(())
}

fn apply_betting_action(
    ctx: &mut GameContext,
    action: &Action,
    events: &mut Vec<GameEvent>,
    effects: &mut Vec<Effect>,
) -> Result<(), EngineError> {
    if ctx.status != GameStatus::Active || ctx.current_actor_seat.is_none() {
        return Err(ValidationError::NoActionExpected.into());
    }
    let player = ctx
        .player(action.seat)
        .filter(|p| !p.sitting_out)
        .ok_or(ValidationError::UnknownSeat(action.seat))?;
    if ctx.current_actor_seat != Some(action.seat) {
        return Err(ValidationError::NotYourTurn {
            expected: ctx.current_actor_seat,
            got: action.seat,
        }
        .into());
    }
    let resolved = validate_betting_action(ctx, player, action)?;

    let player = ctx
        .player_mut(action.seat)
        .ok_or(StateError::Internal("игрок пропал после валидации"))?;
    player.chips -= resolved.pay;
    player.current_bet += resolved.pay;
    player.total_bet += resolved.pay;
    player.has_acted = true;
    if resolved.kind == ActionType::Fold {
        player.folded = true;
    } else if player.chips.is_zero() {
        player.all_in = true;
    }
    let acted = GameEvent::PlayerActed {
        seat: player.seat,
        player_id: player.id,
        action: resolved.kind,
        paid: resolved.pay,
        street_bet: player.current_bet,
        all_in: player.all_in,
    };
    let street_bet = player.current_bet;

    match resolved.raise {
        RaiseKind::None => {}
        RaiseKind::Opening => {
            ctx.min_raise = ctx.min_raise.max(street_bet);
            ctx.high_bet = street_bet;
            reopen_action(ctx, action.seat);
        }
        RaiseKind::Full { increment } => {
            ctx.min_raise = increment;
            ctx.high_bet = street_bet;
            reopen_action(ctx, action.seat);
        }
        RaiseKind::Short => {
            ctx.high_bet = street_bet;
        }
    }

    ctx.pots = build_pots(&ctx.players);
    events.push(acted);

    open_round(ctx, action.seat, effects);
    Ok(())
}

/// Полная ставка переоткрывает торговлю для всех остальных.
fn reopen_action(ctx: &mut GameContext, aggressor: SeatIndex) {
    for p in ctx.players.iter_mut().filter(|p| p.seat != aggressor && p.can_act()) {
        p.has_acted = false;
    }
}
