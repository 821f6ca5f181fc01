use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

use crate::api::dto::ProjectedState;
use crate::bot::{BotStrategy, StrategyKind};
use crate::domain::{Chips, HandNumber, PlayerId, SeatIndex, Street};
use crate::engine::{
    Action, Effect, Engine, GameContext, GameEndReason, GameStatus, RandomSource, StepResult, TransitionOverrides,
};
use crate::history::{HandHistory, HistoryRecorder};
use crate::infra::HistoryStorage;

use super::{SessionError, TableUpdate};

/// Сессия одного стола: единственная точка, через которую меняется движок.
///
/// Все шаги (действия игроков, переходы, ходы ботов, таймауты) идут под
/// одним мьютексом. Отложенные задачи перед применением перепроверяют,
/// что стол не ушёл вперёд; устаревшие молча отбрасываются.
pub struct TableSession<R: RandomSource + Send + 'static> {
    shared: Arc<Shared<R>>,
}

impl<R: RandomSource + Send + 'static> Clone for TableSession<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<R: RandomSource> {
    state: Mutex<SessionState<R>>,
    updates: broadcast::Sender<TableUpdate>,
}

struct SessionState<R: RandomSource> {
    engine: Engine<R>,
    bots: BTreeMap<SeatIndex, Box<dyn BotStrategy + Send + Sync>>,
    recorder: HistoryRecorder,
    storage: Option<Box<dyn HistoryStorage + Send>>,
    finished: Vec<HandHistory>,
    turn_timer: Option<JoinHandle<()>>,
    /// Номер текущего хода: растёт на каждый `StartTimer`.
    turn_token: u64,
    auto_next_hand: bool,
    closed: bool,
    started_at: Instant,
}

/// Что отложенный переход ожидает увидеть в момент срабатывания.
#[derive(Clone, Copy, Debug)]
struct TransitionGuard {
    hand_number: HandNumber,
    from_phase: Street,
}

impl<R: RandomSource + Send + 'static> TableSession<R> {
    pub fn new(engine: Engine<R>) -> Self {
        let (updates, _) = broadcast::channel(256);
        let game_id = engine.context().game_id;
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState {
                    engine,
                    bots: BTreeMap::new(),
                    recorder: HistoryRecorder::new(game_id),
                    storage: None,
                    finished: Vec::new(),
                    turn_timer: None,
                    turn_token: 0,
                    auto_next_hand: false,
                    closed: false,
                    started_at: Instant::now(),
                }),
                updates,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableUpdate> {
        self.shared.updates.subscribe()
    }

    /// Сохранять каждую завершённую раздачу в хранилище.
    pub async fn attach_storage(&self, storage: Box<dyn HistoryStorage + Send>) {
        self.shared.state.lock().await.storage = Some(storage);
    }

    /// Автоматически начинать следующую раздачу через `next_hand_delay_ms`.
    pub async fn set_auto_next_hand(&self, enabled: bool) {
        self.shared.state.lock().await.auto_next_hand = enabled;
    }

    pub async fn seat_player(&self, id: PlayerId, seat: SeatIndex, chips: Chips) -> Result<(), SessionError> {
        let mut state = self.shared.state.lock().await;
        state.engine.seat_player(id, seat, chips)?;
        Ok(())
    }

    /// Посадить бота: стратегия выбирается один раз здесь.
    pub async fn seat_bot(
        &self,
        id: PlayerId,
        seat: SeatIndex,
        chips: Chips,
        strategy: StrategyKind,
    ) -> Result<(), SessionError> {
        let mut state = self.shared.state.lock().await;
        state.engine.seat_player(id, seat, chips)?;
        state.bots.insert(seat, strategy.build());
        Ok(())
    }

    pub async fn start_hand(&self) -> Result<StepResult, SessionError> {
        let mut state = self.shared.state.lock().await;
        self.begin_hand(&mut state)
    }

    /// Действие от клиента (транспорт уже проверил, что место его).
    pub async fn submit_action(&self, action: Action) -> Result<StepResult, SessionError> {
        let mut state = self.shared.state.lock().await;
        if state.closed {
            return Err(SessionError::Closed);
        }
        let result = state.engine.process_action(action)?;
        self.apply(&mut state, &result);
        Ok(result)
    }

    /// Игрок встаёт из-за стола. Если сейчас его ход – сразу фолд.
    pub async fn leave(&self, player_id: PlayerId) -> Result<(), SessionError> {
        let mut state = self.shared.state.lock().await;
        state.engine.mark_leaving(player_id)?;

        let ctx = state.engine.context();
        let acting_seat = ctx
            .player_by_id(player_id)
            .map(|p| p.seat)
            .filter(|&seat| ctx.current_actor_seat == Some(seat));
        if let Some(seat) = acting_seat {
            let result = state.engine.process_action(Action::fold(seat))?;
            self.apply(&mut state, &result);
        }
        Ok(())
    }

    pub async fn player_view(&self, viewer: Option<PlayerId>) -> ProjectedState {
        self.shared.state.lock().await.engine.player_context(viewer)
    }

    pub async fn context(&self) -> GameContext {
        self.shared.state.lock().await.engine.context().clone()
    }

    pub async fn is_closed(&self) -> bool {
        self.shared.state.lock().await.closed
    }

    /// Забрать сыгранные раздачи.
    pub async fn take_histories(&self) -> Vec<HandHistory> {
        let mut state = self.shared.state.lock().await;
        flush_histories(&mut state);
        std::mem::take(&mut state.finished)
    }

    fn begin_hand(&self, state: &mut SessionState<R>) -> Result<StepResult, SessionError> {
        if state.closed {
            return Err(SessionError::Closed);
        }
        flush_histories(state);
        let result = state
            .engine
            .execute_transition(Street::Preflop, TransitionOverrides::none())?;
        self.apply(state, &result);
        Ok(result)
    }

    /// Записать шаг, разослать подписчикам и исполнить эффекты.
    fn apply(&self, state: &mut SessionState<R>, result: &StepResult) {
        let at_ms = state.started_at.elapsed().as_millis() as u64;
        state.recorder.observe(&result.events, Some(at_ms));

        // Любой шаг торговли меняет очередь хода.
        if !result.effects.is_empty() {
            if let Some(timer) = state.turn_timer.take() {
                timer.abort();
            }
            state.engine.set_action_deadline(None);
        }

        // Ошибка отправки значит только то, что подписчиков нет.
        let _ = self.shared.updates.send(TableUpdate::Step {
            sequence: state.engine.sequence(),
            events: result.events.clone(),
            effects: result.effects.clone(),
        });

        for effect in &result.effects {
            match *effect {
                Effect::ScheduleTransition { target_phase, delay_ms } => {
                    self.schedule_transition(state, target_phase, delay_ms)
                }
                Effect::StartTimer { seat, timeout_ms } => self.start_turn(state, seat, timeout_ms),
                Effect::GameEnd { reason } => self.on_game_end(state, reason),
            }
        }
    }

    fn schedule_transition(&self, state: &SessionState<R>, target: Street, delay_ms: u64) {
        let ctx = state.engine.context();
        let guard = TransitionGuard {
            hand_number: ctx.hand_number,
            from_phase: ctx.current_phase,
        };
        let session = self.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            session.run_transition(target, guard).await;
        });
    }

    async fn run_transition(&self, target: Street, guard: TransitionGuard) {
        let mut state = self.shared.state.lock().await;
        let ctx = state.engine.context();
        let still_valid = !state.closed
            && ctx.status == GameStatus::Active
            && ctx.hand_number == guard.hand_number
            && ctx.current_phase == guard.from_phase
            && ctx.current_actor_seat.is_none();
        if !still_valid {
            debug!("game {}: переход в {target:?} устарел, пропускаем", ctx.game_id);
            return;
        }

        match state.engine.execute_transition(target, TransitionOverrides::none()) {
            Ok(result) => self.apply(&mut state, &result),
            Err(err) => warn!("game {}: переход в {target:?} отклонён: {err}", state.engine.context().game_id),
        }
    }

    fn start_turn(&self, state: &mut SessionState<R>, seat: SeatIndex, timeout_ms: u64) {
        state.turn_token += 1;
        let token = state.turn_token;
        state.engine.set_action_deadline(Some(epoch_ms() + timeout_ms));

        if state.bots.contains_key(&seat) {
            let think = Duration::from_millis(state.engine.context().config.bot_think_ms);
            let session = self.clone();
            tokio::spawn(async move {
                sleep(think).await;
                session.run_bot_turn(seat, token).await;
            });
        }

        let session = self.clone();
        state.turn_timer = Some(tokio::spawn(async move {
            sleep(Duration::from_millis(timeout_ms)).await;
            session.run_timeout(seat, token).await;
        }));
    }

    async fn run_bot_turn(&self, seat: SeatIndex, token: u64) {
        let mut state = self.shared.state.lock().await;
        if !turn_still_valid(&state, seat, token) {
            return;
        }
        let Some(action) = state
            .bots
            .get(&seat)
            .and_then(|bot| bot.decide(state.engine.context(), seat))
        else {
            return;
        };

        match state.engine.process_action(action) {
            Ok(result) => self.apply(&mut state, &result),
            Err(err) => warn!("бот на месте {seat} выбрал недопустимое действие: {err}"),
        }
    }

    /// Время хода вышло: check, если он бесплатный, иначе fold.
    async fn run_timeout(&self, seat: SeatIndex, token: u64) {
        let mut state = self.shared.state.lock().await;
        if !turn_still_valid(&state, seat, token) {
            return;
        }
        let can_check = state
            .engine
            .legal_options(seat)
            .map(|opts| opts.can_check)
            .unwrap_or(false);
        let action = if can_check {
            Action::check(seat)
        } else {
            Action::fold(seat)
        };
        info!("game {}: у места {seat} вышло время, {:?}", state.engine.context().game_id, action.kind);

        match state.engine.process_action(action) {
            Ok(result) => self.apply(&mut state, &result),
            Err(err) => warn!("автодействие по таймауту отклонено: {err}"),
        }
    }

    fn on_game_end(&self, state: &mut SessionState<R>, reason: GameEndReason) {
        let hand_number = state.engine.context().hand_number;
        if reason == GameEndReason::TableClosed {
            state.closed = true;
            let _ = self.shared.updates.send(TableUpdate::Closed);
            info!("game {}: стол закрыт", state.engine.context().game_id);
            return;
        }

        let _ = self.shared.updates.send(TableUpdate::HandFinished { hand_number, reason });
        if !state.auto_next_hand {
            return;
        }

        let delay = Duration::from_millis(state.engine.context().config.next_hand_delay_ms);
        let session = self.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            session.run_next_hand(hand_number).await;
        });
    }

    async fn run_next_hand(&self, after_hand: HandNumber) {
        let mut state = self.shared.state.lock().await;
        let ctx = state.engine.context();
        if state.closed || ctx.status != GameStatus::Finished || ctx.hand_number != after_hand {
            return;
        }
        if let Err(err) = self.begin_hand(&mut state) {
            warn!("не удалось начать следующую раздачу: {err}");
        }
    }
}

fn turn_still_valid<R: RandomSource>(state: &SessionState<R>, seat: SeatIndex, token: u64) -> bool {
    let ctx = state.engine.context();
    !state.closed && state.turn_token == token && ctx.status == GameStatus::Active && ctx.current_actor_seat == Some(seat)
}

/// Перенести завершённые раздачи из рекордера в хранилище и очередь выдачи.
fn flush_histories<R: RandomSource>(state: &mut SessionState<R>) {
    for history in state.recorder.take_finished() {
        if let Some(storage) = state.storage.as_mut() {
            storage.save_history(&history);
        }
        state.finished.push(history);
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
