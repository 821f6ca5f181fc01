// tests/common/mod.rs

//! Общие хелперы интеграционных тестов:
//! - сборка движка с детерминированным RNG;
//! - разбор карт из строк;
//! - синхронный прогон эффектов (как сессия, но без таймеров).

#![allow(dead_code)]

use std::collections::VecDeque;

use holdem_engine::domain::{Card, Chips, PlayerId, SeatIndex, Street, TableConfig};
use holdem_engine::engine::{Action, Effect, Engine, GameContext, GameStatus, StepResult, TransitionOverrides};
use holdem_engine::history::HistoryRecorder;
use holdem_engine::infra::DeterministicRng;

pub type TestEngine = Engine<DeterministicRng>;

/// Конфиг без задержек с блайндами 1/2.
pub fn config(max_seats: u8) -> TableConfig {
    TableConfig {
        max_seats,
        ..TableConfig::with_blinds(Chips(1), Chips(2))
    }
    .instant()
}

/// Движок с игроками на местах 1..=stacks.len(); id игрока = 100 + место.
pub fn engine_with_stacks(stacks: &[u64]) -> TestEngine {
    engine_with_config(config(stacks.len().max(2) as u8), stacks)
}

pub fn engine_with_config(config: TableConfig, stacks: &[u64]) -> TestEngine {
    let mut engine = Engine::new(1, config, DeterministicRng::from_seed(7)).expect("конфиг валиден");
    for (i, &stack) in stacks.iter().enumerate() {
        let seat = i as SeatIndex + 1;
        engine
            .seat_player(player_id(seat), seat, Chips(stack))
            .expect("место свободно");
    }
    engine
}

pub fn player_id(seat: SeatIndex) -> PlayerId {
    100 + seat as PlayerId
}

pub fn card(s: &str) -> Card {
    s.parse().expect("валидная карта")
}

pub fn cards(list: &str) -> Vec<Card> {
    list.split_whitespace().map(card).collect()
}

pub fn pair(list: &str) -> [Card; 2] {
    let v = cards(list);
    [v[0], v[1]]
}

/// Старт раздачи с заданными картами, кнопкой и бордом.
pub fn start_rigged(
    engine: &mut TestEngine,
    button: SeatIndex,
    hole: &[(SeatIndex, &str)],
    board: &str,
) -> StepResult {
    let overrides = TransitionOverrides {
        hole_cards: hole.iter().map(|&(seat, c)| (seat, pair(c))).collect(),
        community_cards: cards(board),
        button_seat: Some(button),
    };
    engine
        .execute_transition(Street::Preflop, overrides)
        .expect("раздача должна стартовать")
}

/// Выполнить все запланированные переходы (включая цепочку ранаута).
pub fn drain_transitions(engine: &mut TestEngine, effects: Vec<Effect>) -> Vec<StepResult> {
    drain_recorded(engine, effects, None)
}

pub fn drain_recorded(
    engine: &mut TestEngine,
    effects: Vec<Effect>,
    mut recorder: Option<&mut HistoryRecorder>,
) -> Vec<StepResult> {
    let mut steps = Vec::new();
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        if let Effect::ScheduleTransition { target_phase, .. } = effect {
            let result = engine
                .execute_transition(target_phase, TransitionOverrides::none())
                .expect("запланированный переход должен выполниться");
            if let Some(rec) = recorder.as_deref_mut() {
                rec.observe(&result.events, None);
            }
            queue.extend(result.effects.iter().cloned());
            steps.push(result);
        }
    }
    steps
}

/// Доиграть раздачу: ходы выбирает `decide`, все шаги пишутся в рекордер.
pub fn play_recorded<F>(engine: &mut TestEngine, recorder: &mut HistoryRecorder, start: StepResult, mut decide: F)
where
    F: FnMut(&GameContext, SeatIndex) -> Action,
{
    recorder.observe(&start.events, None);
    drain_recorded(engine, start.effects, Some(&mut *recorder));
    while engine.context().status == GameStatus::Active {
        let seat = engine.context().current_actor_seat.expect("в активной раздаче кто-то ходит");
        let action = decide(engine.context(), seat);
        let result = engine.process_action(action).expect("действие допустимо");
        recorder.observe(&result.events, None);
        drain_recorded(engine, result.effects, Some(&mut *recorder));
    }
}

/// Сумма стека и вклада в банк по всем игрокам.
pub fn table_chips(engine: &TestEngine) -> Chips {
    engine.context().total_chips()
}
