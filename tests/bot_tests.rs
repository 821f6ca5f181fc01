// tests/bot_tests.rs

//! Боты:
//! - каждая стратегия играет десятки раздач, движок принимает каждое решение
//! - одинаковый контекст → одинаковое действие
//! - разбор имён стратегий
//! - calling station только чекает и коллирует

mod common;

use common::*;
use holdem_engine::bot::strength::{hand_strength, preflop_strength};
use holdem_engine::bot::{decide, BotStrategy, StrategyKind, UnknownStrategy};
use holdem_engine::domain::{Chips, Street, TableConfig};
use holdem_engine::engine::{Action, ActionType, Engine, EngineError, StateError, TransitionOverrides};
use holdem_engine::history::HistoryRecorder;
use holdem_engine::infra::DeterministicRng;
use holdem_engine::replay::replay_hand;

/// Сыграть до `hands` раздач за столом из ботов; возвращает число сыгранных.
fn play_table(seed: u64, kinds: &[StrategyKind], hands: usize) -> (TestEngine, usize) {
    let cfg = TableConfig {
        max_seats: kinds.len() as u8,
        ..config(2)
    };
    let mut engine = Engine::new(seed, cfg, DeterministicRng::from_seed(seed)).expect("конфиг валиден");
    for i in 0..kinds.len() {
        let seat = i as u8 + 1;
        engine.seat_player(player_id(seat), seat, Chips(100)).expect("место");
    }
    let bots: Vec<Box<dyn BotStrategy + Send + Sync>> = kinds.iter().map(|k| k.build()).collect();
    let total = table_chips(&engine);

    let mut recorder = HistoryRecorder::new(seed);
    let mut played = 0;
    for _ in 0..hands {
        let start = match engine.execute_transition(Street::Preflop, TransitionOverrides::none()) {
            Ok(start) => start,
            Err(EngineError::State(StateError::NotEnoughPlayers)) => break,
            Err(other) => panic!("раздача не стартовала: {other:?}"),
        };
        play_recorded(&mut engine, &mut recorder, start, |ctx, seat| {
            let bot = &bots[seat as usize - 1];
            decide(ctx, seat, bot.as_ref()).unwrap_or_else(|| panic!("{} молчит на своём ходу", bot.kind()))
        });
        played += 1;
        assert_eq!(table_chips(&engine), total, "фишки не появляются и не исчезают");
    }

    // Каждая записанная раздача проигрывается заново.
    for history in recorder.take_finished() {
        let replay = replay_hand(&history).unwrap_or_else(|f| panic!("реплей #{}: {}", history.hand_number, f.error));
        assert!(replay.finished);
    }
    (engine, played)
}

#[test]
fn every_strategy_plays_legal_hands() {
    for kind in StrategyKind::ALL {
        for seed in 1..=4u64 {
            let (_, played) = play_table(seed, &[kind; 4], 25);
            assert!(played > 0, "{kind} seed {seed}");
        }
    }
}

#[test]
fn mixed_table_plays_until_someone_busts_or_limit() {
    let (engine, played) = play_table(11, &StrategyKind::ALL, 60);
    assert!(played > 0);
    let with_chips = engine.context().players.iter().filter(|p| !p.chips.is_zero()).count();
    assert!(with_chips >= 1);
}

#[test]
fn decisions_are_deterministic() {
    let (a, played_a) = play_table(5, &StrategyKind::ALL, 20);
    let (b, played_b) = play_table(5, &StrategyKind::ALL, 20);
    assert_eq!(played_a, played_b);
    assert_eq!(a.context(), b.context());

    let mut engine = engine_with_stacks(&[100, 100, 100]);
    engine
        .execute_transition(Street::Preflop, TransitionOverrides::none())
        .expect("старт раздачи");
    let seat = engine.context().current_actor_seat.expect("кто-то ходит");
    for kind in StrategyKind::ALL {
        let bot = kind.build();
        let first = decide(engine.context(), seat, bot.as_ref());
        for _ in 0..5 {
            assert_eq!(decide(engine.context(), seat, bot.as_ref()), first);
        }
    }
}

#[test]
fn bots_do_not_act_out_of_turn() {
    let mut engine = engine_with_stacks(&[100, 100, 100]);
    engine
        .execute_transition(Street::Preflop, TransitionOverrides::none())
        .expect("старт раздачи");
    let actor = engine.context().current_actor_seat.expect("кто-то ходит");
    let other = if actor == 1 { 2 } else { 1 };
    for kind in StrategyKind::ALL {
        assert_eq!(decide(engine.context(), other, kind.build().as_ref()), None);
    }
}

#[test]
fn strategy_names_parse() {
    assert_eq!("calling-station".parse::<StrategyKind>(), Ok(StrategyKind::CallingStation));
    assert_eq!("CALLING_STATION".parse::<StrategyKind>(), Ok(StrategyKind::CallingStation));
    assert_eq!(" Tight ".parse::<StrategyKind>(), Ok(StrategyKind::Tight));
    assert_eq!("nit".parse::<StrategyKind>(), Err(UnknownStrategy("nit".into())));

    for kind in StrategyKind::ALL {
        assert_eq!(kind.to_string().parse::<StrategyKind>(), Ok(kind));
        assert_eq!(kind.build().kind(), kind);
    }
}

#[test]
fn calling_station_checks_or_calls() {
    let mut engine = engine_with_stacks(&[100, 100]);
    start_rigged(&mut engine, 1, &[(1, "7d 2c"), (2, "8h 3s")], "");
    let station = StrategyKind::CallingStation.build();

    // SB против BB доплачивает.
    let action = decide(engine.context(), 1, station.as_ref()).expect("ход SB");
    assert_eq!(action.kind, ActionType::Call);
    let call = engine.process_action(action).expect("call");
    drain_transitions(&mut engine, call.effects);
    assert_eq!(engine.context().current_phase, Street::Flop);

    // На флопе без ставки BB чекает.
    let action = decide(engine.context(), 2, station.as_ref()).expect("ход BB");
    assert_eq!(action.kind, ActionType::Check);
}

#[test]
fn tight_bot_folds_trash_to_a_raise() {
    let mut engine = engine_with_stacks(&[100, 100, 100]);
    start_rigged(&mut engine, 1, &[(1, "As Ah"), (2, "7d 2c"), (3, "8h 3s")], "");
    engine
        .process_action(Action::raise(1, Chips(20)))
        .expect("рейз кнопки");

    let tight = StrategyKind::Tight.build();
    let action = decide(engine.context(), 2, tight.as_ref()).expect("ход SB");
    assert_eq!(action.kind, ActionType::Fold);
}

#[test]
fn strength_scale_orders_hands() {
    assert!(preflop_strength(&cards("As Ah")) > preflop_strength(&cards("Ks Qd")));
    assert!(preflop_strength(&cards("Ks Qd")) > preflop_strength(&cards("7d 2c")));
    // Сет на флопе сильнее пары.
    let board = cards("9h 9d 4c");
    assert!(hand_strength(&cards("9s 2c"), &board) > hand_strength(&cards("As 2c"), &board));
}
