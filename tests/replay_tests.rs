// tests/replay_tests.rs

//! Реплей истории:
//! - итоговые стеки совпадают с живым столом
//! - два прогона дают одинаковые кадры (байт в байт)
//! - ранаут проигрывается одной цепочкой
//! - рассинхрон очереди хода → DesyncError с последним хорошим кадром
//! - места манифеста компактируются в 1..N

mod common;

use common::*;
use holdem_engine::bot::{decide, StrategyKind};
use holdem_engine::domain::{Chips, Street};
use holdem_engine::engine::{legal_options, Action, GameContext, GameStatus, TransitionOverrides};
use holdem_engine::history::{ActionTag, HandHistory, HistoryRecorder};
use holdem_engine::replay::{normalize, replay_hand, FrameCause, ReplayError};

/// Первый игрок префлопа делает минимальный рейз, дальше все check/call.
fn raise_then_call(ctx: &GameContext, seat: u8) -> Action {
    let opts = legal_options(ctx, seat).expect("ход игрока");
    let unopened = ctx.high_bet == ctx.big_blind;
    if ctx.current_phase == Street::Preflop && unopened && opts.can_raise {
        Action::raise(seat, opts.min_raise_to)
    } else if opts.can_check {
        Action::check(seat)
    } else {
        Action::call(seat)
    }
}

fn recorded_hand(stacks: &[u64], hole: &[(u8, &str)], board: &str) -> (HandHistory, GameContext) {
    let mut engine = engine_with_stacks(stacks);
    let mut recorder = HistoryRecorder::new(engine.context().game_id);
    let start = start_rigged(&mut engine, 1, hole, board);
    play_recorded(&mut engine, &mut recorder, start, raise_then_call);
    let history = recorder.take_finished().pop().expect("раздача завершена");
    (history, engine.context().clone())
}

#[test]
fn replay_reproduces_final_stacks() {
    let (history, live) = recorded_hand(
        &[100, 100, 100],
        &[(1, "As Ks"), (2, "2d 7c"), (3, "9h 9d")],
        "Qs Js Ts 3h 4d",
    );
    let replay = replay_hand(&history).expect("реплей");
    assert!(replay.finished);

    let last = replay.final_state().expect("кадры");
    assert_eq!(last.status, GameStatus::Finished);
    for p in &live.players {
        let replayed = last.player_by_id(p.id).expect("игрок из манифеста");
        assert_eq!(replayed.chips, p.chips, "игрок {}", p.id);
        assert_eq!(replayed.hole_cards, p.hole_cards);
    }
    assert_eq!(last.community_cards, live.community_cards);

    // Кадр на каждый переход и каждое действие.
    let actions = history.actions.iter().filter(|a| !a.tag.is_automatic()).count();
    let transitions = replay
        .frames
        .iter()
        .filter(|f| matches!(f.cause, FrameCause::Transition(_)))
        .count();
    assert_eq!(replay.frames.len(), actions + transitions);
    assert_eq!(transitions, 5, "префлоп, флоп, тёрн, ривер, шоудаун");
    assert!(replay.frames.iter().enumerate().all(|(i, f)| f.index == i));
}

#[test]
fn replay_is_deterministic() {
    let (history, _) = recorded_hand(
        &[80, 120, 100, 60],
        &[(1, "Ah Ad"), (2, "Kc Qc"), (3, "7s 8s"), (4, "2h 2d")],
        "Ac 9s Tc 5d Js",
    );
    let json = history.to_json().expect("json");
    let restored = HandHistory::from_json(&json).expect("разбор");

    let a = replay_hand(&history).expect("реплей 1");
    let b = replay_hand(&restored).expect("реплей 2");
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a.frames).expect("json"),
        serde_json::to_string(&b.frames).expect("json")
    );
}

#[test]
fn all_in_runout_is_drained_in_one_pass() {
    let mut engine = engine_with_stacks(&[50, 50]);
    let mut recorder = HistoryRecorder::new(engine.context().game_id);
    let start = start_rigged(&mut engine, 1, &[(1, "As Ad"), (2, "Kc Kd")], "2c 7h 9d Jc 3s");
    play_recorded(&mut engine, &mut recorder, start, |ctx, seat| {
        let opts = legal_options(ctx, seat).expect("ход");
        if opts.can_raise {
            Action::all_in(seat)
        } else {
            Action::call(seat)
        }
    });
    let history = recorder.take_finished().pop().expect("раздача");

    let replay = replay_hand(&history).expect("реплей");
    let causes: Vec<String> = replay
        .frames
        .iter()
        .map(|f| match &f.cause {
            FrameCause::Transition(street) => format!("{street:?}"),
            FrameCause::Action { action, .. } => format!("{:?}@{}", action.kind, action.seat),
        })
        .collect();
    assert_eq!(
        causes,
        vec!["Preflop", "AllIn@1", "Call@2", "Flop", "Turn", "River", "Showdown"]
    );

    // Во время ранаута зритель видит карты обоих.
    let flop = replay.frames[3].view(None);
    assert!(flop.runout);
    assert!(flop.players.iter().all(|p| p.hole_cards.iter().all(Option::is_some)));

    let last = replay.final_state().expect("кадр");
    assert_eq!(last.player_by_id(player_id(1)).expect("игрок 1").chips, Chips(100));
}

#[test]
fn blind_all_in_hand_replays_without_actions() {
    // Кнопка (SB) ставит последнюю фишку блайндом: ходить некому.
    let (history, live) = recorded_hand(&[1, 100], &[(1, "As Ad"), (2, "7h 2s")], "Kc 9d 5s 3c 8h");
    assert!(history.actions.iter().all(|a| a.tag.is_automatic()));
    assert_eq!(live.player(1).expect("место 1").chips, Chips(2));
    assert_eq!(live.player(2).expect("место 2").chips, Chips(99));

    let replay = replay_hand(&history).expect("реплей");
    assert!(replay.finished);
    let causes: Vec<FrameCause> = replay.frames.iter().map(|f| f.cause.clone()).collect();
    assert_eq!(
        causes,
        vec![
            FrameCause::Transition(Street::Preflop),
            FrameCause::Transition(Street::Flop),
            FrameCause::Transition(Street::Turn),
            FrameCause::Transition(Street::River),
            FrameCause::Transition(Street::Showdown),
        ]
    );

    let last = replay.final_state().expect("кадр");
    assert_eq!(last.status, GameStatus::Finished);
    for p in &live.players {
        assert_eq!(last.player_by_id(p.id).map(|r| r.chips), Some(p.chips));
    }
}

#[test]
fn out_of_turn_entry_is_a_desync() {
    let (mut history, _) = recorded_hand(
        &[100, 100, 100],
        &[(1, "As Ks"), (2, "2d 7c"), (3, "9h 9d")],
        "Qs Js Ts 3h 4d",
    );
    // Первая запись игрока (рейз кнопки) приписана месту SB.
    let entry_index = history
        .actions
        .iter()
        .position(|a| !a.tag.is_automatic())
        .expect("есть действия");
    history.actions[entry_index].seat_index = Some(1);

    let failure = replay_hand(&history).expect_err("рассинхрон");
    match failure.error {
        ReplayError::Desync(desync) => {
            assert_eq!(desync.entry_index, entry_index);
            assert_eq!(desync.history_seat, 2);
            assert_eq!(desync.engine_seat, Some(1));
            assert_eq!(desync.last_good_frame, Some(0));
        }
        other => panic!("ожидали Desync, получили {other:?}"),
    }
    assert_eq!(failure.frames.len(), 1);
}

#[test]
fn illegal_recorded_action_reports_entry() {
    let (mut history, _) = recorded_hand(
        &[100, 100],
        &[(1, "As Ks"), (2, "2d 7c")],
        "Qs Js Ts 3h 4d",
    );
    let entry_index = history
        .actions
        .iter()
        .position(|a| a.tag == ActionTag::Raise)
        .expect("рейз");
    history.actions[entry_index].amount = Some(3);

    let failure = replay_hand(&history).expect_err("рейз меньше минимального");
    assert!(matches!(
        failure.error,
        ReplayError::Engine {
            entry_index: Some(i),
            ..
        } if i == entry_index
    ));
}

#[test]
fn corrupt_history_is_rejected_before_replay() {
    let (history, _) = recorded_hand(&[100, 100], &[(1, "As Ks"), (2, "2d 7c")], "Qs Js Ts 3h 4d");

    let mut short = history.clone();
    short.starting_stacks.pop();
    assert!(matches!(normalize(&short), Err(ReplayError::Corrupt(_))));

    let mut no_blinds = history.clone();
    no_blinds
        .actions
        .retain(|a| !matches!(a.tag, ActionTag::SmallBlind | ActionTag::BigBlind));
    assert!(matches!(replay_hand(&no_blinds).map_err(|f| f.error), Err(ReplayError::Corrupt(_))));

    let mut bad_card = history;
    bad_card.hole_cards[0] = vec![60, 1];
    assert!(matches!(normalize(&bad_card), Err(ReplayError::Codec(_))));
}

#[test]
fn live_seats_are_compacted_for_replay() {
    // За живым столом места 2, 5 и 7; место 5 пропускает раздачу без фишек.
    let mut engine = engine_with_config(config(8), &[]);
    engine.seat_player(player_id(2), 2, Chips(100)).expect("место 2");
    engine.seat_player(player_id(5), 5, Chips::ZERO).expect("место 5");
    engine.seat_player(player_id(7), 7, Chips(100)).expect("место 7");
    engine.seat_player(player_id(8), 8, Chips(100)).expect("место 8");

    let mut recorder = HistoryRecorder::new(engine.context().game_id);
    let start = engine
        .execute_transition(Street::Preflop, TransitionOverrides::none())
        .expect("старт раздачи");
    assert_eq!(start.state.button_seat, Some(2));
    let bots = StrategyKind::Balanced.build();
    play_recorded(&mut engine, &mut recorder, start, |ctx, seat| {
        decide(ctx, seat, bots.as_ref()).expect("бот ходит")
    });
    let history = recorder.take_finished().pop().expect("раздача");

    assert_eq!(history.manifest, vec![player_id(2), player_id(7), player_id(8)]);
    assert_eq!(history.replay_seat(player_id(8)), Some(3));
    let hand = normalize(&history).expect("нормализация");
    assert_eq!(hand.button_seat, 1);

    let replay = replay_hand(&history).expect("реплей");
    let last = replay.final_state().expect("кадр");
    for id in &history.manifest {
        assert_eq!(
            last.player_by_id(*id).map(|p| p.chips),
            engine.context().player_by_id(*id).map(|p| p.chips)
        );
    }
}
