// tests/api_test.rs

//! Проекция стола для зрителя:
//! - свои карты видны, чужие скрыты
//! - сфолдивший без показа отдаётся без карт
//! - показанная карта видна всем
//! - олл-ин ранаут и вскрытие открывают карты претендентов

mod common;

use common::*;
use holdem_engine::api::{project, ProjectedState};
use holdem_engine::domain::{Card, Chips};
use holdem_engine::engine::{Action, GameStatus};

fn hole(view: &ProjectedState, seat: u8) -> Vec<Option<Card>> {
    view.player(seat).expect("игрок за столом").hole_cards.clone()
}

#[test]
fn own_cards_visible_others_hidden() {
    let mut engine = engine_with_stacks(&[100, 100, 100]);
    start_rigged(&mut engine, 1, &[(1, "As Ks"), (2, "2d 7c"), (3, "9h 9d")], "");

    let view = engine.player_context(Some(player_id(2)));
    assert_eq!(view.viewer, Some(player_id(2)));
    assert_eq!(hole(&view, 2), vec![Some(card("2d")), Some(card("7c"))]);
    assert_eq!(hole(&view, 1), vec![None, None]);
    assert_eq!(hole(&view, 3), vec![None, None]);
    assert!(!view.runout);

    let spectator = engine.player_context(None);
    for seat in 1..=3 {
        assert_eq!(hole(&spectator, seat), vec![None, None]);
    }
    assert_eq!(spectator.current_actor_seat, Some(1));
    assert_eq!(spectator.big_blind, Chips(2));
}

#[test]
fn folded_player_without_reveal_has_no_cards() {
    let mut engine = engine_with_stacks(&[100, 100, 100]);
    start_rigged(&mut engine, 1, &[(1, "As Ks"), (2, "2d 7c"), (3, "9h 9d")], "");
    engine.process_action(Action::fold(1)).expect("fold");

    let view = engine.player_context(None);
    assert!(hole(&view, 1).is_empty());
    assert!(view.player(1).expect("место 1").folded);

    // Сам сфолдивший свои карты видит.
    let own = engine.player_context(Some(player_id(1)));
    assert_eq!(hole(&own, 1), vec![Some(card("As")), Some(card("Ks"))]);

    // После показа одной карты слот второй остаётся скрытым.
    engine.process_action(Action::reveal(1, 1)).expect("reveal");
    let view = engine.player_context(Some(player_id(3)));
    assert_eq!(hole(&view, 1), vec![None, Some(card("Ks"))]);
    assert_eq!(view.player(1).expect("место 1").revealed_indices, vec![1]);
}

#[test]
fn runout_opens_contender_cards() {
    let mut engine = engine_with_stacks(&[50, 50, 100]);
    start_rigged(&mut engine, 3, &[(1, "As Ad"), (2, "Kc Kd"), (3, "7h 2s")], "");

    // Кнопка 3 сбрасывает, блайнды идут олл-ин.
    engine.process_action(Action::fold(3)).expect("fold");
    engine.process_action(Action::all_in(1)).expect("SB олл-ин");
    let call = engine.process_action(Action::call(2)).expect("BB call");

    let view = project(&call.state, None);
    assert_eq!(view.status, GameStatus::Active);
    assert!(view.runout);
    assert_eq!(hole(&view, 1), vec![Some(card("As")), Some(card("Ad"))]);
    assert_eq!(hole(&view, 2), vec![Some(card("Kc")), Some(card("Kd"))]);
    assert!(hole(&view, 3).is_empty());
}

#[test]
fn showdown_opens_contenders_only() {
    let mut engine = engine_with_stacks(&[100, 100, 100]);
    let start = start_rigged(
        &mut engine,
        1,
        &[(1, "As Ks"), (2, "2d 7c"), (3, "9h 9d")],
        "Qs Js Ts 3h 4d",
    );
    drain_transitions(&mut engine, start.effects);
    engine.process_action(Action::call(1)).expect("call");
    engine.process_action(Action::fold(2)).expect("fold");
    let mut last = engine.process_action(Action::check(3)).expect("check");
    while engine.context().status == GameStatus::Active {
        drain_transitions(&mut engine, last.effects);
        if engine.context().status != GameStatus::Active {
            break;
        }
        let seat = engine.context().current_actor_seat.expect("ход");
        last = engine.process_action(Action::check(seat)).expect("check");
    }

    let view = engine.player_context(None);
    assert_eq!(view.status, GameStatus::Finished);
    assert!(!view.runout);
    assert_eq!(hole(&view, 1), vec![Some(card("As")), Some(card("Ks"))]);
    assert_eq!(hole(&view, 3), vec![Some(card("9h")), Some(card("9d"))]);
    assert!(hole(&view, 2).is_empty());
}

#[test]
fn uncontested_winner_keeps_cards_hidden() {
    let mut engine = engine_with_stacks(&[100, 100]);
    start_rigged(&mut engine, 1, &[(1, "As Ks"), (2, "2d 7c")], "");
    let fold = engine.process_action(Action::fold(1)).expect("fold");
    drain_transitions(&mut engine, fold.effects);

    let view = engine.player_context(Some(player_id(1)));
    assert_eq!(view.status, GameStatus::Finished);
    assert_eq!(hole(&view, 2), vec![None, None]);
}

#[test]
fn hidden_cards_serialize_as_null() {
    let mut engine = engine_with_stacks(&[100, 100]);
    start_rigged(&mut engine, 1, &[(1, "As Ks"), (2, "2d 7c")], "");

    let view = engine.player_context(Some(player_id(1)));
    let json = serde_json::to_string(&view).expect("json");
    assert!(json.contains(r#""hole_cards":[null,null]"#));
    let parsed: ProjectedState = serde_json::from_str(&json).expect("json обратно");
    assert_eq!(parsed, view);
}
