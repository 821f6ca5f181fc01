// tests/engine_sidepots_tests.rs

//! Сайд-поты:
//! - A=100, B=50, C=100 олл-ин → основной 150 {A,B,C}, сайд 100 {A,C}
//! - фишки сфолдившего остаются в банке, но не дают права на него
//! - разные победители основного и сайд-пота

mod common;

use common::*;
use holdem_engine::domain::{Chips, Player};
use holdem_engine::engine::side_pots::build_pots;
use holdem_engine::engine::{Action, GameEvent, GameStatus};

fn committed(seat: u8, total: u64, all_in: bool, folded: bool) -> Player {
    let mut p = Player::new(player_id(seat), seat, Chips::ZERO);
    p.total_bet = Chips(total);
    p.all_in = all_in;
    p.folded = folded;
    p
}

#[test]
fn three_way_all_in_builds_main_and_side_pot() {
    let mut engine = engine_with_stacks(&[100, 50, 100]);
    start_rigged(
        &mut engine,
        1,
        &[(1, "Qs Qd"), (2, "As Ad"), (3, "Ks Kd")],
        "2c 7h 9d Jc 3s",
    );

    engine.process_action(Action::all_in(1)).expect("A олл-ин 100");
    engine.process_action(Action::all_in(2)).expect("B олл-ин 50");
    let call = engine.process_action(Action::call(3)).expect("C call");

    let pots = &call.state.pots;
    assert_eq!(pots.len(), 2);
    assert_eq!(pots[0].amount, Chips(150));
    assert_eq!(pots[0].eligible_players, vec![player_id(1), player_id(2), player_id(3)]);
    assert_eq!(pots[1].amount, Chips(100));
    assert_eq!(pots[1].eligible_players, vec![player_id(1), player_id(3)]);

    let steps = drain_transitions(&mut engine, call.effects);
    let end = steps.last().expect("шоудаун");
    let awards: Vec<(usize, u8, Chips)> = end
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PotAwarded {
                pot_index, seat, amount, ..
            } => Some((*pot_index, *seat, *amount)),
            _ => None,
        })
        .collect();
    // Основной банк – тузы B, сайд-пот – короли C.
    assert_eq!(awards, vec![(0, 2, Chips(150)), (1, 3, Chips(100))]);

    let ctx = engine.context();
    assert_eq!(ctx.status, GameStatus::Finished);
    assert!(ctx.player(1).expect("A").chips.is_zero());
    assert_eq!(ctx.player(2).expect("B").chips, Chips(150));
    assert_eq!(ctx.player(3).expect("C").chips, Chips(100));
}

#[test]
fn folded_chips_stay_in_pot_without_eligibility() {
    let players = vec![
        committed(1, 100, true, false),
        committed(2, 50, true, false),
        committed(3, 100, false, false),
        committed(4, 30, false, true),
    ];
    let pots = build_pots(&players);

    assert_eq!(pots.len(), 2);
    assert_eq!(pots[0].amount, Chips(180));
    assert_eq!(pots[0].eligible_players, vec![player_id(1), player_id(2), player_id(3)]);
    assert_eq!(pots[1].amount, Chips(100));
    assert_eq!(pots[1].eligible_players, vec![player_id(1), player_id(3)]);

    let total: Chips = pots.iter().map(|p| p.amount).sum();
    assert_eq!(total, Chips(280));
}

#[test]
fn level_funded_only_by_folded_player_merges_down() {
    // Сфолдивший внёс больше всех: его излишек уходит в последний живой банк.
    let players = vec![
        committed(1, 40, true, false),
        committed(2, 40, true, false),
        committed(3, 90, false, true),
    ];
    let pots = build_pots(&players);

    assert_eq!(pots.len(), 1);
    assert_eq!(pots[0].amount, Chips(170));
    assert_eq!(pots[0].eligible_players, vec![player_id(1), player_id(2)]);
}

#[test]
fn side_pot_split_when_main_pot_winner_is_short() {
    let mut engine = engine_with_stacks(&[100, 50, 100, 100]);
    // Кнопка 4: SB 1, BB 2, первым ходит место 3.
    start_rigged(
        &mut engine,
        4,
        &[(1, "8s 8d"), (2, "Ah Ad"), (3, "Kh Qh"), (4, "Kc Qc")],
        "As Ks Qd 4h 5c",
    );

    engine.process_action(Action::all_in(3)).expect("олл-ин 100");
    engine.process_action(Action::call(4)).expect("call 100");
    engine.process_action(Action::fold(1)).expect("fold SB");
    let call = engine.process_action(Action::all_in(2)).expect("BB олл-ин 50");
    drain_transitions(&mut engine, call.effects);

    // Основной банк: 50*3 + 1 от SB = 151 – сет тузов; сайд 100 делят две пары K/Q.
    let ctx = engine.context();
    assert_eq!(ctx.player(2).expect("место 2").chips, Chips(151));
    assert_eq!(ctx.player(3).expect("место 3").chips, Chips(50));
    assert_eq!(ctx.player(4).expect("место 4").chips, Chips(50));
    assert_eq!(ctx.player(1).expect("место 1").chips, Chips(99));
    assert_eq!(table_chips(&engine), Chips(350));
}
