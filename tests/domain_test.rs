// tests/domain_test.rs

//! Доменные типы и оценка рук:
//! - Card: Display + FromStr, канонический индекс
//! - Chips: арифметика без ухода в минус, деление банка
//! - Deck: состав колоды, draw_exact, remove_cards
//! - eval: порядок категорий, лучшая пятёрка из семи

use std::collections::HashSet;

use holdem_engine::domain::{Card, Chips, Deck, Rank, Suit, TableConfig};
use holdem_engine::eval::{describe_hand, evaluate_best_hand, evaluate_cards, HandCategory};

fn cards(list: &str) -> Vec<Card> {
    list.split_whitespace()
        .map(|s| s.parse().expect("валидная карта"))
        .collect()
}

/// Card/Suit/Rank: Display + FromStr roundtrip.
#[test]
fn card_display_and_parse_roundtrip() {
    let samples = [
        Card {
            rank: Rank::Ace,
            suit: Suit::Hearts,
        },
        Card {
            rank: Rank::Ten,
            suit: Suit::Spades,
        },
        Card {
            rank: Rank::Two,
            suit: Suit::Clubs,
        },
    ];
    for card in samples {
        let s = card.to_string();
        let parsed: Card = s.parse().expect("строка из Display");
        assert_eq!(parsed, card);
        assert_eq!(Card::from_index(card.index()).expect("индекс"), card);
    }
    assert_eq!("ah".parse::<Card>().expect("нижний регистр"), samples[0]);

    assert!("".parse::<Card>().is_err());
    assert!("XYZ".parse::<Card>().is_err());
    assert!("1c".parse::<Card>().is_err());
    assert!("Acx".parse::<Card>().is_err());
}

/// Chips: арифметика и деление банка.
#[test]
fn chips_arithmetic_and_split() {
    assert_eq!(Chips(100) + Chips(50), Chips(150));
    assert_eq!(Chips(200) - Chips(50), Chips(150));

    let mut x = Chips(10);
    x += Chips(5);
    assert_eq!(x, Chips(15));
    x -= Chips(20);
    assert_eq!(x, Chips::ZERO);

    assert_eq!(Chips(101).split(2), (Chips(50), Chips(1)));
    assert_eq!(Chips(9).split(0), (Chips::ZERO, Chips(9)));

    let total: Chips = [Chips(1), Chips(2), Chips(3)].iter().sum();
    assert_eq!(total, Chips(6));
}

#[test]
fn deck_standard_52_basic_properties() {
    let deck = Deck::standard_52();
    assert_eq!(deck.len(), 52);
    let set: HashSet<_> = deck.cards.iter().collect();
    assert_eq!(set.len(), 52);
    for suit in Suit::ALL {
        assert_eq!(deck.cards.iter().filter(|c| c.suit == suit).count(), 13);
    }
    // Канонический порядок: 2c первой, As последней.
    assert_eq!(deck.cards[0], cards("2c")[0]);
    assert_eq!(deck.cards[51], cards("As")[0]);
}

#[test]
fn deck_draw_exact_and_remove_cards() {
    let mut deck = Deck::standard_52();

    // Сверху колоды – конец вектора.
    let top = deck.draw_exact(2).expect("хватает карт");
    assert_eq!(top, cards("As Ks"));
    assert_eq!(deck.len(), 50);

    assert!(deck.draw_exact(51).is_none());
    assert_eq!(deck.len(), 50, "при нехватке колода не меняется");

    let used = cards("Ah 2c");
    deck.remove_cards(&used);
    assert_eq!(deck.len(), 48);
    assert!(used.iter().all(|c| !deck.cards.contains(c)));
}

#[test]
fn table_config_round_trips_through_json() {
    let cfg = TableConfig::with_blinds(Chips(5), Chips(10)).instant();
    let json = serde_json::to_string(&cfg).expect("json");
    assert_eq!(TableConfig::from_json_str(&json).expect("разбор"), cfg);
    assert_eq!(cfg.street_delay_ms, 0);
    assert_eq!(cfg.turn_timeout_ms, TableConfig::default().turn_timeout_ms);
}

#[test]
fn hand_categories_are_ordered() {
    let board = cards("Ks Qs Js 7d 2c");
    let straight_flush = evaluate_best_hand(&cards("As Ts"), &board).expect("7 карт");
    let straight = evaluate_best_hand(&cards("Ad Td"), &board).expect("7 карт");
    let pair = evaluate_best_hand(&cards("Kd 3h"), &board).expect("7 карт");
    let high = evaluate_best_hand(&cards("9h 3h"), &board).expect("7 карт");

    assert_eq!(straight_flush.category(), HandCategory::StraightFlush);
    assert_eq!(straight.category(), HandCategory::Straight);
    assert_eq!(pair.category(), HandCategory::OnePair);
    assert_eq!(high.category(), HandCategory::HighCard);
    assert!(straight_flush > straight && straight > pair && pair > high);
    assert_eq!(describe_hand(straight), "Straight");
}

#[test]
fn kicker_decides_equal_pairs() {
    let board = cards("Ah 9d 6c 4s 2h");
    let ace_king = evaluate_best_hand(&cards("As Kd"), &board).expect("7 карт");
    let ace_queen = evaluate_best_hand(&cards("Ac Qd"), &board).expect("7 карт");
    assert!(ace_king > ace_queen);

    // Играет борд: обе руки равны.
    let board = cards("As Ks Qs Js Ts");
    assert_eq!(
        evaluate_best_hand(&cards("2c 3d"), &board),
        evaluate_best_hand(&cards("4c 5d"), &board)
    );
    assert_eq!(evaluate_cards(&board).map(|r| r.category()), Some(HandCategory::StraightFlush));
}

#[test]
fn wheel_is_the_lowest_straight() {
    let wheel = evaluate_cards(&cards("Ah 2d 3c 4s 5h")).expect("5 карт");
    let six_high = evaluate_cards(&cards("2d 3c 4s 5h 6c")).expect("5 карт");
    assert_eq!(wheel.category(), HandCategory::Straight);
    assert!(six_high > wheel);
}
