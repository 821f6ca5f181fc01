use crate::domain::card::{Card, Rank, Suit};
use crate::domain::hand::HandRank;

use super::hand_rank::HandCategory;
use super::lookup_tables::{detect_straight, rank_to_bit, ranks_desc, RankMask};

/// Лучшая 5-карточная рука из карманных карт и борда.
///
/// Считается сразу по 5–7 картам (без перебора сочетаний).
/// Если карт меньше 5 (борд ещё не открыт): `None`.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> Option<HandRank> {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);
    evaluate_cards(&all_cards)
}

/// Оценка набора из 5–7 карт.
pub fn evaluate_cards(cards: &[Card]) -> Option<HandRank> {
    if !(5..=7).contains(&cards.len()) {
        return None;
    }

    let mut rank_counts = [0u8; 15]; // используем индексы 2..=14
    let mut suit_masks: [RankMask; 4] = [0; 4];
    let mut all_mask: RankMask = 0;

    for card in cards {
        rank_counts[card.rank.value() as usize] += 1;
        suit_masks[suit_slot(card.suit)] |= rank_to_bit(card.rank);
        all_mask |= rank_to_bit(card.rank);
    }

    let flush_mask = suit_masks
        .iter()
        .copied()
        .find(|m| m.count_ones() >= 5);

    // Straight flush.
    if let Some(high) = flush_mask.and_then(detect_straight) {
        return Some(HandRank::from_category_and_ranks(HandCategory::StraightFlush, &[high]));
    }

    // Ранги, сгруппированные по количеству, от старших к младшим.
    let with_count = |n: u8| -> Vec<Rank> {
        Rank::ALL
            .iter()
            .rev()
            .copied()
            .filter(|r| rank_counts[r.value() as usize] == n)
            .collect()
    };
    let quads = with_count(4);
    let trips = with_count(3);
    let pairs = with_count(2);

    // Кикеры: старшие ранги, не входящие в `used`.
    let kickers = |used: &[Rank], n: usize| -> Vec<Rank> {
        ranks_desc(all_mask).filter(|r| !used.contains(r)).take(n).collect()
    };

    if let Some(&four) = quads.first() {
        let mut ranks = vec![four];
        ranks.extend(kickers(&[four], 1));
        return Some(HandRank::from_category_and_ranks(HandCategory::FourOfAKind, &ranks));
    }

    // Full house: старший сет + старшая из оставшихся пар/сетов.
    if let Some(&set) = trips.first() {
        let pair = trips
            .iter()
            .skip(1)
            .chain(pairs.iter())
            .copied()
            .max();
        if let Some(pair) = pair {
            return Some(HandRank::from_category_and_ranks(HandCategory::FullHouse, &[set, pair]));
        }
    }

    if let Some(mask) = flush_mask {
        let ranks: Vec<Rank> = ranks_desc(mask).take(5).collect();
        return Some(HandRank::from_category_and_ranks(HandCategory::Flush, &ranks));
    }

    if let Some(high) = detect_straight(all_mask) {
        return Some(HandRank::from_category_and_ranks(HandCategory::Straight, &[high]));
    }

    if let Some(&set) = trips.first() {
        let mut ranks = vec![set];
        ranks.extend(kickers(&[set], 2));
        return Some(HandRank::from_category_and_ranks(HandCategory::ThreeOfAKind, &ranks));
    }

    if pairs.len() >= 2 {
        let (hi, lo) = (pairs[0], pairs[1]);
        let mut ranks = vec![hi, lo];
        ranks.extend(kickers(&[hi, lo], 1));
        return Some(HandRank::from_category_and_ranks(HandCategory::TwoPair, &ranks));
    }

    if let Some(&pair) = pairs.first() {
        let mut ranks = vec![pair];
        ranks.extend(kickers(&[pair], 3));
        return Some(HandRank::from_category_and_ranks(HandCategory::OnePair, &ranks));
    }

    let ranks = kickers(&[], 5);
    Some(HandRank::from_category_and_ranks(HandCategory::HighCard, &ranks))
}

fn suit_slot(suit: Suit) -> usize {
    match suit {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}
