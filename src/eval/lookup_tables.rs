use crate::domain::card::Rank;

/// Битовая маска рангов: бит 0 = двойка, бит 12 = туз.
pub type RankMask = u16;

/// Маска стрита «от колеса» A2345.
const WHEEL_MASK: RankMask = mask_from_ranks(&[Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five]);

/// Маска пяти подряд идущих рангов, старший из которых имеет бит `top_bit`.
const fn run_mask(top_bit: u8) -> RankMask {
    0b1_1111 << (top_bit - 4)
}

/// Получить битовую маску для одного ранга.
pub fn rank_to_bit(rank: Rank) -> RankMask {
    1u16 << (rank.value() - 2)
}

/// Построить маску из списка рангов.
pub const fn mask_from_ranks(ranks: &[Rank]) -> RankMask {
    let mut mask: RankMask = 0;
    let mut i = 0;
    while i < ranks.len() {
        mask |= 1 << (ranks[i] as u8 - 2);
        i += 1;
    }
    mask
}

/// Найти стрит в маске рангов. Возвращает старшую карту стрита;
/// для колеса A2345: пятёрку.
pub fn detect_straight(mask: RankMask) -> Option<Rank> {
    // От бродвея (туз = бит 12) вниз до шестёрки (бит 4).
    for top_bit in (4..=12u8).rev() {
        let run = run_mask(top_bit);
        if mask & run == run {
            return Rank::from_value(top_bit + 2);
        }
    }
    if mask & WHEEL_MASK == WHEEL_MASK {
        return Some(Rank::Five);
    }
    None
}

/// Ранги из маски, от старшего к младшему.
pub fn ranks_desc(mask: RankMask) -> impl Iterator<Item = Rank> {
    Rank::ALL
        .iter()
        .rev()
        .copied()
        .filter(move |r| mask & rank_to_bit(*r) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_is_five_high() {
        let mask = mask_from_ranks(&[Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::King]);
        assert_eq!(detect_straight(mask), Some(Rank::Five));
    }

    #[test]
    fn six_card_run_picks_top() {
        let mask = mask_from_ranks(&[Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine]);
        assert_eq!(detect_straight(mask), Some(Rank::Nine));
    }
}
