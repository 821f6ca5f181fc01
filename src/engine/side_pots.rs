//! Банки: пересборка основного и сайд-потов из вкладов игроков и выплата.

use crate::domain::{Card, Chips, HandRank, Player, PlayerId, SeatIndex};
use crate::engine::context::Pot;
use crate::engine::positions::clockwise_from;
use crate::eval::evaluate_best_hand;

/// Пересобрать банки из `total_bet` всех игроков.
///
/// Уровни банков – вклады игроков, ушедших в олл-ин (и не сфолдивших),
/// плюс максимальный вклад. Фишки сфолдивших остаются в банках,
/// но претендовать на них они не могут.
pub fn build_pots(players: &[Player]) -> Vec<Pot> {
    let Some(top) = players.iter().map(|p| p.total_bet).max() else {
        return Vec::new();
    };
    if top.is_zero() {
        return Vec::new();
    }

    let mut levels: Vec<Chips> = players
        .iter()
        .filter(|p| p.is_contender() && p.all_in && !p.total_bet.is_zero())
        .map(|p| p.total_bet)
        .collect();
    levels.push(top);
    levels.sort();
    levels.dedup();

    let mut pots: Vec<Pot> = Vec::new();
    let mut prev = Chips::ZERO;

    for level in levels {
        let amount: Chips = players
            .iter()
            .map(|p| p.total_bet.min(level) - p.total_bet.min(prev))
            .sum();
        prev = level;
        if amount.is_zero() {
            continue;
        }

        let eligible: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.is_contender() && p.total_bet >= level)
            .map(|p| p.id)
            .collect();

        // Уровень, который закрыли только сфолдившие, доливаем в предыдущий банк.
        match (eligible.is_empty(), pots.last_mut()) {
            (true, Some(last)) => last.amount += amount,
            (true, None) => pots.push(Pot {
                amount,
                eligible_players: players.iter().filter(|p| p.is_contender()).map(|p| p.id).collect(),
            }),
            (false, _) => pots.push(Pot {
                amount,
                eligible_players: eligible,
            }),
        }
    }

    pots
}

/// Выплата одного банка одному игроку.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PotAward {
    pub pot_index: usize,
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub amount: Chips,
}

/// Разыграть банки.
///
/// Каждый банк делится поровну между лучшими руками среди претендентов.
/// Остаток от деления целиком получает первый победитель по часовой
/// стрелке от кнопки. Если претендент один – банк его без вскрытия.
///
/// Возвращает `None`, если для сравнения рук не хватает карт.
pub fn distribute(
    pots: &[Pot],
    players: &[Player],
    board: &[Card],
    button: SeatIndex,
) -> Option<Vec<PotAward>> {
    let order = clockwise_from(players, button);
    let mut awards = Vec::new();

    for (pot_index, pot) in pots.iter().enumerate() {
        let mut eligible: Vec<&Player> = order
            .iter()
            .filter_map(|&seat| players.iter().find(|p| p.seat == seat))
            .filter(|p| pot.eligible_players.contains(&p.id))
            .collect();

        if eligible.len() > 1 {
            let mut ranked: Vec<(&Player, HandRank)> = Vec::with_capacity(eligible.len());
            for p in &eligible {
                ranked.push((*p, evaluate_best_hand(&p.hole_cards, board)?));
            }
            let best = ranked.iter().map(|(_, r)| *r).max()?;
            eligible = ranked
                .into_iter()
                .filter(|(_, r)| *r == best)
                .map(|(p, _)| p)
                .collect();
        }

        let (share, remainder) = pot.amount.split(eligible.len() as u64);
        for (i, p) in eligible.iter().enumerate() {
            let amount = if i == 0 { share + remainder } else { share };
            if amount.is_zero() {
                continue;
            }
            awards.push(PotAward {
                pot_index,
                seat: p.seat,
                player_id: p.id,
                amount,
            });
        }
    }

    Some(awards)
}
