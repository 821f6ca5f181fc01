//! Переходы фаз: старт раздачи, открытие улиц, шоудаун и выплата.

use log::{debug, info};

use crate::domain::{Card, Chips, Deck, SeatIndex, Street};
use crate::engine::betting::{is_runout, next_to_act, round_closed};
use crate::engine::context::{GameContext, GameStatus, TransitionOverrides};
use crate::engine::effects::{BlindKind, Effect, GameEndReason, GameEvent, SeatSnapshot};
use crate::engine::errors::{EngineError, StateError};
use crate::engine::positions::{blind_seats, clockwise_from, next_button};
use crate::engine::side_pots::{build_pots, distribute};
use crate::engine::RandomSource;
use crate::eval::evaluate_best_hand;

/// Старт новой раздачи:
/// - пересаживает ушедших и игроков без фишек в sitting out;
/// - двигает кнопку, постит анте и блайнды;
/// - раздаёт карманные карты и назначает первого игрока.
pub(crate) fn start_hand<R: RandomSource>(
    ctx: &mut GameContext,
    deck: &mut Deck,
    rng: &mut R,
    overrides: &TransitionOverrides,
    events: &mut Vec<GameEvent>,
    effects: &mut Vec<Effect>,
) -> Result<(), EngineError> {
    if ctx.status == GameStatus::Active {
        return Err(StateError::HandInProgress.into());
    }

    for p in ctx.players.iter_mut() {
        p.reset_for_new_hand();
    }
    let participants: Vec<SeatIndex> = ctx.players.iter().filter(|p| !p.sitting_out).map(|p| p.seat).collect();
    if participants.len() < 2 {
        return Err(StateError::NotEnoughPlayers.into());
    }

    let button = match overrides.button_seat {
        Some(seat) if participants.contains(&seat) => seat,
        Some(seat) => {
            return Err(StateError::InvalidOverride(format!("кнопка на месте {seat}, которое не участвует")).into())
        }
        None => next_button(&ctx.players, ctx.button_seat).ok_or(StateError::NotEnoughPlayers)?,
    };
    let (sb_seat, bb_seat) = blind_seats(&ctx.players, button).ok_or(StateError::NotEnoughPlayers)?;

    validate_hand_overrides(overrides, &participants)?;
    let mut fresh = Deck::standard_52();
    rng.shuffle(&mut fresh.cards);
    fresh.remove_cards(&override_cards(overrides));

    ctx.hand_number += 1;
    ctx.status = GameStatus::Active;
    ctx.current_phase = Street::Preflop;
    ctx.community_cards.clear();
    ctx.pots.clear();
    ctx.current_actor_seat = None;
    ctx.action_deadline = None;
    ctx.button_seat = Some(button);
    ctx.sb_seat = Some(sb_seat);
    ctx.bb_seat = Some(bb_seat);
    ctx.small_blind = ctx.config.small_blind;
    ctx.big_blind = ctx.config.big_blind;
    ctx.ante = ctx.config.ante;
    ctx.high_bet = Chips::ZERO;
    ctx.min_raise = ctx.big_blind;
    ctx.hand_start_chips = ctx.total_chips();

    events.push(GameEvent::HandStarted {
        hand_number: ctx.hand_number,
        button_seat: button,
        sb_seat,
        bb_seat,
        small_blind: ctx.small_blind,
        big_blind: ctx.big_blind,
        ante: ctx.ante,
        seats: ctx
            .players
            .iter()
            .filter(|p| !p.sitting_out)
            .map(|p| SeatSnapshot {
                seat: p.seat,
                player_id: p.id,
                chips: p.chips,
            })
            .collect(),
    });

    let order = clockwise_from(&ctx.players, button);

    // Анте.
    let (ante, small_blind, big_blind) = (ctx.ante, ctx.small_blind, ctx.big_blind);
    if !ante.is_zero() {
        for &seat in &order {
            let amount = post_forced(ctx, seat, ante, false);
            if !amount.is_zero() {
                events.push(GameEvent::AntePosted { seat, amount });
            }
        }
    }

    // Блайнды.
    let sb_amount = post_forced(ctx, sb_seat, small_blind, true);
    events.push(GameEvent::BlindPosted {
        seat: sb_seat,
        blind: BlindKind::Small,
        amount: sb_amount,
    });
    let bb_amount = post_forced(ctx, bb_seat, big_blind, true);
    events.push(GameEvent::BlindPosted {
        seat: bb_seat,
        blind: BlindKind::Big,
        amount: bb_amount,
    });
    ctx.high_bet = ctx.players.iter().map(|p| p.current_bet).max().unwrap_or(Chips::ZERO);
    // Хедз-ап: блайнд BB засчитывается как его ход, call SB закрывает префлоп.
    // Рейз SB переоткрывает торговлю для BB как обычно.
    if participants.len() == 2 {
        if let Some(bb) = ctx.player_mut(bb_seat) {
            bb.has_acted = true;
        }
    }

    // Карманные карты: по порядку от малого блайнда.
    for &seat in &order {
        let cards = match overrides.hole_cards.iter().find(|(s, _)| *s == seat) {
            Some((_, cards)) => cards.to_vec(),
            None => fresh.draw_exact(2).ok_or(StateError::DeckExhausted)?,
        };
        if let Some(p) = ctx.player_mut(seat) {
            p.hole_cards = cards.clone();
        }
        events.push(GameEvent::HoleCardsDealt { seat, cards });
    }

    // Заданный заранее борд кладём наверх колоды в порядке выдачи.
    fresh.cards.extend(overrides.community_cards.iter().rev().copied());
    *deck = fresh;

    ctx.pots = build_pots(&ctx.players);
    info!(
        "game {}: раздача #{} началась, кнопка {}, блайнды {}/{}",
        ctx.game_id, ctx.hand_number, button, sb_seat, bb_seat
    );

    open_round(ctx, bb_seat, effects);
    Ok(())
}

/// Открыть флоп, тёрн или ривер.
pub(crate) fn deal_street(
    ctx: &mut GameContext,
    deck: &mut Deck,
    target: Street,
    overrides: &TransitionOverrides,
    events: &mut Vec<GameEvent>,
    effects: &mut Vec<Effect>,
) -> Result<(), EngineError> {
    let expected_prev = match target {
        Street::Flop => Street::Preflop,
        Street::Turn => Street::Flop,
        Street::River => Street::Turn,
        Street::Preflop | Street::Showdown => return Err(invalid_transition(ctx, target)),
    };
    if ctx.status != GameStatus::Active || ctx.current_phase != expected_prev || ctx.contender_count() < 2 {
        return Err(invalid_transition(ctx, target));
    }
    if ctx.current_actor_seat.is_some() || !round_closed(ctx) {
        return Err(StateError::RoundNotClosed.into());
    }

    let count = target.cards_to_deal();
    let cards = if overrides.community_cards.is_empty() {
        deck.draw_exact(count).ok_or(StateError::DeckExhausted)?
    } else {
        let cards = overrides.community_cards.clone();
        if cards.len() != count {
            return Err(StateError::InvalidOverride(format!(
                "для {target:?} нужно {count} карт, передано {}",
                cards.len()
            ))
            .into());
        }
        let in_play = |c: &Card| {
            ctx.community_cards.contains(c) || ctx.players.iter().any(|p| p.hole_cards.contains(c))
        };
        if let Some(dup) = cards.iter().find(|c| in_play(c)) {
            return Err(StateError::InvalidOverride(format!("карта {dup} уже в игре")).into());
        }
        deck.remove_cards(&cards);
        cards
    };

    ctx.community_cards.extend_from_slice(&cards);
    ctx.current_phase = target;
    for p in ctx.players.iter_mut() {
        p.current_bet = Chips::ZERO;
        p.has_acted = false;
    }
    ctx.high_bet = Chips::ZERO;
    ctx.min_raise = ctx.big_blind;

    debug!("game {}: {target:?} {cards:?}", ctx.game_id);
    events.push(GameEvent::StreetDealt { street: target, cards });

    let anchor = ctx.button_seat.ok_or(StateError::Internal("улица без кнопки"))?;
    open_round(ctx, anchor, effects);
    Ok(())
}

/// Вскрытие и выплата банков. Раздача переходит в `Finished`.
pub(crate) fn showdown(
    ctx: &mut GameContext,
    events: &mut Vec<GameEvent>,
    effects: &mut Vec<Effect>,
) -> Result<(), EngineError> {
    if ctx.status != GameStatus::Active {
        return Err(invalid_transition(ctx, Street::Showdown));
    }
    let contested = ctx.contender_count() >= 2;
    if contested {
        if ctx.current_phase != Street::River {
            return Err(invalid_transition(ctx, Street::Showdown));
        }
        if ctx.current_actor_seat.is_some() || !round_closed(ctx) {
            return Err(StateError::RoundNotClosed.into());
        }
    }
    let button = ctx.button_seat.ok_or(StateError::Internal("шоудаун без кнопки"))?;

    ctx.current_phase = Street::Showdown;
    ctx.current_actor_seat = None;
    ctx.pots = build_pots(&ctx.players);

    if contested {
        for seat in clockwise_from(&ctx.players, button) {
            let Some(p) = ctx.player(seat).filter(|p| p.is_contender()) else {
                continue;
            };
            let rank = evaluate_best_hand(&p.hole_cards, &ctx.community_cards)
                .ok_or(StateError::Internal("не хватает карт для вскрытия"))?;
            events.push(GameEvent::HandShown {
                seat,
                cards: p.hole_cards.clone(),
                rank,
            });
        }
    }

    let awards = distribute(&ctx.pots, &ctx.players, &ctx.community_cards, button)
        .ok_or(StateError::Internal("не удалось разыграть банк"))?;
    for award in awards {
        if let Some(p) = ctx.player_mut(award.seat) {
            p.chips += award.amount;
        }
        events.push(GameEvent::PotAwarded {
            pot_index: award.pot_index,
            seat: award.seat,
            player_id: award.player_id,
            amount: award.amount,
        });
    }

    for p in ctx.players.iter_mut() {
        p.current_bet = Chips::ZERO;
        p.total_bet = Chips::ZERO;
    }
    ctx.pots.clear();
    ctx.high_bet = Chips::ZERO;
    ctx.status = GameStatus::Finished;

    let reason = if contested {
        GameEndReason::Showdown
    } else {
        GameEndReason::Uncontested
    };
    events.push(GameEvent::HandFinished {
        hand_number: ctx.hand_number,
        reason,
    });
    effects.push(Effect::GameEnd { reason });

    let next_hand_players = ctx
        .players
        .iter()
        .filter(|p| !p.left && !p.leaving && !p.chips.is_zero())
        .count();
    if next_hand_players < 2 {
        effects.push(Effect::GameEnd {
            reason: GameEndReason::TableClosed,
        });
    }

    info!("game {}: раздача #{} завершена ({reason:?})", ctx.game_id, ctx.hand_number);
    Ok(())
}

/// Назначить следующего игрока после `anchor` или, если раунд закрыт,
/// запланировать следующую фазу.
pub(crate) fn open_round(ctx: &mut GameContext, anchor: SeatIndex, effects: &mut Vec<Effect>) {
    match next_to_act(ctx, anchor).filter(|_| !round_closed(ctx)) {
        Some(seat) => {
            ctx.current_actor_seat = Some(seat);
            effects.push(Effect::StartTimer {
                seat,
                timeout_ms: ctx.config.turn_timeout_ms,
            });
        }
        None => {
            ctx.current_actor_seat = None;
            schedule_next_phase(ctx, effects);
        }
    }
}

/// Раунд закрыт: запланировать следующую фазу.
pub(crate) fn schedule_next_phase(ctx: &GameContext, effects: &mut Vec<Effect>) {
    let target = if ctx.contender_count() <= 1 {
        Street::Showdown
    } else {
        match ctx.current_phase.next() {
            Some(next) => next,
            None => return,
        }
    };
    let delay_ms = if target == Street::Showdown {
        ctx.config.showdown_delay_ms
    } else if is_runout(ctx) {
        ctx.config.runout_delay_ms
    } else {
        ctx.config.street_delay_ms
    };
    effects.push(Effect::ScheduleTransition {
        target_phase: target,
        delay_ms,
    });
}

/// Принудительная ставка (анте или блайнд). Возвращает внесённую сумму.
fn post_forced(ctx: &mut GameContext, seat: SeatIndex, amount: Chips, counts_on_street: bool) -> Chips {
    let Some(p) = ctx.player_mut(seat) else {
        return Chips::ZERO;
    };
    let paid = amount.min(p.chips);
    p.chips -= paid;
    p.total_bet += paid;
    if counts_on_street {
        p.current_bet += paid;
    }
    if p.chips.is_zero() {
        p.all_in = true;
    }
    paid
}

fn override_cards(overrides: &TransitionOverrides) -> Vec<Card> {
    overrides
        .hole_cards
        .iter()
        .flat_map(|(_, cards)| cards.iter().copied())
        .chain(overrides.community_cards.iter().copied())
        .collect()
}

fn validate_hand_overrides(overrides: &TransitionOverrides, participants: &[SeatIndex]) -> Result<(), StateError> {
    if overrides.community_cards.len() > Street::River.board_len() {
        return Err(StateError::InvalidOverride("на борде не больше 5 карт".into()));
    }
    if !overrides.hole_cards.is_empty() {
        for seat in participants {
            if overrides.hole_cards.iter().filter(|(s, _)| s == seat).count() != 1 {
                return Err(StateError::InvalidOverride(format!("нет карманных карт для места {seat}")));
            }
        }
        if overrides.hole_cards.len() != participants.len() {
            return Err(StateError::InvalidOverride("карты для места вне раздачи".into()));
        }
    }

    let mut indices: Vec<u8> = override_cards(overrides).iter().map(|c| c.index()).collect();
    let total = indices.len();
    indices.sort_unstable();
    indices.dedup();
    if indices.len() != total {
        return Err(StateError::InvalidOverride("карта встречается дважды".into()));
    }
    Ok(())
}

fn invalid_transition(ctx: &GameContext, target: Street) -> EngineError {
    StateError::InvalidTransition {
        status: ctx.status,
        from: ctx.current_phase,
        to: target,
    }
    .into()
}
