//! Состояние раунда ставок: закрыт ли раунд и кто ходит следующим.

use crate::domain::SeatIndex;
use crate::engine::context::GameContext;
use crate::engine::positions::clockwise_from;

/// Возможна ли ещё торговля на улице.
///
/// Нужны хотя бы два игрока, способных ставить, либо один такой игрок,
/// которому ещё надо ответить на чужой олл-ин.
pub fn betting_possible(ctx: &GameContext) -> bool {
    let mut actors = ctx.actors();
    match (actors.next(), actors.next()) {
        (Some(_), Some(_)) => true,
        (Some(only), None) => only.current_bet < ctx.high_bet,
        _ => false,
    }
}

/// Раунд ставок закрыт:
/// - остался один претендент;
/// - или торговать больше некому (олл-ин ранаут);
/// - или каждый, кто может ставить, уже походил и уравнял `high_bet`.
pub fn round_closed(ctx: &GameContext) -> bool {
    if ctx.contender_count() <= 1 || !betting_possible(ctx) {
        return true;
    }
    ctx.actors()
        .all(|p| p.has_acted && p.current_bet >= ctx.high_bet)
}

/// Олл-ин ранаут: претендентов больше одного, а ставить уже некому.
pub fn is_runout(ctx: &GameContext) -> bool {
    ctx.contender_count() >= 2 && !betting_possible(ctx)
}

/// Первый игрок после `anchor` по часовой стрелке, которому нужно действовать.
pub fn next_to_act(ctx: &GameContext, anchor: SeatIndex) -> Option<SeatIndex> {
    clockwise_from(&ctx.players, anchor).into_iter().find(|&seat| {
        ctx.player(seat)
            .map(|p| p.can_act() && (!p.has_acted || p.current_bet < ctx.high_bet))
            .unwrap_or(false)
    })
}

/// Есть ли у игрока соперник, который может ответить на его ставку.
pub fn has_live_opponent(ctx: &GameContext, seat: SeatIndex) -> bool {
    ctx.actors().any(|p| p.seat != seat)
}
