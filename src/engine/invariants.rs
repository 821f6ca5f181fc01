//! Проверки целостности контекста. Движок прогоняет их после каждого шага,
//! тесты – явно.

use thiserror::Error;

use crate::domain::{Chips, PlayerId, SeatIndex};
use crate::engine::betting::round_closed;
use crate::engine::context::{GameContext, GameStatus};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("фишки не сходятся: было {expected}, стало {actual}")]
    ChipsNotConserved { expected: Chips, actual: Chips },

    #[error("банки ({pots}) не равны сумме вкладов ({committed})")]
    PotsMismatch { pots: Chips, committed: Chips },

    #[error("игрок {0} претендует на банк, но не участвует или сфолдил")]
    IneligibleInPot(PlayerId),

    #[error("ход у места {0}, хотя раунд закрыт или игрок не может ставить")]
    StaleActor(SeatIndex),
}

pub fn check(ctx: &GameContext) -> Result<(), InvariantViolation> {
    if ctx.status != GameStatus::Waiting {
        let actual = ctx.total_chips();
        if actual != ctx.hand_start_chips {
            return Err(InvariantViolation::ChipsNotConserved {
                expected: ctx.hand_start_chips,
                actual,
            });
        }
    }

    let (pots, committed) = (ctx.total_in_pots(), ctx.total_committed());
    if pots != committed {
        return Err(InvariantViolation::PotsMismatch { pots, committed });
    }

    for id in ctx.pots.iter().flat_map(|p| p.eligible_players.iter()) {
        if !ctx.player_by_id(*id).map(|p| p.is_contender()).unwrap_or(false) {
            return Err(InvariantViolation::IneligibleInPot(*id));
        }
    }

    if let Some(seat) = ctx.current_actor_seat {
        let can_act = ctx.player(seat).map(|p| p.can_act()).unwrap_or(false);
        if !can_act || round_closed(ctx) {
            return Err(InvariantViolation::StaleActor(seat));
        }
    }

    Ok(())
}
