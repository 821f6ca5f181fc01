use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Player, SeatIndex};
use crate::engine::actions::{Action, ActionType};
use crate::engine::betting::has_live_opponent;
use crate::engine::context::GameContext;
use crate::engine::errors::ValidationError;

/// Какие действия сейчас доступны игроку.
///
/// Используется и при валидации, и ботами, и таймаутом хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LegalOptions {
    pub seat: SeatIndex,
    /// Сколько нужно доплатить для call (не больше стека).
    pub to_call: Chips,
    pub can_check: bool,
    pub can_call: bool,
    pub can_bet: bool,
    pub can_raise: bool,
    /// Минимальный bet (или весь стек, если он меньше).
    pub min_bet: Chips,
    /// Минимальный «рейз до».
    pub min_raise_to: Chips,
    /// Максимальная итоговая ставка – весь стек.
    pub max_bet_to: Chips,
}

/// Доступные действия для места. `None`, если игрок не может ставить.
pub fn legal_options(ctx: &GameContext, seat: SeatIndex) -> Option<LegalOptions> {
    let player = ctx.player(seat).filter(|p| p.can_act())?;

    let to_call = player.to_call(ctx.high_bet).min(player.chips);
    let max_bet_to = player.current_bet + player.chips;
    // Торговля переоткрыта: игрок не ходил после последней полной ставки.
    let may_raise = !player.has_acted && has_live_opponent(ctx, seat);
    let facing_bet = !ctx.high_bet.is_zero();

    Some(LegalOptions {
        seat,
        to_call,
        can_check: player.current_bet >= ctx.high_bet,
        can_call: !to_call.is_zero(),
        can_bet: !facing_bet && may_raise,
        can_raise: facing_bet && may_raise && max_bet_to > ctx.high_bet,
        min_bet: ctx.min_raise.min(player.chips),
        min_raise_to: (ctx.high_bet + ctx.min_raise).min(max_bet_to),
        max_bet_to,
    })
}

/// Во что превращается действие после проверки.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaiseKind {
    /// Ставка не растёт (fold/check/call).
    None,
    /// Первая ставка на улице (переоткрывает торговлю).
    Opening,
    /// Полный рейз на `increment`.
    Full { increment: Chips },
    /// Короткий олл-ин: `high_bet` растёт, торговля не переоткрывается.
    Short,
}

/// Проверенное действие торговли.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedAction {
    pub kind: ActionType,
    /// Сколько фишек уходит из стека.
    pub pay: Chips,
    pub raise: RaiseKind,
}

/// Проверка действия торговли для игрока, чей сейчас ход.
pub fn validate_betting_action(
    ctx: &GameContext,
    player: &Player,
    action: &Action,
) -> Result<ResolvedAction, ValidationError> {
    let opts = legal_options(ctx, player.seat).ok_or(ValidationError::NoActionExpected)?;
    let resolved = |pay: Chips, raise: RaiseKind| ResolvedAction {
        kind: action.kind,
        pay,
        raise,
    };

    match action.kind {
        ActionType::Fold => Ok(resolved(Chips::ZERO, RaiseKind::None)),

        ActionType::Check => {
            if opts.can_check {
                Ok(resolved(Chips::ZERO, RaiseKind::None))
            } else {
                Err(ValidationError::CannotCheck)
            }
        }

        ActionType::Call => {
            if opts.can_call {
                Ok(resolved(opts.to_call, RaiseKind::None))
            } else {
                Err(ValidationError::NothingToCall)
            }
        }

        ActionType::Bet => {
            if !ctx.high_bet.is_zero() {
                return Err(ValidationError::BetFacingBet);
            }
            let amount = action.amount.ok_or(ValidationError::MissingAmount)?;
            check_may_raise(ctx, player)?;
            if amount > player.chips {
                return Err(ValidationError::InsufficientChips);
            }
            if amount.is_zero() || (amount < ctx.min_raise && amount != player.chips) {
                return Err(ValidationError::BetTooSmall { min: opts.min_bet });
            }
            Ok(resolved(amount, RaiseKind::Opening))
        }

        ActionType::Raise => {
            if ctx.high_bet.is_zero() {
                return Err(ValidationError::NothingToRaise);
            }
            let raise_to = action.amount.ok_or(ValidationError::MissingAmount)?;
            check_may_raise(ctx, player)?;
            if raise_to > opts.max_bet_to {
                return Err(ValidationError::InsufficientChips);
            }
            if raise_to <= ctx.high_bet {
                return Err(ValidationError::RaiseTooSmall {
                    min_to: opts.min_raise_to,
                });
            }
            let pay = raise_to - player.current_bet;
            let raise = classify_raise(ctx, raise_to, pay == player.chips)
                .ok_or(ValidationError::RaiseTooSmall {
                    min_to: opts.min_raise_to,
                })?;
            Ok(resolved(pay, raise))
        }

        ActionType::AllIn => {
            let total = opts.max_bet_to;
            if total <= ctx.high_bet {
                // Олл-ин не больше текущей ставки – это call.
                return Ok(resolved(player.chips, RaiseKind::None));
            }
            if let Err(err) = check_may_raise(ctx, player) {
                if ctx.high_bet.is_zero() {
                    return Err(err);
                }
                // Рейз закрыт (соперники в олл-ине или торговля не переоткрыта):
                // олл-ин сводится к call.
                return Ok(ResolvedAction {
                    kind: ActionType::Call,
                    pay: opts.to_call,
                    raise: RaiseKind::None,
                });
            }
            let raise = if ctx.high_bet.is_zero() {
                RaiseKind::Opening
            } else {
                classify_raise(ctx, total, true).unwrap_or(RaiseKind::Short)
            };
            Ok(resolved(player.chips, raise))
        }

        ActionType::Reveal => Err(ValidationError::NoActionExpected),
    }
}

fn check_may_raise(ctx: &GameContext, player: &Player) -> Result<(), ValidationError> {
    if player.has_acted {
        return Err(ValidationError::ActionNotReopened);
    }
    if !has_live_opponent(ctx, player.seat) {
        return Err(ValidationError::NoOpponentToBet);
    }
    Ok(())
}

/// Полный рейз, короткий олл-ин или `None`, если рейз меньше минимального.
fn classify_raise(ctx: &GameContext, raise_to: Chips, is_all_in: bool) -> Option<RaiseKind> {
    let increment = raise_to - ctx.high_bet;
    if increment >= ctx.min_raise {
        Some(RaiseKind::Full { increment })
    } else if is_all_in {
        Some(RaiseKind::Short)
    } else {
        None
    }
}

/// Проверка показа карты. Возвращает индекс карты.
///
/// Показывать можно в любой момент раздачи и после неё, очередь хода не важна.
pub fn validate_reveal(ctx: &GameContext, player: &Player, action: &Action) -> Result<u8, ValidationError> {
    if ctx.hand_number == 0 || player.sitting_out || player.hole_cards.len() != 2 {
        return Err(ValidationError::NothingToReveal);
    }
    let index = action.index.ok_or(ValidationError::MissingIndex)?;
    if index > 1 {
        return Err(ValidationError::InvalidRevealIndex(index));
    }
    if player.revealed_indices.contains(&index) {
        return Err(ValidationError::AlreadyRevealed(index));
    }
    Ok(index)
}
