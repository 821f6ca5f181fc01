use crate::domain::{Chips, SeatIndex};
use crate::engine::{legal_options, Action, GameContext, LegalOptions};

use super::strength::{hand_strength, pot_odds};
use super::{BotStrategy, StrategyKind};

/// Пороги, по которым бот принимает решение (сила по шкале 0..=10).
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyProfile {
    /// С какой силы бот добровольно доплачивает.
    pub play_threshold: u8,
    /// С какой силы бот ставит и рейзит.
    pub raise_threshold: u8,
    /// Размер ставки в процентах от банка.
    pub bet_pot_percent: u64,
    /// Рука чуть слабее `play_threshold` доплачивает при таких шансах банка.
    pub min_pot_odds: f32,
    /// Доля решений (0..100), в которых слабая рука разыгрывается агрессивно.
    pub bluff_percent: u8,
}

/// Общая логика порогового бота.
///
/// Решение зависит только от контекста и профиля: «случайность» блефа –
/// хэш от номера раздачи, места и улицы.
pub fn threshold_decision(ctx: &GameContext, seat: SeatIndex, profile: &StrategyProfile) -> Option<Action> {
    if ctx.current_actor_seat != Some(seat) {
        return None;
    }
    let opts = legal_options(ctx, seat)?;
    let player = ctx.player(seat)?;
    let strength = hand_strength(&player.hole_cards, &ctx.community_cards);
    let pot = ctx.total_committed();

    let bluff = decision_noise(ctx, seat) < u64::from(profile.bluff_percent);
    if strength >= profile.raise_threshold || bluff {
        if let Some(action) = aggressive_action(ctx, &opts, profile, pot) {
            return Some(action);
        }
    }

    if opts.can_check {
        return Some(Action::check(seat));
    }

    // Крупная доплата (половина стека и больше) – только с сильной рукой.
    let big_commitment = opts.to_call.0.saturating_mul(2) >= player.chips.0;
    let needed = if big_commitment {
        profile.raise_threshold.saturating_sub(1)
    } else {
        profile.play_threshold
    };
    if strength >= needed {
        return Some(Action::call(seat));
    }
    if !big_commitment
        && strength + 2 >= profile.play_threshold
        && pot_odds(pot, opts.to_call) >= profile.min_pot_odds
    {
        return Some(Action::call(seat));
    }
    Some(Action::fold(seat))
}

/// Bet или raise размером `bet_pot_percent` от банка в пределах допустимого.
fn aggressive_action(
    ctx: &GameContext,
    opts: &LegalOptions,
    profile: &StrategyProfile,
    pot: Chips,
) -> Option<Action> {
    let sized = Chips(pot.0.saturating_mul(profile.bet_pot_percent) / 100).max(ctx.big_blind);

    if opts.can_bet {
        let stack = opts.max_bet_to - ctx.player(opts.seat)?.current_bet;
        let amount = sized.max(opts.min_bet).min(stack);
        return Some(if amount >= stack {
            Action::all_in(opts.seat)
        } else {
            Action::bet(opts.seat, amount)
        });
    }
    if opts.can_raise {
        let raise_to = (ctx.high_bet + sized).max(opts.min_raise_to).min(opts.max_bet_to);
        return Some(if raise_to >= opts.max_bet_to {
            Action::all_in(opts.seat)
        } else {
            Action::raise(opts.seat, raise_to)
        });
    }
    None
}

/// Детерминированное «случайное» число 0..100 для решения.
fn decision_noise(ctx: &GameContext, seat: SeatIndex) -> u64 {
    let mut x = ctx
        .game_id
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ ctx.hand_number.rotate_left(17)
        ^ (u64::from(seat) << 8)
        ^ u64::from(ctx.current_phase.code())
        ^ ctx.high_bet.0.rotate_left(29);
    // splitmix64
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (x ^ (x >> 31)) % 100
}

/// Много ставит и рейзит, часто блефует.
#[derive(Clone, Debug, Default)]
pub struct AggressiveBot;

impl BotStrategy for AggressiveBot {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Aggressive
    }

    fn profile(&self) -> StrategyProfile {
        StrategyProfile {
            play_threshold: 3,
            raise_threshold: 5,
            bet_pot_percent: 100,
            min_pot_odds: 0.6,
            bluff_percent: 15,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct BalancedBot;

impl BotStrategy for BalancedBot {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Balanced
    }

    fn profile(&self) -> StrategyProfile {
        StrategyProfile {
            play_threshold: 4,
            raise_threshold: 7,
            bet_pot_percent: 66,
            min_pot_odds: 0.7,
            bluff_percent: 5,
        }
    }
}

/// Играет только сильные руки, не блефует.
#[derive(Clone, Debug, Default)]
pub struct TightBot;

impl BotStrategy for TightBot {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Tight
    }

    fn profile(&self) -> StrategyProfile {
        StrategyProfile {
            play_threshold: 6,
            raise_threshold: 8,
            bet_pot_percent: 75,
            min_pot_odds: 0.8,
            bluff_percent: 0,
        }
    }
}

/// Входит почти в каждую раздачу, но рейзит редко.
#[derive(Clone, Debug, Default)]
pub struct LooseBot;

impl BotStrategy for LooseBot {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Loose
    }

    fn profile(&self) -> StrategyProfile {
        StrategyProfile {
            play_threshold: 2,
            raise_threshold: 8,
            bet_pot_percent: 50,
            min_pot_odds: 0.5,
            bluff_percent: 5,
        }
    }
}

/// Никогда не фолдит и не рейзит: check, если можно, иначе call.
#[derive(Clone, Debug, Default)]
pub struct CallingStationBot;

impl BotStrategy for CallingStationBot {
    fn kind(&self) -> StrategyKind {
        StrategyKind::CallingStation
    }

    fn profile(&self) -> StrategyProfile {
        StrategyProfile {
            play_threshold: 0,
            raise_threshold: u8::MAX,
            bet_pot_percent: 0,
            min_pot_odds: 0.0,
            bluff_percent: 0,
        }
    }

    fn decide(&self, ctx: &GameContext, seat: SeatIndex) -> Option<Action> {
        if ctx.current_actor_seat != Some(seat) {
            return None;
        }
        let opts = legal_options(ctx, seat)?;
        Some(if opts.can_check {
            Action::check(seat)
        } else {
            Action::call(seat)
        })
    }
}
