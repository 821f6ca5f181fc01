//! Проекция авторитетного состояния для конкретного зрителя.
//!
//! Правила видимости карманных карт:
//! - свои карты видны всегда;
//! - показанные игроком карты видны всем;
//! - на вскрытии (два и больше претендента) карты претендентов открыты;
//! - в олл-ин ранауте карты претендентов открыты сразу;
//! - сфолдивший, ничего не показавший, отдаётся без карт;
//! - остальное скрыто.

use crate::domain::{Player, PlayerId, Street};
use crate::engine::betting::is_runout;
use crate::engine::{GameContext, GameStatus};

use super::dto::{ProjectedPlayer, ProjectedState};

pub fn project(ctx: &GameContext, viewer: Option<PlayerId>) -> ProjectedState {
    let runout = ctx.status == GameStatus::Active && is_runout(ctx);
    let showdown = ctx.current_phase == Street::Showdown && ctx.contender_count() >= 2;
    let open_contenders = runout || showdown;

    ProjectedState {
        game_id: ctx.game_id,
        viewer,
        status: ctx.status,
        phase: ctx.current_phase,
        hand_number: ctx.hand_number,
        community_cards: ctx.community_cards.clone(),
        pots: ctx.pots.clone(),
        current_actor_seat: ctx.current_actor_seat,
        button_seat: ctx.button_seat,
        sb_seat: ctx.sb_seat,
        bb_seat: ctx.bb_seat,
        small_blind: ctx.small_blind,
        big_blind: ctx.big_blind,
        high_bet: ctx.high_bet,
        min_raise: ctx.min_raise,
        action_deadline: ctx.action_deadline,
        runout,
        players: ctx
            .players
            .iter()
            .map(|p| project_player(p, viewer, open_contenders))
            .collect(),
    }
}

fn project_player(p: &Player, viewer: Option<PlayerId>, open_contenders: bool) -> ProjectedPlayer {
    let own = viewer == Some(p.id);
    let hole_cards = if own || (open_contenders && p.is_contender()) {
        p.hole_cards.iter().copied().map(Some).collect()
    } else if p.folded && p.revealed_indices.is_empty() {
        Vec::new()
    } else {
        p.hole_cards
            .iter()
            .enumerate()
            .map(|(i, c)| p.revealed_indices.contains(&(i as u8)).then_some(*c))
            .collect()
    };

    ProjectedPlayer {
        player_id: p.id,
        seat: p.seat,
        chips: p.chips,
        current_bet: p.current_bet,
        total_bet: p.total_bet,
        folded: p.folded,
        all_in: p.all_in,
        has_acted: p.has_acted,
        sitting_out: p.sitting_out,
        leaving: p.leaving,
        hole_cards,
        revealed_indices: p.revealed_indices.clone(),
    }
}
