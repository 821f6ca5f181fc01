// src/bin/holdem_bot_table.rs
//
// Dev-CLI: один стол с ботами, N раздач подряд. Каждая раздача
// записывается в историю, сразу проигрывается реплеем и сверяется
// с живым движком.

use std::collections::{BTreeMap, VecDeque};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, warn};

use holdem_engine::bot::{BotStrategy, StrategyKind};
use holdem_engine::domain::{SeatIndex, Street, TableConfig};
use holdem_engine::engine::{Effect, Engine, GameContext, GameEndReason, GameStatus, TransitionOverrides};
use holdem_engine::history::{HandHistory, HistoryRecorder};
use holdem_engine::infra::{DeterministicRng, HistoryStorage, IdGenerator, InMemoryHistoryStorage};
use holdem_engine::replay::replay_hand;

type BotTable = BTreeMap<SeatIndex, Box<dyn BotStrategy + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "holdem_bot_table")]
#[command(about = "Прогон стола с ботами с проверкой каждой раздачи реплеем")]
struct Args {
    /// Сколько раздач сыграть.
    #[arg(long, default_value_t = 20)]
    hands: u32,

    /// Сколько ботов посадить (2–10).
    #[arg(long, default_value_t = 6)]
    players: u8,

    /// Seed колоды.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Стратегии по кругу, через запятую (aggressive, balanced, tight, loose, calling_station).
    #[arg(long, value_delimiter = ',')]
    strategies: Vec<StrategyKind>,

    /// JSON с конфигом стола (пропущенные поля – по умолчанию).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Печатать JSON каждой истории.
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_target(false).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TableConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => TableConfig::default(),
    }
    .instant();
    config.max_seats = config.max_seats.max(args.players);
    config.validate()?;

    let strategies = if args.strategies.is_empty() {
        StrategyKind::ALL.to_vec()
    } else {
        args.strategies.clone()
    };

    let ids = IdGenerator::new();
    let mut engine = Engine::new(ids.next_game_id(), config.clone(), DeterministicRng::from_seed(args.seed))?;
    let mut bots = BotTable::new();
    for i in 0..args.players {
        let seat = i + 1;
        let kind = strategies[i as usize % strategies.len()];
        engine.seat_player(ids.next_player_id(), seat, config.starting_stack)?;
        bots.insert(seat, kind.build());
    }

    let mut recorder = HistoryRecorder::new(engine.context().game_id);
    let mut storage = InMemoryHistoryStorage::new();
    let mut frames_total = 0usize;

    println!(
        "holdem_bot_table: {} ботов, блайнды {}/{}, стек {}, seed {}",
        args.players, config.small_blind, config.big_blind, config.starting_stack, args.seed
    );

    for _ in 0..args.hands {
        let table_closed = play_hand(&mut engine, &bots, &mut recorder)?;

        for history in recorder.take_finished() {
            frames_total += verify_with_replay(&history, engine.context())?;
            if args.dump {
                println!("{}", history.to_json()?);
            }
            storage.save_history(&history);
        }

        if table_closed {
            info!("за столом не осталось двух игроков с фишками");
            break;
        }
    }

    println!();
    println!(
        "Сыграно раздач: {}, кадров реплея: {}",
        storage.hand_numbers(engine.context().game_id).len(),
        frames_total
    );
    for p in &engine.context().players {
        let name = bots.get(&p.seat).map(|b| b.kind().name()).unwrap_or("-");
        println!("  место {:>2} [{:<15}] игрок {:>3}: {}", p.seat, name, p.id, p.chips);
    }
    Ok(())
}

/// Одна раздача: эффекты исполняются сразу, ходы делают боты.
/// Возвращает `true`, если стол закрылся.
fn play_hand(
    engine: &mut Engine<DeterministicRng>,
    bots: &BotTable,
    recorder: &mut HistoryRecorder,
) -> Result<bool, Box<dyn Error>> {
    let result = engine.execute_transition(Street::Preflop, TransitionOverrides::none())?;
    recorder.observe(&result.events, None);
    let mut pending: VecDeque<Effect> = result.effects.into();
    let mut table_closed = false;

    while let Some(effect) = pending.pop_front() {
        let result = match effect {
            Effect::ScheduleTransition { target_phase, .. } => {
                engine.execute_transition(target_phase, TransitionOverrides::none())?
            }
            Effect::StartTimer { seat, .. } => {
                let bot = bots.get(&seat).ok_or(format!("на месте {seat} нет бота"))?;
                let action = bot
                    .decide(engine.context(), seat)
                    .ok_or(format!("бот на месте {seat} не нашёл действия"))?;
                debug!("место {seat} ({}): {:?}", bot.kind(), action);
                engine.process_action(action)?
            }
            Effect::GameEnd { reason } => {
                table_closed |= reason == GameEndReason::TableClosed;
                continue;
            }
        };
        recorder.observe(&result.events, None);
        pending.extend(result.effects);
    }

    if engine.context().status != GameStatus::Finished {
        return Err(format!("раздача #{} не доиграна", engine.context().hand_number).into());
    }
    Ok(table_closed)
}

/// Проиграть историю заново и сверить стеки с живым столом.
fn verify_with_replay(history: &HandHistory, live: &GameContext) -> Result<usize, Box<dyn Error>> {
    let replay = replay_hand(history).map_err(|failure| {
        format!(
            "реплей раздачи #{} упал после {} кадров: {}",
            history.hand_number,
            failure.frames.len(),
            failure.error
        )
    })?;
    let replayed = replay
        .final_state()
        .ok_or(format!("реплей раздачи #{} пуст", history.hand_number))?;

    for player_id in &history.manifest {
        let expected = live.player_by_id(*player_id).map(|p| p.chips);
        let got = replayed.player_by_id(*player_id).map(|p| p.chips);
        if expected != got {
            warn!("раздача #{}: игрок {player_id} live {expected:?} / replay {got:?}", history.hand_number);
            return Err(format!("реплей раздачи #{} разошёлся со столом", history.hand_number).into());
        }
    }
    Ok(replay.frames.len())
}
