//! Simulation command: bot-driven hands through the game service.
//!
//! One game is created in an in-memory repository, `players` bot seats join
//! with the configured starting stack and hands are dealt until `hands` have
//! been played or only one seat has chips left. Chip conservation is checked
//! after every hand. With `--output` each finished hand is appended to a
//! JSONL history file.

use std::io::Write;
use std::path::PathBuf;

use homegame_ai::{create_bot, SeatStrategy, BOT_NAMES};
use homegame_engine::errors::GameError;
use homegame_engine::player::PlayerId;
use homegame_engine::repository::{GameId, InMemoryRepository};
use homegame_engine::round::{Outcome, Transition};
use homegame_engine::service::GameService;

use crate::config::{self, Config};
use crate::error::CliError;
use crate::ui;

/// Upper bound on actions in a single hand before the run is aborted.
const MAX_ACTIONS_PER_HAND: usize = 1_000;

#[derive(Debug, Clone, Default)]
pub struct SimOptions {
    pub hands: u64,
    pub players: Option<usize>,
    pub seed: Option<u64>,
    pub output: Option<String>,
    pub bots: Vec<String>,
}

pub fn handle_sim_command(
    opts: SimOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    sim_with_config(&cfg, opts, out, err)
}

fn sim_with_config(
    cfg: &Config,
    opts: SimOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if opts.hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let seats = opts.players.unwrap_or(cfg.players);
    config::validate_players(seats)?;
    let bots = resolve_bots(&opts.bots)?;

    let base_seed = opts.seed.or(cfg.seed).unwrap_or_else(rand::random);
    let settings = cfg.engine_settings(seats, Some(base_seed), opts.output.map(PathBuf::from));
    let svc = GameService::new(InMemoryRepository::new(), settings)?;
    let game = svc.create_game()?;
    let ids = (1..=seats)
        .map(|i| svc.add_player(&game, format!("bot{i}"), cfg.starting_stack))
        .collect::<Result<Vec<PlayerId>, GameError>>()?;
    let total = cfg.starting_stack * seats as u64;

    writeln!(out, "Seed: {}", base_seed)?;
    let mut played = 0u64;
    while played < opts.hands {
        let funded = svc.players(&game)?.iter().filter(|p| p.stack > 0).count();
        if funded < 2 {
            ui::display_warning(
                err,
                &format!("stopping after {} hands: one seat holds every chip", played),
            )?;
            break;
        }
        let finished = play_hand(&svc, &game, &ids, &bots)?;
        played += 1;

        let chips = finished.table.total_chips();
        if chips != total {
            return Err(CliError::Engine(GameError::InvariantViolation(format!(
                "hand {} ended with {} chips, expected {}",
                played, chips, total
            ))));
        }
    }

    writeln!(out, "Hands played: {}", played)?;
    for p in svc.players(&game)? {
        writeln!(out, "{}: {}", p.name, p.stack)?;
    }
    writeln!(out, "Chip conservation: ok ({} chips)", total)?;
    Ok(())
}

fn resolve_bots(names: &[String]) -> Result<Vec<Box<dyn SeatStrategy>>, CliError> {
    let names: Vec<&str> = if names.is_empty() {
        vec!["baseline"]
    } else {
        names.iter().map(String::as_str).collect()
    };
    names
        .into_iter()
        .map(|name| {
            create_bot(name).ok_or_else(|| {
                CliError::InvalidInput(format!(
                    "unknown bot {:?} (available: {})",
                    name,
                    BOT_NAMES.join(", ")
                ))
            })
        })
        .collect()
}

fn play_hand(
    svc: &GameService<InMemoryRepository>,
    game: &GameId,
    ids: &[PlayerId],
    bots: &[Box<dyn SeatStrategy>],
) -> Result<Transition, CliError> {
    let mut t = svc.deal(game)?;
    let mut actions = 0;
    while t.outcome != Outcome::HandOver {
        let Some(seat) = t.table.round()?.current else {
            break;
        };
        let bot = &bots[seat % bots.len()];
        let action = bot.decide(&t.table, seat);
        let id = &ids[seat];
        t = match svc.act(game, id, action) {
            Ok(next) => next,
            // bots may size a raise the engine refuses; fall back to a call
            Err(e) if e.is_caller_error() => svc.call(game, id)?,
            Err(e) => return Err(e.into()),
        };
        actions += 1;
        if actions > MAX_ACTIONS_PER_HAND {
            return Err(CliError::Engine(GameError::InvariantViolation(format!(
                "hand did not finish after {} actions",
                MAX_ACTIONS_PER_HAND
            ))));
        }
    }
    Ok(t)
}
