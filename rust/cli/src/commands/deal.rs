//! Deal command: one hand, printed for inspection.
//!
//! Seats `P1..Pn` with the configured starting stack, posts blinds and deals
//! through the engine's round transitions, then prints each seat's position
//! and hole cards followed by the full five-card board.

use std::io::Write;

use homegame_engine::board::{Board, Table};
use homegame_engine::player::{Player, PlayerId};
use homegame_engine::round;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::{self, Config};
use crate::error::CliError;
use crate::ui;

pub fn handle_deal_command(
    players: Option<usize>,
    seed: Option<u64>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    deal_with_config(&cfg, players, seed, out)
}

fn deal_with_config(
    cfg: &Config,
    players: Option<usize>,
    seed: Option<u64>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let seats = players.unwrap_or(cfg.players);
    config::validate_players(seats)?;
    let base_seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let mut rng = ChaCha20Rng::seed_from_u64(base_seed);

    let roster = (1..=seats)
        .map(|i| Player::new(PlayerId::new(format!("p{i}")), format!("P{i}"), cfg.starting_stack))
        .collect();
    let dealt = round::deal(&Table::new(roster, Board::new(cfg.big_blind)), &mut rng)?;
    let table = dealt.table;
    let round = table.round()?;

    writeln!(out, "Seed: {}", base_seed)?;
    for (seat, p) in table.players.iter().enumerate() {
        let mut tags = Vec::new();
        if table.board.dealer == Some(seat) {
            tags.push("D");
        }
        if round.small_blind == seat {
            tags.push("SB");
        }
        if round.big_blind == seat {
            tags.push("BB");
        }
        let hole = p.hole.map(|h| ui::cards_line(&h)).unwrap_or_else(|| "--".into());
        if tags.is_empty() {
            writeln!(out, "Hole {}: {}", p.name, hole)?;
        } else {
            writeln!(out, "Hole {}: {} [{}]", p.name, hole, tags.join("/"))?;
        }
    }
    writeln!(out, "Board: {}", ui::cards_line(&round.board_cards))?;
    Ok(())
}
