//! Command-line definitions for the `homegame` binary.
//!
//! Parsed with `clap` derive; [`crate::run`] dispatches each [`Commands`]
//! variant to its handler in `commands/`.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "homegame", version, about = "Homegame poker engine tools")]
pub struct HomegameCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score 5 to 7 cards, e.g. `homegame eval As Ks Qs Js Ts`
    Eval {
        /// Cards such as `As`, `Td`, `7c`; commas are accepted as separators
        #[arg(required = true, num_args = 1..)]
        cards: Vec<String>,
    },
    /// Deal one hand and print the seating, hole cards and board
    Deal {
        /// Number of seats (defaults to the configured player count)
        #[arg(long)]
        players: Option<usize>,
        /// RNG seed for a reproducible deal
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play bot-driven hands through the game service
    Sim {
        #[arg(long)]
        hands: u64,
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Append finished hands to this JSONL file
        #[arg(long)]
        output: Option<String>,
        /// Bots assigned to seats in turn, e.g. `baseline,station`
        #[arg(long, value_delimiter = ',', default_value = "baseline")]
        bots: Vec<String>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

pub const COMMANDS: &[&str] = &["eval", "deal", "sim", "cfg"];
