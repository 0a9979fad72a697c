//! # homegame-ai: Bot Seats for Simulated Games
//!
//! Strategies that pick an action for one seat given the table as it stands.
//! Used by the simulator to drive hands through the engine.
//!
//! ## Core Components
//!
//! - [`SeatStrategy`] - Trait every bot implements
//! - [`baseline`] - Rule-based bot using hand strength and pot odds
//! - [`CallingStation`] - Calls everything; handy for checking down hands
//! - [`create_bot`] - Factory by name
//!
//! ## Quick Start
//!
//! ```rust
//! use homegame_ai::create_bot;
//! use homegame_engine::board::{Board, Table};
//! use homegame_engine::player::{Player, PlayerId};
//! use homegame_engine::round::deal;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let players = vec![
//!     Player::new(PlayerId::new("a"), "Ann", 1000),
//!     Player::new(PlayerId::new("b"), "Bo", 1000),
//! ];
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let t = deal(&Table::new(players, Board::new(100)), &mut rng).unwrap();
//!
//! let bot = create_bot("baseline").expect("known bot");
//! let seat = t.table.round().unwrap().current.unwrap();
//! println!("{} chose {:?}", bot.name(), bot.decide(&t.table, seat));
//! ```

use homegame_engine::board::Table;
use homegame_engine::player::PlayerAction;

pub mod baseline;

/// Picks an action for one seat.
///
/// Implementations only read the table. An action that the engine rejects
/// (e.g. a raise the stack can not cover) is the caller's problem to fall
/// back from, typically to [`PlayerAction::Call`].
pub trait SeatStrategy: Send + Sync {
    fn decide(&self, table: &Table, seat: usize) -> PlayerAction;

    fn name(&self) -> &str;
}

/// Calls (or checks) every time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallingStation;

impl SeatStrategy for CallingStation {
    fn decide(&self, _table: &Table, _seat: usize) -> PlayerAction {
        PlayerAction::Call
    }

    fn name(&self) -> &str {
        "CallingStation"
    }
}

pub const BOT_NAMES: [&str; 2] = ["baseline", "station"];

/// Look up a bot by name; `None` for an unknown name.
///
/// ```rust
/// use homegame_ai::create_bot;
///
/// assert_eq!(create_bot("baseline").unwrap().name(), "BaselineBot");
/// assert!(create_bot("shark").is_none());
/// ```
pub fn create_bot(name: &str) -> Option<Box<dyn SeatStrategy>> {
    match name {
        "baseline" => Some(Box::new(baseline::BaselineBot::new())),
        "station" => Some(Box::new(CallingStation)),
        _ => None,
    }
}
