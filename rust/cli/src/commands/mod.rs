//! Command handlers for the `homegame` CLI.
//!
//! Each subcommand lives in its own file and exposes
//! `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`. Output
//! streams are passed in so tests can capture them.

mod cfg;
mod deal;
mod eval;
mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use sim::{handle_sim_command, SimOptions};
