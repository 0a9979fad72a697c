//! Configuration command handler.
//!
//! Prints the resolved configuration as pretty JSON, each value paired with
//! the layer it came from (`default`, `file` or `env`):
//!
//! ```json
//! {
//!   "big_blind": {
//!     "value": 100,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "big_blind": {
            "value": config.big_blind,
            "source": sources.big_blind,
        },
        "starting_stack": {
            "value": config.starting_stack,
            "source": sources.starting_stack,
        },
        "players": {
            "value": config.players,
            "source": sources.players,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
