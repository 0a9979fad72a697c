//! # Homegame CLI Library
//!
//! Developer tools for the homegame poker engine: score hands, deal a single
//! hand for inspection, run bot simulations through the game service and
//! inspect the resolved configuration.
//!
//! ## Main Entry Point
//!
//! [`run`] parses command-line arguments, dispatches to the subcommand and
//! returns the process exit code.
//!
//! ```
//! use std::io;
//! let args = vec!["homegame", "eval", "As", "Ks", "Qs", "Js", "Ts"];
//! let code = homegame_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `eval`: Score 5 to 7 cards
//! - `deal`: Deal one hand and print seats, hole cards and board
//! - `sim`: Play bot hands and verify chip conservation
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod ui;

use cli::{Commands, HomegameCli, COMMANDS};
use commands::{
    handle_cfg_command, handle_deal_command, handle_eval_command, handle_sim_command, SimOptions,
};

pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Returns `0` on success and `2` on any parse or command error. Help and
/// version output go to `out` with exit code `0`.
///
/// ```
/// use std::io;
/// let args = vec!["homegame", "deal", "--players", "3", "--seed", "42"];
/// let code = homegame_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match HomegameCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(&e, out, err),
    };

    let result = match cli.cmd {
        Commands::Eval { cards } => handle_eval_command(&cards, out),
        Commands::Deal { players, seed } => handle_deal_command(players, seed, out),
        Commands::Sim {
            hands,
            players,
            seed,
            output,
            bots,
        } => handle_sim_command(
            SimOptions {
                hands,
                players,
                seed,
                output,
                bots,
            },
            out,
            err,
        ),
        Commands::Cfg => handle_cfg_command(out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn report_parse_error(e: &clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let mut usage = format!(
        "{}\nHomegame Poker CLI\nUsage: homegame <command> [options]\n\nCommands:\n",
        e
    );
    for c in COMMANDS {
        usage.push_str(&format!("  {}\n", c));
    }
    usage.push_str("\nFor full help, run: homegame --help\n");
    let _ = err.write_all(usage.as_bytes());
    exit_code::ERROR
}
