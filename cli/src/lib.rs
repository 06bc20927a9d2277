//! # holdem-cli: command-line front end for the tournament engine
//!
//! A single-process CLI that exercises `holdem-engine` against an
//! in-process [`holdem_engine::memory::InMemoryRepository`], for local
//! play and hand-history tooling.
//!
//! ## Module Organization
//!
//! - **`cli`**: clap argument surface (`HoldemCli`, `Commands`)
//! - **`commands`**: one handler module per subcommand
//! - **`history`**: the JSONL hand-history record shared by every command
//! - **`validation`**: parses interactive player-action input
//! - **`config`**, **`error`**, **`ui`**, **`exit_code`**: support modules
//!
//! ## Commands
//!
//! `play`, `doctor`, `replay`, `export`, `stats`, `cfg`

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod history;
pub mod io_utils;
#[macro_use]
pub mod macros;
pub mod ui;
pub mod validation;

use cli::{Commands, HoldemCli};

use commands::{
    handle_cfg_command, handle_doctor_command, handle_export_command, handle_play_command,
    handle_replay_command, handle_stats_command,
};

pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate
/// subcommand handler.
///
/// Returns an exit code: `0` for success, `2` for errors, `130` if the
/// user interrupted an interactive command.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    match HoldemCli::try_parse_from(&argv) {
        Err(e) => handle_parse_error(e, out, err),
        Ok(cli) => execute_command(cli.cmd, out, err),
    }
}

fn handle_parse_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(out, "{}", e);
            exit_code::SUCCESS
        }
        _ => {
            const COMMANDS: &[&str] = &["play", "doctor", "replay", "export", "stats", "cfg"];
            let _ = writeln!(err, "{}", e);
            let _ = writeln!(err);
            let _ = writeln!(err, "holdem: No-Limit Hold'em tournament engine CLI");
            let _ = writeln!(err, "Usage: holdem <command> [options]\n");
            let _ = writeln!(err, "Commands:");
            for c in COMMANDS {
                let _ = writeln!(err, "  {}", c);
            }
            let _ = writeln!(err, "\nFor full help, run: holdem --help");
            exit_code::ERROR
        }
    }
}

fn execute_command(cmd: Commands, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    let result = match cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Play {
            players,
            hands,
            history,
        } => {
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(players, hands, history, out, err, &mut stdin_lock)
        }
        Commands::Doctor { input } => handle_doctor_command(input, out, err),
        Commands::Replay { input } => handle_replay_command(input, out, err),
        Commands::Export {
            input,
            format,
            output,
        } => handle_export_command(input, output, format, out, err),
        Commands::Stats { input } => handle_stats_command(input, out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
        Err(e) => {
            let _ = writeln!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}
