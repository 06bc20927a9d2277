//! CLI argument surface for the tournament engine front end.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "holdem")]
#[command(author, version, about = "No-Limit Hold'em tournament engine CLI", long_about = None)]
pub struct HoldemCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play an interactive tournament against the in-process engine.
    Play {
        /// Number of seats to start the game with (default 4).
        #[arg(long)]
        players: Option<u32>,
        /// Stop after this many completed hands (default: play until one
        /// player remains or the user quits).
        #[arg(long)]
        hands: Option<u32>,
        /// Append each completed hand to this JSONL history file.
        #[arg(long)]
        history: Option<String>,
    },
    /// Run the testable-property checks against a recorded hand history.
    Doctor {
        /// Path to a JSONL hand-history file (optionally .zst compressed).
        #[arg(long)]
        input: String,
    },
    /// Replay a recorded hand history, hand by hand.
    Replay {
        #[arg(long)]
        input: String,
    },
    /// Export a hand history to CSV, JSON, or SQLite.
    Export {
        #[arg(long)]
        input: String,
        /// One of: csv, json, sqlite.
        #[arg(long)]
        format: String,
        #[arg(long)]
        output: String,
    },
    /// Summarize per-player chip and action statistics from a hand history.
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the resolved configuration and where each value came from.
    Cfg,
}
