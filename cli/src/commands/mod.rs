//! Command handler modules for the `holdem` CLI.
//!
//! Each subcommand lives in its own module and exposes a single
//! `pub fn handle_*_command(...) -> Result<(), CliError>` entry point.
//! Output streams are taken as `&mut dyn Write` parameters (rather than
//! written straight to stdout/stderr) so the handlers are unit-testable
//! without a real terminal.

pub mod cfg;
pub mod doctor;
pub mod export;
pub mod play;
pub mod replay;
pub mod stats;

pub use cfg::handle_cfg_command;
pub use doctor::handle_doctor_command;
pub use export::handle_export_command;
pub use play::handle_play_command;
pub use replay::handle_replay_command;
pub use stats::handle_stats_command;
