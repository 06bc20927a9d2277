//! Binary entry point for the `holdem` command-line tool.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = std::env::args();
    let code = holdem_cli::run(args, &mut io::stdout(), &mut io::stderr());
    ExitCode::from(code as u8)
}
