//! Configuration command handler.
//!
//! Implements the `cfg` command, which displays the resolved CLI
//! configuration (starting stack, blind clock, starting level) together
//! with which layer — default, file, or environment — each value came
//! from.

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "starting_stack": {
            "value": config.starting_stack,
            "source": sources.starting_stack,
        },
        "blind_time_secs": {
            "value": config.blind_time_secs,
            "source": sources.blind_time_secs,
        },
        "starting_level": {
            "value": config.starting_level,
            "source": sources.starting_level,
        },
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cfg_displays_json_output_with_sources() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = handle_cfg_command(&mut out, &mut err);
        assert!(result.is_ok());

        let output = String::from_utf8(out).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(json["starting_stack"]["value"].is_u64());
        assert!(json["starting_stack"]["source"].is_string());
        assert!(json["blind_time_secs"]["value"].is_u64());
        assert!(json["starting_level"]["value"].is_u64());
    }

    #[test]
    fn cfg_writes_pretty_json_and_nothing_to_stderr() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_cfg_command(&mut out, &mut err);
        assert!(result.is_ok());
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains('\n'));
        assert!(String::from_utf8(err).unwrap().is_empty());
    }
}
