//! Hand-by-hand replay of a recorded history.
//!
//! `replay` walks a JSONL hand-history file in order and prints each
//! hand's actions and result, the same narration `play` prints live, so a
//! saved session can be reviewed without re-running the engine.

use crate::error::CliError;
use crate::formatters::format_action;
use crate::history::load_records;
use std::io::Write;

pub fn handle_replay_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let records = load_records(&input).map_err(CliError::InvalidInput)?;
    if records.is_empty() {
        crate::ui::write_error(err, &format!("{input}: no hands recorded"))?;
        return Err(CliError::InvalidInput(format!(
            "{input}: no hands recorded"
        )));
    }

    for (index, record) in records.iter().enumerate() {
        writeln!(
            out,
            "\n=== hand {index} (level {}, dealer seat {}) ===",
            record.hand.level, record.hand.dealer_seat
        )?;
        writeln!(
            out,
            "blinds: sb={:?} bb={} ante={}",
            record.hand.small_blind_seat, record.hand.big_blind_amount, record.hand.ante
        )?;

        for action in &record.actions {
            let name = record.name_of(action.player_id);
            writeln!(out, "  [{:?}] {}", action.round, format_action(action, name))?;
        }

        if record.hand.winners.is_empty() {
            writeln!(out, "  (no winners recorded)")?;
        } else {
            for (player, amount) in record.winners() {
                writeln!(out, "  {} wins {}", record.name_of(*player), amount)?;
            }
        }
        writeln!(out, "  pot={}", record.hand.pot)?;
    }

    writeln!(out, "\nreplayed {} hand(s)", records.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use holdem_engine::hand::Hand;
    use holdem_engine::ids::GameId;
    use std::collections::HashMap;
    use std::io::Write as _;

    fn write_sample_history(path: &std::path::Path) {
        let mut hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        hand.pot = 150;
        hand.is_complete = true;
        let winner = holdem_engine::ids::PlayerId::new();
        hand.winners = vec![(winner, 150)];
        let record = crate::history::HandHistoryRecord {
            game_id: hand.game_id,
            hand,
            actions: Vec::new(),
            player_names: HashMap::new(),
            recorded_at: Utc::now(),
        };
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{}", serde_json::to_string(&record).unwrap()).unwrap();
    }

    #[test]
    fn replays_every_recorded_hand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        write_sample_history(&path);

        let mut out = Vec::new();
        let mut err = Vec::new();
        let result =
            handle_replay_command(path.to_str().unwrap().to_string(), &mut out, &mut err);
        assert!(result.is_ok());
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("replayed 1 hand(s)"));
        assert!(output.contains("pot=150"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result =
            handle_replay_command("does-not-exist.jsonl".to_string(), &mut out, &mut err);
        assert!(result.is_err());
    }
}
