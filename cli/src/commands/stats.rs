//! Per-player statistics from a recorded hand history.
//!
//! `stats` aggregates a JSONL hand-history file into one row per player:
//! hands played, hands won, total chips won, and a count per action kind
//! (how often they bet, raised, folded, and so on).

use crate::error::CliError;
use crate::history::load_records;
use crate::ui;
use holdem_engine::ids::PlayerId;
use holdem_engine::player::ActionKind;
use std::collections::HashMap;
use std::io::Write;

#[derive(Default)]
struct PlayerStats {
    name: String,
    hands_played: u64,
    hands_won: u64,
    chips_won: u64,
    actions: HashMap<&'static str, u64>,
}

pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let records = load_records(&input).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to read {}: {}", input, e));
        CliError::InvalidInput(e)
    })?;
    if records.is_empty() {
        ui::write_error(err, &format!("{input}: no hands recorded"))?;
        return Err(CliError::InvalidInput(format!(
            "{input}: no hands recorded"
        )));
    }

    let mut by_player: HashMap<PlayerId, PlayerStats> = HashMap::new();

    for record in &records {
        for (player_id, name) in &record.player_names {
            let entry = by_player.entry(*player_id).or_default();
            entry.name = name.clone();
            entry.hands_played += 1;
        }
        for (player_id, amount) in record.winners() {
            let entry = by_player.entry(*player_id).or_default();
            entry.hands_won += 1;
            entry.chips_won += amount;
        }
        for action in &record.actions {
            let entry = by_player.entry(action.player_id).or_default();
            *entry.actions.entry(action_label(action.action)).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<_> = by_player.values().collect();
    rows.sort_by(|a, b| b.chips_won.cmp(&a.chips_won).then(a.name.cmp(&b.name)));

    let report: Vec<serde_json::Value> = rows
        .iter()
        .map(|p| {
            serde_json::json!({
                "player": p.name,
                "hands_played": p.hands_played,
                "hands_won": p.hands_won,
                "chips_won": p.chips_won,
                "actions": p.actions,
            })
        })
        .collect();

    let json_str = serde_json::to_string_pretty(&serde_json::json!({
        "hands_in_history": records.len(),
        "players": report,
    }))
    .map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

fn action_label(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Bet => "bet",
        ActionKind::Fold => "fold",
        ActionKind::Call => "call",
        ActionKind::Check => "check",
        ActionKind::Raise => "raise",
        ActionKind::ReRaise => "reraise",
        ActionKind::AllIn => "allin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use holdem_engine::action_log::Action;
    use holdem_engine::hand::{Hand, Round};
    use holdem_engine::ids::GameId;

    #[test]
    fn aggregates_chips_won_and_action_counts() {
        let mut hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        hand.pot = 300;
        hand.is_complete = true;
        let alice = PlayerId::new();
        hand.winners = vec![(alice, 300)];
        let mut player_names = HashMap::new();
        player_names.insert(alice, "alice".to_string());
        let actions = vec![Action::new(
            hand.id,
            alice,
            Round::Preflop,
            ActionKind::Raise,
            300,
            1,
            Utc::now(),
        )];
        let record = crate::history::HandHistoryRecord {
            game_id: hand.game_id,
            hand,
            actions,
            player_names,
            recorded_at: Utc::now(),
        };

        let mut by_player: HashMap<PlayerId, PlayerStats> = HashMap::new();
        for (player_id, name) in &record.player_names {
            let entry = by_player.entry(*player_id).or_default();
            entry.name = name.clone();
            entry.hands_played += 1;
        }
        for (player_id, amount) in record.winners() {
            let entry = by_player.entry(*player_id).or_default();
            entry.hands_won += 1;
            entry.chips_won += amount;
        }
        for action in &record.actions {
            let entry = by_player.entry(action.player_id).or_default();
            *entry.actions.entry(action_label(action.action)).or_insert(0) += 1;
        }

        let stats = &by_player[&alice];
        assert_eq!(stats.chips_won, 300);
        assert_eq!(stats.hands_won, 1);
        assert_eq!(stats.actions.get("raise"), Some(&1));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_stats_command("does-not-exist.jsonl".to_string(), &mut out, &mut err);
        assert!(result.is_err());
    }
}
