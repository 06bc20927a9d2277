//! Persisted hand-history record shared by `play`, `doctor`, `replay`,
//! `export`, and `stats`.
//!
//! The engine crate has no notion of a file format — it only hands back a
//! [`Snapshot`] after each command. `HandHistoryRecord` is the CLI's own
//! on-disk shape: one JSON object per line (JSONL, optionally `.zst`
//! compressed), one line per completed hand, carrying enough of the
//! [`Hand`]/[`Action`] state for the other commands to rebuild a picture
//! of what happened without replaying through the engine again.

use chrono::{DateTime, Utc};
use holdem_engine::action_log::Action;
use holdem_engine::hand::Hand;
use holdem_engine::ids::{GameId, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandHistoryRecord {
    pub game_id: GameId,
    pub hand: Hand,
    pub actions: Vec<Action>,
    /// Name at the time of the hand, keyed by player id, for display
    /// without needing the live `Player` rows.
    pub player_names: HashMap<PlayerId, String>,
    pub recorded_at: DateTime<Utc>,
}

impl HandHistoryRecord {
    pub fn winners(&self) -> &[(PlayerId, u64)] {
        &self.hand.winners
    }

    pub fn name_of(&self, player: PlayerId) -> &str {
        self.player_names
            .get(&player)
            .map(String::as_str)
            .unwrap_or("?")
    }
}

/// Loads every record from a JSONL hand-history file (optionally `.zst`
/// compressed), in file order. Blank lines are skipped; a malformed line
/// fails the whole load rather than being silently dropped, since a
/// truncated write would otherwise look like a short-but-valid history.
pub fn load_records(path: &str) -> Result<Vec<HandHistoryRecord>, String> {
    let text = crate::io_utils::read_text_auto(path)?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(|e| format!("{path}: {e}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::hand::Round;

    #[test]
    fn round_trips_through_json() {
        let hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        let mut player_names = HashMap::new();
        player_names.insert(PlayerId::new(), "a".to_string());
        let record = HandHistoryRecord {
            game_id: hand.game_id,
            hand,
            actions: Vec::new(),
            player_names,
            recorded_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let line = serde_json::to_string(&record).unwrap();
        let back: HandHistoryRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back.hand.round, Round::Preflop);
        assert_eq!(back.player_names.len(), 1);
    }
}
