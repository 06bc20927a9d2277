use crate::ids::GameId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tournament session. At most one [`Game`] with `end_time: None` exists
/// at a time (enforced by the repository's `get_active_game`/`start_game`
/// pairing, not by this type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Seconds each blind level lasts before the level bumps.
    pub blind_time_secs: u64,
    /// Current blind level, >= 1.
    pub level: u32,
    /// Starting stack handed to every seat (and to rebuys).
    pub chips: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Game {
    pub fn new(blind_time_secs: u64, chips: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: GameId::new(),
            blind_time_secs,
            level: 1,
            chips,
            start_time: now,
            end_time: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}
