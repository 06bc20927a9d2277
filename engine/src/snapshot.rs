use crate::action_log::Action;
use crate::game::Game;
use crate::hand::Hand;
use crate::opportunities::ActionOpportunities;
use crate::player::Player;
use serde::{Deserialize, Serialize};

/// The full externally-visible state of one game at a point in time.
/// This is what every command handler returns and what a client polls or
/// replays from; it is deliberately the entire picture rather than a
/// diff, so a consumer never has to reconstruct state from a sequence of
/// partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub game: Game,
    pub players: Vec<Player>,
    pub hand: Option<Hand>,
    pub hand_actions: Vec<Action>,
    /// Legal actions for whoever's turn it is, if a hand is in progress
    /// and awaiting an action.
    pub opportunities: Option<ActionOpportunities>,
}
