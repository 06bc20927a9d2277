use crate::hand::Round;
use crate::ids::{ActionId, HandId, PlayerId};
use crate::player::ActionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded action against a hand. The action log is append-only and
/// is the durable record a replay or audit is built from (spec.md: "action
/// log totality" — every chip movement traces back to exactly one entry
/// here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub hand_id: HandId,
    pub player_id: PlayerId,
    pub round: Round,
    pub action: ActionKind,
    /// Chips committed by this action (0 for check/fold).
    pub amount: u64,
    /// Monotonic per-hand sequence number (spec.md §3/§4.2: `last.action_order
    /// + 1`, or 1 for the hand's first action). Gapless by construction —
    /// [`crate::hand::Hand::next_action_order`] is the only way to obtain
    /// one and always hands out the next integer.
    pub action_order: u64,
    /// Tracks the same counter as `action_order` (spec.md §4.2 defines both
    /// as incrementing together from the prior action); kept as a distinct
    /// field because the persisted schema names it separately.
    pub betting_round: u64,
    pub created_at: DateTime<Utc>,
}

impl Action {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hand_id: HandId,
        player_id: PlayerId,
        round: Round,
        action: ActionKind,
        amount: u64,
        action_order: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActionId::new(),
            hand_id,
            player_id,
            round,
            action,
            amount,
            action_order,
            betting_round: action_order,
            created_at: now,
        }
    }
}
