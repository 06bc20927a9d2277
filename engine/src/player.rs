use crate::ids::{GameId, HandId, PlayerId};
use serde::{Deserialize, Serialize};

/// The last action a player took during the current betting street.
/// Corresponds to spec.md's `players.action` enum; the empty-string
/// variant from the source schema is modelled as `Option::None` on
/// [`Player::action`] rather than as a member of this enum.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Bet,
    Fold,
    Call,
    Check,
    Raise,
    ReRaise,
    AllIn,
}

/// An action request submitted by (or on behalf of) a player. Distinct
/// from [`ActionKind`]: this is the command coming in, `ActionKind` is the
/// record of what happened once validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action_type", rename_all = "kebab-case")]
pub enum PlayerActionRequest {
    Bet { amount: u64 },
    Raise { amount: u64 },
    ReRaise { amount: u64 },
    Call,
    Check,
    Fold,
    AllIn,
}

impl PlayerActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerActionRequest::Bet { .. } => ActionKind::Bet,
            PlayerActionRequest::Raise { .. } => ActionKind::Raise,
            PlayerActionRequest::ReRaise { .. } => ActionKind::ReRaise,
            PlayerActionRequest::Call => ActionKind::Call,
            PlayerActionRequest::Check => ActionKind::Check,
            PlayerActionRequest::Fold => ActionKind::Fold,
            PlayerActionRequest::AllIn => ActionKind::AllIn,
        }
    }
}

/// A seat occupant within a game. Table order is the order `Player`s were
/// created in and is immutable once a hand begins (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub game_id: GameId,
    pub name: String,
    /// Current chip stack. Never negative by construction: every debit
    /// goes through [`Player::commit`], which saturates at zero and is
    /// only ever called with amounts already checked against the stack.
    pub amount: u64,
    pub is_online: bool,
    /// Still in the tournament (not busted, or rebought).
    pub is_active: bool,
    pub action: Option<ActionKind>,
    /// Total commitment this street.
    pub action_amount: u64,
    /// Total commitment this hand.
    pub all_bet_sum: u64,
    /// Hand at which this seat busted, frozen for rotation accounting
    /// until a rebuy clears it.
    pub inactive_time_hand_id: Option<HandId>,
    /// Table order, assigned at creation and never renumbered.
    pub seat: u32,
}

impl Player {
    pub fn new(game_id: GameId, name: impl Into<String>, amount: u64, seat: u32) -> Self {
        Self {
            id: PlayerId::new(),
            game_id,
            name: name.into(),
            amount,
            is_online: true,
            is_active: true,
            action: None,
            action_amount: 0,
            all_bet_sum: 0,
            inactive_time_hand_id: None,
            seat,
        }
    }

    /// True once this player has folded this hand; a folded player is
    /// still counted for seat rotation but excluded from pot contention.
    pub fn has_folded(&self) -> bool {
        self.action == Some(ActionKind::Fold)
    }

    pub fn is_all_in(&self) -> bool {
        self.action == Some(ActionKind::AllIn)
    }

    /// Contending for the pot: active, dealt in, and not folded.
    pub fn is_live(&self) -> bool {
        self.is_active && !self.has_folded()
    }

    /// Live and has chips behind — can still act.
    pub fn is_live_not_all_in(&self) -> bool {
        self.is_live() && !self.is_all_in()
    }

    /// Pull `amount` chips from the stack, converting to an all-in if the
    /// stack can't cover it. Returns the amount actually committed.
    pub fn commit(&mut self, amount: u64) -> u64 {
        let paid = amount.min(self.amount);
        self.amount -= paid;
        self.action_amount += paid;
        self.all_bet_sum += paid;
        paid
    }

    pub fn credit(&mut self, amount: u64) {
        self.amount = self.amount.saturating_add(amount);
    }

    /// Pulls an ante from the stack into the pot. Unlike [`Player::commit`],
    /// this does not touch `action_amount`: the ante is dead money the
    /// street's call/raise bookkeeping must not see, or the big blind's
    /// forced ante would make their street commitment look larger than
    /// `current_bet` and the round would never be able to close (spec.md
    /// §4.1's "ante posted by BB only" quirk, §8's per-street commitment
    /// equality invariant).
    pub fn commit_ante(&mut self, amount: u64) -> u64 {
        let paid = amount.min(self.amount);
        self.amount -= paid;
        self.all_bet_sum += paid;
        paid
    }

    /// Reset per-street bookkeeping. Called at street transitions for
    /// every live, non-all-in player (spec.md §4.3).
    pub fn reset_street(&mut self) {
        self.action = None;
        self.action_amount = 0;
    }

    /// Reset per-hand bookkeeping. Called at the start of a new hand for
    /// every seated player.
    pub fn reset_hand(&mut self) {
        self.action = None;
        self.action_amount = 0;
        self.all_bet_sum = 0;
    }

    pub fn eliminate(&mut self, hand_id: HandId) {
        self.is_active = false;
        self.inactive_time_hand_id = Some(hand_id);
    }

    pub fn rebuy(&mut self, chips: u64) {
        self.amount = chips;
        self.is_active = true;
        self.inactive_time_hand_id = None;
        self.reset_hand();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_caps_at_stack_and_tracks_totals() {
        let mut p = Player::new(GameId::new(), "alice", 100, 0);
        let paid = p.commit(150);
        assert_eq!(paid, 100);
        assert_eq!(p.amount, 0);
        assert_eq!(p.action_amount, 100);
        assert_eq!(p.all_bet_sum, 100);
    }

    #[test]
    fn reset_street_keeps_all_bet_sum() {
        let mut p = Player::new(GameId::new(), "alice", 100, 0);
        p.commit(40);
        p.action = Some(ActionKind::Call);
        p.reset_street();
        assert_eq!(p.action_amount, 0);
        assert_eq!(p.all_bet_sum, 40);
        assert!(p.action.is_none());
    }
}
