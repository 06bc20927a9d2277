use crate::hand::Hand;
use crate::player::{ActionKind, Player};
use serde::{Deserialize, Serialize};

/// The set of legal actions for a player at the exact moment it becomes
/// their turn, plus the bet-size bounds an open/raise must fall within.
/// Computed fresh before every action rather than cached, so it always
/// reflects the current `Hand`/`Player` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOpportunities {
    pub can_fold: bool,
    pub can_check: bool,
    pub can_call: bool,
    /// Chips required to call; 0 when `can_call` is false.
    pub call_amount: u64,
    pub can_bet: bool,
    pub can_raise: bool,
    /// Minimum legal total (player's `action_amount` after acting) for a
    /// bet/raise; `None` if neither is available.
    pub min_open_total: Option<u64>,
    /// Maximum legal total for a bet/raise — the player's whole stack.
    pub max_open_total: Option<u64>,
    pub can_all_in: bool,
    /// Which wire `ActionKind` a raise should be submitted as, when
    /// `can_raise` is set: `Raise` for the street's first raise, `ReRaise`
    /// once one has already landed this round. Both are handled
    /// identically by the processor (spec.md §9: the source distinguishes
    /// them only for UI) — `None` when `can_raise` is false.
    pub raise_kind_hint: Option<ActionKind>,
}

/// Computes the legal actions available to `player` given the current
/// state of `hand`. Assumes it is already this player's turn and that
/// they are live and not all-in; callers must check that separately.
///
/// `round_has_raise` reflects whether a `Raise`/`ReRaise` has already been
/// logged for this hand's current round — spec.md §4.4 names this as one
/// of the booleans the opportunity calculator derives by "querying
/// distinct `action_type`s in the action log for `(hand_id, round)`"; here
/// it is sourced from [`crate::repository::Repository::action_kinds_in_round`]
/// rather than re-derived from `Hand`/`Player` fields.
pub fn compute_opportunities(
    hand: &Hand,
    player: &Player,
    round_has_raise: bool,
) -> ActionOpportunities {
    let owed = hand.current_bet.saturating_sub(player.action_amount);
    let stack = player.amount;

    let can_check = owed == 0;
    let can_call = owed > 0 && stack > 0;
    let call_amount = if can_call { owed.min(stack) } else { 0 };

    let can_bet = hand.current_bet == 0 && stack > 0;
    let min_raise_increment = if hand.last_raise_amount > 0 {
        hand.last_raise_amount
    } else {
        hand.current_bet
    };
    let min_open_total = hand.current_bet + min_raise_increment.max(1);
    let max_open_total = player.action_amount + stack;
    let can_raise = hand.current_bet > 0 && stack > 0 && max_open_total > hand.current_bet;

    let (can_bet, can_raise) = (
        can_bet && max_open_total >= min_open_total.min(max_open_total),
        can_raise,
    );

    ActionOpportunities {
        can_fold: true,
        can_check,
        can_call,
        call_amount,
        can_bet,
        can_raise,
        min_open_total: if can_bet || can_raise {
            Some(min_open_total.min(max_open_total))
        } else {
            None
        },
        max_open_total: if can_bet || can_raise {
            Some(max_open_total)
        } else {
            None
        },
        can_all_in: stack > 0,
        raise_kind_hint: can_raise.then_some(if round_has_raise {
            ActionKind::ReRaise
        } else {
            ActionKind::Raise
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GameId;

    #[test]
    fn facing_no_bet_can_check_or_bet() {
        let hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        let player = Player::new(hand.game_id, "p", 1000, 0);
        let opp = compute_opportunities(&hand, &player, false);
        assert!(opp.can_check);
        assert!(!opp.can_call);
        assert!(opp.can_bet);
        assert!(!opp.can_raise);
        assert_eq!(opp.raise_kind_hint, None);
    }

    #[test]
    fn facing_a_bet_can_call_or_raise_not_check() {
        let mut hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        hand.current_bet = 200;
        hand.last_raise_amount = 100;
        let player = Player::new(hand.game_id, "p", 1000, 0);
        let opp = compute_opportunities(&hand, &player, false);
        assert!(!opp.can_check);
        assert!(opp.can_call);
        assert_eq!(opp.call_amount, 200);
        assert!(opp.can_raise);
        assert_eq!(opp.min_open_total, Some(300));
        assert_eq!(opp.raise_kind_hint, Some(ActionKind::Raise));
    }

    #[test]
    fn a_second_raise_this_round_is_hinted_as_reraise() {
        let mut hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        hand.current_bet = 400;
        hand.last_raise_amount = 200;
        let player = Player::new(hand.game_id, "p", 1000, 0);
        let opp = compute_opportunities(&hand, &player, true);
        assert_eq!(opp.raise_kind_hint, Some(ActionKind::ReRaise));
    }

    #[test]
    fn short_stack_can_only_go_all_in_for_less_than_min_raise() {
        let mut hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        hand.current_bet = 200;
        hand.last_raise_amount = 100;
        let mut player = Player::new(hand.game_id, "p", 1000, 0);
        player.amount = 50;
        let opp = compute_opportunities(&hand, &player, false);
        assert_eq!(opp.call_amount, 50);
        assert_eq!(opp.max_open_total, Some(50));
        assert!(opp.can_all_in);
    }
}
