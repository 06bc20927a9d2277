use crate::errors::DomainError;
use crate::hand::Hand;
use crate::player::{ActionKind, Player, PlayerActionRequest};

/// The effect of a legal action, computed but not yet applied. Separating
/// validation from application means a rejected action never touches
/// `Player`/`Hand` state (spec.md §4.2: "validate, then apply").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedAction {
    pub kind: ActionKind,
    /// Chips pulled from the acting player's stack right now.
    pub delta: u64,
    /// The player's `action_amount` after this action is applied.
    pub total_to: u64,
    /// `Hand::current_bet` after this action is applied.
    pub new_current_bet: u64,
    /// `Hand::last_raise_amount` after this action is applied.
    pub new_last_raise_amount: u64,
    pub is_all_in: bool,
}

/// Validates `request` against the live state of `hand` and `player`,
/// returning the chip effect without mutating anything.
///
/// `big_blind` sets the table minimum bet/raise-increment for the street;
/// any request that would leave `player` with no chips behind is
/// automatically treated as all-in rather than rejected (spec.md §4.2,
/// §4.5).
pub fn validate_action(
    hand: &Hand,
    player: &Player,
    request: &PlayerActionRequest,
) -> Result<ValidatedAction, DomainError> {
    if player.amount == 0 && !player.is_all_in() {
        return Err(DomainError::InsufficientChips);
    }
    match request {
        PlayerActionRequest::Fold => Ok(ValidatedAction {
            kind: ActionKind::Fold,
            delta: 0,
            total_to: player.action_amount,
            new_current_bet: hand.current_bet,
            new_last_raise_amount: hand.last_raise_amount,
            is_all_in: false,
        }),
        PlayerActionRequest::Check => {
            if hand.current_bet != player.action_amount {
                return Err(DomainError::CannotCheck);
            }
            Ok(ValidatedAction {
                kind: ActionKind::Check,
                delta: 0,
                total_to: player.action_amount,
                new_current_bet: hand.current_bet,
                new_last_raise_amount: hand.last_raise_amount,
                is_all_in: false,
            })
        }
        PlayerActionRequest::Call => {
            let owed = hand.current_bet.saturating_sub(player.action_amount);
            if owed == 0 {
                return Err(DomainError::CannotCheck);
            }
            let delta = owed.min(player.amount);
            let total_to = player.action_amount + delta;
            let is_all_in = delta == player.amount;
            Ok(ValidatedAction {
                kind: if is_all_in { ActionKind::AllIn } else { ActionKind::Call },
                delta,
                total_to,
                new_current_bet: hand.current_bet,
                new_last_raise_amount: hand.last_raise_amount,
                is_all_in,
            })
        }
        PlayerActionRequest::Bet { amount } => {
            if hand.current_bet != 0 {
                return Err(DomainError::CannotBet);
            }
            validate_open(hand, player, *amount, ActionKind::Bet)
        }
        PlayerActionRequest::Raise { amount } => {
            if hand.current_bet == 0 {
                return Err(DomainError::CannotBet);
            }
            validate_open(hand, player, *amount, ActionKind::Raise)
        }
        PlayerActionRequest::ReRaise { amount } => {
            if hand.current_bet == 0 {
                return Err(DomainError::CannotBet);
            }
            validate_open(hand, player, *amount, ActionKind::ReRaise)
        }
        PlayerActionRequest::AllIn => {
            let delta = player.amount;
            let total_to = player.action_amount + delta;
            let new_current_bet = hand.current_bet.max(total_to);
            let new_last_raise_amount = if total_to > hand.current_bet {
                let increment = total_to - hand.current_bet;
                if increment >= hand.last_raise_amount {
                    increment
                } else {
                    hand.last_raise_amount
                }
            } else {
                hand.last_raise_amount
            };
            Ok(ValidatedAction {
                kind: ActionKind::AllIn,
                delta,
                total_to,
                new_current_bet,
                new_last_raise_amount,
                is_all_in: true,
            })
        }
    }
}

/// Shared logic for Bet/Raise/Re-raise: `amount` is the new total the
/// player will have put in this street once the action lands, not the
/// incremental chips. Enforces the minimum-raise rule: the increment over
/// the current bet must be at least the size of the previous raise this
/// street (or the big blind, if this is the street's first bet),
/// unless the player is going all-in for less.
fn validate_open(
    hand: &Hand,
    player: &Player,
    amount: u64,
    kind: ActionKind,
) -> Result<ValidatedAction, DomainError> {
    if amount <= player.action_amount {
        return Err(DomainError::InvalidBetAmount {
            amount,
            minimum: player.action_amount + 1,
        });
    }
    let delta = amount - player.action_amount;
    let max_delta = player.amount;
    let (delta, total_to, is_all_in) = if delta >= max_delta {
        (max_delta, player.action_amount + max_delta, true)
    } else {
        (delta, amount, false)
    };

    // The floor for an opening bet/raise is the last raise this street, or
    // the big blind if nothing has been bet yet this street (spec.md §4.4:
    // `betMinAmount = big_blind_amount`, applied on every street, not just
    // preflop where it happens to coincide with `current_bet`).
    let min_increment = if hand.last_raise_amount > 0 {
        hand.last_raise_amount
    } else {
        hand.big_blind_amount.max(1)
    };
    let min_total = hand.current_bet + min_increment;
    if !is_all_in && total_to < min_total {
        return Err(DomainError::InvalidBetAmount {
            amount: total_to,
            minimum: min_total,
        });
    }

    let increment_over_current = total_to.saturating_sub(hand.current_bet);
    let new_last_raise_amount = if is_all_in && increment_over_current < min_increment {
        hand.last_raise_amount
    } else {
        increment_over_current
    };

    Ok(ValidatedAction {
        kind: if is_all_in { ActionKind::AllIn } else { kind },
        delta,
        total_to,
        new_current_bet: total_to.max(hand.current_bet),
        new_last_raise_amount,
        is_all_in,
    })
}
