use crate::action_log::Action;
use crate::advancer::{find_next_actor, hand_is_all_in_runout, round_is_complete};
use crate::capping::{build_side_pots, refund_uncalled_bet};
use crate::errors::DomainError;
use crate::hand::{Hand, Round};
use crate::ids::PlayerId;
use crate::player::{Player, PlayerActionRequest};
use crate::rules::validate_action;
use chrono::{DateTime, Utc};

/// Outcome of applying one player action: the recorded [`Action`] plus
/// what the caller needs to do next (nothing, advance to the next street,
/// or the hand is over).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub action: Action,
    pub street_advanced_to: Option<Round>,
    pub hand_over_by_fold: bool,
    /// Uncalled chips refunded back to a player once the street closed.
    pub refund: Option<(PlayerId, u64)>,
    /// Players whose per-street state (`action`/`action_amount`) was reset
    /// because the street closed and the hand continues — the set the
    /// caller should persist via
    /// [`crate::repository::Transaction::reset_street_state_for_many`].
    pub reset_players: Vec<PlayerId>,
}

/// Validates and applies one player action against `hand`/`players`,
/// advancing the turn (and, if the street has closed, the round) as a
/// side effect. This is the single entry point the command layer calls
/// for every player action (spec.md §4.2).
pub fn apply_action(
    hand: &mut Hand,
    players: &mut [Player],
    acting_player: PlayerId,
    request: PlayerActionRequest,
    now: DateTime<Utc>,
) -> Result<ActionOutcome, DomainError> {
    if hand.is_complete {
        return Err(DomainError::HandAlreadyComplete(hand.id));
    }
    let turn_seat = hand.turn_seat.ok_or(DomainError::NoHandInProgress(hand.game_id))?;

    let player_idx = players
        .iter()
        .position(|p| p.id == acting_player)
        .ok_or(DomainError::PlayerGameMismatch {
            player: acting_player,
            game: hand.game_id,
        })?;

    if !players[player_idx].is_active {
        return Err(DomainError::PlayerInactive(acting_player));
    }
    if players[player_idx].seat != turn_seat {
        return Err(DomainError::NotPlayersTurn {
            expected: players
                .iter()
                .find(|p| p.seat == turn_seat)
                .map(|p| p.id)
                .unwrap_or(acting_player),
            actual: acting_player,
        });
    }
    if players[player_idx].has_folded() {
        return Err(DomainError::PlayerAlreadyFolded(acting_player));
    }

    let validated = validate_action(hand, &players[player_idx], &request)?;

    {
        let player = &mut players[player_idx];
        player.commit(validated.delta);
        player.action = Some(validated.kind);
    }
    hand.pot += validated.delta;
    hand.current_bet = validated.new_current_bet;
    hand.last_raise_amount = validated.new_last_raise_amount;
    hand.mark_acted(turn_seat);

    // A bet/raise reopens action: everyone else must act again.
    if matches!(
        validated.kind,
        crate::player::ActionKind::Bet | crate::player::ActionKind::Raise | crate::player::ActionKind::ReRaise
    ) {
        hand.acted_this_street = vec![turn_seat];
    }

    let action_order = hand.next_action_order();
    let action = Action::new(
        hand.id,
        acting_player,
        hand.round,
        validated.kind,
        validated.delta,
        action_order,
        now,
    );

    let live_remaining = players.iter().filter(|p| p.is_live()).count();
    if live_remaining <= 1 {
        let (refund, winner) = settle_fold_walk(players);
        if let Some((_, amount)) = refund {
            hand.pot -= amount;
        }
        if let Some(winner_id) = winner {
            hand.complete(vec![(winner_id, hand.pot)]);
            hand.side_pots = build_side_pots(players);
        }
        return Ok(ActionOutcome {
            action,
            street_advanced_to: None,
            hand_over_by_fold: true,
            refund,
            reset_players: Vec::new(),
        });
    }

    let mut refund = None;
    let mut street_advanced_to = None;
    let mut reset_players = Vec::new();
    if round_is_complete(hand, players) {
        refund = refund_uncalled_bet(players);
        if let Some((_, amount)) = refund {
            hand.pot -= amount;
        }
        if hand_is_all_in_runout(players) {
            // No further decisions possible: fast-forward every remaining
            // street without stopping for action.
            let mut round = hand.round;
            while let Some(next) = round.next() {
                round = next;
                hand.advance_round(round);
                if round == Round::Showdown {
                    break;
                }
            }
            hand.turn_seat = None;
            hand.is_complete = true;
            hand.side_pots = build_side_pots(players);
            street_advanced_to = Some(hand.round);
        } else if let Some(next_round) = hand.round.next() {
            for p in players.iter_mut().filter(|p| p.is_live_not_all_in()) {
                p.reset_street();
                reset_players.push(p.id);
            }
            hand.advance_round(next_round);
            if next_round == Round::Showdown {
                hand.turn_seat = None;
                hand.is_complete = true;
                hand.side_pots = build_side_pots(players);
            } else {
                hand.turn_seat = find_next_actor(players, hand.dealer_seat);
            }
            street_advanced_to = Some(next_round);
        }
    } else {
        hand.turn_seat = find_next_actor(players, turn_seat);
    }

    Ok(ActionOutcome {
        action,
        street_advanced_to,
        hand_over_by_fold: false,
        refund,
        reset_players,
    })
}

/// When the field folds to one player, that player wins the pot without a
/// showdown; any excess they bet beyond what anyone else could call is
/// refunded first.
fn settle_fold_walk(players: &mut [Player]) -> (Option<(PlayerId, u64)>, Option<PlayerId>) {
    let refund = refund_uncalled_bet(players);
    let winner = players.iter().find(|p| p.is_live()).map(|p| p.id);
    (refund, winner)
}
