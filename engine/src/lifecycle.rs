use crate::action_log::Action;
use crate::blinds::GameBlind;
use crate::errors::DomainError;
use crate::hand::Hand;
use crate::ids::{GameId, HandId};
use crate::player::{ActionKind, Player};
use chrono::{DateTime, Utc};

/// The dealer/small-blind/big-blind seats for an upcoming hand. Seat
/// numbers are physical table positions and persist across busts — a
/// busted seat stays at its number, it just stops being dealt into
/// rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatAssignment {
    pub dealer_seat: u32,
    /// `None` when the seat that would post small blind is empty
    /// (its occupant busted last hand) — the blind is dead for this hand
    /// rather than shifted onto a different player (spec.md's
    /// "dead small blind after bust" scenario).
    pub small_blind_seat: Option<u32>,
    pub big_blind_seat: u32,
}

fn next_active_seat_after(players: &[Player], seat: u32, total_seats: u32) -> Option<u32> {
    if total_seats == 0 {
        return None;
    }
    for offset in 1..=total_seats {
        let candidate = (seat + offset) % total_seats;
        if players
            .iter()
            .any(|p| p.seat == candidate && p.is_active)
        {
            return Some(candidate);
        }
    }
    None
}

/// Computes seat assignments for the next hand. `prev_dealer_seat` is
/// `None` for a game's very first hand, in which case the lowest-numbered
/// active seat becomes dealer. `prev_hand_id` names the hand that just
/// finished (also `None` for the first hand) and is what decides whether
/// the small blind is dead this hand: spec.md §4.1 keys that off the
/// seat's `inactive_time_hand_id` matching `prev_hand_id` exactly — a
/// fresh bust — not bare inactivity, so a seat that busted several hands
/// ago passes the small blind on to the next live seat instead.
pub fn rotate_seats(
    players: &[Player],
    prev_dealer_seat: Option<u32>,
    prev_hand_id: Option<HandId>,
) -> Result<SeatAssignment, DomainError> {
    let total_seats = players.iter().map(|p| p.seat).max().map(|m| m + 1).unwrap_or(0);
    let active_count = players.iter().filter(|p| p.is_active).count();
    if active_count < 2 {
        return Err(DomainError::CannotStartHand(
            "fewer than two active players remain".to_string(),
        ));
    }

    let dealer_seat = match prev_dealer_seat {
        None => players
            .iter()
            .filter(|p| p.is_active)
            .map(|p| p.seat)
            .min()
            .expect("active_count >= 2"),
        Some(prev) => next_active_seat_after(players, prev, total_seats).unwrap_or(prev),
    };

    if active_count == 2 {
        // Heads-up: dealer posts small blind, the lone opponent posts big blind.
        let bb_seat = next_active_seat_after(players, dealer_seat, total_seats)
            .expect("a second active player exists");
        return Ok(SeatAssignment {
            dealer_seat,
            small_blind_seat: Some(dealer_seat),
            big_blind_seat: bb_seat,
        });
    }

    let sb_physical_seat = (dealer_seat + 1) % total_seats;
    let sb_is_live = players
        .iter()
        .any(|p| p.seat == sb_physical_seat && p.is_active);
    let sb_occupant_freshly_busted = players.iter().any(|p| {
        p.seat == sb_physical_seat
            && !p.is_active
            && prev_hand_id.is_some()
            && p.inactive_time_hand_id == prev_hand_id
    });

    let (small_blind_seat, big_blind_seat) = if sb_is_live {
        let bb = next_active_seat_after(players, sb_physical_seat, total_seats)
            .ok_or_else(|| DomainError::CannotStartHand("no active seat for big blind".to_string()))?;
        (Some(sb_physical_seat), bb)
    } else if sb_occupant_freshly_busted {
        // Dead small blind for this hand only — the seat busted out on
        // the hand that just finished.
        let bb = next_active_seat_after(players, dealer_seat, total_seats)
            .ok_or_else(|| DomainError::CannotStartHand("no active seat for big blind".to_string()))?;
        (None, bb)
    } else {
        // Stale bust (or no occupant at all): the small blind passes on
        // to the next live seat rather than going dead.
        let sb = next_active_seat_after(players, dealer_seat, total_seats)
            .ok_or_else(|| DomainError::CannotStartHand("no active seat for small blind".to_string()))?;
        let bb = next_active_seat_after(players, sb, total_seats)
            .ok_or_else(|| DomainError::CannotStartHand("no active seat for big blind".to_string()))?;
        (Some(sb), bb)
    };

    Ok(SeatAssignment {
        dealer_seat,
        small_blind_seat,
        big_blind_seat,
    })
}

/// Posts blinds (and the ante, debited only from the big blind — a quirk
/// carried over deliberately rather than corrected) and opens the first
/// hand of a brand-new game.
pub fn start_game(
    game_id: GameId,
    players: &mut [Player],
    blind: &GameBlind,
    now: DateTime<Utc>,
) -> Result<(Hand, Vec<Action>), DomainError> {
    for p in players.iter_mut() {
        p.reset_hand();
    }
    let assignment = rotate_seats(players, None, None)?;
    post_blinds(game_id, players, &assignment, blind, now)
}

/// Rotates seats and posts blinds for the next hand of an in-progress
/// game. Eliminated players are left in place (tracked via
/// `inactive_time_hand_id`) so rotation can keep skipping their seat.
/// `prev_hand_id` is the hand that just finished — it is what decides
/// whether a busted small blind seat is freshly dead or a stale bust
/// that passes the blind along (see [`rotate_seats`]).
pub fn handle_next_hand(
    game_id: GameId,
    players: &mut [Player],
    blind: &GameBlind,
    prev_dealer_seat: u32,
    prev_hand_id: HandId,
    now: DateTime<Utc>,
) -> Result<(Hand, Vec<Action>), DomainError> {
    for p in players.iter_mut().filter(|p| p.is_active) {
        p.reset_hand();
    }
    let assignment = rotate_seats(players, Some(prev_dealer_seat), Some(prev_hand_id))?;
    post_blinds(game_id, players, &assignment, blind, now)
}

/// Posts SB/BB (and the BB's ante) and synthesizes the two driving actions
/// described in spec.md §4.1 — a Bet by the small blind, then a Raise by
/// the big blind — so that pot, `last_raise_amount` and `current_bet` come
/// out identical to what the normal action processor would have produced,
/// and so the action log for this hand starts with those two entries
/// rather than appearing to begin mid-street.
fn post_blinds(
    game_id: GameId,
    players: &mut [Player],
    assignment: &SeatAssignment,
    blind: &GameBlind,
    now: DateTime<Utc>,
) -> Result<(Hand, Vec<Action>), DomainError> {
    let mut hand = Hand::new(
        game_id,
        blind.level,
        assignment.dealer_seat,
        assignment.small_blind_seat,
        assignment.big_blind_seat,
    );
    hand.small_blind_amount = blind.small_blind_amount;
    hand.big_blind_amount = blind.big_blind_amount;
    hand.ante = blind.ante;
    let mut actions = Vec::new();

    if let Some(sb_seat) = assignment.small_blind_seat {
        if let Some(p) = players.iter_mut().find(|p| p.seat == sb_seat) {
            let paid = p.commit(blind.small_blind_amount);
            p.action = Some(ActionKind::Bet);
            hand.current_bet = paid;
            hand.last_raise_amount = paid;
            actions.push(Action::new(
                hand.id,
                p.id,
                hand.round,
                ActionKind::Bet,
                paid,
                hand.next_action_order(),
                now,
            ));
        }
    }
    if let Some(p) = players.iter_mut().find(|p| p.seat == assignment.big_blind_seat) {
        let paid = p.commit(blind.big_blind_amount);
        p.action = Some(ActionKind::Raise);
        // The big blind's post sets the table's min-raise baseline to a
        // full big blind, not the (smaller) increment over the small
        // blind's post — standard poker, and spec.md §8 scenario 1's
        // worked `last_raise_amount=100` for a 50/100 blind.
        hand.current_bet = hand.current_bet.max(paid);
        hand.last_raise_amount = paid;
        actions.push(Action::new(
            hand.id,
            p.id,
            hand.round,
            ActionKind::Raise,
            paid,
            hand.next_action_order(),
            now,
        ));
        if blind.ante > 0 {
            p.commit_ante(blind.ante);
        }
    }

    let mut pot = 0u64;
    for p in players.iter().filter(|p| p.is_active) {
        pot += p.all_bet_sum;
    }
    hand.pot = pot;
    // Neither blind counts as having "acted" for round-completion purposes;
    // their forced post isn't a voluntary decision (spec.md §4.3's preflop
    // big-blind option hinges on this).

    Ok((hand, actions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blinds::blinds_for_level;

    fn three_players(game_id: GameId) -> Vec<Player> {
        vec![
            Player::new(game_id, "a", 1000, 0),
            Player::new(game_id, "b", 1000, 1),
            Player::new(game_id, "c", 1000, 2),
        ]
    }

    #[test]
    fn first_hand_seats_lowest_active_as_dealer() {
        let game_id = GameId::new();
        let mut players = three_players(game_id);
        let blind = blinds_for_level(1).unwrap();
        let (hand, actions) = start_game(game_id, &mut players, &blind, Utc::now()).unwrap();
        assert_eq!(hand.dealer_seat, 0);
        assert_eq!(hand.small_blind_seat, Some(1));
        assert_eq!(hand.big_blind_seat, 2);
        assert_eq!(players[1].amount, 1000 - blind.small_blind_amount);
        assert_eq!(players[2].amount, 1000 - blind.big_blind_amount);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action_order, 1);
        assert_eq!(actions[1].action_order, 2);
    }

    #[test]
    fn small_blind_is_dead_when_seat_busted_last_hand() {
        let game_id = GameId::new();
        let mut players = vec![
            Player::new(game_id, "a", 1000, 0),
            Player::new(game_id, "b", 1000, 1),
            Player::new(game_id, "c", 1000, 2),
            Player::new(game_id, "d", 1000, 3),
        ];
        let prev_hand_id = crate::ids::HandId::new();
        players[1].eliminate(prev_hand_id);
        let blind = blinds_for_level(1).unwrap();
        // previous dealer was seat 3; the button moves to the next
        // active seat, which is 0.
        let (hand, _actions) =
            handle_next_hand(game_id, &mut players, &blind, 3, prev_hand_id, Utc::now()).unwrap();
        // seat 1 would be small blind but busted on the hand that just
        // finished, so it's dead and seat 2 posts big blind directly.
        assert_eq!(hand.dealer_seat, 0);
        assert_eq!(hand.small_blind_seat, None);
        assert_eq!(hand.big_blind_seat, 2);
        assert_eq!(players[2].amount, 1000 - blind.big_blind_amount);
        // the dead seat is untouched
        assert_eq!(players[1].amount, 1000);
    }

    #[test]
    fn small_blind_passes_on_when_busted_seat_is_a_stale_bust() {
        let game_id = GameId::new();
        let mut players = vec![
            Player::new(game_id, "a", 1000, 0),
            Player::new(game_id, "b", 1000, 1),
            Player::new(game_id, "c", 1000, 2),
            Player::new(game_id, "d", 1000, 3),
        ];
        // seat 1 busted several hands ago, not on the hand that just
        // finished.
        players[1].eliminate(crate::ids::HandId::new());
        let prev_hand_id = crate::ids::HandId::new();
        let blind = blinds_for_level(1).unwrap();
        let (hand, _actions) =
            handle_next_hand(game_id, &mut players, &blind, 3, prev_hand_id, Utc::now()).unwrap();
        // seat 1 is stale-busted, not freshly busted: the small blind
        // passes to the next live seat (2) instead of going dead.
        assert_eq!(hand.dealer_seat, 0);
        assert_eq!(hand.small_blind_seat, Some(2));
        assert_eq!(hand.big_blind_seat, 3);
        assert_eq!(players[2].amount, 1000 - blind.small_blind_amount);
        assert_eq!(players[3].amount, 1000 - blind.big_blind_amount);
    }

    #[test]
    fn heads_up_dealer_posts_small_blind() {
        let game_id = GameId::new();
        let mut players = vec![
            Player::new(game_id, "a", 1000, 0),
            Player::new(game_id, "b", 1000, 1),
        ];
        let blind = blinds_for_level(1).unwrap();
        let (hand, _actions) = start_game(game_id, &mut players, &blind, Utc::now()).unwrap();
        assert_eq!(hand.dealer_seat, 0);
        assert_eq!(hand.small_blind_seat, Some(0));
        assert_eq!(hand.big_blind_seat, 1);
    }
}
