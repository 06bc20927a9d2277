use crate::hand::Hand;
use crate::player::Player;

/// Finds the next seat after `from_seat` (exclusive) that can still act,
/// wrapping around the table once. Returns `None` if no live,
/// not-all-in seat exists.
pub fn find_next_actor(players: &[Player], from_seat: u32) -> Option<u32> {
    let n = players.len();
    if n == 0 {
        return None;
    }
    let seats: Vec<u32> = players.iter().map(|p| p.seat).collect();
    let start = seats.iter().position(|&s| s == from_seat).unwrap_or(0);
    for offset in 1..=n {
        let idx = (start + offset) % n;
        let seat = seats[idx];
        if let Some(p) = players.iter().find(|p| p.seat == seat) {
            if p.is_live_not_all_in() {
                return Some(seat);
            }
        }
    }
    None
}

/// How many players remain who could still take a betting action this
/// street. If this drops to one or zero, no further action is possible
/// and remaining streets (if any) run without betting (spec.md §4.3's
/// all-in fast-forward).
pub fn contenders_remaining(players: &[Player]) -> usize {
    players.iter().filter(|p| p.is_live_not_all_in()).count()
}

/// How many players remain in the hand at all (live, folded or not). If
/// this drops to one, the hand is over by fold-walk regardless of street.
pub fn live_players_remaining(players: &[Player]) -> usize {
    players.iter().filter(|p| p.is_live()).count()
}

/// True once every player still able to act this street has matched
/// `hand.current_bet` and has been given the chance to act at least once
/// since the street (or the last raise) began. This single condition also
/// covers the preflop big-blind option: the big blind is a contender like
/// any other, so the street cannot close until it has acted even when its
/// committed amount already matches `current_bet`.
pub fn round_is_complete(hand: &Hand, players: &[Player]) -> bool {
    let contenders: Vec<&Player> = players
        .iter()
        .filter(|p| p.is_live_not_all_in())
        .collect();

    if contenders.is_empty() {
        return true;
    }
    if contenders.len() == 1 && contenders[0].action_amount == hand.current_bet {
        // Every other live player is all-in and this lone contender already
        // matches the street's top bet: no raise could possibly be called,
        // so the street is settled even though they haven't formally acted.
        return true;
    }

    contenders.iter().all(|p| {
        p.action_amount == hand.current_bet && hand.acted_this_street.contains(&p.seat)
    })
}

/// True when the entire hand has no further decisions to make and every
/// remaining street (if any) should be dealt straight through to
/// showdown without stopping for action.
pub fn hand_is_all_in_runout(players: &[Player]) -> bool {
    live_players_remaining(players) > 1 && contenders_remaining(players) <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GameId;
    use crate::player::ActionKind;

    fn table(stacks: &[u64]) -> Vec<Player> {
        let game_id = GameId::new();
        stacks
            .iter()
            .enumerate()
            .map(|(i, &amt)| Player::new(game_id, format!("p{i}"), amt, i as u32))
            .collect()
    }

    #[test]
    fn next_actor_skips_folded_and_all_in() {
        let mut players = table(&[100, 100, 100]);
        players[1].action = Some(ActionKind::Fold);
        players[2].action = Some(ActionKind::AllIn);
        players[2].amount = 0;
        assert_eq!(find_next_actor(&players, 0), Some(0));
    }

    #[test]
    fn round_incomplete_until_big_blind_acts() {
        let mut hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        hand.current_bet = 100;
        let mut players = table(&[1000, 1000, 1000]);
        players[1].action_amount = 50;
        players[1].action = Some(ActionKind::Bet);
        players[2].action_amount = 100;
        // seat 0 (button) calls
        players[0].action_amount = 100;
        players[0].action = Some(ActionKind::Call);
        hand.mark_acted(0);
        hand.mark_acted(1);
        // big blind (seat 2) hasn't acted yet even though already matched
        assert!(!round_is_complete(&hand, &players));
        hand.mark_acted(2);
        assert!(round_is_complete(&hand, &players));
    }

    #[test]
    fn single_contender_closes_round_immediately() {
        let hand = Hand::new(GameId::new(), 1, 0, Some(1), 2);
        let mut players = table(&[1000, 0]);
        players[1].action = Some(ActionKind::AllIn);
        assert!(round_is_complete(&hand, &players));
        assert!(hand_is_all_in_runout(&players));
    }
}
