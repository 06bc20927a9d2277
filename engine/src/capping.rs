use crate::ids::PlayerId;
use crate::player::Player;
use serde::{Deserialize, Serialize};

/// A pot (main or side) awarded independently at showdown, along with the
/// players eligible to win it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePot {
    pub amount: u64,
    pub eligible_players: Vec<PlayerId>,
}

/// Refunds any portion of the current street's top bet that no other live
/// player could call — e.g. one player bets 500, everyone else folds or is
/// all-in for 200; the 300 excess never entered the pot and is returned
/// to the bettor's stack before the street is considered settled.
///
/// Returns the refunded amount and to whom, or `None` if no refund is due.
pub fn refund_uncalled_bet(players: &mut [Player]) -> Option<(PlayerId, u64)> {
    let mut live: Vec<&mut Player> = players.iter_mut().filter(|p| !p.has_folded()).collect();
    if live.len() < 2 {
        if let Some(p) = live.into_iter().next() {
            if p.action_amount > 0 {
                let refund = p.action_amount;
                p.action_amount = 0;
                p.amount += refund;
                p.all_bet_sum -= refund;
                return Some((p.id, refund));
            }
        }
        return None;
    }

    live.sort_by(|a, b| b.action_amount.cmp(&a.action_amount));
    let top = live[0].action_amount;
    let second = live[1].action_amount;
    if top > second {
        let refund = top - second;
        let p = &mut live[0];
        p.action_amount -= refund;
        p.amount += refund;
        p.all_bet_sum -= refund;
        return Some((p.id, refund));
    }
    None
}

/// Builds the main pot and any side pots from each player's total
/// commitment this hand (`all_bet_sum`). Standard layered side-pot
/// construction: each distinct all-in level closes one pot, funded by
/// every player who contributed at least that much and open to every
/// player (folded or not) who contributed to that layer, minus players
/// who already folded.
pub fn build_side_pots(players: &[Player]) -> Vec<SidePot> {
    let mut levels: Vec<u64> = players
        .iter()
        .map(|p| p.all_bet_sum)
        .filter(|&a| a > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots = Vec::new();
    let mut floor = 0u64;
    for level in levels {
        let layer = level - floor;
        let contributors: Vec<&Player> = players.iter().filter(|p| p.all_bet_sum >= level).collect();
        if !contributors.is_empty() {
            let amount = layer * contributors.len() as u64;
            let eligible_players = contributors
                .iter()
                .filter(|p| !p.has_folded())
                .map(|p| p.id)
                .collect::<Vec<_>>();
            if amount > 0 {
                pots.push(SidePot {
                    amount,
                    eligible_players,
                });
            }
        }
        floor = level;
    }
    pots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GameId;

    #[test]
    fn uncalled_bet_is_refunded_to_sole_remaining_bettor() {
        let game_id = GameId::new();
        let mut bettor = Player::new(game_id, "a", 800, 0);
        bettor.commit(500);
        let mut folded = Player::new(game_id, "b", 1000, 1);
        folded.action = Some(crate::player::ActionKind::Fold);

        let mut players = vec![bettor, folded];
        let (id, refund) = refund_uncalled_bet(&mut players).unwrap();
        assert_eq!(refund, 500);
        assert_eq!(id, players[0].id);
        assert_eq!(players[0].action_amount, 0);
        assert_eq!(players[0].amount, 800);
    }

    #[test]
    fn no_refund_when_bets_match() {
        let game_id = GameId::new();
        let mut a = Player::new(game_id, "a", 800, 0);
        a.commit(200);
        let mut b = Player::new(game_id, "b", 800, 1);
        b.commit(200);
        let mut players = vec![a, b];
        assert_eq!(refund_uncalled_bet(&mut players), None);
    }

    #[test]
    fn side_pot_built_for_short_all_in() {
        let game_id = GameId::new();
        let mut a = Player::new(game_id, "a", 0, 0);
        a.all_bet_sum = 100;
        let mut b = Player::new(game_id, "b", 0, 1);
        b.all_bet_sum = 300;
        let mut c = Player::new(game_id, "c", 0, 2);
        c.all_bet_sum = 300;
        let players = vec![a, b, c];
        let pots = build_side_pots(&players);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 300); // 100 * 3
        assert_eq!(pots[0].eligible_players.len(), 3);
        assert_eq!(pots[1].amount, 400); // 200 * 2
        assert_eq!(pots[1].eligible_players.len(), 2);
    }
}
