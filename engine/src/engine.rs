use crate::advancer::find_next_actor;
use crate::blinds::blinds_for_level;
use crate::errors::{DomainError, EngineError, NotFoundError};
use crate::game::Game;
use crate::hand::{Hand, Round};
use crate::ids::{GameId, HandId, PlayerId};
use crate::lifecycle::{handle_next_hand, start_game as lifecycle_start_game};
use crate::opportunities::compute_opportunities;
use crate::player::{ActionKind, Player, PlayerActionRequest};
use crate::processor::apply_action;
use crate::repository::Repository;
use crate::snapshot::Snapshot;
use chrono::Utc;
use std::sync::Arc;

/// Top-level command surface over the betting engine. Every public method
/// here is one unit of work: it acquires the per-game lock, loads state
/// through the [`Repository`], validates and applies the command, writes
/// the result back inside a transaction, and returns the resulting
/// [`Snapshot`]. Nothing outside this module touches a `Repository`
/// directly.
pub struct TournamentEngine {
    repo: Arc<dyn Repository>,
}

impl TournamentEngine {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn start_game(
        &self,
        blind_time_secs: u64,
        starting_chips: u64,
        player_names: Vec<String>,
    ) -> Result<Snapshot, EngineError> {
        if let Some(active) = self.repo.get_active_game().await? {
            return Err(DomainError::GameAlreadyActive(active.id).into());
        }
        if player_names.len() < 2 {
            return Err(
                DomainError::CannotStartHand("at least two players are required".to_string()).into(),
            );
        }

        let now = Utc::now();
        let game = Game::new(blind_time_secs, starting_chips, now);
        let mut players: Vec<Player> = player_names
            .into_iter()
            .enumerate()
            .map(|(seat, name)| Player::new(game.id, name, starting_chips, seat as u32))
            .collect();

        let blind = blinds_for_level(game.level)?;
        let (hand, blind_actions) = lifecycle_start_game(game.id, &mut players, &blind, now)?;
        let hand = self.open_first_round(hand, &players);

        let mut tx = self.repo.begin().await?;
        tx.put_game(game.clone()).await?;
        tx.put_players(players.clone()).await?;
        tx.put_hand(hand.clone()).await?;
        for action in blind_actions {
            tx.append_action(action).await?;
        }
        tx.commit().await?;

        Ok(self.snapshot(game, players, Some(hand)).await?)
    }

    pub async fn end_game(&self, game_id: GameId) -> Result<(), EngineError> {
        let _guard = self.lock(game_id).await;
        let mut game = self.repo.get_game(game_id).await?;
        game.end_time = Some(Utc::now());

        let mut tx = self.repo.begin().await?;
        tx.put_game(game).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn get_active_game(&self) -> Result<Option<Snapshot>, EngineError> {
        let Some(game) = self.repo.get_active_game().await? else {
            return Ok(None);
        };
        let players = self.repo.get_players(game.id).await?;
        let hand = self.repo.get_current_hand(game.id).await?;
        Ok(Some(self.snapshot(game, players, hand).await?))
    }

    pub async fn player_action(
        &self,
        game_id: GameId,
        hand_id: HandId,
        player_id: PlayerId,
        request: PlayerActionRequest,
    ) -> Result<Snapshot, EngineError> {
        let _guard = self.lock(game_id).await;
        let game = self.repo.get_game(game_id).await?;
        let mut hand = self.repo.get_hand(hand_id).await?;
        if hand.game_id != game_id {
            return Err(DomainError::HandGameMismatch { hand: hand_id, game: game_id }.into());
        }
        // The per-game lock already serializes commands, so this should
        // never actually trip; it's a defensive check that the action log
        // hasn't moved since `hand` was loaded (spec.md §5's "each inbound
        // command must serialize against other commands on the same Game").
        if let Some(last) = self.repo.last_action(hand_id).await? {
            if last.action_order != hand.action_count {
                return Err(DomainError::ConflictingTurn(hand_id).into());
            }
        }
        let mut players = self.repo.get_players(game_id).await?;

        let outcome = apply_action(&mut hand, &mut players, player_id, request, Utc::now())?;

        let mut tx = self.repo.begin().await?;
        tx.put_players(players.clone()).await?;
        tx.put_hand(hand.clone()).await?;
        tx.append_action(outcome.action).await?;
        if !outcome.reset_players.is_empty() {
            tx.reset_street_state_for_many(&outcome.reset_players).await?;
        }
        tx.commit().await?;

        let _ = outcome.hand_over_by_fold;
        Ok(self.snapshot(game, players, Some(hand)).await?)
    }

    /// Implements spec.md §4.1's `handle-next-hand`: credit winners, honor
    /// rebuys, bump the blind level, eliminate any seat left at zero, then
    /// rotate and post the next hand. `hand_id` must name the hand the
    /// caller believes just finished — it is not re-derived from the store
    /// so that a stale caller gets a clear error rather than silently
    /// operating on the wrong hand.
    pub async fn next_hand(
        &self,
        game_id: GameId,
        hand_id: HandId,
        winners: Vec<(PlayerId, u64)>,
        new_level: u32,
        rebuy_player_ids: Vec<PlayerId>,
    ) -> Result<Snapshot, EngineError> {
        let _guard = self.lock(game_id).await;
        let mut game = self.repo.get_game(game_id).await?;
        if !game.is_active() {
            return Err(DomainError::NoActiveGame.into());
        }
        let prev_hand = self
            .repo
            .get_current_hand(game_id)
            .await?
            .ok_or(DomainError::NoHandInProgress(game_id))?;
        if prev_hand.id != hand_id {
            return Err(DomainError::HandGameMismatch { hand: hand_id, game: game_id }.into());
        }
        if !prev_hand.is_complete {
            return Err(DomainError::CannotStartHand("current hand is still in progress".to_string()).into());
        }
        // Belt-and-suspenders check that `hand_id` genuinely belongs to
        // this game's history, via spec.md §4.6's "hands by game" query.
        let game_hands = self.repo.hands_for_game(game_id).await?;
        if !game_hands.iter().any(|h| h.id == hand_id) {
            return Err(DomainError::HandGameMismatch { hand: hand_id, game: game_id }.into());
        }

        let mut players = self.repo.get_players(game_id).await?;
        // Credit winners locally (needed for the elimination check and the
        // next hand's blind posting below), but persist the credit through
        // the targeted `increment_player_amount` updater rather than
        // folding it into the full-row `put_players` write — so
        // `winner_deltas` is applied against each player's pre-credit
        // stored amount.
        let mut winner_deltas: Vec<(PlayerId, i64)> = Vec::new();
        for (winner_id, amount) in winners {
            if let Some(p) = players.iter_mut().find(|p| p.id == winner_id) {
                p.credit(amount);
                winner_deltas.push((winner_id, amount as i64));
            }
        }
        for rebuy_id in rebuy_player_ids {
            if let Some(p) = players.iter_mut().find(|p| p.id == rebuy_id) {
                p.rebuy(game.chips);
            }
        }
        settle_eliminations(&mut players, prev_hand.id);

        game.level = new_level.max(1);
        let blind = blinds_for_level(game.level)?;
        let now = Utc::now();
        let (hand, blind_actions) =
            handle_next_hand(game_id, &mut players, &blind, prev_hand.dealer_seat, prev_hand.id, now)?;
        let hand = self.open_first_round(hand, &players);

        let mut pre_credit_players = players.clone();
        for (winner_id, delta) in &winner_deltas {
            if let Some(p) = pre_credit_players.iter_mut().find(|p| p.id == *winner_id) {
                p.amount = p.amount.saturating_sub(*delta as u64);
            }
        }

        let mut tx = self.repo.begin().await?;
        tx.put_game(game.clone()).await?;
        tx.put_players(pre_credit_players).await?;
        tx.put_hand(hand.clone()).await?;
        for (winner_id, delta) in winner_deltas {
            tx.increment_player_amount(winner_id, delta).await?;
        }
        for action in blind_actions {
            tx.append_action(action).await?;
        }
        tx.commit().await?;

        Ok(self.snapshot(game, players, Some(hand)).await?)
    }

    /// Cross-checks the action log against each player's recorded
    /// commitment for `hand_id` (spec.md §4.6's `sum bet_amount` aggregate
    /// against `Player.all_bet_sum`) — every chip committed this hand must
    /// trace back to exactly one logged action. The big blind's forced
    /// ante is the sole exception: it is dead money that never goes
    /// through the action log (see [`crate::player::Player::commit_ante`]),
    /// so it's subtracted out of that seat's expected total before
    /// comparing.
    pub async fn verify_hand_commitments(&self, hand_id: HandId) -> Result<bool, EngineError> {
        let hand = self.repo.get_hand(hand_id).await?;
        let players = self.repo.get_players(hand.game_id).await?;
        for player in players {
            let logged = self.repo.sum_bet_amount(hand_id, player.id, None).await?;
            let ante = if player.seat == hand.big_blind_seat {
                hand.ante
            } else {
                0
            };
            if logged != player.all_bet_sum.saturating_sub(ante) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `hand_id` names the hand in progress at the moment of the rebuy
    /// request (spec.md §6's `{gameId, handId, playerId}`) and is checked
    /// against the stored current hand so a rebuy can't race a hand that
    /// has already moved on; the restored stack size is always the game's
    /// configured starting stack, not a caller-supplied amount.
    pub async fn rebuy(
        &self,
        game_id: GameId,
        hand_id: HandId,
        player_id: PlayerId,
    ) -> Result<Snapshot, EngineError> {
        let _guard = self.lock(game_id).await;
        let game = self.repo.get_game(game_id).await?;
        if let Some(current) = self.repo.get_current_hand(game_id).await? {
            if current.id != hand_id {
                return Err(DomainError::HandGameMismatch { hand: hand_id, game: game_id }.into());
            }
        }
        let mut players = self.repo.get_players(game_id).await?;
        let player = players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(NotFoundError::Player(player_id))?;
        if player.is_active {
            return Err(DomainError::NotEligibleForRebuy.into());
        }
        player.rebuy(game.chips);

        let mut tx = self.repo.begin().await?;
        tx.put_players(players.clone()).await?;
        tx.commit().await?;

        let hand = self.repo.get_current_hand(game_id).await?;
        Ok(self.snapshot(game, players, hand).await?)
    }

    async fn lock(&self, game_id: GameId) -> tokio::sync::OwnedMutexGuard<()> {
        self.repo.lock_for_game(game_id).await.lock_owned().await
    }

    fn open_first_round(&self, mut hand: Hand, players: &[Player]) -> Hand {
        hand.turn_seat = find_next_actor(players, hand.big_blind_seat);
        hand
    }

    async fn snapshot(
        &self,
        game: Game,
        players: Vec<Player>,
        hand: Option<Hand>,
    ) -> Result<Snapshot, EngineError> {
        let hand_actions = match &hand {
            Some(h) => self.repo.get_actions(h.id).await?,
            None => Vec::new(),
        };
        let mut opportunities = None;
        if let Some(h) = hand.as_ref() {
            if !h.is_complete && h.round != Round::Showdown {
                if let Some(seat) = h.turn_seat {
                    if let Some(player) = players.iter().find(|p| p.seat == seat) {
                        let kinds = self.repo.action_kinds_in_round(h.id, h.round).await?;
                        let round_has_raise =
                            kinds.contains(&ActionKind::Raise) || kinds.contains(&ActionKind::ReRaise);
                        opportunities = Some(compute_opportunities(h, player, round_has_raise));
                    }
                }
            }
        }
        Ok(Snapshot {
            game,
            players,
            hand,
            hand_actions,
            opportunities,
        })
    }
}

fn settle_eliminations(players: &mut [Player], hand_id: HandId) {
    for p in players.iter_mut() {
        if p.is_active && p.amount == 0 {
            p.eliminate(hand_id);
        }
    }
}
