use crate::action_log::Action;
use crate::errors::{EngineError, NotFoundError};
use crate::game::Game;
use crate::hand::{Hand, Round};
use crate::ids::{GameId, HandId, PlayerId};
use crate::player::{ActionKind, Player};
use crate::repository::{Repository, Transaction};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Default)]
struct Store {
    games: HashMap<GameId, Game>,
    active_game: Option<GameId>,
    players: HashMap<PlayerId, Player>,
    hands: HashMap<HandId, Hand>,
    current_hand: HashMap<GameId, HandId>,
    hands_by_game: HashMap<GameId, Vec<HandId>>,
    actions: HashMap<HandId, Vec<Action>>,
}

/// Reference [`Repository`] implementation backed by in-process maps.
/// Every game gets its own [`tokio::sync::Mutex`] so commands against
/// different games run fully concurrently while commands against the
/// same game serialize, mirroring a per-session lock keyed by id rather
/// than one lock guarding the whole store.
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
    game_locks: Arc<RwLock<HashMap<GameId, Arc<Mutex<()>>>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            game_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the per-game command lock, creating it on first use.
    pub async fn lock_for_game(&self, game_id: GameId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.game_locks.read().await.get(&game_id) {
            return lock.clone();
        }
        let mut locks = self.game_locks.write().await;
        locks
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn begin(&self) -> Result<Box<dyn Transaction>, EngineError> {
        Ok(Box::new(InMemoryTransaction {
            store: self.store.clone(),
            staged_game: None,
            staged_players: None,
            staged_hand: None,
            staged_actions: Vec::new(),
            staged_amount_deltas: Vec::new(),
            staged_street_resets: Vec::new(),
        }))
    }

    async fn get_active_game(&self) -> Result<Option<Game>, EngineError> {
        let store = self.store.read().await;
        Ok(store.active_game.and_then(|id| store.games.get(&id).cloned()))
    }

    async fn get_game(&self, id: GameId) -> Result<Game, NotFoundError> {
        let store = self.store.read().await;
        store.games.get(&id).cloned().ok_or(NotFoundError::Game(id))
    }

    async fn get_players(&self, game_id: GameId) -> Result<Vec<Player>, EngineError> {
        let store = self.store.read().await;
        let mut players: Vec<Player> = store
            .players
            .values()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect();
        players.sort_by_key(|p| p.seat);
        Ok(players)
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, NotFoundError> {
        let store = self.store.read().await;
        store.players.get(&id).cloned().ok_or(NotFoundError::Player(id))
    }

    async fn get_hand(&self, id: HandId) -> Result<Hand, NotFoundError> {
        let store = self.store.read().await;
        store.hands.get(&id).cloned().ok_or(NotFoundError::Hand(id))
    }

    async fn get_current_hand(&self, game_id: GameId) -> Result<Option<Hand>, EngineError> {
        let store = self.store.read().await;
        Ok(store
            .current_hand
            .get(&game_id)
            .and_then(|id| store.hands.get(id).cloned()))
    }

    async fn get_actions(&self, hand_id: HandId) -> Result<Vec<Action>, EngineError> {
        let store = self.store.read().await;
        Ok(store.actions.get(&hand_id).cloned().unwrap_or_default())
    }

    async fn sum_bet_amount(
        &self,
        hand_id: HandId,
        player_id: PlayerId,
        round: Option<Round>,
    ) -> Result<u64, EngineError> {
        let store = self.store.read().await;
        let sum = store
            .actions
            .get(&hand_id)
            .map(|actions| {
                actions
                    .iter()
                    .filter(|a| a.player_id == player_id && round.map_or(true, |r| a.round == r))
                    .map(|a| a.amount)
                    .sum()
            })
            .unwrap_or(0);
        Ok(sum)
    }

    async fn action_kinds_in_round(
        &self,
        hand_id: HandId,
        round: Round,
    ) -> Result<HashSet<ActionKind>, EngineError> {
        let store = self.store.read().await;
        Ok(store
            .actions
            .get(&hand_id)
            .map(|actions| {
                actions
                    .iter()
                    .filter(|a| a.round == round)
                    .map(|a| a.action)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn last_action(&self, hand_id: HandId) -> Result<Option<Action>, EngineError> {
        let store = self.store.read().await;
        Ok(store
            .actions
            .get(&hand_id)
            .and_then(|actions| actions.iter().max_by_key(|a| a.action_order).cloned()))
    }

    async fn hands_for_game(&self, game_id: GameId) -> Result<Vec<Hand>, EngineError> {
        let store = self.store.read().await;
        Ok(store
            .hands_by_game
            .get(&game_id)
            .map(|ids| ids.iter().filter_map(|id| store.hands.get(id).cloned()).collect())
            .unwrap_or_default())
    }

    async fn lock_for_game(&self, game_id: GameId) -> Arc<Mutex<()>> {
        self.lock_for_game(game_id).await
    }
}

struct InMemoryTransaction {
    store: Arc<RwLock<Store>>,
    staged_game: Option<Game>,
    staged_players: Option<Vec<Player>>,
    staged_hand: Option<Hand>,
    staged_actions: Vec<Action>,
    staged_amount_deltas: Vec<(PlayerId, i64)>,
    staged_street_resets: Vec<PlayerId>,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn put_game(&mut self, game: Game) -> Result<(), EngineError> {
        self.staged_game = Some(game);
        Ok(())
    }

    async fn put_players(&mut self, players: Vec<Player>) -> Result<(), EngineError> {
        self.staged_players = Some(players);
        Ok(())
    }

    async fn put_hand(&mut self, hand: Hand) -> Result<(), EngineError> {
        self.staged_hand = Some(hand);
        Ok(())
    }

    async fn append_action(&mut self, action: Action) -> Result<(), EngineError> {
        self.staged_actions.push(action);
        Ok(())
    }

    async fn increment_player_amount(
        &mut self,
        player_id: PlayerId,
        delta: i64,
    ) -> Result<(), EngineError> {
        self.staged_amount_deltas.push((player_id, delta));
        Ok(())
    }

    async fn reset_street_state_for_many(
        &mut self,
        player_ids: &[PlayerId],
    ) -> Result<(), EngineError> {
        self.staged_street_resets.extend_from_slice(player_ids);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), EngineError> {
        let mut store = self.store.write().await;
        if let Some(game) = self.staged_game {
            if game.is_active() {
                store.active_game = Some(game.id);
            } else if store.active_game == Some(game.id) {
                store.active_game = None;
            }
            store.games.insert(game.id, game);
        }
        if let Some(players) = self.staged_players {
            for player in players {
                store.players.insert(player.id, player);
            }
        }
        if let Some(hand) = self.staged_hand {
            let game_hands = store.hands_by_game.entry(hand.game_id).or_default();
            if !game_hands.contains(&hand.id) {
                game_hands.push(hand.id);
            }
            store.current_hand.insert(hand.game_id, hand.id);
            store.hands.insert(hand.id, hand);
        }
        for action in self.staged_actions {
            store.actions.entry(action.hand_id).or_default().push(action);
        }
        for (player_id, delta) in self.staged_amount_deltas {
            if let Some(player) = store.players.get_mut(&player_id) {
                player.amount = if delta >= 0 {
                    player.amount.saturating_add(delta as u64)
                } else {
                    player.amount.saturating_sub(delta.unsigned_abs())
                };
            }
        }
        for player_id in self.staged_street_resets {
            if let Some(player) = store.players.get_mut(&player_id) {
                player.action = None;
                player.action_amount = 0;
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), EngineError> {
        Ok(())
    }
}
