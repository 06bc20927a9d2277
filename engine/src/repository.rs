use crate::action_log::Action;
use crate::errors::{EngineError, NotFoundError};
use crate::game::Game;
use crate::hand::{Hand, Round};
use crate::ids::{GameId, HandId, PlayerId};
use crate::player::{ActionKind, Player};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Persistence boundary for the engine. Implementors own durability;
/// everything above this trait reasons only in terms of the domain
/// types. Consumers hold an `Arc<dyn Repository>`, so the trait must stay
/// object-safe — hence `async-trait` rather than native `async fn in
/// trait`, and `Box<dyn Transaction>` rather than an associated type.
///
/// The aggregate queries from spec.md §4.6 (`sum bet_amount by (hand,
/// player[, round])`, `existence of action types by (hand, round)`,
/// `last action by hand`, `hands by game`) live here rather than on
/// [`Transaction`]: they're read-only, and callers like
/// [`crate::engine::TournamentEngine`]'s snapshot assembly need them
/// outside the lifetime of any single write transaction.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Transaction>, EngineError>;

    async fn get_active_game(&self) -> Result<Option<Game>, EngineError>;
    async fn get_game(&self, id: GameId) -> Result<Game, NotFoundError>;
    async fn get_players(&self, game_id: GameId) -> Result<Vec<Player>, EngineError>;
    async fn get_player(&self, id: PlayerId) -> Result<Player, NotFoundError>;
    async fn get_hand(&self, id: HandId) -> Result<Hand, NotFoundError>;
    async fn get_current_hand(&self, game_id: GameId) -> Result<Option<Hand>, EngineError>;
    async fn get_actions(&self, hand_id: HandId) -> Result<Vec<Action>, EngineError>;

    /// Total chips `player_id` has committed in `hand_id`, optionally
    /// scoped to one `round`; `None` sums across the whole hand.
    async fn sum_bet_amount(
        &self,
        hand_id: HandId,
        player_id: PlayerId,
        round: Option<Round>,
    ) -> Result<u64, EngineError>;

    /// Distinct `ActionKind`s logged for `(hand_id, round)` — the query
    /// spec.md §4.4 names as the source of `roundHasBet`/`roundHasRaise`/
    /// `roundHasAllIn` for the opportunity calculator.
    async fn action_kinds_in_round(
        &self,
        hand_id: HandId,
        round: Round,
    ) -> Result<HashSet<ActionKind>, EngineError>;

    /// The most recently appended action for `hand_id`, or `None` if the
    /// hand has no actions logged yet.
    async fn last_action(&self, hand_id: HandId) -> Result<Option<Action>, EngineError>;

    /// Every hand ever dealt for `game_id`, in the order they were played.
    async fn hands_for_game(&self, game_id: GameId) -> Result<Vec<Hand>, EngineError>;

    /// Returns the mutex that serializes commands against `game_id`
    /// (spec.md §5: "each inbound command ... must serialize against
    /// other commands on the same Game"). The default implementation
    /// hands back a fresh, uncontended mutex every call — correct only
    /// when a caller never issues two commands against the same game
    /// concurrently. A repository backing multiple concurrent callers
    /// (like [`crate::memory::InMemoryRepository`]) must override this to
    /// return the same mutex for the same `game_id` every time.
    async fn lock_for_game(&self, game_id: GameId) -> Arc<Mutex<()>> {
        let _ = game_id;
        Arc::new(Mutex::new(()))
    }
}

/// A unit of work over the repository's mutable state. Every write goes
/// through a `Transaction` so a validation failure partway through a
/// command (e.g. an action that turns out illegal) can be rolled back
/// without leaving partial state visible to another caller.
#[async_trait]
pub trait Transaction: Send {
    async fn put_game(&mut self, game: Game) -> Result<(), EngineError>;
    async fn put_players(&mut self, players: Vec<Player>) -> Result<(), EngineError>;
    async fn put_hand(&mut self, hand: Hand) -> Result<(), EngineError>;
    async fn append_action(&mut self, action: Action) -> Result<(), EngineError>;

    /// Targeted updater: adjusts one player's stack by `delta` (negative
    /// to debit) without rewriting the rest of the row. spec.md §4.6's
    /// "increment player amount" — used where only the stack changes
    /// (e.g. crediting a showdown winner) and a full [`Transaction::put_players`]
    /// would be a wider write than the change warrants.
    async fn increment_player_amount(
        &mut self,
        player_id: PlayerId,
        delta: i64,
    ) -> Result<(), EngineError>;

    /// Targeted updater: clears `action`/`action_amount` for every id in
    /// `player_ids` in one call. spec.md §4.6's "bulk-update non-folded
    /// non-all-in players by game" — used when a street closes and every
    /// live, not-all-in player's per-street state resets together.
    async fn reset_street_state_for_many(
        &mut self,
        player_ids: &[PlayerId],
    ) -> Result<(), EngineError>;

    async fn commit(self: Box<Self>) -> Result<(), EngineError>;
    async fn rollback(self: Box<Self>) -> Result<(), EngineError>;
}
