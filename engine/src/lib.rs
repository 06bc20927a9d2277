//! # holdem-engine: No-Limit Hold'em tournament betting engine
//!
//! The state machine that advances a hand from preflop to showdown:
//! action validation, pot/chip bookkeeping, blind and dealer rotation,
//! all-in side-pot mechanics, and legal-action computation for the
//! player on turn. Card dealing and hand evaluation are out of scope —
//! showdown winners are supplied by the caller.
//!
//! ## Core Modules
//!
//! - [`ids`] - Newtype identifiers (`GameId`, `PlayerId`, `HandId`, `ActionId`)
//! - [`game`] - Tournament session lifecycle
//! - [`blinds`] - Blind/ante schedule lookup by level
//! - [`player`] - Player seat state, stack bookkeeping, action requests
//! - [`hand`] - Betting state for one dealt hand (pot, street, turn)
//! - [`action_log`] - Append-only record of every action taken
//! - [`rules`] - Action validation and the minimum-raise rule
//! - [`opportunities`] - Legal-action computation for the player on turn
//! - [`capping`] - Uncalled-bet refunds and side-pot construction
//! - [`advancer`] - Turn selection and round-completion detection
//! - [`processor`] - Applies one validated action and drives the advancer
//! - [`lifecycle`] - Seat rotation, blind posting, hand start/next-hand
//! - [`repository`] - The persistence boundary (`Repository`/`Transaction`)
//! - [`memory`] - In-process reference `Repository` implementation
//! - [`engine`] - `TournamentEngine`: the command surface over all of the above
//! - [`snapshot`] - The `{players, hand, opportunities}` view returned by every command
//! - [`errors`] - `DomainError`/`NotFoundError`/`EngineError`
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::engine::TournamentEngine;
//! use holdem_engine::memory::InMemoryRepository;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let repo = Arc::new(InMemoryRepository::new());
//! let engine = TournamentEngine::new(repo);
//! let snapshot = engine
//!     .start_game(60, 10_000, vec!["a".into(), "b".into(), "c".into(), "d".into()])
//!     .await
//!     .unwrap();
//! assert_eq!(snapshot.hand.unwrap().pot, 150);
//! # }
//! ```

pub mod action_log;
pub mod advancer;
pub mod blinds;
pub mod capping;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod ids;
pub mod lifecycle;
pub mod memory;
pub mod opportunities;
pub mod player;
pub mod processor;
pub mod repository;
pub mod rules;
pub mod snapshot;
