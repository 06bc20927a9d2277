use crate::ids::{GameId, HandId, PlayerId};
use thiserror::Error;

/// User-facing rule violations. Never mutates state; the transaction that
/// surfaces one of these is always rolled back by the caller.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DomainError {
    #[error("invalid bet amount: {amount}, minimum: {minimum}")]
    InvalidBetAmount { amount: u64, minimum: u64 },
    #[error("insufficient chips for action")]
    InsufficientChips,
    #[error("no hand in progress for game {0}")]
    NoHandInProgress(GameId),
    #[error("hand {0} is already complete")]
    HandAlreadyComplete(HandId),
    #[error("player {0} has already folded")]
    PlayerAlreadyFolded(PlayerId),
    #[error("player {0} is not active")]
    PlayerInactive(PlayerId),
    #[error("it is not player {actual}'s turn (expected {expected})")]
    NotPlayersTurn {
        expected: PlayerId,
        actual: PlayerId,
    },
    #[error("player {player} does not belong to game {game}")]
    PlayerGameMismatch { player: PlayerId, game: GameId },
    #[error("hand {hand} does not belong to game {game}")]
    HandGameMismatch { hand: HandId, game: GameId },
    #[error("check is not legal while a bet is outstanding")]
    CannotCheck,
    #[error("bet is not legal once a bet is already outstanding this street")]
    CannotBet,
    #[error("a game is already active (id {0})")]
    GameAlreadyActive(GameId),
    #[error("no active game")]
    NoActiveGame,
    #[error("action on hand {0} conflicts with a concurrent update — retry")]
    ConflictingTurn(HandId),
    #[error("blind level must be at least 1, got {level}")]
    InvalidLevel { level: u32 },
    #[error("cannot start a hand: {0}")]
    CannotStartHand(String),
    #[error("rebuy is only legal for an eliminated player")]
    NotEligibleForRebuy,
}

/// Referenced id absent. Handled identically to [`DomainError`] by callers.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NotFoundError {
    #[error("game {0} not found")]
    Game(GameId),
    #[error("player {0} not found")]
    Player(PlayerId),
    #[error("hand {0} not found")]
    Hand(HandId),
}

/// Top-level engine error. Every command handler returns `Result<_,
/// EngineError>`; infrastructure failures roll back the transaction and
/// surface as an opaque [`EngineError::Infrastructure`] without ever
/// leaving a half-applied action visible to another caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl EngineError {
    pub fn is_client_fault(&self) -> bool {
        matches!(self, EngineError::Domain(_) | EngineError::NotFound(_))
    }
}
