use crate::capping::SidePot;
use crate::ids::{GameId, HandId, PlayerId};
use serde::{Deserialize, Serialize};

/// Betting street. Advances strictly in this order; `Showdown` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Round {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Round {
    /// The round that follows this one, or `None` if this is `Showdown`.
    pub fn next(self) -> Option<Round> {
        match self {
            Round::Preflop => Some(Round::Flop),
            Round::Flop => Some(Round::Turn),
            Round::Turn => Some(Round::River),
            Round::River => Some(Round::Showdown),
            Round::Showdown => None,
        }
    }
}

/// A single dealt hand within a game. Card dealing and hand evaluation
/// happen outside this crate; a `Hand` only tracks the betting state
/// (pot, street, whose turn, how much is required to continue) and is
/// closed out by supplying winners from the outside once showdown is
/// reached or the field folds to one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub id: HandId,
    pub game_id: GameId,
    pub level: u32,
    pub round: Round,
    /// Seat holding the dealer button this hand.
    pub dealer_seat: u32,
    /// `None` when the small blind is dead this hand (its seat busted on
    /// the previous hand) — spec.md §3's `small_blind?`.
    pub small_blind_seat: Option<u32>,
    pub big_blind_seat: u32,
    /// Blind/ante amounts in force for this hand (spec.md §3's
    /// `small_blind_amount`/`big_blind_amount`/`ante`), snapshotted at deal
    /// time so a mid-hand level bump never changes the rules of a hand
    /// already in progress. `big_blind_amount` also floors the minimum
    /// opening bet on every street (spec.md §4.4's `betMinAmount`).
    pub small_blind_amount: u64,
    pub big_blind_amount: u64,
    pub ante: u64,
    /// Total chips committed by all players so far this hand.
    pub pot: u64,
    /// The amount a player must match to continue in the current street
    /// (the highest `action_amount` among live players).
    pub current_bet: u64,
    /// Size of the last bet/raise this street, used to enforce the
    /// minimum-raise rule on the next raise.
    pub last_raise_amount: u64,
    /// Seat to act next, or `None` once the street/hand has no further
    /// legal actors.
    pub turn_seat: Option<u32>,
    /// True once a player has acted after a bet reopened the action on this
    /// street, used to decide whether a later all-in-for-less reopens it
    /// again (it does not, per the resolved Open Question).
    pub acted_this_street: Vec<u32>,
    pub is_complete: bool,
    /// Populated once the hand is resolved, by whoever evaluated the
    /// showdown (or determined a walk by fold). `(player id, amount won)`.
    pub winners: Vec<(PlayerId, u64)>,
    /// Main pot and any side pots, built from each player's total
    /// commitment once the hand reaches showdown or an all-in runout
    /// (spec.md §4.5). Empty until then, and for a walk-by-fold with a
    /// single pot eligible to everyone who didn't fold.
    pub side_pots: Vec<SidePot>,
    /// Count of actions recorded so far this hand; the source of
    /// `Action::action_order`/`Action::betting_round` (spec.md §4.2).
    pub action_count: u64,
}

impl Hand {
    pub fn new(
        game_id: GameId,
        level: u32,
        dealer_seat: u32,
        small_blind_seat: Option<u32>,
        big_blind_seat: u32,
    ) -> Self {
        Self {
            id: HandId::new(),
            game_id,
            level,
            round: Round::Preflop,
            dealer_seat,
            small_blind_seat,
            big_blind_seat,
            small_blind_amount: 0,
            big_blind_amount: 0,
            ante: 0,
            pot: 0,
            current_bet: 0,
            last_raise_amount: 0,
            turn_seat: None,
            acted_this_street: Vec::new(),
            is_complete: false,
            winners: Vec::new(),
            side_pots: Vec::new(),
            action_count: 0,
        }
    }

    /// Hands out the next `action_order`/`betting_round` value, starting
    /// at 1 (spec.md §4.2: "both 1 when no prior action").
    pub fn next_action_order(&mut self) -> u64 {
        self.action_count += 1;
        self.action_count
    }

    pub fn mark_acted(&mut self, seat: u32) {
        if !self.acted_this_street.contains(&seat) {
            self.acted_this_street.push(seat);
        }
    }

    /// Reset per-street bookkeeping when moving to the next `Round`.
    pub fn advance_round(&mut self, round: Round) {
        self.round = round;
        self.current_bet = 0;
        self.last_raise_amount = 0;
        self.acted_this_street.clear();
    }

    pub fn complete(&mut self, winners: Vec<(PlayerId, u64)>) {
        self.winners = winners;
        self.is_complete = true;
        self.turn_seat = None;
    }
}
