use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

/// Static blind/ante table for one level, looked up by level number rather
/// than a foreign key (spec: "Lookup is by level, not foreign key").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameBlind {
    pub level: u32,
    pub small_blind_amount: u64,
    pub big_blind_amount: u64,
    pub ante: u64,
}

/// Returns the blind/ante structure for a given tournament level.
///
/// Levels 1-20 use a predefined progressive schedule; level 21+ is treated
/// as level 20 (the schedule's final, maximum level). Level 0 is invalid.
///
/// # Examples
///
/// ```
/// use holdem_engine::blinds::blinds_for_level;
///
/// let lvl1 = blinds_for_level(1).unwrap();
/// assert_eq!((lvl1.small_blind_amount, lvl1.big_blind_amount), (50, 100));
///
/// let lvl20 = blinds_for_level(20).unwrap();
/// assert_eq!((lvl20.small_blind_amount, lvl20.big_blind_amount), (4000, 8000));
///
/// // levels beyond the schedule saturate at the level-20 blinds
/// assert_eq!(blinds_for_level(99).unwrap().big_blind_amount, 8000);
///
/// assert!(blinds_for_level(0).is_err());
/// ```
pub fn blinds_for_level(level: u32) -> Result<GameBlind, DomainError> {
    if level == 0 {
        return Err(DomainError::InvalidLevel { level });
    }
    let (sb, bb, ante) = match level.min(20) {
        1 => (50, 100, 0),
        2 => (75, 150, 0),
        3 => (100, 200, 25),
        4 => (125, 250, 25),
        5 => (150, 300, 25),
        6 => (200, 400, 50),
        7 => (250, 500, 50),
        8 => (300, 600, 75),
        9 => (400, 800, 75),
        10 => (500, 1000, 100),
        11 => (600, 1200, 100),
        12 => (800, 1600, 200),
        13 => (1000, 2000, 200),
        14 => (1200, 2400, 300),
        15 => (1500, 3000, 300),
        16 => (2000, 4000, 400),
        17 => (2500, 5000, 500),
        18 => (3000, 6000, 500),
        19 => (3500, 7000, 700),
        _ => (4000, 8000, 800),
    };
    Ok(GameBlind {
        level,
        small_blind_amount: sb,
        big_blind_amount: bb,
        ante,
    })
}
