//! Match configuration.
//!
//! - `DominoParameters`: tile range and hand size, derived from seat count
//! - `MatchConfig`: round limit and RNG seed, built once per match
//!
//! The tile range is never configured directly; it always follows the
//! seat-count step table so every match plays a standard double-N set.

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Lowest face value of any tile.
pub const SIDE_MIN: u8 = 0;

/// Number of rounds in a match.
pub const MAX_ROUNDS: u32 = 10;

/// Points scored by the double-blank tile instead of its face sum.
pub const DOUBLE_BLANK_BONUS: u32 = 50;

/// Fewest and most seats a match supports.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 14;

/// Tile set and dealing parameters for a given seat count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominoParameters {
    /// Highest face value in the set (the set is double-`max_face`).
    pub max_face: u8,

    /// Tiles dealt to each seat at the start of a round.
    pub hand_size: usize,
}

impl DominoParameters {
    /// Look up the set size and hand size for `player_count` seats.
    ///
    /// ```
    /// use train_dominoes::core::DominoParameters;
    ///
    /// let params = DominoParameters::for_player_count(4).unwrap();
    /// assert_eq!((params.max_face, params.hand_size), (12, 12));
    /// assert!(DominoParameters::for_player_count(15).is_err());
    /// ```
    pub fn for_player_count(player_count: usize) -> Result<Self, GameError> {
        let (max_face, hand_size) = match player_count {
            0..=1 => {
                return Err(GameError::Configuration(format!(
                    "cannot play Train Dominoes with fewer than {MIN_PLAYERS} players (got {player_count})"
                )))
            }
            2..=3 => (9, 8),
            4..=6 => (12, 12),
            7..=8 => (12, 10),
            9..=12 => (15, 11),
            13..=14 => (18, 11),
            _ => {
                return Err(GameError::Configuration(format!(
                    "cannot play Train Dominoes with more than {MAX_PLAYERS} players (got {player_count})"
                )))
            }
        };

        Ok(Self { max_face, hand_size })
    }

    /// Number of distinct tiles in the complete set: `(M+1)(M+2)/2`.
    #[must_use]
    pub fn set_size(&self) -> usize {
        let faces = usize::from(self.max_face - SIDE_MIN) + 1;
        faces * (faces + 1) / 2
    }
}

/// Configuration consumed once when a match is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of rounds before the match is over.
    pub rounds: u32,

    /// Seed for the match's single random source.
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds: MAX_ROUNDS,
            seed: 0,
        }
    }
}

impl MatchConfig {
    /// Create a config with the standard round limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rounds.
    #[must_use]
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject configurations that could never produce a finished match.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rounds == 0 {
            return Err(GameError::Configuration(
                "a match needs at least one round".to_string(),
            ));
        }
        Ok(())
    }
}
