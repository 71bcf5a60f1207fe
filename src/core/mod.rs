//! Core engine types: seats, RNG, configuration, errors.
//!
//! These are the building blocks shared by the tile structures and the
//! game controller.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::{
    DominoParameters, MatchConfig, DOUBLE_BLANK_BONUS, MAX_PLAYERS, MAX_ROUNDS, MIN_PLAYERS,
    SIDE_MIN,
};
pub use error::GameError;
