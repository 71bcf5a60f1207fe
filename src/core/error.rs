//! Error taxonomy for the engine.
//!
//! Every error is fatal to the operation that raised it; nothing is retried
//! internally. Errors raised while realizing a participant's move are
//! wrapped in `GameError::IllegalTurn` together with the pre-move snapshot
//! so the controller can roll the turn back.

use thiserror::Error;

use super::player::PlayerId;
use crate::game::StateSnapshot;
use crate::tiles::Tile;

/// Errors produced by tiles, trains and the game controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("cannot draw from an empty tile set")]
    EmptyCollection,

    #[error("{0} is not in the tile set")]
    NotFound(Tile),

    #[error("{0} is not an open end")]
    InvalidLeaf(Tile),

    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("the communal train is always marked")]
    CommunalMarker,

    #[error("no round is in progress")]
    NoActiveRound,

    #[error("a round is already in progress")]
    RoundInProgress,

    #[error("the round is over and has not been scored")]
    RoundOver,

    #[error("the match is already complete")]
    MatchComplete,

    #[error("no aborted turn to roll back")]
    NoCheckpoint,

    #[error("{player} made an illegal turn: {cause}")]
    IllegalTurn {
        player: PlayerId,
        cause: Box<GameError>,
        snapshot: Box<StateSnapshot>,
    },
}

impl GameError {
    /// The pre-move snapshot carried by an illegal turn, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&StateSnapshot> {
        match self {
            GameError::IllegalTurn { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    /// Unwrap an illegal turn down to the violation that caused it.
    #[must_use]
    pub fn root_cause(&self) -> &GameError {
        match self {
            GameError::IllegalTurn { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}
