//! # train-dominoes
//!
//! An engine for Train Dominoes: participants extend branching trains of
//! matching tiles from a shared engine double, subject to turn legality,
//! forced draws and train marking, over a fixed number of scored rounds.
//!
//! ## Design Principles
//!
//! 1. **Arena Trees**: Trains are index-addressed node arenas with a
//!    face→leaf index, so finding playable ends never walks the tree.
//!
//! 2. **Snapshot Legality**: Whether a turn was legal is decided by diffing
//!    canonical board snapshots, not by re-checking the chosen move.
//!
//! 3. **Deterministic**: One seeded RNG per match drives every draw and the
//!    starting seat. Rounds are cheap to clone for rollback.
//!
//! ## Modules
//!
//! - `core`: Seats, RNG, configuration, errors
//! - `tiles`: Tiles, tile sets and the branching tile tree
//! - `trains`: Owned and communal trains with marking
//! - `players`: The move decision seam and the greedy bot
//! - `game`: Round state, snapshots and the match controller
//!
//! ```
//! use train_dominoes::{Game, MatchConfig};
//!
//! let mut game = Game::with_bots(3, Vec::new(), MatchConfig::default().with_rounds(1)).unwrap();
//! let standings = game.play_match().unwrap();
//! assert_eq!(standings.len(), 3);
//! ```

pub mod core;
pub mod tiles;
pub mod trains;
pub mod players;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    DominoParameters, GameError, GameRng, GameRngState, MatchConfig, PlayerId, PlayerMap,
};

pub use crate::tiles::{NodeId, Tile, TileSet, TileTree};

pub use crate::trains::{Train, TrainOwner};

pub use crate::players::{GreedyFirstFit, HandView, Move, MoveDecider, Participant, Strategy};

pub use crate::game::{
    Game, RoundEnd, RoundState, RoundSummary, Standing, StateSnapshot, TurnOutcome,
};
