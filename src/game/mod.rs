//! Rounds, turns and the match controller.

pub mod snapshot;
pub mod round;
pub mod controller;

pub use snapshot::StateSnapshot;
pub use round::{RoundEnd, RoundState};
pub use controller::{Game, RoundSummary, Standing, TurnOutcome};
