//! Participants and their move strategies.
//!
//! `MoveDecider` is the only seam between the engine and whatever chooses
//! moves. The engine ships one bot (`GreedyFirstFit`); anything else,
//! including human input, plugs in as `Strategy::Interactive`.

pub mod strategy;
pub mod participant;

pub use strategy::{GreedyFirstFit, HandView, Move, MoveDecider, Strategy};
pub use participant::Participant;
