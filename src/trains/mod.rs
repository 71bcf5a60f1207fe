//! Trains (chains) of tiles.
//!
//! Every seat owns one train and there is a single communal train. All of
//! them start from the round's engine tile.

pub mod train;

pub use train::{Train, TrainOwner};
