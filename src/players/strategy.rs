//! Move decision strategies.
//!
//! The controller asks a participant for a move through `MoveDecider`,
//! handing over a restricted view of the hand and the trains the
//! participant may currently extend. Strategies are a closed set of
//! variants (`Strategy`) chosen when the participant is seated:
//! - `Greedy`: the built-in bot, plays the first fit it finds
//! - `Interactive`: any external decider, e.g. a terminal prompt

use crate::tiles::{Tile, TileSet};
use crate::trains::{Train, TrainOwner};

// =============================================================================
// Decision seam
// =============================================================================

/// A placement: put `tile` from the hand onto `end` of `train`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub tile: Tile,
    pub train: TrainOwner,
    pub end: Tile,
}

impl Move {
    #[must_use]
    pub fn new(tile: Tile, train: TrainOwner, end: Tile) -> Self {
        Self { tile, train, end }
    }
}

/// A participant's hand as seen by a strategy.
///
/// Strategies may inspect the hand and reorient tiles, but cannot add or
/// remove them; the controller draws the chosen tile itself.
pub struct HandView<'a> {
    hand: &'a mut TileSet,
}

impl<'a> HandView<'a> {
    pub(crate) fn new(hand: &'a mut TileSet) -> Self {
        Self { hand }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hand.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hand.is_empty()
    }

    #[must_use]
    pub fn contains(&self, tile: &Tile) -> bool {
        self.hand.contains(tile)
    }

    /// The tiles in the hand, highest value first.
    #[must_use]
    pub fn tiles(&self) -> Vec<Tile> {
        self.hand.sorted()
    }

    /// Hand tiles that fit below `end`, reoriented in place to fit.
    ///
    /// See [`TileSet::find_and_orient`].
    pub fn find_and_orient(&mut self, end: &Tile) -> Vec<Tile> {
        self.hand.find_and_orient(end)
    }
}

/// Decides what a participant plays on their turn.
pub trait MoveDecider {
    /// Choose a move, or `None` to decline.
    ///
    /// `legal_trains` always contains the participant's own train and the
    /// communal train, plus every other marked train. Declining while a
    /// legal move exists is an illegal turn.
    fn decide_move(&mut self, hand: &mut HandView<'_>, legal_trains: &[&Train]) -> Option<Move>;
}

// =============================================================================
// Built-in bot
// =============================================================================

/// Greedy first-fit bot.
///
/// Walks the legal trains in order and, on each, the ends that share a face
/// with the hand; plays the first hand tile that fits.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyFirstFit;

impl MoveDecider for GreedyFirstFit {
    fn decide_move(&mut self, hand: &mut HandView<'_>, legal_trains: &[&Train]) -> Option<Move> {
        let tiles = hand.tiles();

        for train in legal_trains {
            for end in train.playable_ends(&tiles) {
                if let Some(tile) = hand.find_and_orient(&end).first() {
                    return Some(Move::new(*tile, train.owner(), end));
                }
            }
        }
        None
    }
}

// =============================================================================
// Strategy variants
// =============================================================================

/// The strategy a participant was seated with.
pub enum Strategy {
    /// Built-in greedy bot.
    Greedy(GreedyFirstFit),
    /// Externally driven decisions (human input, scripted play).
    Interactive(Box<dyn MoveDecider>),
}

impl Strategy {
    /// Whether decisions come from outside the engine.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self, Strategy::Interactive(_))
    }
}

impl MoveDecider for Strategy {
    fn decide_move(&mut self, hand: &mut HandView<'_>, legal_trains: &[&Train]) -> Option<Move> {
        match self {
            Strategy::Greedy(bot) => bot.decide_move(hand, legal_trains),
            Strategy::Interactive(decider) => decider.decide_move(hand, legal_trains),
        }
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Greedy(_) => write!(f, "Greedy"),
            Strategy::Interactive(_) => write!(f, "Interactive"),
        }
    }
}
