//! A single domino tile.
//!
//! Tiles are oriented vertically: to "match", the top of the lower tile
//! must equal the bottom of the tile above it. Orientation is transient
//! state used while attaching; identity is the unordered face pair.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::core::DOUBLE_BLANK_BONUS;

/// An unordered pair of face values with a current orientation.
///
/// Equality, hashing and ordering ignore orientation:
///
/// ```
/// use train_dominoes::tiles::Tile;
///
/// let tile = Tile::new(6, 2);
/// assert_eq!(tile, tile.flipped());
/// assert_eq!(tile.top, 6);
/// assert_eq!(tile.flipped().top, 2);
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Tile {
    /// Face currently pointing towards the parent end.
    pub top: u8,
    /// Face currently exposed for the next tile.
    pub bottom: u8,
}

impl Tile {
    /// Create a tile oriented with `top` up.
    #[must_use]
    pub const fn new(top: u8, bottom: u8) -> Self {
        Self { top, bottom }
    }

    /// The face pair as `(low, high)`, independent of orientation.
    #[inline]
    #[must_use]
    pub fn key(&self) -> (u8, u8) {
        if self.top <= self.bottom {
            (self.top, self.bottom)
        } else {
            (self.bottom, self.top)
        }
    }

    /// Point value: the face sum, except the double-blank.
    #[must_use]
    pub fn value(&self) -> u32 {
        if self.top == 0 && self.bottom == 0 {
            DOUBLE_BLANK_BONUS
        } else {
            u32::from(self.top) + u32::from(self.bottom)
        }
    }

    /// Whether both faces are equal. Doubles may fork in a train.
    #[inline]
    #[must_use]
    pub fn is_double(&self) -> bool {
        self.top == self.bottom
    }

    /// Whether either face shows `face`.
    #[inline]
    #[must_use]
    pub fn has_face(&self, face: u8) -> bool {
        self.top == face || self.bottom == face
    }

    /// Rotate the tile 180 degrees in place.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.top, &mut self.bottom);
    }

    /// A rotated copy of this tile.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self::new(self.bottom, self.top)
    }

    /// True if this tile's top meets `above`'s bottom.
    #[inline]
    #[must_use]
    pub fn matches(&self, above: &Tile) -> bool {
        self.top == above.bottom
    }

    /// True if this tile would meet `above`'s bottom once flipped.
    #[inline]
    #[must_use]
    pub fn matches_flipped(&self, above: &Tile) -> bool {
        self.bottom == above.bottom
    }

    /// Flip if needed so `matches(above)` holds. Returns whether it does.
    pub fn orient_to(&mut self, above: &Tile) -> bool {
        if !self.matches(above) && self.matches_flipped(above) {
            self.flip();
        }
        self.matches(above)
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for Tile {
    /// Higher point values sort first; equal values fall back to the face pair.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .value()
            .cmp(&self.value())
            .then_with(|| self.key().cmp(&other.key()))
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({}, {})", self.top, self.bottom)
    }
}
