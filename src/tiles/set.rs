//! Unordered collections of unique tiles: draw piles and hands.
//!
//! A `TileSet` is keyed by the orientation-free face pair, so two tiles
//! with the same faces can never coexist. Backed by `im::OrdMap` so round
//! checkpoints clone in O(1) and iteration order is deterministic.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::tile::Tile;
use crate::core::{GameError, GameRng, SIDE_MIN};

/// A set of unique tiles.
///
/// Created full (see [`TileSet::complete`]) and shrinks by drawing; hands
/// are created empty and grow by adding drawn tiles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct TileSet {
    tiles: OrdMap<(u8, u8), Tile>,
}

impl TileSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every unordered pair `(i, j)` with `SIDE_MIN <= i <= j <= max_face`.
    ///
    /// ```
    /// use train_dominoes::tiles::TileSet;
    ///
    /// assert_eq!(TileSet::complete(6).len(), 28);
    /// assert_eq!(TileSet::complete(12).len(), 91);
    /// ```
    #[must_use]
    pub fn complete(max_face: u8) -> Self {
        (SIDE_MIN..=max_face)
            .flat_map(|i| (i..=max_face).map(move |j| Tile::new(i, j)))
            .collect()
    }

    /// Number of tiles in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether the set holds a tile with the same faces as `tile`.
    #[must_use]
    pub fn contains(&self, tile: &Tile) -> bool {
        self.tiles.contains_key(&tile.key())
    }

    /// Add a tile. Returns `false` (and keeps the existing tile) if one with
    /// the same faces is already present.
    pub fn add(&mut self, tile: Tile) -> bool {
        if self.contains(&tile) {
            return false;
        }
        self.tiles.insert(tile.key(), tile);
        true
    }

    /// Remove and return a uniformly random tile.
    pub fn draw_random(&mut self, rng: &mut GameRng) -> Result<Tile, GameError> {
        if self.tiles.is_empty() {
            return Err(GameError::EmptyCollection);
        }
        let index = rng.gen_range_usize(0..self.tiles.len());
        let key = self
            .tiles
            .keys()
            .nth(index)
            .copied()
            .ok_or(GameError::EmptyCollection)?;
        self.tiles.remove(&key).ok_or(GameError::EmptyCollection)
    }

    /// Remove and return the tile with the same faces as `tile`.
    ///
    /// The returned tile keeps the orientation it had inside the set.
    pub fn draw(&mut self, tile: &Tile) -> Result<Tile, GameError> {
        self.tiles
            .remove(&tile.key())
            .ok_or(GameError::NotFound(*tile))
    }

    /// Find every tile that can sit below `target`, orienting each in place.
    ///
    /// This is a query with a side effect: any tile that would match once
    /// flipped is flipped inside the set first. The returned copies (and
    /// the stored tiles) have `top == target.bottom`, ready to attach.
    pub fn find_and_orient(&mut self, target: &Tile) -> Vec<Tile> {
        let keys: Vec<(u8, u8)> = self
            .tiles
            .values()
            .filter(|tile| tile.has_face(target.bottom))
            .map(Tile::key)
            .collect();

        let mut matching = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(tile) = self.tiles.get_mut(&key) {
                if tile.orient_to(target) {
                    matching.push(*tile);
                }
            }
        }
        matching
    }

    /// Iterate over the tiles in face-pair order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// The tiles in canonical order (highest value first).
    #[must_use]
    pub fn sorted(&self) -> Vec<Tile> {
        let mut tiles: Vec<Tile> = self.tiles.values().copied().collect();
        tiles.sort();
        tiles
    }

    /// Sum of the point values of every tile in the set.
    #[must_use]
    pub fn total_value(&self) -> u32 {
        self.tiles.values().map(Tile::value).sum()
    }

    /// Empty the set, returning the summed point value of what it held.
    pub fn drain_value(&mut self) -> u32 {
        let total = self.total_value();
        self.tiles.clear();
        total
    }
}

impl FromIterator<Tile> for TileSet {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut set = TileSet::new();
        for tile in iter {
            set.add(tile);
        }
        set
    }
}

impl From<Vec<Tile>> for TileSet {
    fn from(tiles: Vec<Tile>) -> Self {
        tiles.into_iter().collect()
    }
}

impl From<TileSet> for Vec<Tile> {
    fn from(set: TileSet) -> Self {
        set.tiles.values().copied().collect()
    }
}
