//! Trains: owned, markable tile trees anchored on the engine tile.

use serde::{Deserialize, Serialize};

use crate::core::{GameError, PlayerId};
use crate::tiles::{Tile, TileSet, TileTree};

/// Who a train belongs to.
///
/// Orders seats first (by seat index) and the communal train last, which
/// is the canonical order used in snapshots and legal-train lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrainOwner {
    /// A participant's private train.
    Player(PlayerId),
    /// The shared train anyone may extend.
    Communal,
}

impl TrainOwner {
    /// The owning seat, if this is a private train.
    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            TrainOwner::Player(player) => Some(player),
            TrainOwner::Communal => None,
        }
    }
}

impl std::fmt::Display for TrainOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainOwner::Player(player) => write!(f, "{player}"),
            TrainOwner::Communal => write!(f, "Communal"),
        }
    }
}

/// A train of tiles.
///
/// The first tile matches the engine; each later tile matches the tile it
/// hangs from. Until the first tile is placed the engine itself is the
/// train's only end.
///
/// ## Marking
///
/// A marked train may be extended by anyone; an unmarked one only by its
/// owner. The communal train is permanently marked.
#[derive(Clone, Debug)]
pub struct Train {
    owner: TrainOwner,
    engine: Tile,
    tree: TileTree,
    marked: bool,
}

impl Train {
    /// Create an empty, unmarked train for a seat.
    #[must_use]
    pub fn new(player: PlayerId, engine: Tile) -> Self {
        Self {
            owner: TrainOwner::Player(player),
            engine,
            tree: TileTree::new(),
            marked: false,
        }
    }

    /// Create the empty communal train.
    #[must_use]
    pub fn communal(engine: Tile) -> Self {
        Self {
            owner: TrainOwner::Communal,
            engine,
            tree: TileTree::new(),
            marked: true,
        }
    }

    #[must_use]
    pub fn owner(&self) -> TrainOwner {
        self.owner
    }

    #[must_use]
    pub fn engine(&self) -> Tile {
        self.engine
    }

    #[must_use]
    pub fn is_communal(&self) -> bool {
        self.owner == TrainOwner::Communal
    }

    /// Whether any participant may extend this train.
    #[must_use]
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Open the train to every participant.
    pub fn set_marked(&mut self) -> Result<(), GameError> {
        if self.is_communal() {
            return Err(GameError::CommunalMarker);
        }
        self.marked = true;
        Ok(())
    }

    /// Close the train to everyone but its owner.
    pub fn set_unmarked(&mut self) -> Result<(), GameError> {
        if self.is_communal() {
            return Err(GameError::CommunalMarker);
        }
        self.marked = false;
        Ok(())
    }

    /// Whether `player` may extend this train right now.
    #[must_use]
    pub fn is_open_to(&self, player: PlayerId) -> bool {
        self.marked || self.owner == TrainOwner::Player(player)
    }

    /// Whether no tile has been placed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Number of placed tiles (the engine is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Read-only view of the placed tiles.
    #[must_use]
    pub fn tree(&self) -> &TileTree {
        &self.tree
    }

    /// Every current end; the engine alone while the train is empty.
    #[must_use]
    pub fn ends(&self) -> Vec<Tile> {
        if self.is_empty() {
            vec![self.engine]
        } else {
            self.tree.ends()
        }
    }

    /// Ends that could take one of `candidates`.
    ///
    /// On an empty train the engine is returned if no candidates were given
    /// or some candidate shows the engine's face. Otherwise this is the
    /// tree's face filter (see [`TileTree::playable_ends`]).
    #[must_use]
    pub fn playable_ends(&self, candidates: &[Tile]) -> Vec<Tile> {
        match self.tree.playable_ends(candidates) {
            Some(ends) => ends,
            None => {
                let fits_engine = candidates.is_empty()
                    || candidates
                        .iter()
                        .any(|tile| tile.matches(&self.engine) || tile.matches_flipped(&self.engine));
                if fits_engine {
                    vec![self.engine]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Whether some tile in `hand` can actually be attached somewhere.
    ///
    /// Narrows the ends through the face index first, then checks each
    /// candidate end for a real fit.
    #[must_use]
    pub fn accepts_any(&self, hand: &TileSet) -> bool {
        if hand.is_empty() {
            return false;
        }
        let tiles: Vec<Tile> = hand.iter().copied().collect();
        self.playable_ends(&tiles)
            .iter()
            .any(|end| tiles.iter().any(|tile| tile.has_face(end.bottom)))
    }

    /// Attach `tile` at `end`, returning the tile as placed.
    ///
    /// While the train is empty the only valid end is the engine, and the
    /// tile becomes the root. Otherwise this delegates to
    /// [`TileTree::add_to_leaf`].
    pub fn add_to_end(&mut self, end: &Tile, mut tile: Tile) -> Result<Tile, GameError> {
        if !self.is_empty() {
            return self.tree.add_to_leaf(end, tile);
        }
        if *end != self.engine {
            return Err(GameError::InvalidLeaf(*end));
        }
        if !tile.orient_to(&self.engine) {
            return Err(GameError::InvalidMove(format!(
                "{tile} does not match the engine {}",
                self.engine
            )));
        }
        self.tree.plant(tile)?;
        Ok(tile)
    }
}

impl std::fmt::Display for Train {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Train(owner={}, marked={})", self.owner, self.marked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGINE: Tile = Tile::new(6, 6);

    fn seat() -> PlayerId {
        PlayerId::new(0)
    }

    #[test]
    fn test_new_train() {
        let train = Train::new(seat(), ENGINE);

        assert!(train.is_empty());
        assert!(!train.is_marked());
        assert_eq!(train.owner(), TrainOwner::Player(seat()));
        assert_eq!(train.ends(), vec![ENGINE]);
        assert_eq!(train.to_string(), "Train(owner=Player 0, marked=false)");
    }

    #[test]
    fn test_marking() {
        let mut train = Train::new(seat(), ENGINE);

        assert!(train.is_open_to(seat()));
        assert!(!train.is_open_to(PlayerId::new(1)));

        train.set_marked().unwrap();
        assert!(train.is_marked());
        assert!(train.is_open_to(PlayerId::new(1)));

        train.set_unmarked().unwrap();
        assert!(!train.is_marked());
    }

    #[test]
    fn test_communal_is_always_marked() {
        let mut train = Train::communal(ENGINE);

        assert!(train.is_marked());
        assert!(train.is_open_to(PlayerId::new(3)));
        assert_eq!(train.set_marked(), Err(GameError::CommunalMarker));
        assert_eq!(train.set_unmarked(), Err(GameError::CommunalMarker));
        assert!(train.is_marked());
    }

    #[test]
    fn test_empty_train_playable_ends() {
        let train = Train::new(seat(), ENGINE);

        assert_eq!(train.playable_ends(&[]), vec![ENGINE]);
        assert_eq!(train.playable_ends(&[Tile::new(6, 2)]), vec![ENGINE]);
        assert_eq!(train.playable_ends(&[Tile::new(2, 6)]), vec![ENGINE]);
        assert!(train.playable_ends(&[Tile::new(1, 2)]).is_empty());
    }

    #[test]
    fn test_first_tile_becomes_root() {
        let mut train = Train::new(seat(), ENGINE);

        let placed = train.add_to_end(&ENGINE, Tile::new(2, 6)).unwrap();

        assert_eq!((placed.top, placed.bottom), (6, 2));
        assert_eq!(train.len(), 1);
        assert_eq!(train.ends(), vec![Tile::new(6, 2)]);
        assert_eq!(train.playable_ends(&[Tile::new(2, 2)]), vec![Tile::new(6, 2)]);
    }

    #[test]
    fn test_first_tile_must_match_engine() {
        let mut train = Train::new(seat(), ENGINE);

        let err = train.add_to_end(&ENGINE, Tile::new(1, 2)).unwrap_err();
        assert!(matches!(err, GameError::InvalidMove(_)));

        let err = train.add_to_end(&Tile::new(5, 5), Tile::new(5, 6)).unwrap_err();
        assert_eq!(err, GameError::InvalidLeaf(Tile::new(5, 5)));
        assert!(train.is_empty());
    }

    #[test]
    fn test_engine_is_not_an_end_once_started() {
        let mut train = Train::new(seat(), ENGINE);
        train.add_to_end(&ENGINE, Tile::new(6, 2)).unwrap();

        let err = train.add_to_end(&ENGINE, Tile::new(6, 3)).unwrap_err();
        assert_eq!(err, GameError::InvalidLeaf(ENGINE));
    }

    #[test]
    fn test_accepts_any() {
        let mut train = Train::new(seat(), ENGINE);

        assert!(train.accepts_any(&TileSet::from(vec![Tile::new(1, 6)])));
        assert!(!train.accepts_any(&TileSet::from(vec![Tile::new(1, 2)])));
        assert!(!train.accepts_any(&TileSet::new()));

        train.add_to_end(&ENGINE, Tile::new(6, 2)).unwrap();
        assert!(train.accepts_any(&TileSet::from(vec![Tile::new(1, 2)])));
        assert!(!train.accepts_any(&TileSet::from(vec![Tile::new(1, 6)])));
    }

    #[test]
    fn test_owner_ordering() {
        let mut owners = vec![
            TrainOwner::Communal,
            TrainOwner::Player(PlayerId::new(2)),
            TrainOwner::Player(PlayerId::new(0)),
        ];
        owners.sort();

        assert_eq!(
            owners,
            vec![
                TrainOwner::Player(PlayerId::new(0)),
                TrainOwner::Player(PlayerId::new(2)),
                TrainOwner::Communal,
            ]
        );
        assert_eq!(TrainOwner::Communal.player(), None);
    }
}
