//! Arena-based branching tree of placed tiles.
//!
//! Nodes live in a flat `im::Vector` and reference each other by `NodeId`
//! index, which keeps the structure acyclic for the borrow checker and
//! cheap to clone for checkpoints.
//!
//! ## Branching
//!
//! A double may carry two children; every other tile carries at most one.
//! A node is an *end* (leaf) while it still has a free child slot.
//!
//! ## End index
//!
//! `ends_by_face` maps the exposed bottom face of every end to the nodes
//! exposing it, so finding attachment points for a hand is a lookup per
//! face instead of a walk over the whole tree. It is updated in the same
//! call that mutates the tree and is never rebuilt.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::tile::Tile;
use crate::core::GameError;

/// Index into the `TileTree` node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A placed tile and the tiles attached below it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    /// The tile, oriented so its top meets the parent's bottom.
    pub tile: Tile,

    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,

    /// Attached children in placement order.
    pub children: SmallVec<[NodeId; 2]>,
}

impl TreeNode {
    fn new(tile: Tile, parent: Option<NodeId>) -> Self {
        Self {
            tile,
            parent,
            children: SmallVec::new(),
        }
    }

    /// Maximum number of children: two for doubles, one otherwise.
    #[must_use]
    pub fn capacity(&self) -> usize {
        if self.tile.is_double() {
            2
        } else {
            1
        }
    }

    /// Child slots still free.
    #[must_use]
    pub fn open_slots(&self) -> usize {
        self.capacity().saturating_sub(self.children.len())
    }

    /// Whether this node has its maximal number of children.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.open_slots() == 0
    }
}

/// A directed tree of tiles where every tile matches its parent.
#[derive(Clone, Debug, Default)]
pub struct TileTree {
    nodes: Vector<TreeNode>,
    root: Option<NodeId>,

    /// Every end, keyed by its (orientation-free) tile.
    ends: FxHashMap<Tile, NodeId>,

    /// Exposed bottom face -> ends exposing it.
    ends_by_face: FxHashMap<u8, SmallVec<[NodeId; 4]>>,

    /// Every placed tile, ends and interior nodes alike.
    placed: FxHashSet<Tile>,
}

impl TileTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no tile has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of placed tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The root node ID, if a tile has been placed.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Get a node by ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    /// Placed tiles in placement order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.nodes.iter().map(|node| node.tile)
    }

    /// Whether `tile` is currently an open end.
    #[must_use]
    pub fn is_end(&self, tile: &Tile) -> bool {
        self.ends.contains_key(tile)
    }

    /// Free child slots on the end holding `tile`; zero if it is not an end.
    #[must_use]
    pub fn open_slots(&self, tile: &Tile) -> usize {
        self.ends
            .get(tile)
            .and_then(|&id| self.get(id))
            .map_or(0, TreeNode::open_slots)
    }

    /// Every end tile, in canonical order. Empty for an empty tree.
    #[must_use]
    pub fn ends(&self) -> Vec<Tile> {
        self.sorted_tiles(self.ends.values().copied())
    }

    /// Ends that could take one of `candidates`.
    ///
    /// Returns `None` when the tree is empty, so callers can tell "not yet
    /// started" from "nothing fits". With no candidates every end is
    /// returned. Otherwise the result holds each end whose exposed face
    /// appears on either face of some candidate. This is a superset filter:
    /// sharing a face does not prove a specific candidate fits a specific
    /// end, so callers still attach through [`TileTree::add_to_leaf`].
    #[must_use]
    pub fn playable_ends(&self, candidates: &[Tile]) -> Option<Vec<Tile>> {
        self.root?;

        if candidates.is_empty() {
            return Some(self.ends());
        }

        let faces: FxHashSet<u8> = candidates
            .iter()
            .flat_map(|tile| [tile.top, tile.bottom])
            .collect();

        let ids = faces
            .iter()
            .filter_map(|face| self.ends_by_face.get(face))
            .flat_map(|ids| ids.iter().copied());

        Some(self.sorted_tiles(ids))
    }

    /// Attach `tile` below the end holding `leaf`.
    ///
    /// `tile` is flipped if needed so its top meets the end's exposed face.
    /// Returns the tile as placed.
    ///
    /// # Errors
    ///
    /// - `InvalidLeaf` if `leaf` is not a current end (including nodes that
    ///   already hold their maximum number of children).
    /// - `InvalidMove` if `tile` is already anywhere in the tree, or if
    ///   neither orientation of `tile` matches.
    pub fn add_to_leaf(&mut self, leaf: &Tile, mut tile: Tile) -> Result<Tile, GameError> {
        let leaf_id = *self.ends.get(leaf).ok_or(GameError::InvalidLeaf(*leaf))?;
        let leaf_tile = self.node(leaf_id)?.tile;

        if !tile.orient_to(&leaf_tile) {
            return Err(GameError::InvalidMove(format!(
                "{tile} does not match end {leaf_tile}"
            )));
        }
        if self.placed.contains(&tile) {
            return Err(GameError::InvalidMove(format!("{tile} is already placed")));
        }

        let child_id = self.alloc(TreeNode::new(tile, Some(leaf_id)));
        let leaf_complete = match self.nodes.get_mut(leaf_id.index()) {
            Some(node) => {
                node.children.push(child_id);
                node.is_complete()
            }
            None => return Err(GameError::InvalidLeaf(*leaf)),
        };

        self.register_end(child_id, tile);
        if leaf_complete {
            self.unregister_end(leaf_id, leaf_tile);
        }
        Ok(tile)
    }

    /// Place the first tile. Only valid on an empty tree.
    pub(crate) fn plant(&mut self, tile: Tile) -> Result<NodeId, GameError> {
        if !self.is_empty() {
            return Err(GameError::InvalidMove(format!(
                "cannot plant {tile}: the tree already has a root"
            )));
        }
        let id = self.alloc(TreeNode::new(tile, None));
        self.root = Some(id);
        self.register_end(id, tile);
        Ok(id)
    }

    fn node(&self, id: NodeId) -> Result<&TreeNode, GameError> {
        self.get(id)
            .ok_or_else(|| GameError::InvalidMove(format!("dangling node {}", id.0)))
    }

    fn alloc(&mut self, node: TreeNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.placed.insert(node.tile);
        self.nodes.push_back(node);
        id
    }

    fn register_end(&mut self, id: NodeId, tile: Tile) {
        self.ends.insert(tile, id);
        self.ends_by_face.entry(tile.bottom).or_default().push(id);
    }

    fn unregister_end(&mut self, id: NodeId, tile: Tile) {
        self.ends.remove(&tile);
        if let Some(ids) = self.ends_by_face.get_mut(&tile.bottom) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.ends_by_face.remove(&tile.bottom);
            }
        }
    }

    fn sorted_tiles(&self, ids: impl Iterator<Item = NodeId>) -> Vec<Tile> {
        let mut tiles: Vec<Tile> = ids
            .filter_map(|id| self.get(id))
            .map(|node| node.tile)
            .collect();
        tiles.sort();
        tiles.dedup();
        tiles
    }
}
