//! Tile data structures.
//!
//! - `Tile`: an orientable, orientation-free-equal pair of faces
//! - `TileSet`: draw piles and hands
//! - `TileTree`: the branching structure tiles are placed into

pub mod tile;
pub mod set;
pub mod tree;

pub use tile::Tile;
pub use set::TileSet;
pub use tree::{NodeId, TileTree, TreeNode};
