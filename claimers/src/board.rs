//! Types that make up the game board.

use serde::{Deserialize, Serialize};

use crate::ids::{BoardId, PlayerId, TerritoryId, TileId};

pub use self::{
    dimensions::{BoardDimensions, Neighbors, Wrapping},
    grid::Grid,
    position::Position,
};

mod dimensions;
mod grid;
mod position;

/// A board: a rectangle of tiles. The board's id is also the id of the map that its
/// tiles' territories belong to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub dimensions: BoardDimensions,
}

impl Board {
    /// Create a board with a freshly generated id.
    pub fn new(dimensions: BoardDimensions) -> Self {
        Self {
            id: BoardId::new(),
            dimensions,
        }
    }

    /// `(width, height)` of the board in tiles.
    pub fn size(&self) -> (usize, usize) {
        (self.dimensions.width(), self.dimensions.height())
    }
}

/// A single tile of a board.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub board_id: BoardId,
    /// Player holding the tile, if it has been claimed.
    pub owner: Option<PlayerId>,
    /// Units stationed on the tile.
    pub units: u32,
    pub position: Position,
    /// Territory the tile lies on, if the board has terrain.
    pub territory: Option<TerritoryId>,
}

impl Tile {
    /// Create an unowned, empty tile with a freshly generated id.
    pub fn new(board_id: BoardId, position: Position) -> Self {
        Self {
            id: TileId::new(),
            board_id,
            owner: None,
            units: 0,
            position,
            territory: None,
        }
    }

    /// Whether the given player holds this tile.
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}
