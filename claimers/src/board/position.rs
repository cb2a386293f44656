use std::fmt;

use serde::{Deserialize, Serialize};

/// The position of a tile on the board, counted from the top-left corner.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column of the tile.
    pub x: usize,
    /// Row of the tile.
    pub y: usize,
}

impl Position {
    /// Construct a [`Position`] from the given `x` and `y`.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Position {
    /// Construct a [`Position`] from the given `(x, y)` pair.
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl From<Position> for (usize, usize) {
    /// Convert the [`Position`] into an `(x, y)` pair.
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
