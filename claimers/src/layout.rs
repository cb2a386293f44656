//! Placement of tiles on a fixed-size canvas.
//!
//! Tiles are laid out proportionally: a board of `w` by `h` tiles divides the canvas into
//! `w` columns and `h` rows, and each tile fills its cell less a margin.

use crate::board::{BoardDimensions, Position};

/// Width of the game canvas in pixels.
pub const CANVAS_WIDTH: u32 = 1024;
/// Height of the game canvas in pixels.
pub const CANVAS_HEIGHT: u32 = 768;
/// Fraction of a tile's size left empty on each side.
pub const TILE_MARGIN_RATIO: f64 = 0.05;

/// An RGBA color.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Color behind the board.
pub const BACKGROUND: Rgba = Rgba::new(240, 240, 240, 255);
/// Color of a tile.
pub const TILE: Rgba = Rgba::new(200, 200, 255, 255);

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    /// Shrink the rectangle by `ratio` of its width on the left and right and `ratio` of
    /// its height on the top and bottom. Ratios of one half or more collapse it to its
    /// center.
    pub fn inset(self, ratio: f64) -> TileRect {
        let ratio = ratio.max(0.0).min(0.5);
        let dx = (f64::from(self.width) * ratio).floor() as u32;
        let dy = (f64::from(self.height) * ratio).floor() as u32;
        TileRect {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width.saturating_sub(2 * dx),
            height: self.height.saturating_sub(2 * dy),
        }
    }

    /// Whether the pixel lies inside the rectangle.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// A canvas that a board is drawn onto.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn tile_size(&self, dim: &BoardDimensions) -> (f64, f64) {
        (
            f64::from(self.width) / dim.width() as f64,
            f64::from(self.height) / dim.height() as f64,
        )
    }

    /// The full cell of the tile at `pos`, without margin.
    pub fn tile_rect(&self, dim: &BoardDimensions, pos: Position) -> TileRect {
        let (tile_width, tile_height) = self.tile_size(dim);
        TileRect {
            x: (pos.x as f64 * tile_width) as u32,
            y: (pos.y as f64 * tile_height) as u32,
            width: tile_width as u32,
            height: tile_height as u32,
        }
    }

    /// The drawn rectangle of every tile, row by row, margins applied.
    pub fn tile_rects<'a>(
        &'a self,
        dim: &'a BoardDimensions,
    ) -> impl 'a + Iterator<Item = (Position, TileRect)> {
        dim.iter_positions()
            .flatten()
            .map(move |pos| (pos, self.tile_rect(dim, pos).inset(TILE_MARGIN_RATIO)))
    }

    /// The tile under a pixel, if any.
    pub fn tile_at(&self, dim: &BoardDimensions, px: u32, py: u32) -> Option<Position> {
        if px >= self.width || py >= self.height {
            return None;
        }
        let (tile_width, tile_height) = self.tile_size(dim);
        let pos = Position::new(
            (f64::from(px) / tile_width) as usize,
            (f64::from(py) / tile_height) as usize,
        );
        if dim.contains(pos) {
            Some(pos)
        } else {
            None
        }
    }
}
