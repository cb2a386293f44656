//! Rectangular board dimensions, optionally wrapping at the edges.
use enumflags2::BitFlags;
use serde::{Deserialize, Serialize};

use crate::board::Position;

/// Controls which dimensions the board wraps around in.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Wrapping {
    /// The board wraps along the `x` direction.
    Horizontal = 0b01,
    /// The board wraps along the `y` direction.
    Vertical = 0b10,
}

/// Width and height of a board. Optionally supports wrapping.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BoardDimensions {
    /// Number of columns. This corresponds to [`Position::x`].
    width: usize,
    /// Number of rows. This corresponds to [`Position::y`].
    height: usize,

    /// Set of orientations that the board wraps along.
    wrapping: BitFlags<Wrapping>,
}

impl BoardDimensions {
    /// Create new [`BoardDimensions`] with the specified width and height, without
    /// wrapping.
    /// Panics if `width * height` exceeds `usize::MAX` or if `width` or `height` is 0.
    pub fn new(width: usize, height: usize) -> Self {
        Self::new_wrapping(width, height, BitFlags::empty())
    }

    /// Create a square board of `size` by `size` tiles.
    /// Panics under the same conditions as [`BoardDimensions::new`].
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Create new [`BoardDimensions`] wrapping on the specified axes.
    /// Panics if `width * height` exceeds `usize::MAX` or if `width` or `height` is 0.
    pub fn new_wrapping<B: Into<BitFlags<Wrapping>>>(
        width: usize,
        height: usize,
        wrapping: B,
    ) -> Self {
        match Self::try_new_wrapping(width, height, wrapping) {
            Some(dim) => dim,
            None if width == 0 || height == 0 => {
                panic!("board dimensions must be nonzero, got {}x{}", width, height)
            }
            None => panic!(
                "board dimensions too large: {} * {} > {}",
                width,
                height,
                usize::MAX
            ),
        }
    }

    /// Create new [`BoardDimensions`] without wrapping.
    /// Returns `None` if `width * height` exceeds `usize::MAX` or if `width` or `height`
    /// is 0.
    pub fn try_new(width: usize, height: usize) -> Option<Self> {
        Self::try_new_wrapping(width, height, BitFlags::empty())
    }

    /// Create new [`BoardDimensions`] wrapping on the specified axes.
    /// Returns `None` if `width * height` exceeds `usize::MAX` or if `width` or `height`
    /// is 0.
    pub fn try_new_wrapping<B: Into<BitFlags<Wrapping>>>(
        width: usize,
        height: usize,
        wrapping: B,
    ) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            width.checked_mul(height).map(|_| Self {
                width,
                height,
                wrapping: wrapping.into(),
            })
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn wrapping(&self) -> BitFlags<Wrapping> {
        self.wrapping
    }

    /// Whether the board wraps along the `x` direction.
    pub fn wrap_x(&self) -> bool {
        self.wrapping.contains(Wrapping::Horizontal)
    }

    /// Whether the board wraps along the `y` direction.
    pub fn wrap_y(&self) -> bool {
        self.wrapping.contains(Wrapping::Vertical)
    }

    /// Number of tiles on the board.
    pub fn total_size(&self) -> usize {
        self.width * self.height
    }

    /// Whether the position lies on the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Convert a position to its row-major index, or `None` if it is off the board.
    pub fn try_linearize(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    /// Convert a row-major index back into a [`Position`].
    pub fn un_linearize(&self, idx: usize) -> Position {
        Position {
            x: idx % self.width,
            y: idx / self.width,
        }
    }

    /// Get an iterator over rows of the board. Each row is an iterator over the positions
    /// of that row.
    pub fn iter_positions(&self) -> impl Iterator<Item = impl Iterator<Item = Position>> {
        let width = self.width;
        (0..self.height).map(move |y| (0..width).map(move |x| Position { x, y }))
    }

    /// Iterate the orthogonal neighbors of a position: up, down, left, right. Edges wrap
    /// according to [`BoardDimensions::wrapping`]. Off-board positions have no neighbors.
    pub fn neighbors(&self, pos: Position) -> Neighbors {
        Neighbors {
            dim: *self,
            pos,
            step: if self.contains(pos) {
                NeighborStep::Up
            } else {
                NeighborStep::End
            },
        }
    }

    /// Return true if the two positions are orthogonally adjacent.
    pub fn is_neighbor(&self, a: Position, b: Position) -> bool {
        self.neighbors(a).any(|n| n == b)
    }
}

impl Default for BoardDimensions {
    /// The default board: 10x10 with no wrapping.
    fn default() -> Self {
        Self::square(10)
    }
}

/// Serialized as `[width, height]`. Wrapping is not part of a stored board.
impl Serialize for BoardDimensions {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.width, self.height).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BoardDimensions {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (width, height) = <(usize, usize)>::deserialize(deserializer)?;
        Self::try_new(width, height).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid board dimensions {}x{}", width, height))
        })
    }
}

/// Iterator over the neighbors of a position.
#[derive(Debug, Clone)]
pub struct Neighbors {
    dim: BoardDimensions,
    pos: Position,
    step: NeighborStep,
}

#[derive(Debug, Copy, Clone)]
enum NeighborStep {
    Up,
    Down,
    Left,
    Right,
    End,
}

impl Iterator for Neighbors {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let Position { x, y } = self.pos;
        let dim = &self.dim;
        loop {
            match self.step {
                NeighborStep::Up => {
                    self.step = NeighborStep::Down;
                    match y.checked_sub(1) {
                        Some(y) => return Some(Position::new(x, y)),
                        None if dim.wrap_y() && dim.height > 2 => {
                            return Some(Position::new(x, dim.height - 1))
                        }
                        None => {}
                    }
                }
                NeighborStep::Down => {
                    self.step = NeighborStep::Left;
                    match y + 1 {
                        ny if ny < dim.height => return Some(Position::new(x, ny)),
                        _ if dim.wrap_y() && dim.height > 2 => return Some(Position::new(x, 0)),
                        _ => {}
                    }
                }
                NeighborStep::Left => {
                    self.step = NeighborStep::Right;
                    match x.checked_sub(1) {
                        Some(x) => return Some(Position::new(x, y)),
                        None if dim.wrap_x() && dim.width > 2 => {
                            return Some(Position::new(dim.width - 1, y))
                        }
                        None => {}
                    }
                }
                NeighborStep::Right => {
                    self.step = NeighborStep::End;
                    match x + 1 {
                        nx if nx < dim.width => return Some(Position::new(nx, y)),
                        _ if dim.wrap_x() && dim.width > 2 => return Some(Position::new(0, y)),
                        _ => {}
                    }
                }
                NeighborStep::End => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_boards() {
        assert_eq!(BoardDimensions::try_new(0, 3), None);
        assert_eq!(BoardDimensions::try_new(3, 0), None);
        assert_eq!(BoardDimensions::try_new(usize::MAX, 2), None);
    }

    #[test]
    fn linearize_round_trips() {
        let dim = BoardDimensions::new(4, 3);
        for (idx, pos) in dim.iter_positions().flatten().enumerate() {
            assert_eq!(dim.try_linearize(pos), Some(idx));
            assert_eq!(dim.un_linearize(idx), pos);
        }
        assert_eq!(dim.try_linearize(Position::new(4, 0)), None);
        assert_eq!(dim.try_linearize(Position::new(0, 3)), None);
    }

    #[test]
    fn corner_has_two_neighbors_without_wrapping() {
        let dim = BoardDimensions::new(3, 3);
        let neighbors: Vec<_> = dim.neighbors(Position::new(0, 0)).collect();
        assert_eq!(neighbors, vec![Position::new(0, 1), Position::new(1, 0)]);
    }

    #[test]
    fn center_has_four_neighbors() {
        let dim = BoardDimensions::new(3, 3);
        let neighbors: Vec<_> = dim.neighbors(Position::new(1, 1)).collect();
        assert_eq!(
            neighbors,
            vec![
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(0, 1),
                Position::new(2, 1),
            ]
        );
    }

    #[test]
    fn wrapping_connects_opposite_edges() {
        let dim = BoardDimensions::new_wrapping(3, 3, Wrapping::Horizontal);
        assert!(dim.is_neighbor(Position::new(0, 1), Position::new(2, 1)));
        assert!(!dim.is_neighbor(Position::new(1, 0), Position::new(1, 2)));

        let dim = BoardDimensions::new_wrapping(3, 3, Wrapping::Horizontal | Wrapping::Vertical);
        assert_eq!(dim.neighbors(Position::new(0, 0)).count(), 4);
    }

    #[test]
    fn off_board_positions_have_no_neighbors() {
        let dim = BoardDimensions::new(2, 2);
        assert_eq!(dim.neighbors(Position::new(5, 5)).count(), 0);
    }

    #[test]
    fn serializes_as_width_and_height() {
        let dim = BoardDimensions::new(7, 5);
        let text = serde_yaml::to_string(&dim).unwrap();
        let back: BoardDimensions = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, dim);
        assert!(serde_yaml::from_str::<BoardDimensions>("[0, 5]").is_err());
    }
}
