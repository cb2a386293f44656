//! Dense row-major storage for one value per tile of a board.

use std::ops::{Index, IndexMut};

use crate::board::{BoardDimensions, Position};

/// One value for every position of a board.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    /// Dimensions of the board.
    dim: BoardDimensions,
    /// Values in row-major order.
    cells: Box<[T]>,
}

impl<T> Grid<T> {
    /// Build a grid by computing the value for each position.
    pub fn from_fn<F: FnMut(Position) -> T>(dim: BoardDimensions, mut f: F) -> Self {
        let cells = (0..dim.total_size())
            .map(|idx| f(dim.un_linearize(idx)))
            .collect();
        Self { dim, cells }
    }

    pub fn dimensions(&self) -> &BoardDimensions {
        &self.dim
    }

    /// Get a reference to the value at the given [`Position`].
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.dim.try_linearize(pos).and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the value at the given [`Position`].
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.dim
            .try_linearize(pos)
            .and_then(move |i| self.cells.get_mut(i))
    }

    /// Get an iterator over the rows of the grid. Each row is a slice of that row's
    /// values.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.dim.width())
    }

    /// Iterate every value with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        let dim = self.dim;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, value)| (dim.un_linearize(idx), value))
    }
}

impl<T: Default> Grid<T> {
    /// Build a grid filled with default values.
    pub fn new(dim: BoardDimensions) -> Self {
        Self::from_fn(dim, |_| T::default())
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Position) -> &T {
        self.get(pos).expect("position out of bounds")
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    fn index_mut(&mut self, pos: Position) -> &mut T {
        self.get_mut(pos).expect("position out of bounds")
    }
}
