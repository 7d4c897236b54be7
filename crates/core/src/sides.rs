use std::ops::{Index, IndexMut};

/// One of the four faces of a grid node.
///
/// Each direction maps to a fixed `(di, dj)` offset in grid coordinates:
///
/// | Direction | Neighbor     |
/// |-----------|--------------|
/// | `Left`    | `(i - 1, j)` |
/// | `Bottom`  | `(i, j + 1)` |
/// | `Right`   | `(i + 1, j)` |
/// | `Top`     | `(i, j - 1)` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Bottom,
    Right,
    Top,
}

impl Direction {
    /// All directions, in slot order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Bottom,
        Direction::Right,
        Direction::Top,
    ];

    /// Returns the `(di, dj)` offset to the neighbor across this face.
    #[must_use]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Bottom => (0, 1),
            Direction::Right => (1, 0),
            Direction::Top => (0, -1),
        }
    }
}

/// Values at the left, bottom, right, and top faces of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides<T> {
    pub left: T,
    pub bottom: T,
    pub right: T,
    pub top: T,
}

impl<T: Copy> Sides<T> {
    /// Constructs a `Sides` with the same value on all faces.
    #[must_use]
    pub fn from_value(value: T) -> Self {
        Self {
            left: value,
            bottom: value,
            right: value,
            top: value,
        }
    }
}

impl<T> Sides<T> {
    /// Constructs a `Sides` by evaluating `f` once per direction.
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Self {
            left: f(Direction::Left),
            bottom: f(Direction::Bottom),
            right: f(Direction::Right),
            top: f(Direction::Top),
        }
    }

    /// Iterates over `(direction, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::ALL.into_iter().map(move |d| (d, &self[d]))
    }
}

impl<T> Index<Direction> for Sides<T> {
    type Output = T;

    fn index(&self, direction: Direction) -> &T {
        match direction {
            Direction::Left => &self.left,
            Direction::Bottom => &self.bottom,
            Direction::Right => &self.right,
            Direction::Top => &self.top,
        }
    }
}

impl<T> IndexMut<Direction> for Sides<T> {
    fn index_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Bottom => &mut self.bottom,
            Direction::Right => &mut self.right,
            Direction::Top => &mut self.top,
        }
    }
}
