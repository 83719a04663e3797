use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A cell on the square play field.
///
/// Coordinates are signed so a head that steps off the board is still
/// representable; `in_bounds` decides whether the cell is on the field.
/// The grid's y axis grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `dir`. `Direction::None` returns `self`.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// True if the cell lies on a `size` x `size` board.
    pub fn in_bounds(self, size: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < size && (self.y as u32) < size
    }

    /// Manhattan distance to another cell.
    pub fn manhattan(self, other: GridCell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add<Direction> for GridCell {
    type Output = GridCell;

    fn add(self, dir: Direction) -> GridCell {
        self.step(dir)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Heading on the grid. `None` is the resting state before the first move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// The four moving headings, in a fixed order.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Grid-axis step for this heading.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::None => (0, 0),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// True if `self` points straight back along `other`.
    /// `None` is never anti-parallel to anything.
    pub fn is_anti_parallel(self, other: Direction) -> bool {
        self != Direction::None && self.opposite() == other
    }

    /// Canonical heading angle in degrees, counter-clockwise about +Z with
    /// `Up` (render +Y) at 0. The resting heading shares `Left`'s angle.
    pub const fn angle_degrees(self) -> f32 {
        match self {
            Direction::Up => 0.0,
            Direction::None | Direction::Left => 90.0,
            Direction::Down => 180.0,
            Direction::Right => 270.0,
        }
    }
}
