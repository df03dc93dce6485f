use std::fmt;

use arrayvec::ArrayVec;

/// In-bounds orthogonal neighbors of a cell, at most four entries.
pub type Neighbors = ArrayVec<Position, 4>;

/// Discrete grid coordinate. `(0, 0)` is the top-left start cell; `row`
/// grows downward, `col` grows rightward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Coordinate one step away in the given direction. The result may lie
    /// outside any particular grid; callers bound-check against dimensions.
    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self::new(self.row + dr, self.col + dc)
    }

    /// The four orthogonal neighbor coordinates in [`Direction::ALL`] order,
    /// without any bounds filtering.
    pub fn orthogonal(self) -> [Position; 4] {
        [
            self.step(Direction::Up),
            self.step(Direction::Down),
            self.step(Direction::Left),
            self.step(Direction::Right),
        ]
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Movement direction on the grid.
///
/// The `ALL` order is a contract: belief updates and search expansion walk
/// neighbors in this order, so reordering variants changes observable
/// behavior.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector as `(row delta, col delta)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}
