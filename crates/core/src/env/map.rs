use crate::state::{CellTags, Position};

/// Read-only view of a grid's geometry and cell contents.
///
/// The search strategy and belief tests consume this seam instead of the
/// concrete [`crate::state::Grid`], so they can run against stub layouts.
pub trait GridOracle: Send + Sync {
    fn dimensions(&self) -> GridDimensions;

    /// Tags at `position`, or `None` when the coordinate is out of bounds.
    /// In-bounds empty cells report `CellTags::empty()`.
    fn tags_at(&self, position: Position) -> Option<CellTags>;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }
}

/// Square grid extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub side: u32,
}

impl GridDimensions {
    pub const fn new(side: u32) -> Self {
        Self { side }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row >= 0
            && position.col >= 0
            && position.row < self.side as i32
            && position.col < self.side as i32
    }

    /// Total number of cells.
    pub fn area(&self) -> usize {
        (self.side as usize) * (self.side as usize)
    }

    /// All coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        let side = self.side as i32;
        (0..side).flat_map(move |row| (0..side).map(move |col| Position::new(row, col)))
    }
}
