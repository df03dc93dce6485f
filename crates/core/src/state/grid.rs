use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::env::{GridDimensions, GridOracle, PcgRng, RngOracle, SampleStream};

use super::{CellTags, HazardKind, Position};

/// Cells the generator keeps hazard-free: the start cell and its two
/// orthogonal neighbors, so the opening move can never be forced into a
/// hazard.
const RESERVED: [Position; 3] = [
    Position { row: 0, col: 0 },
    Position { row: 1, col: 0 },
    Position { row: 0, col: 1 },
];

/// Upper bound on rejection-sampling retries per placement. Config
/// validation guarantees eligible cells exist, so hitting this means the
/// stream is pathological rather than the board being full.
const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    #[error("position {position} is outside the grid")]
    OutOfBounds { position: Position },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GenerateError {
    #[error("dimension {dimension} is below the minimum of {minimum}")]
    DimensionTooSmall { dimension: u32, minimum: u32 },

    #[error("{requested} hazards do not fit on a board with {available} eligible cells")]
    TooManyHazards { requested: u32, available: u32 },

    #[error("placement of {tag:?} exhausted its retry budget")]
    PlacementOverflow { tag: CellTags },
}

/// The palace: a square board mapping coordinates to tag sets.
///
/// Immutable after generation except for monster removal (detonation
/// downgrades a composite cell to its remaining tags). Cells absent from the
/// map are empty.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    dimensions: GridDimensions,
    cells: BTreeMap<Position, CellTags>,
}

impl Grid {
    /// Generates a palace layout from the default [`PcgRng`] oracle.
    pub fn generate(config: &GameConfig, seed: u64) -> Result<Self, GenerateError> {
        Self::generate_with(config, seed, &PcgRng)
    }

    /// Generates a palace layout, drawing every random placement from `rng`.
    ///
    /// Deterministic: the same config, seed, and oracle produce the same
    /// board. Placement rules:
    /// - `START` at (0, 0), nothing else reserved there.
    /// - Hazards land outside the reserved opening cells. Trap kinds may
    ///   co-locate with each other; two hazards of the same kind never share
    ///   a cell; the monster takes a hazard-free cell.
    /// - The exit and the target take trap-free cells away from the start;
    ///   they may share a cell with each other or with the monster.
    pub fn generate_with<R>(config: &GameConfig, seed: u64, rng: &R) -> Result<Self, GenerateError>
    where
        R: RngOracle + ?Sized,
    {
        let dimensions = GridDimensions::new(config.dimension);
        if config.dimension < GameConfig::MIN_DIMENSION {
            return Err(GenerateError::DimensionTooSmall {
                dimension: config.dimension,
                minimum: GameConfig::MIN_DIMENSION,
            });
        }
        let available = (dimensions.area() - GameConfig::RESERVED_CELLS) as u32;
        if config.hazards.total() > available {
            return Err(GenerateError::TooManyHazards {
                requested: config.hazards.total(),
                available,
            });
        }

        let mut grid = Self {
            dimensions,
            cells: BTreeMap::new(),
        };
        grid.add_tags(Position::ORIGIN, CellTags::START);

        let mut stream = SampleStream::new(rng, seed);

        for kind in HazardKind::ALL {
            for _ in 0..config.hazards.count(kind) {
                let position = grid.sample_cell(&mut stream, kind.tag(), |grid, candidate| {
                    if RESERVED.contains(&candidate) {
                        return false;
                    }
                    let tags = grid.cell(candidate);
                    match kind {
                        // The monster roams; it never shares a cell with a
                        // fixed hazard.
                        HazardKind::Monster => !tags.is_hazardous(),
                        _ => !tags.contains(kind.tag()),
                    }
                })?;
                grid.add_tags(position, kind.tag());
            }
        }

        for tag in [CellTags::EXIT, CellTags::TARGET] {
            let position = grid.sample_cell(&mut stream, tag, |grid, candidate| {
                candidate != Position::ORIGIN && !grid.cell(candidate).intersects(CellTags::LETHAL)
            })?;
            grid.add_tags(position, tag);
        }

        Ok(grid)
    }

    /// Builds a grid from an explicit layout. `START` is stamped onto the
    /// origin regardless of the provided cells.
    pub fn from_layout<I>(dimension: u32, layout: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (Position, CellTags)>,
    {
        let dimensions = GridDimensions::new(dimension);
        let mut grid = Self {
            dimensions,
            cells: BTreeMap::new(),
        };
        grid.add_tags(Position::ORIGIN, CellTags::START);
        for (position, tags) in layout {
            if !dimensions.contains(position) {
                return Err(GridError::OutOfBounds { position });
            }
            grid.add_tags(position, tags);
        }
        Ok(grid)
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Tags at `position`, failing when the coordinate is out of bounds.
    pub fn tags(&self, position: Position) -> Result<CellTags, GridError> {
        if !self.dimensions.contains(position) {
            return Err(GridError::OutOfBounds { position });
        }
        Ok(self.cell(position))
    }

    /// Whether any of `tags` is present at `position`.
    pub fn is(&self, position: Position, tags: CellTags) -> Result<bool, GridError> {
        Ok(self.tags(position)?.intersects(tags))
    }

    /// First cell holding any of `tags`, in row-major order.
    pub fn find_first(&self, tags: CellTags) -> Option<Position> {
        self.cells
            .iter()
            .find(|(_, cell)| cell.intersects(tags))
            .map(|(position, _)| *position)
    }

    /// Number of cells holding any of `tags`.
    pub fn count_cells_with(&self, tags: CellTags) -> usize {
        self.cells
            .values()
            .filter(|cell| cell.intersects(tags))
            .count()
    }

    /// Removes the monster tag at `position`. Returns whether a monster was
    /// actually there; remaining tags on the cell survive.
    pub fn remove_monster(&mut self, position: Position) -> Result<bool, GridError> {
        if !self.dimensions.contains(position) {
            return Err(GridError::OutOfBounds { position });
        }
        let Some(tags) = self.cells.get_mut(&position) else {
            return Ok(false);
        };
        if !tags.contains(CellTags::MONSTER) {
            return Ok(false);
        }
        tags.remove(CellTags::MONSTER);
        if tags.is_empty() {
            self.cells.remove(&position);
        }
        Ok(true)
    }

    fn cell(&self, position: Position) -> CellTags {
        self.cells.get(&position).copied().unwrap_or(CellTags::empty())
    }

    fn add_tags(&mut self, position: Position, tags: CellTags) {
        *self.cells.entry(position).or_insert(CellTags::empty()) |= tags;
    }

    fn sample_cell<R, F>(
        &self,
        stream: &mut SampleStream<'_, R>,
        tag: CellTags,
        eligible: F,
    ) -> Result<Position, GenerateError>
    where
        R: RngOracle + ?Sized,
        F: Fn(&Self, Position) -> bool,
    {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let row = stream.next_below(self.dimensions.side) as i32;
            let col = stream.next_below(self.dimensions.side) as i32;
            let candidate = Position::new(row, col);
            if eligible(self, candidate) {
                return Ok(candidate);
            }
        }
        Err(GenerateError::PlacementOverflow { tag })
    }
}

impl GridOracle for Grid {
    fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    fn tags_at(&self, position: Position) -> Option<CellTags> {
        self.dimensions.contains(position).then(|| self.cell(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HazardCounts;

    fn generated(seed: u64) -> Grid {
        Grid::generate(&GameConfig::new(), seed).expect("default config generates")
    }

    #[test]
    fn layout_satisfies_placement_invariants() {
        for seed in [0, 1, 7, 99, 12345] {
            let grid = generated(seed);
            let config = GameConfig::new();

            assert_eq!(grid.count_cells_with(CellTags::START), 1);
            assert!(grid.cell(Position::ORIGIN).contains(CellTags::START));
            assert_eq!(grid.count_cells_with(CellTags::EXIT), 1);
            assert_eq!(grid.count_cells_with(CellTags::TARGET), 1);

            for kind in HazardKind::ALL {
                assert_eq!(
                    grid.count_cells_with(kind.tag()),
                    config.hazards.count(kind) as usize,
                    "seed {seed}, kind {kind}"
                );
            }

            for position in RESERVED {
                assert!(
                    !grid.cell(position).is_hazardous(),
                    "seed {seed}: hazard on reserved cell {position}"
                );
            }

            for (position, tags) in &grid.cells {
                assert!(grid.dimensions.contains(*position));
                assert!(!tags.is_empty());
            }
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        assert_eq!(generated(42), generated(42));
        assert_ne!(generated(1), generated(2));
    }

    #[test]
    fn exit_and_target_avoid_traps_and_start() {
        for seed in 0..20 {
            let grid = generated(seed);
            for tag in [CellTags::EXIT, CellTags::TARGET] {
                let position = grid.find_first(tag).expect("placed");
                assert_ne!(position, Position::ORIGIN);
                assert!(!grid.cell(position).intersects(CellTags::LETHAL));
            }
        }
    }

    #[test]
    fn tags_query_rejects_out_of_bounds() {
        let grid = generated(3);
        let outside = Position::new(6, 0);
        assert_eq!(
            grid.tags(outside),
            Err(GridError::OutOfBounds { position: outside })
        );
        assert!(grid.tags(Position::new(5, 5)).is_ok());
    }

    #[test]
    fn remove_monster_downgrades_composite_cells() {
        let at = Position::new(2, 2);
        let mut grid = Grid::from_layout(4, [(at, CellTags::MONSTER | CellTags::EXIT)])
            .expect("layout in bounds");

        assert_eq!(grid.remove_monster(at), Ok(true));
        assert_eq!(grid.tags(at), Ok(CellTags::EXIT));
        // Second removal is a no-op.
        assert_eq!(grid.remove_monster(at), Ok(false));
    }

    #[test]
    fn oversized_hazard_count_is_rejected() {
        let mut config = GameConfig::with_dimension(2);
        config.hazards = HazardCounts {
            precipices: 2,
            fire_traps: 0,
            dart_traps: 0,
            monsters: 0,
        };
        assert_eq!(
            Grid::generate(&config, 0),
            Err(GenerateError::TooManyHazards {
                requested: 2,
                available: 1,
            })
        );
    }

    #[test]
    fn undersized_dimension_is_rejected() {
        let config = GameConfig::with_dimension(1);
        assert!(matches!(
            Grid::generate(&config, 0),
            Err(GenerateError::DimensionTooSmall { .. })
        ));
    }
}
