use super::Position;

/// The single-use detonation resource.
///
/// {Armed} --adjacent monster--> {Exhausted, defeated}
/// {Armed} --no monster-------> {Exhausted}
/// {Exhausted} -- detonate ----> rejected, no effect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetonationCharge {
    #[default]
    Armed,
    Exhausted,
}

impl DetonationCharge {
    pub fn is_armed(self) -> bool {
        matches!(self, DetonationCharge::Armed)
    }
}

/// Captain Willard's mutable state.
///
/// Position is agent-owned data, independent of grid cell contents; the
/// board never swaps cells to track the player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub position: Position,
    pub alive: bool,
    pub target_found: bool,
    pub monster_defeated: bool,
    pub charge: DetonationCharge,
    /// Pre-move coordinates of every valid move, in order.
    pub visited: Vec<Position>,
}

impl AgentState {
    pub fn new() -> Self {
        Self {
            position: Position::ORIGIN,
            alive: true,
            target_found: false,
            monster_defeated: false,
            charge: DetonationCharge::Armed,
            visited: Vec::new(),
        }
    }

    /// Appends the current position to the visited trail.
    pub fn record_visit(&mut self) {
        self.visited.push(self.position);
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::new()
    }
}
