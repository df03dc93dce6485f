use bitflags::bitflags;

use super::HazardKind;

bitflags! {
    /// Sensations available from the agent's current cell and its orthogonal
    /// neighbors. One bit per sensed feature.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SenseSet: u8 {
        /// A precipice is adjacent.
        const BREEZE = 1 << 0;
        /// A fire trap is adjacent.
        const HEAT   = 1 << 1;
        /// A dart trap is adjacent.
        const WHIR   = 1 << 2;
        /// The monster is adjacent.
        const STENCH = 1 << 3;
        /// The exit is adjacent or underfoot.
        const GLOW   = 1 << 4;
    }
}

bitflags! {
    /// Boundary walls touching the agent's cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct WallSet: u8 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl HazardKind {
    /// The sense bit this hazard triggers on adjacent cells.
    pub fn sense(self) -> SenseSet {
        match self {
            HazardKind::Precipice => SenseSet::BREEZE,
            HazardKind::FireTrap => SenseSet::HEAT,
            HazardKind::DartTrap => SenseSet::WHIR,
            HazardKind::Monster => SenseSet::STENCH,
        }
    }
}

/// What the agent senses this turn.
///
/// Recomputed fresh from agent position plus grid state on every turn;
/// never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Percept {
    pub senses: SenseSet,
    pub walls: WallSet,
    /// Whether the target has been located (persists once set).
    pub target_found: bool,
}

impl Percept {
    pub fn senses_hazard(&self, kind: HazardKind) -> bool {
        self.senses.contains(kind.sense())
    }

    /// True when any hazard at all is sensed nearby.
    pub fn any_hazard(&self) -> bool {
        HazardKind::ALL.iter().any(|kind| self.senses_hazard(*kind))
    }

    pub fn glow(&self) -> bool {
        self.senses.contains(SenseSet::GLOW)
    }
}
