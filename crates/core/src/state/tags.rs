use bitflags::bitflags;

bitflags! {
    /// Features co-located on a single cell.
    ///
    /// A cell holds a *set* of tags rather than one composite variant, so
    /// "exit plus monster" or "fire plus dart trap" is plain set union and
    /// every feature query is a membership test.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CellTags: u8 {
        const PRECIPICE = 1 << 0;
        const FIRE_TRAP = 1 << 1;
        const DART_TRAP = 1 << 2;
        const MONSTER   = 1 << 3;
        const TARGET    = 1 << 4;
        const EXIT      = 1 << 5;
        const START     = 1 << 6;
    }
}

impl CellTags {
    /// Tags that can kill the agent on entry.
    pub const HAZARDS: CellTags = CellTags::PRECIPICE
        .union(CellTags::FIRE_TRAP)
        .union(CellTags::DART_TRAP)
        .union(CellTags::MONSTER);

    /// Hazards that are lethal unconditionally. The monster is excluded: it
    /// only kills while undefeated.
    pub const LETHAL: CellTags = CellTags::PRECIPICE
        .union(CellTags::FIRE_TRAP)
        .union(CellTags::DART_TRAP);

    pub fn is_hazardous(self) -> bool {
        self.intersects(Self::HAZARDS)
    }
}

/// The lethal grid features an agent can sense and reason about.
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
pub enum HazardKind {
    Precipice,
    FireTrap,
    DartTrap,
    Monster,
}

impl HazardKind {
    pub const ALL: [HazardKind; 4] = [
        HazardKind::Precipice,
        HazardKind::FireTrap,
        HazardKind::DartTrap,
        HazardKind::Monster,
    ];

    /// The cell tag marking this hazard.
    pub fn tag(self) -> CellTags {
        match self {
            HazardKind::Precipice => CellTags::PRECIPICE,
            HazardKind::FireTrap => CellTags::FIRE_TRAP,
            HazardKind::DartTrap => CellTags::DART_TRAP,
            HazardKind::Monster => CellTags::MONSTER,
        }
    }
}
