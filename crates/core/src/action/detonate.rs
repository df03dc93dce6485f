use crate::action::ActionTransition;
use crate::env::GridOracle;
use crate::state::{CellTags, DetonationCharge, GameState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetonateError {
    #[error("the detonation charge is already spent")]
    Exhausted,
}

/// Spend the single detonation charge against an adjacent monster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetonateAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetonateOutcome {
    /// The monster occupied an orthogonal neighbor and is gone from the
    /// grid.
    MonsterDefeated { at: Position },
    /// No monster nearby; the charge is spent regardless.
    Missed,
}

impl ActionTransition for DetonateAction {
    type Error = DetonateError;
    type Outcome = DetonateOutcome;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        if !state.agent.charge.is_armed() {
            return Err(DetonateError::Exhausted);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Outcome, Self::Error> {
        state.agent.charge = DetonationCharge::Exhausted;

        let monster = state.adjacent_positions().into_iter().find(|neighbor| {
            state
                .grid
                .tags_at(*neighbor)
                .is_some_and(|tags| tags.contains(CellTags::MONSTER))
        });

        let Some(at) = monster else {
            return Ok(DetonateOutcome::Missed);
        };

        // In bounds by construction; a failed removal would mean the lookup
        // above lied about the tag.
        let removed = state.grid.remove_monster(at).unwrap_or(false);
        if removed {
            state.agent.monster_defeated = true;
            Ok(DetonateOutcome::MonsterDefeated { at })
        } else {
            Ok(DetonateOutcome::Missed)
        }
    }

}
