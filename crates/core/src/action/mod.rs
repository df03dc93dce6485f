//! Player actions and their state transitions.
//!
//! Each action implements [`ActionTransition`]: pre-conditions are checked
//! against the state before mutation, the mutation runs, then
//! post-conditions are checked. Terminal outcomes (death, victory, forfeit)
//! are ordinary return values; the caller decides how to end the session.
mod detonate;
mod exit;
mod movement;

pub use detonate::{DetonateAction, DetonateError, DetonateOutcome};
pub use exit::{ExitAction, ExitError, ExitOutcome};
pub use movement::{MoveAction, MoveError, MoveOutcome};

use crate::state::GameState;

/// Defines how a concrete action variant mutates game state.
///
/// Implementors can override the validation hooks to surface pre- and
/// post-conditions that must hold around the state mutation. Validation
/// hooks must stay side-effect free.
pub trait ActionTransition {
    type Error;
    type Outcome;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly.
    /// Implementations may assume `pre_validate` has already passed.
    fn apply(&self, state: &mut GameState) -> Result<Self::Outcome, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &GameState) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Top-level player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Move(MoveAction),
    Detonate(DetonateAction),
    Exit(ExitAction),
}

/// Outcome of a successfully executed action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    Move(MoveOutcome),
    Detonate(DetonateOutcome),
    Exit(ExitOutcome),
}

impl ActionOutcome {
    /// Whether this outcome ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActionOutcome::Move(MoveOutcome::Died { .. }) | ActionOutcome::Exit(_)
        )
    }
}
