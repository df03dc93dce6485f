use crate::action::ActionTransition;
use crate::env::GridOracle;
use crate::state::{CellTags, GameState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitError {
    #[error("agent at {position} is not on the exit cell")]
    NotAtExit { position: Position },
}

/// Leave the palace through the exit cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExitAction;

/// How the session ended. Both variants are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitOutcome {
    /// Left with the target in tow: mission accomplished.
    Victory,
    /// Left without the target: the mission is forfeit.
    Forfeit,
}

impl ActionTransition for ExitAction {
    type Error = ExitError;
    type Outcome = ExitOutcome;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let position = state.agent.position;
        let on_exit = state
            .grid
            .tags_at(position)
            .is_some_and(|tags| tags.contains(CellTags::EXIT));
        if !on_exit {
            return Err(ExitError::NotAtExit { position });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Outcome, Self::Error> {
        // The session is over either way; the caller reads the outcome.
        state.agent.alive = false;
        if state.agent.target_found {
            Ok(ExitOutcome::Victory)
        } else {
            Ok(ExitOutcome::Forfeit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Grid;

    fn session_on_exit(target_found: bool) -> GameState {
        let exit = Position::new(2, 2);
        let grid =
            Grid::from_layout(3, [(exit, CellTags::EXIT)]).expect("layout in bounds");
        let mut state = GameState::new(grid);
        state.agent.position = exit;
        state.agent.target_found = target_found;
        state
    }

    fn run(state: &mut GameState) -> Result<ExitOutcome, ExitError> {
        let action = ExitAction;
        action.pre_validate(state)?;
        action.apply(state)
    }

    #[test]
    fn exiting_away_from_the_exit_cell_has_no_effect() {
        let mut state = session_on_exit(true);
        state.agent.position = Position::ORIGIN;
        let before = state.clone();

        assert_eq!(
            run(&mut state),
            Err(ExitError::NotAtExit {
                position: Position::ORIGIN
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn exit_with_target_is_victory() {
        let mut state = session_on_exit(true);
        assert_eq!(run(&mut state), Ok(ExitOutcome::Victory));
        assert!(!state.agent.alive);
    }

    #[test]
    fn exit_without_target_is_forfeit() {
        let mut state = session_on_exit(false);
        assert_eq!(run(&mut state), Ok(ExitOutcome::Forfeit));
        assert!(!state.agent.alive);
    }
}
