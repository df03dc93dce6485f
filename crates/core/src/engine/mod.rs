//! Action execution pipeline.
//!
//! [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! mutation flows through the same pre_validate → apply → post_validate
//! pipeline, and the turn counter advances only on success. Terminal
//! conditions (death, victory, forfeit) come back as ordinary outcomes; the
//! engine never ends the process.

use crate::action::{
    Action, ActionOutcome, ActionTransition, DetonateError, ExitError, MoveError,
};
use crate::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    /// The agent is dead or has left the palace; no further actions are
    /// accepted.
    #[error("the session is over")]
    SessionOver,

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Detonate(#[from] DetonateError),

    #[error(transparent)]
    Exit(#[from] ExitError),
}

/// Routes player actions through their transition pipelines.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Executes one action. Failed validation leaves the state untouched.
    pub fn execute(&mut self, action: &Action) -> Result<ActionOutcome, ExecuteError> {
        if !self.state.agent.alive {
            return Err(ExecuteError::SessionOver);
        }

        let outcome = match action {
            Action::Move(move_action) => {
                ActionOutcome::Move(run_transition(move_action, self.state)?)
            }
            Action::Detonate(detonate) => {
                ActionOutcome::Detonate(run_transition(detonate, self.state)?)
            }
            Action::Exit(exit) => ActionOutcome::Exit(run_transition(exit, self.state)?),
        };

        self.state.turn.count += 1;
        Ok(outcome)
    }

    pub fn state(&self) -> &GameState {
        self.state
    }
}

fn run_transition<T>(transition: &T, state: &mut GameState) -> Result<T::Outcome, T::Error>
where
    T: ActionTransition,
{
    transition.pre_validate(state)?;
    let outcome = transition.apply(state)?;
    transition.post_validate(state)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{DetonateAction, DetonateOutcome, ExitOutcome, MoveAction, MoveOutcome};
    use crate::state::{CellTags, Direction, Grid, HazardKind, Position, SenseSet};

    fn session(layout: &[(Position, CellTags)]) -> GameState {
        let grid = Grid::from_layout(3, layout.iter().copied()).expect("layout in bounds");
        GameState::new(grid)
    }

    #[test]
    fn turn_counter_advances_only_on_success() {
        let mut state = session(&[]);
        let mut engine = GameEngine::new(&mut state);

        assert!(engine.execute(&Action::Move(MoveAction::new(Direction::Up))).is_err());
        assert_eq!(engine.state().turn.count, 0);

        engine
            .execute(&Action::Move(MoveAction::new(Direction::Down)))
            .expect("in bounds");
        assert_eq!(engine.state().turn.count, 1);
    }

    #[test]
    fn dead_agents_take_no_further_actions() {
        let mut state = session(&[(Position::new(1, 0), CellTags::PRECIPICE)]);
        let mut engine = GameEngine::new(&mut state);

        let outcome = engine
            .execute(&Action::Move(MoveAction::new(Direction::Down)))
            .expect("in bounds");
        assert!(outcome.is_terminal());

        assert_eq!(
            engine.execute(&Action::Move(MoveAction::new(Direction::Up))),
            Err(ExecuteError::SessionOver)
        );
    }

    #[test]
    fn victory_requires_target_then_exit() {
        let exit = Position::new(0, 1);
        let target = Position::new(1, 0);
        let mut state = session(&[(exit, CellTags::EXIT), (target, CellTags::TARGET)]);
        let mut engine = GameEngine::new(&mut state);

        let found = engine
            .execute(&Action::Move(MoveAction::new(Direction::Down)))
            .expect("target cell");
        assert_eq!(
            found,
            ActionOutcome::Move(MoveOutcome::FoundTarget { at: target })
        );

        engine
            .execute(&Action::Move(MoveAction::new(Direction::Up)))
            .expect("back to start");
        engine
            .execute(&Action::Move(MoveAction::new(Direction::Right)))
            .expect("onto exit");

        let outcome = engine
            .execute(&Action::Exit(crate::action::ExitAction))
            .expect("on exit with target");
        assert_eq!(outcome, ActionOutcome::Exit(ExitOutcome::Victory));
        assert_eq!(
            engine.execute(&Action::Exit(crate::action::ExitAction)),
            Err(ExecuteError::SessionOver)
        );
    }

    // Scenario from the mission briefing: monster at (1,0), target at (2,2)
    // on a 3x3 board. From (1,1) the monster is smelled, then detonated.
    #[test]
    fn monster_is_smelled_and_detonated_from_the_center() {
        let monster = Position::new(1, 0);
        let mut state = session(&[
            (monster, CellTags::MONSTER),
            (Position::new(2, 2), CellTags::TARGET),
        ]);
        let mut engine = GameEngine::new(&mut state);

        engine
            .execute(&Action::Move(MoveAction::new(Direction::Right)))
            .expect("to (0,1)");
        engine
            .execute(&Action::Move(MoveAction::new(Direction::Down)))
            .expect("to (1,1)");
        assert_eq!(engine.state().agent.position, Position::new(1, 1));

        let percept = engine.state().perceive();
        assert!(percept.senses_hazard(HazardKind::Monster));

        let outcome = engine
            .execute(&Action::Detonate(DetonateAction))
            .expect("charge armed");
        assert_eq!(
            outcome,
            ActionOutcome::Detonate(DetonateOutcome::MonsterDefeated { at: monster })
        );

        // The stench is gone with the monster.
        assert!(!engine.state().perceive().senses.contains(SenseSet::STENCH));
    }
}
