use crate::action::ActionTransition;
use crate::state::{CellTags, Direction, GameState, HazardKind, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("destination {destination} is outside the palace walls")]
    OutOfBounds { destination: Position },
}

/// Step one cell in a cardinal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub direction: Direction,
}

impl MoveAction {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }
}

/// What happened when the agent entered the destination cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveOutcome {
    /// Relocated onto a benign cell.
    Moved { to: Position },
    /// Stepped onto the target's cell; the agent and the target now travel
    /// together (the target tag stays on the cell).
    FoundTarget { at: Position },
    /// Stepped onto a lethal cell. Terminal.
    Died { at: Position, cause: HazardKind },
}

impl ActionTransition for MoveAction {
    type Error = MoveError;
    type Outcome = MoveOutcome;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let destination = state.agent.position.step(self.direction);
        if !state.grid.dimensions().contains(destination) {
            return Err(MoveError::OutOfBounds { destination });
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Outcome, Self::Error> {
        let destination = state.agent.position.step(self.direction);
        let tags = state
            .grid
            .tags(destination)
            .map_err(|_| MoveError::OutOfBounds { destination })?;

        state.agent.record_visit();
        state.agent.position = destination;

        if let Some(cause) = lethal_cause(tags, state.agent.monster_defeated) {
            state.agent.alive = false;
            return Ok(MoveOutcome::Died {
                at: destination,
                cause,
            });
        }

        if tags.contains(CellTags::TARGET) && !state.agent.target_found {
            state.agent.target_found = true;
            return Ok(MoveOutcome::FoundTarget { at: destination });
        }

        Ok(MoveOutcome::Moved { to: destination })
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let position = state.agent.position;
        if !state.grid.dimensions().contains(position) {
            return Err(MoveError::OutOfBounds {
                destination: position,
            });
        }
        Ok(())
    }
}

/// First hazard on the cell that kills on entry, in `HazardKind::ALL` order.
/// A defeated monster no longer counts; its tag is gone from the grid anyway.
fn lethal_cause(tags: CellTags, monster_defeated: bool) -> Option<HazardKind> {
    HazardKind::ALL.into_iter().find(|kind| {
        if !tags.contains(kind.tag()) {
            return false;
        }
        *kind != HazardKind::Monster || !monster_defeated
    })
}
