//! Strategy seam shared by the percept-driven belief engines.

use palace_core::{GameState, Neighbors, Percept, Position};

use crate::bayes::BeliefError;

/// Everything a belief engine may look at for one turn: where the agent
/// stands, which in-bounds neighbors surround it, and what it senses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub position: Position,
    /// In-bounds orthogonal neighbors in `Direction::ALL` order.
    pub neighbors: Neighbors,
    pub percept: Percept,
}

impl Observation {
    /// Captures the current turn's observation from the session state.
    pub fn capture(state: &GameState) -> Self {
        Self {
            position: state.agent.position,
            neighbors: state.adjacent_positions(),
            percept: state.perceive(),
        }
    }
}

/// A belief engine refreshes its internal model from the latest
/// observation, once per executed action.
///
/// Implementations must be deterministic and thread-safe.
pub trait BeliefEngine: Send + Sync {
    /// Returns the strategy name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Folds one observation into the belief state.
    fn observe(&mut self, observation: &Observation) -> Result<(), BeliefError>;
}
