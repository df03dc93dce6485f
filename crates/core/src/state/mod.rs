//! Authoritative game state representation.
//!
//! This module owns the board, the agent, and turn bookkeeping. Frontends
//! and strategies read this state freely but mutate it exclusively through
//! [`crate::engine::GameEngine`].
mod agent;
mod common;
mod grid;
mod percept;
mod tags;

pub use agent::{AgentState, DetonationCharge};
pub use common::{Direction, Neighbors, Position};
pub use grid::{GenerateError, Grid, GridError};
pub use percept::{Percept, SenseSet, WallSet};
pub use tags::{CellTags, HazardKind};

use crate::env::GridOracle;

/// Turn bookkeeping for the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Successfully executed actions so far.
    pub count: u64,
}

/// Canonical snapshot of one game session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub grid: Grid,
    pub agent: AgentState,
    pub turn: TurnState,
}

impl GameState {
    /// Fresh session with the agent at the start cell.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            agent: AgentState::new(),
            turn: TurnState::default(),
        }
    }

    /// In-bounds orthogonal neighbors of the agent's cell, in
    /// [`Direction::ALL`] order. Belief updates rely on this order being
    /// stable.
    pub fn adjacent_positions(&self) -> Neighbors {
        let dimensions = self.grid.dimensions();
        self.agent
            .position
            .orthogonal()
            .into_iter()
            .filter(|position| dimensions.contains(*position))
            .collect()
    }

    /// Computes the percept vector for the current turn.
    ///
    /// Pure function of agent position and grid contents; mutates nothing.
    pub fn perceive(&self) -> Percept {
        let mut senses = SenseSet::empty();
        for neighbor in self.adjacent_positions() {
            let Some(tags) = self.grid.tags_at(neighbor) else {
                continue;
            };
            for kind in HazardKind::ALL {
                if tags.contains(kind.tag()) {
                    senses |= kind.sense();
                }
            }
            if tags.contains(CellTags::EXIT) {
                senses |= SenseSet::GLOW;
            }
        }
        if self
            .grid
            .tags_at(self.agent.position)
            .is_some_and(|tags| tags.contains(CellTags::EXIT))
        {
            senses |= SenseSet::GLOW;
        }

        let side = self.grid.dimensions().side as i32;
        let mut walls = WallSet::empty();
        if self.agent.position.row == 0 {
            walls |= WallSet::UP;
        }
        if self.agent.position.row == side - 1 {
            walls |= WallSet::DOWN;
        }
        if self.agent.position.col == 0 {
            walls |= WallSet::LEFT;
        }
        if self.agent.position.col == side - 1 {
            walls |= WallSet::RIGHT;
        }

        Percept {
            senses,
            walls,
            target_found: self.agent.target_found,
        }
    }
}
