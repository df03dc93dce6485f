//! Deterministic game model for the palace puzzle.
//!
//! `palace-core` defines the canonical rules (grid, percepts, actions,
//! engine) and exposes pure APIs reusable by any frontend. All state
//! mutation flows through [`engine::GameEngine`]; strategy crates read the
//! types re-exported here. The core never prints and never reads input.
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod state;

pub use action::{
    Action, ActionOutcome, ActionTransition, DetonateAction, DetonateError, DetonateOutcome,
    ExitAction, ExitError, ExitOutcome, MoveAction, MoveError, MoveOutcome,
};
pub use config::{GameConfig, HazardCounts};
pub use engine::{ExecuteError, GameEngine};
pub use env::{GridDimensions, GridOracle, PcgRng, RngOracle, SampleStream, mix_seed};
pub use state::{
    AgentState, CellTags, DetonationCharge, Direction, GameState, GenerateError, Grid, GridError,
    HazardKind, Neighbors, Percept, Position, SenseSet, TurnState, WallSet,
};
