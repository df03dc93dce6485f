//! Propositional inference over cell knowledge.
//!
//! Single-step deduction, not full constraint propagation: a sensed hazard
//! keeps every unresolved neighbor as a candidate until a later visit
//! confirms or excludes it.

use std::collections::{BTreeMap, BTreeSet};

use palace_core::{HazardKind, Position};

use crate::bayes::BeliefError;
use crate::strategy::{BeliefEngine, Observation};

/// Knowledge base of confirmed-safe cells and per-hazard candidate sets.
///
/// Safety is monotonic: once a cell is known safe it never rejoins a
/// candidate set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicInference {
    known_safe: BTreeSet<Position>,
    possible: BTreeMap<HazardKind, BTreeSet<Position>>,
    target: Option<Position>,
}

impl LogicInference {
    pub fn new() -> Self {
        Self {
            // The start cell is survivable by construction.
            known_safe: BTreeSet::from([Position::ORIGIN]),
            possible: HazardKind::ALL
                .into_iter()
                .map(|kind| (kind, BTreeSet::new()))
                .collect(),
            target: None,
        }
    }

    /// Folds one turn's observation into the knowledge base.
    ///
    /// Every hazard kind signaled this turn is recorded; simultaneous
    /// signals do not shadow each other. With no signal at all, the current
    /// cell and all its neighbors are confirmed safe.
    pub fn update(&mut self, observation: &Observation) {
        let current = observation.position;
        let signaled: Vec<HazardKind> = HazardKind::ALL
            .into_iter()
            .filter(|kind| observation.percept.senses_hazard(*kind))
            .collect();

        if signaled.is_empty() {
            self.mark_safe(current);
            for neighbor in &observation.neighbors {
                self.mark_safe(*neighbor);
            }
            tracing::debug!("no hazard signal at {current}; cell and neighbors marked safe");
        } else {
            for kind in &signaled {
                let candidates = self.possible.entry(*kind).or_default();
                for neighbor in &observation.neighbors {
                    if *neighbor != current && !self.known_safe.contains(neighbor) {
                        candidates.insert(*neighbor);
                    }
                }
            }
            tracing::debug!("hazard signals {:?} recorded around {current}", signaled);
        }

        if observation.percept.target_found && self.target.is_none() {
            self.target = Some(current);
            tracing::debug!("target located at {current}");
        }
    }

    /// Whether `cell` has been confirmed safe.
    pub fn is_safe(&self, cell: Position) -> bool {
        self.known_safe.contains(&cell)
    }

    /// Candidate locations for one hazard kind.
    pub fn possible(&self, kind: HazardKind) -> &BTreeSet<Position> {
        // Populated for every kind at construction.
        static EMPTY: BTreeSet<Position> = BTreeSet::new();
        self.possible.get(&kind).unwrap_or(&EMPTY)
    }

    /// Cells flagged by at least one hazard candidate set and never
    /// confirmed safe.
    pub fn definitely_dangerous(&self) -> BTreeSet<Position> {
        self.possible
            .values()
            .flatten()
            .copied()
            .filter(|cell| !self.known_safe.contains(cell))
            .collect()
    }

    /// Confirmed-safe cells among the given neighbors, for per-turn
    /// movement advice.
    pub fn safe_neighbors(&self, neighbors: &[Position]) -> Vec<Position> {
        neighbors
            .iter()
            .copied()
            .filter(|cell| self.is_safe(*cell))
            .collect()
    }

    /// Where the target was found, if the percept has reported it.
    pub fn target_location(&self) -> Option<Position> {
        self.target
    }

    fn mark_safe(&mut self, cell: Position) {
        self.known_safe.insert(cell);
        for candidates in self.possible.values_mut() {
            candidates.remove(&cell);
        }
    }
}

impl Default for LogicInference {
    fn default() -> Self {
        Self::new()
    }
}

impl BeliefEngine for LogicInference {
    fn name(&self) -> &'static str {
        "logic"
    }

    fn observe(&mut self, observation: &Observation) -> Result<(), BeliefError> {
        self.update(observation);
        Ok(())
    }
}
