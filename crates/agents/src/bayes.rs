//! Bayesian posterior tables over cell contents.
//!
//! One independent probability table per channel, updated by uniform-prior
//! elimination: an adjacency signal concentrates the mass on the sensed
//! neighborhood, silence spreads it uniformly over cells not yet ruled out.

use std::collections::{BTreeMap, BTreeSet};

use palace_core::{GridDimensions, HazardKind, Percept, Position, SenseSet};

use crate::strategy::{BeliefEngine, Observation};

/// Probability mass must stay within this distance of 1 (or exactly 0 once
/// a channel is fully resolved).
const MASS_TOLERANCE: f64 = 1e-9;

/// One tracked posterior: the four hazard kinds plus the exit.
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
pub enum BeliefChannel {
    Precipice,
    FireTrap,
    DartTrap,
    Monster,
    Exit,
}

impl BeliefChannel {
    pub const ALL: [BeliefChannel; 5] = [
        BeliefChannel::Precipice,
        BeliefChannel::FireTrap,
        BeliefChannel::DartTrap,
        BeliefChannel::Monster,
        BeliefChannel::Exit,
    ];

    /// The sense bit that signals this channel.
    fn sense(self) -> SenseSet {
        match self {
            BeliefChannel::Precipice => HazardKind::Precipice.sense(),
            BeliefChannel::FireTrap => HazardKind::FireTrap.sense(),
            BeliefChannel::DartTrap => HazardKind::DartTrap.sense(),
            BeliefChannel::Monster => HazardKind::Monster.sense(),
            BeliefChannel::Exit => SenseSet::GLOW,
        }
    }

    fn sensed(self, percept: &Percept) -> bool {
        percept.senses.contains(self.sense())
    }

    /// The exit glows underfoot as well as from adjacent cells, so its
    /// posterior support includes the agent's own cell.
    fn senses_underfoot(self) -> bool {
        matches!(self, BeliefChannel::Exit)
    }
}

impl From<HazardKind> for BeliefChannel {
    fn from(kind: HazardKind) -> Self {
        match kind {
            HazardKind::Precipice => BeliefChannel::Precipice,
            HazardKind::FireTrap => BeliefChannel::FireTrap,
            HazardKind::DartTrap => BeliefChannel::DartTrap,
            HazardKind::Monster => BeliefChannel::Monster,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BeliefError {
    /// Every candidate cell for a sensed channel had already been ruled
    /// out. The observation sequence is inconsistent with the model.
    #[error("posterior support for the {channel} channel collapsed to empty")]
    Contradiction { channel: BeliefChannel },
}

/// Per-channel posterior tables over the whole grid.
///
/// Each channel keeps its own cleared-cell history; a cell ruled out for
/// one channel says nothing about the others. Cleared cells hold
/// probability 0 permanently.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BayesianInference {
    dimensions: GridDimensions,
    tables: BTreeMap<BeliefChannel, BTreeMap<Position, f64>>,
    cleared: BTreeMap<BeliefChannel, BTreeSet<Position>>,
}

impl BayesianInference {
    /// Uniform prior of 1/N² on every cell, for every channel.
    pub fn new(dimensions: GridDimensions) -> Self {
        let prior = 1.0 / dimensions.area() as f64;
        let uniform: BTreeMap<Position, f64> =
            dimensions.iter().map(|cell| (cell, prior)).collect();
        Self {
            dimensions,
            tables: BeliefChannel::ALL
                .into_iter()
                .map(|channel| (channel, uniform.clone()))
                .collect(),
            cleared: BeliefChannel::ALL
                .into_iter()
                .map(|channel| (channel, BTreeSet::new()))
                .collect(),
        }
    }

    /// Folds one observation into every channel's posterior.
    ///
    /// Fails with [`BeliefError::Contradiction`] when a sensed channel has
    /// no surviving candidate, or when a table's mass drifts off 1.
    pub fn update(&mut self, observation: &Observation) -> Result<(), BeliefError> {
        for channel in BeliefChannel::ALL {
            if channel.sensed(&observation.percept) {
                self.condition_on_signal(channel, observation)?;
            } else {
                self.condition_on_silence(channel, observation);
            }
            self.check_mass(channel)?;
        }
        Ok(())
    }

    /// The complete N×N table for one channel.
    pub fn distribution(&self, channel: BeliefChannel) -> &BTreeMap<Position, f64> {
        self.tables
            .get(&channel)
            .expect("every channel is initialized at construction")
    }

    /// Convenience lookup for the hazard channels.
    pub fn hazard_distribution(&self, kind: HazardKind) -> &BTreeMap<Position, f64> {
        self.distribution(kind.into())
    }

    fn condition_on_signal(
        &mut self,
        channel: BeliefChannel,
        observation: &Observation,
    ) -> Result<(), BeliefError> {
        let table = self
            .tables
            .get_mut(&channel)
            .expect("every channel is initialized at construction");

        let mut support: Vec<Position> = observation
            .neighbors
            .iter()
            .copied()
            .filter(|cell| table.get(cell).copied().unwrap_or(0.0) > 0.0)
            .collect();
        if channel.senses_underfoot()
            && table.get(&observation.position).copied().unwrap_or(0.0) > 0.0
        {
            support.push(observation.position);
        }

        if support.is_empty() {
            return Err(BeliefError::Contradiction { channel });
        }

        let share = 1.0 / support.len() as f64;
        for value in table.values_mut() {
            *value = 0.0;
        }
        for cell in &support {
            table.insert(*cell, share);
        }
        tracing::trace!(
            "{channel} signal at {}: mass split over {} candidates",
            observation.position,
            support.len()
        );
        Ok(())
    }

    fn condition_on_silence(&mut self, channel: BeliefChannel, observation: &Observation) {
        let history = self
            .cleared
            .get_mut(&channel)
            .expect("every channel is initialized at construction");
        history.insert(observation.position);
        history.extend(observation.neighbors.iter().copied());

        let unresolved = self.dimensions.area() - history.len();
        let share = if unresolved == 0 {
            0.0
        } else {
            1.0 / unresolved as f64
        };

        let table = self
            .tables
            .get_mut(&channel)
            .expect("every channel is initialized at construction");
        for (cell, value) in table.iter_mut() {
            *value = if history.contains(cell) { 0.0 } else { share };
        }
        tracing::trace!(
            "{channel} silent at {}: {unresolved} unresolved cells",
            observation.position
        );
    }

    fn check_mass(&self, channel: BeliefChannel) -> Result<(), BeliefError> {
        let mass: f64 = self.distribution(channel).values().sum();
        let resolved = self.cleared[&channel].len() == self.dimensions.area();
        let expected = if resolved { 0.0 } else { 1.0 };
        if !mass.is_finite() || (mass - expected).abs() > MASS_TOLERANCE {
            return Err(BeliefError::Contradiction { channel });
        }
        Ok(())
    }
}

impl BeliefEngine for BayesianInference {
    fn name(&self) -> &'static str {
        "bayesian"
    }

    fn observe(&mut self, observation: &Observation) -> Result<(), BeliefError> {
        self.update(observation)
    }
}
