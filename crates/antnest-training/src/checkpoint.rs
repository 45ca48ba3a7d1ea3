//! Serializable snapshots of a training run.
//!
//! A [`TrainingCheckpoint`] captures everything the trainer needs to continue a run:
//! configuration, generation counter, candidate index, the scored population, the
//! champion and the random stream. The stream is captured as it was immediately
//! before the current candidate's trial was spawned, so a resumed run re-evaluates
//! that candidate from the start and then continues exactly as the uninterrupted run
//! would have.

use serde::{Deserialize, Serialize};

use crate::{
    config::TrainingConfig, genetic::PopulationEntry, trainer::Champion, world::TrainingRng,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingCheckpoint {
    pub config: TrainingConfig,
    pub generation: u32,
    pub candidate_index: usize,
    /// Evaluation time already spent on the current candidate when the snapshot was
    /// taken. Informational: resuming restarts the candidate's trial.
    pub elapsed: f64,
    pub champion: Option<Champion>,
    pub entries: Vec<PopulationEntry>,
    pub rng: TrainingRng,
}

/// A checkpoint that does not describe a reachable trainer state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CheckpointError {
    #[display("checkpoint generation must be at least 1")]
    Generation,
    #[display("checkpoint holds {actual} candidates but the population size is {expected}")]
    PopulationSize { expected: usize, actual: usize },
    #[display("checkpoint candidate index {index} is out of range for {population_size} candidates")]
    CandidateIndex {
        index: usize,
        population_size: usize,
    },
    #[display("checkpoint candidate {index} does not match the configured network shape")]
    NetworkShape { index: usize },
}

impl TrainingCheckpoint {
    /// Checks that the snapshot is consistent with its own configuration.
    ///
    /// The configuration itself is validated separately by
    /// [`TrainingConfig::validate`].
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.generation < 1 {
            return Err(CheckpointError::Generation);
        }
        if self.entries.len() != self.config.population_size {
            return Err(CheckpointError::PopulationSize {
                expected: self.config.population_size,
                actual: self.entries.len(),
            });
        }
        if self.candidate_index >= self.entries.len() {
            return Err(CheckpointError::CandidateIndex {
                index: self.candidate_index,
                population_size: self.entries.len(),
            });
        }
        if let Some(index) = self
            .entries
            .iter()
            .position(|e| e.network.shape() != self.config.network)
        {
            return Err(CheckpointError::NetworkShape { index });
        }
        Ok(())
    }
}
