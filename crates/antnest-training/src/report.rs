use antnest_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::genetic::Population;

/// Summary of one completed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation number (1-based).
    pub generation: u32,
    /// Candidate indices ordered by score, highest first.
    pub ranking: Vec<usize>,
    /// Score of the first-ranked candidate.
    pub top_score: f64,
    /// Statistics over all scores of the generation.
    pub fitness_stats: DescriptiveStats,
    /// Best score seen by the run up to and including this generation.
    pub best_fitness_ever: f64,
}

impl GenerationReport {
    /// Summarizes a fully scored population.
    ///
    /// Returns `None` for an empty population.
    #[must_use]
    pub fn new(generation: u32, population: &Population, best_fitness_ever: f64) -> Option<Self> {
        let ranking = population.ranking();
        let top_score = population.scores()[*ranking.first()?];
        Some(Self {
            generation,
            ranking,
            top_score,
            fitness_stats: population.fitness_stats()?,
            best_fitness_ever,
        })
    }
}
