//! Genetic algorithm over policy networks.
//!
//! A generation's candidates are scored one by one by the
//! [`Trainer`](crate::trainer::Trainer); once every score is in, a
//! [`PopulationEvolver`] builds the next generation.
//!
//! # Algorithm Overview
//!
//! 1. **Rank** - Stable sort of candidate indices by score, highest first. Candidates
//!    with equal scores keep their original index order.
//! 2. **Elitism** - The top `elite_count` networks are cloned unmutated, in rank order.
//! 3. **Fill** - Each remaining slot clones an elite chosen uniformly at random and
//!    mutates it (see [`PolicyNetwork::mutate`]).
//!
//! There is no crossover: the network's parameters are only ever perturbed, never
//! recombined.
//!
//! # Randomness
//!
//! Evolution consumes the random stream in slot order: for each filled slot, one draw
//! for the parent index followed by the mutation draws of that child. With a fixed
//! seed the next population is therefore reproducible bit for bit.

use antnest_network::{NetworkShape, PolicyNetwork};
use antnest_stats::descriptive::DescriptiveStats;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::TrainingConfig;

/// One candidate and its score, as stored in checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationEntry {
    pub network: PolicyNetwork,
    pub score: f64,
}

/// The candidates of one generation and their scores.
///
/// `networks` and `scores` always have the same length; index `i` of both refers to
/// candidate `i` of the current generation. Scores start at zero and are never
/// carried over into the next generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    networks: Vec<PolicyNetwork>,
    scores: Vec<f64>,
}

impl Population {
    /// Creates a population of `count` randomly initialized networks.
    #[must_use]
    pub fn random<R>(shape: NetworkShape, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let networks = (0..count).map(|_| PolicyNetwork::new(shape, rng)).collect();
        Self::from_networks(networks)
    }

    /// Creates a population from existing networks, with all scores zero.
    #[must_use]
    pub fn from_networks(networks: Vec<PolicyNetwork>) -> Self {
        let scores = vec![0.0; networks.len()];
        Self { networks, scores }
    }

    /// Creates a population from checkpointed `(network, score)` pairs.
    #[must_use]
    pub fn from_entries(entries: Vec<PopulationEntry>) -> Self {
        let (networks, scores) = entries.into_iter().map(|e| (e.network, e.score)).unzip();
        Self { networks, scores }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    #[must_use]
    pub fn networks(&self) -> &[PolicyNetwork] {
        &self.networks
    }

    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Returns the network of candidate `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn network(&self, index: usize) -> &PolicyNetwork {
        &self.networks[index]
    }

    /// Records the score of candidate `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_score(&mut self, index: usize, score: f64) {
        self.scores[index] = score;
    }

    /// Clones every candidate into checkpoint form.
    #[must_use]
    pub fn entries(&self) -> Vec<PopulationEntry> {
        self.networks
            .iter()
            .zip(&self.scores)
            .map(|(network, &score)| PopulationEntry {
                network: network.clone(),
                score,
            })
            .collect()
    }

    /// Returns candidate indices ordered by score, highest first.
    ///
    /// The sort is stable: equal scores keep their original index order. NaN scores
    /// rank below every other score, and `-0.0` ties with `0.0`.
    #[must_use]
    pub fn ranking(&self) -> Vec<usize> {
        let mut indices = (0..self.scores.len()).collect::<Vec<_>>();
        indices.sort_by(|&a, &b| rank_key(self.scores[b]).total_cmp(&rank_key(self.scores[a])));
        indices
    }

    /// Returns the highest score, or `None` for an empty population.
    #[must_use]
    pub fn top_score(&self) -> Option<f64> {
        self.ranking().first().map(|&i| self.scores[i])
    }

    /// Computes descriptive statistics over the scores.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.scores.iter().copied())
    }
}

fn rank_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else if score == 0.0 {
        0.0
    } else {
        score
    }
}

/// Builds the next generation from a fully scored one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationEvolver {
    /// Number of top candidates copied unmutated (elitism)
    pub elite_count: usize,
    /// Probability of mutating each parameter of a filled slot
    pub mutation_rate: f64,
    /// Half-width of the uniform mutation offset
    pub mutation_strength: f32,
}

impl PopulationEvolver {
    #[must_use]
    pub fn from_config(config: &TrainingConfig) -> Self {
        Self {
            elite_count: config.elite_count,
            mutation_rate: config.mutation_rate,
            mutation_strength: config.mutation_strength,
        }
    }

    /// Evolves `population` into the next generation.
    ///
    /// The returned population has the same size as the input and all scores zero.
    ///
    /// # Panics
    ///
    /// Panics if `elite_count` is zero or larger than the population. Both are rejected
    /// earlier by [`TrainingConfig::validate`].
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        assert!(
            (1..=population.len()).contains(&self.elite_count),
            "elite count must be in 1..=population size"
        );

        let ranking = population.ranking();
        let mut next = Vec::with_capacity(population.len());

        // elite selection
        next.extend(
            ranking[..self.elite_count]
                .iter()
                .map(|&i| population.networks[i].clone()),
        );

        // fill the rest with mutated copies of the elites
        while next.len() < population.len() {
            let parent = rng.random_range(0..self.elite_count);
            let mut child = next[parent].clone();
            child.mutate(rng, self.mutation_rate, self.mutation_strength);
            next.push(child);
        }

        Population::from_networks(next)
    }
}
