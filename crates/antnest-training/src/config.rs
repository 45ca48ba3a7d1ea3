//! Training configuration and its validation.

use antnest_network::NetworkShape;
use serde::{Deserialize, Serialize};

/// Parameters of a training run.
///
/// Deserialization fills missing fields from [`TrainingConfig::default`], so a
/// configuration file only needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Layer sizes of every network in the population.
    pub network: NetworkShape,
    /// Number of candidates per generation.
    pub population_size: usize,
    /// Number of top-ranked candidates copied unmutated into the next generation.
    pub elite_count: usize,
    /// Per-parameter mutation probability, in `[0, 1]`.
    pub mutation_rate: f64,
    /// Half-width of the uniform mutation offset. `2 * strength` must be finite.
    pub mutation_strength: f32,
    /// Simulated seconds each candidate is evaluated for.
    pub evaluation_window: f64,
    /// Seed of the single random stream used by the whole run.
    pub seed: u64,
    /// Fitness recorded for a candidate whose trial could not be run.
    pub failed_trial_fitness: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            network: NetworkShape::default(),
            population_size: 12,
            elite_count: 3,
            mutation_rate: 0.10,
            mutation_strength: 0.25,
            evaluation_window: 25.0,
            seed: 12345,
            failed_trial_fitness: 0.0,
        }
    }
}

/// A configuration value that would make training meaningless.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("elite count must be in 1..={population_size} (got {elite_count})")]
    EliteCount {
        elite_count: usize,
        population_size: usize,
    },
    #[display(
        "network sizes must be positive (got {}x{}x{})",
        shape.input,
        shape.hidden,
        shape.output
    )]
    NetworkShape { shape: NetworkShape },
    #[display("mutation rate must be in [0, 1] (got {rate})")]
    MutationRate { rate: f64 },
    #[display("mutation strength must be non-negative with a finite span (got {strength})")]
    MutationStrength { strength: f32 },
    #[display("evaluation window must be finite and positive (got {window})")]
    EvaluationWindow { window: f64 },
    #[display("failed trial fitness must not be NaN")]
    FailedTrialFitness,
}

impl TrainingConfig {
    /// Checks every invariant the trainer relies on.
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 1 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !(1..=self.population_size).contains(&self.elite_count) {
            return Err(ConfigError::EliteCount {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if !self.network.is_valid() {
            return Err(ConfigError::NetworkShape {
                shape: self.network,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRate {
                rate: self.mutation_rate,
            });
        }
        if !((2.0 * self.mutation_strength).is_finite() && self.mutation_strength >= 0.0) {
            return Err(ConfigError::MutationStrength {
                strength: self.mutation_strength,
            });
        }
        if !(self.evaluation_window.is_finite() && self.evaluation_window > 0.0) {
            return Err(ConfigError::EvaluationWindow {
                window: self.evaluation_window,
            });
        }
        if self.failed_trial_fitness.is_nan() {
            return Err(ConfigError::FailedTrialFitness);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(TrainingConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_each_invariant() {
        let cases: [(fn(&mut TrainingConfig), fn(&ConfigError) -> bool); 11] = [
            (
                |c| c.population_size = 0,
                |e| matches!(e, ConfigError::EmptyPopulation),
            ),
            (
                |c| c.elite_count = 0,
                |e| matches!(e, ConfigError::EliteCount { .. }),
            ),
            (
                |c| c.elite_count = 13,
                |e| matches!(e, ConfigError::EliteCount { .. }),
            ),
            (
                |c| c.network.hidden = 0,
                |e| matches!(e, ConfigError::NetworkShape { .. }),
            ),
            (
                |c| c.mutation_rate = 1.5,
                |e| matches!(e, ConfigError::MutationRate { .. }),
            ),
            (
                |c| c.mutation_rate = f64::NAN,
                |e| matches!(e, ConfigError::MutationRate { .. }),
            ),
            (
                |c| c.mutation_strength = -0.1,
                |e| matches!(e, ConfigError::MutationStrength { .. }),
            ),
            (
                |c| c.mutation_strength = f32::INFINITY,
                |e| matches!(e, ConfigError::MutationStrength { .. }),
            ),
            (
                |c| c.mutation_strength = f32::MAX,
                |e| matches!(e, ConfigError::MutationStrength { .. }),
            ),
            (
                |c| c.evaluation_window = 0.0,
                |e| matches!(e, ConfigError::EvaluationWindow { .. }),
            ),
            (
                |c| c.failed_trial_fitness = f64::NAN,
                |e| matches!(e, ConfigError::FailedTrialFitness),
            ),
        ];
        for (modify, expected) in cases {
            let mut config = TrainingConfig::default();
            modify(&mut config);
            let err = config.validate().unwrap_err();
            assert!(expected(&err), "unexpected error: {err}");
        }
    }

    #[test]
    fn test_elite_count_may_equal_population_size() {
        let config = TrainingConfig {
            population_size: 1,
            elite_count: 1,
            ..TrainingConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_largest_accepted_strength_can_mutate() {
        use antnest_network::{PolicyNetwork, params};
        use rand::SeedableRng as _;
        use rand_pcg::Pcg32;

        let config = TrainingConfig {
            mutation_rate: 1.0,
            mutation_strength: f32::MAX / 2.0,
            ..TrainingConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));

        let mut rng = Pcg32::seed_from_u64(3);
        let mut network = PolicyNetwork::new(config.network, &mut rng);
        network.mutate(&mut rng, config.mutation_rate, config.mutation_strength);
        let mut values = vec![0.0; 16];
        params::mutate(&mut values, 1.0, config.mutation_strength, &mut rng);
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"population_size": 4, "elite_count": 1}"#).unwrap();
        assert_eq!(config.population_size, 4);
        assert_eq!(config.elite_count, 1);
        assert_eq!(config.network, NetworkShape::new(6, 8, 6));
        assert_eq!(config.seed, 12345);
    }

    #[test]
    fn test_error_message_names_invariant() {
        let config = TrainingConfig {
            elite_count: 20,
            ..TrainingConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "elite count must be in 1..=12 (got 20)"
        );
    }
}
