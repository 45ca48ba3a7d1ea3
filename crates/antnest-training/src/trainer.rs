//! The generation state machine.
//!
//! The [`Trainer`] evaluates one candidate at a time against a world implementing
//! [`EmbodimentHook`] and [`FitnessSource`], driven by an external periodic tick.
//!
//! # States
//!
//! ```text
//! Idle ──start()──▶ SpawningCandidate ──▶ Evaluating ──(elapsed ≥ window)──▶ Scoring
//!                        ▲                                                    │
//!                        │◀──────────── more candidates in this generation ───┤
//!                        │                                                    ▼
//!                        └────────────── generation + 1 ◀──────────── EvolvingPopulation
//! ```
//!
//! Only `Evaluating` spans ticks. Every other state is passed through within a single
//! call to [`Trainer::start`] or [`Trainer::tick`], so between calls the trainer is
//! either `Idle` or `Evaluating` with exactly one live trial. The one exception is a trial
//! that fails to spawn: the trainer then waits in `Scoring` until the next tick, so a
//! world that refuses every trial still advances one candidate per tick instead of
//! spinning.
//!
//! There is no terminal state. The host decides when to stop calling `tick`.

use antnest_network::PolicyNetwork;
use rand::SeedableRng as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    checkpoint::{CheckpointError, TrainingCheckpoint},
    config::{ConfigError, TrainingConfig},
    genetic::{Population, PopulationEvolver},
    report::GenerationReport,
    world::{EmbodimentHook, FitnessSource, TrainingRng},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Serialize, Deserialize)]
pub enum TrainerPhase {
    Idle,
    SpawningCandidate,
    Evaluating,
    Scoring,
    EvolvingPopulation,
}

/// The best candidate seen so far in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    pub network: PolicyNetwork,
    pub fitness: f64,
    pub generation: u32,
    pub candidate_index: usize,
}

#[derive(
    Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum TrainerError {
    #[display("invalid training configuration: {_0}")]
    #[from]
    Config(ConfigError),
    #[display("invalid checkpoint: {_0}")]
    #[from]
    Checkpoint(CheckpointError),
    #[display("trainer has not been started")]
    NotStarted,
    #[display("tick duration must be finite and non-negative (got {delta_time})")]
    InvalidTick { delta_time: f64 },
}

/// Drives the evolutionary training loop.
///
/// The trainer is the sole owner of the population and of the generation state. The
/// world only ever sees clones of candidate networks.
#[derive(Debug)]
pub struct Trainer<W>
where
    W: EmbodimentHook,
{
    config: TrainingConfig,
    world: W,
    rng: TrainingRng,
    /// Random stream as it was right before the current candidate's trial spawned.
    trial_rng: TrainingRng,
    phase: TrainerPhase,
    population: Population,
    generation: u32,
    candidate_index: usize,
    elapsed: f64,
    champion: Option<Champion>,
    active_trial: Option<W::Trial>,
    trial_failed: bool,
    last_report: Option<GenerationReport>,
}

impl<W> Trainer<W>
where
    W: EmbodimentHook + FitnessSource,
{
    /// Creates an idle trainer. The configuration is validated by [`Self::start`].
    pub fn new(config: TrainingConfig, world: W) -> Self {
        let rng = TrainingRng::seed_from_u64(config.seed);
        Self {
            config,
            world,
            trial_rng: rng.clone(),
            rng,
            phase: TrainerPhase::Idle,
            population: Population::default(),
            generation: 0,
            candidate_index: 0,
            elapsed: 0.0,
            champion: None,
            active_trial: None,
            trial_failed: false,
            last_report: None,
        }
    }

    /// Restores a trainer from a checkpoint and spawns the trial of the checkpointed
    /// candidate.
    pub fn resume(checkpoint: TrainingCheckpoint, world: W) -> Result<Self, TrainerError> {
        checkpoint.config.validate()?;
        checkpoint.validate()?;

        let TrainingCheckpoint {
            config,
            generation,
            candidate_index,
            elapsed: _,
            champion,
            entries,
            rng,
        } = checkpoint;

        let mut trainer = Self::new(config, world);
        trainer.rng = rng;
        trainer.population = Population::from_entries(entries);
        trainer.generation = generation;
        trainer.candidate_index = candidate_index;
        trainer.champion = champion;

        info!(
            generation,
            candidate = candidate_index + 1,
            population_size = trainer.population.len(),
            "resuming training"
        );
        trainer.phase = TrainerPhase::SpawningCandidate;
        trainer.advance();
        Ok(trainer)
    }

    /// Starts (or restarts) the run: validates the configuration, creates the first
    /// generation from the seeded random stream and spawns candidate 0.
    ///
    /// On a configuration error nothing is changed.
    pub fn start(&mut self) -> Result<(), TrainerError> {
        self.config.validate()?;

        if let Some(trial) = self.active_trial.take() {
            self.world.teardown_trial(trial);
        }

        self.rng = TrainingRng::seed_from_u64(self.config.seed);
        self.population = Population::random(
            self.config.network,
            self.config.population_size,
            &mut self.rng,
        );
        self.generation = 1;
        self.candidate_index = 0;
        self.elapsed = 0.0;
        self.champion = None;
        self.trial_failed = false;
        self.last_report = None;

        info!(
            seed = self.config.seed,
            population_size = self.config.population_size,
            elite_count = self.config.elite_count,
            "starting training"
        );
        info!(generation = self.generation, "generation started");
        self.phase = TrainerPhase::SpawningCandidate;
        self.advance();
        Ok(())
    }

    /// Advances the run by `delta_time` simulated seconds.
    pub fn tick(&mut self, delta_time: f64) -> Result<(), TrainerError> {
        if self.phase.is_idle() {
            return Err(TrainerError::NotStarted);
        }
        if !(delta_time.is_finite() && delta_time >= 0.0) {
            return Err(TrainerError::InvalidTick { delta_time });
        }

        if self.phase.is_evaluating() {
            if let Some(trial) = &mut self.active_trial
                && let Err(err) = self.world.update_trial(trial, delta_time, &mut self.rng)
            {
                warn!(
                    generation = self.generation,
                    candidate = self.candidate_index + 1,
                    error = %err,
                    "trial failed during evaluation"
                );
                self.trial_failed = true;
                self.phase = TrainerPhase::Scoring;
            } else {
                self.elapsed += delta_time;
                if self.elapsed >= self.config.evaluation_window {
                    self.phase = TrainerPhase::Scoring;
                }
            }
        }

        self.advance();
        Ok(())
    }

    /// Runs the non-waiting transitions until the trainer has to wait for time to pass.
    fn advance(&mut self) {
        loop {
            match self.phase {
                TrainerPhase::Idle | TrainerPhase::Evaluating => return,
                TrainerPhase::SpawningCandidate => {
                    if !self.spawn_candidate() {
                        return;
                    }
                }
                TrainerPhase::Scoring => self.score_candidate(),
                TrainerPhase::EvolvingPopulation => self.evolve_population(),
            }
        }
    }

    /// Returns `false` if the trial could not be spawned.
    fn spawn_candidate(&mut self) -> bool {
        debug_assert!(self.active_trial.is_none());
        let network = self.population.network(self.candidate_index).clone();
        self.elapsed = 0.0;
        self.trial_rng = self.rng.clone();

        match self.world.spawn_trial(network, &mut self.rng) {
            Ok(trial) => {
                debug!(
                    generation = self.generation,
                    candidate = self.candidate_index + 1,
                    population_size = self.population.len(),
                    "evaluation started"
                );
                self.active_trial = Some(trial);
                self.phase = TrainerPhase::Evaluating;
                true
            }
            Err(err) => {
                warn!(
                    generation = self.generation,
                    candidate = self.candidate_index + 1,
                    error = %err,
                    "failed to spawn trial"
                );
                self.trial_failed = true;
                self.phase = TrainerPhase::Scoring;
                false
            }
        }
    }

    fn score_candidate(&mut self) {
        let fitness = if self.trial_failed {
            self.config.failed_trial_fitness
        } else {
            let fitness = self.world.read_fitness();
            if fitness.is_nan() {
                warn!(
                    generation = self.generation,
                    candidate = self.candidate_index + 1,
                    "world reported NaN fitness"
                );
                self.config.failed_trial_fitness
            } else {
                fitness
            }
        };

        self.population.set_score(self.candidate_index, fitness);
        if self.champion.as_ref().is_none_or(|c| fitness > c.fitness) {
            self.champion = Some(Champion {
                network: self.population.network(self.candidate_index).clone(),
                fitness,
                generation: self.generation,
                candidate_index: self.candidate_index,
            });
        }

        if let Some(trial) = self.active_trial.take() {
            self.world.teardown_trial(trial);
        }

        debug!(
            generation = self.generation,
            candidate = self.candidate_index + 1,
            population_size = self.population.len(),
            fitness,
            best_ever = self.best_fitness_ever(),
            "evaluation finished"
        );

        self.trial_failed = false;
        self.candidate_index += 1;
        self.phase = if self.candidate_index < self.population.len() {
            TrainerPhase::SpawningCandidate
        } else {
            TrainerPhase::EvolvingPopulation
        };
    }

    fn evolve_population(&mut self) {
        if let Some(report) =
            GenerationReport::new(self.generation, &self.population, self.best_fitness_ever())
        {
            info!(
                generation = report.generation,
                top_score = report.top_score,
                mean = report.fitness_stats.mean,
                min = report.fitness_stats.min,
                best_ever = report.best_fitness_ever,
                "generation finished"
            );
            self.last_report = Some(report);
        }

        let evolver = PopulationEvolver::from_config(&self.config);
        self.population = evolver.evolve(&self.population, &mut self.rng);
        self.generation += 1;
        self.candidate_index = 0;

        info!(generation = self.generation, "generation started");
        self.phase = TrainerPhase::SpawningCandidate;
    }

    /// Snapshots the run so it can be continued later with [`Self::resume`].
    pub fn checkpoint(&self) -> Result<TrainingCheckpoint, TrainerError> {
        if self.phase.is_idle() {
            return Err(TrainerError::NotStarted);
        }
        debug_assert!(self.phase.is_evaluating() || self.phase.is_scoring());
        Ok(TrainingCheckpoint {
            config: self.config.clone(),
            generation: self.generation,
            candidate_index: self.candidate_index,
            elapsed: self.elapsed,
            champion: self.champion.clone(),
            entries: self.population.entries(),
            rng: self.trial_rng.clone(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> TrainerPhase {
        self.phase
    }

    /// Current generation number, starting at 1 (0 before [`Self::start`]).
    #[must_use]
    pub fn current_generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn candidate_index(&self) -> usize {
        self.candidate_index
    }

    /// Seconds the current candidate has been evaluated for.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Best fitness recorded so far, or negative infinity before the first score.
    ///
    /// Never decreases during a run.
    #[must_use]
    pub fn best_fitness_ever(&self) -> f64 {
        self.champion
            .as_ref()
            .map_or(f64::NEG_INFINITY, |c| c.fitness)
    }

    #[must_use]
    pub fn champion(&self) -> Option<&Champion> {
        self.champion.as_ref()
    }

    /// Returns a clone of the best network seen so far.
    ///
    /// Before the first score this is candidate 0 of the current population; before
    /// [`Self::start`] there is none.
    #[must_use]
    pub fn current_best_network(&self) -> Option<PolicyNetwork> {
        self.champion
            .as_ref()
            .map(|c| &c.network)
            .or_else(|| self.population.networks().first())
            .cloned()
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&GenerationReport> {
        self.last_report.as_ref()
    }

    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    #[must_use]
    pub fn has_active_trial(&self) -> bool {
        self.active_trial.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use antnest_network::NetworkShape;
    use rand::Rng as _;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Spawn(usize),
        Teardown(usize),
    }

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    #[display("spawn refused")]
    struct SpawnRefused;

    /// In-memory world with scripted or network-derived fitness.
    #[derive(Debug, Default)]
    struct ScriptedWorld {
        scripted: VecDeque<f64>,
        refuse_spawns: VecDeque<bool>,
        events: Vec<Event>,
        spawned: Vec<PolicyNetwork>,
        active: Option<usize>,
        fitness: f64,
        noisy: bool,
    }

    impl ScriptedWorld {
        fn with_scores(scores: &[f64]) -> Self {
            Self {
                scripted: scores.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn teardowns(&self) -> usize {
            self.events
                .iter()
                .filter(|e| matches!(e, Event::Teardown(_)))
                .count()
        }
    }

    fn network_fitness(network: &PolicyNetwork) -> f64 {
        let input = vec![0.5; network.input_size()];
        let output = network.forward(&input).unwrap();
        output.iter().map(|&v| f64::from(v)).sum()
    }

    impl EmbodimentHook for ScriptedWorld {
        type Trial = usize;
        type Error = SpawnRefused;

        fn spawn_trial(
            &mut self,
            network: PolicyNetwork,
            _rng: &mut TrainingRng,
        ) -> Result<usize, SpawnRefused> {
            assert_eq!(self.active, None, "trials must never overlap");
            if self.refuse_spawns.pop_front().unwrap_or(false) {
                return Err(SpawnRefused);
            }
            let id = self.spawned.len();
            (self.fitness, self.noisy) = match self.scripted.pop_front() {
                Some(fitness) => (fitness, false),
                None => (network_fitness(&network), true),
            };
            self.spawned.push(network);
            self.active = Some(id);
            self.events.push(Event::Spawn(id));
            Ok(id)
        }

        fn update_trial(
            &mut self,
            trial: &mut usize,
            delta_time: f64,
            rng: &mut TrainingRng,
        ) -> Result<(), SpawnRefused> {
            assert_eq!(self.active, Some(*trial));
            if self.noisy {
                self.fitness += delta_time * rng.random_range(0.0..0.001);
            }
            Ok(())
        }

        fn teardown_trial(&mut self, trial: usize) {
            assert_eq!(self.active, Some(trial));
            self.active = None;
            self.events.push(Event::Teardown(trial));
        }
    }

    impl FitnessSource for ScriptedWorld {
        fn read_fitness(&self) -> f64 {
            self.fitness
        }
    }

    fn config(population_size: usize, elite_count: usize) -> TrainingConfig {
        TrainingConfig {
            population_size,
            elite_count,
            evaluation_window: 1.0,
            ..TrainingConfig::default()
        }
    }

    fn run_until_generation(trainer: &mut Trainer<ScriptedWorld>, generation: u32) {
        while trainer.current_generation() < generation {
            trainer.tick(0.5).unwrap();
        }
    }

    #[test]
    fn test_tick_before_start() {
        let mut trainer = Trainer::new(config(3, 1), ScriptedWorld::default());
        assert_eq!(trainer.tick(1.0), Err(TrainerError::NotStarted));
        assert!(trainer.checkpoint().is_err());
        assert_eq!(trainer.current_best_network(), None);
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let mut trainer = Trainer::new(config(3, 4), ScriptedWorld::default());
        let err = trainer.start().unwrap_err();
        assert!(matches!(
            err,
            TrainerError::Config(ConfigError::EliteCount { .. })
        ));
        assert!(trainer.phase().is_idle());
        assert!(trainer.population().is_empty());
        assert!(trainer.world().events.is_empty());
    }

    #[test]
    fn test_rejects_invalid_tick() {
        let mut trainer = Trainer::new(config(3, 1), ScriptedWorld::default());
        trainer.start().unwrap();
        assert!(matches!(
            trainer.tick(-1.0),
            Err(TrainerError::InvalidTick { .. })
        ));
        assert!(trainer.tick(f64::NAN).is_err());
        assert_eq!(trainer.elapsed(), 0.0);
    }

    #[test]
    fn test_start_spawns_first_candidate() {
        let mut trainer = Trainer::new(config(3, 1), ScriptedWorld::default());
        trainer.start().unwrap();
        assert!(trainer.phase().is_evaluating());
        assert_eq!(trainer.current_generation(), 1);
        assert_eq!(trainer.candidate_index(), 0);
        assert!(trainer.has_active_trial());
        assert_eq!(trainer.world().events, vec![Event::Spawn(0)]);
        assert_eq!(&trainer.world().spawned[0], trainer.population().network(0));
        assert_eq!(
            trainer.current_best_network().as_ref(),
            Some(trainer.population().network(0))
        );
    }

    #[test]
    fn test_elapsed_accumulates_until_window() {
        let mut trainer = Trainer::new(config(3, 1), ScriptedWorld::default());
        trainer.start().unwrap();
        for _ in 0..3 {
            trainer.tick(0.25).unwrap();
        }
        assert_eq!(trainer.candidate_index(), 0);
        assert_eq!(trainer.elapsed(), 0.75);
        trainer.tick(0.25).unwrap();
        assert_eq!(trainer.candidate_index(), 1);
        assert_eq!(trainer.elapsed(), 0.0);
        assert!(trainer.phase().is_evaluating());
    }

    #[test]
    fn test_sequential_evaluation() {
        let population_size = 5;
        let mut trainer = Trainer::new(config(population_size, 2), ScriptedWorld::default());
        trainer.start().unwrap();
        for _ in 0..population_size {
            trainer.tick(1.0).unwrap();
        }

        let world = trainer.world();
        assert_eq!(world.teardowns(), population_size);
        let expected = (0..population_size)
            .flat_map(|i| [Event::Spawn(i), Event::Teardown(i)])
            .chain([Event::Spawn(population_size)])
            .collect::<Vec<_>>();
        assert_eq!(world.events, expected);
        assert_eq!(trainer.current_generation(), 2);
        assert_eq!(trainer.candidate_index(), 0);
    }

    #[test]
    fn test_end_to_end_single_elite_zero_strength() {
        let mut config = config(4, 1);
        config.mutation_rate = 1.0;
        config.mutation_strength = 0.0;
        let world = ScriptedWorld::with_scores(&[10.0, 30.0, 20.0, 5.0]);
        let mut trainer = Trainer::new(config, world);
        trainer.start().unwrap();
        let initial = trainer.population().clone();

        for _ in 0..4 {
            trainer.tick(1.0).unwrap();
        }

        assert_eq!(trainer.current_generation(), 2);
        let next = trainer.population();
        assert_eq!(next.len(), 4);
        for network in next.networks() {
            assert_eq!(network, initial.network(1));
        }
        assert_eq!(next.scores(), &[0.0; 4]);
        assert_eq!(trainer.best_fitness_ever(), 30.0);

        let report = trainer.last_report().unwrap();
        assert_eq!(report.generation, 1);
        assert_eq!(report.ranking, vec![1, 2, 0, 3]);
        assert_eq!(report.top_score, 30.0);

        let champion = trainer.champion().unwrap();
        assert_eq!(champion.candidate_index, 1);
        assert_eq!(champion.generation, 1);
        assert_eq!(&champion.network, initial.network(1));
    }

    #[test]
    fn test_elitism_preserves_top_three() {
        let world = ScriptedWorld::with_scores(&[1.0, 9.0, 4.0, 7.0, 2.0, 8.0]);
        let mut config = config(6, 3);
        config.mutation_rate = 1.0;
        let mut trainer = Trainer::new(config, world);
        trainer.start().unwrap();
        let initial = trainer.population().clone();
        run_until_generation(&mut trainer, 2);

        let next = trainer.population();
        assert_eq!(next.network(0), initial.network(1));
        assert_eq!(next.network(1), initial.network(5));
        assert_eq!(next.network(2), initial.network(3));
    }

    #[test]
    fn test_stable_tie_break_through_trainer() {
        let world = ScriptedWorld::with_scores(&[5.0, 5.0, 5.0]);
        let mut trainer = Trainer::new(config(3, 3), world);
        trainer.start().unwrap();
        let initial = trainer.population().clone();
        run_until_generation(&mut trainer, 2);

        assert_eq!(trainer.last_report().unwrap().ranking, vec![0, 1, 2]);
        assert_eq!(trainer.population().networks(), initial.networks());
        assert_eq!(trainer.champion().unwrap().candidate_index, 0);
    }

    #[test]
    fn test_population_size_invariant() {
        for population_size in 1..=4 {
            let mut trainer =
                Trainer::new(config(population_size, 1), ScriptedWorld::default());
            trainer.start().unwrap();
            for generation in 2..=4 {
                run_until_generation(&mut trainer, generation);
                assert_eq!(trainer.population().len(), population_size);
                assert_eq!(trainer.population().scores().len(), population_size);
            }
        }
    }

    #[test]
    fn test_best_fitness_is_monotonic() {
        let world = ScriptedWorld::with_scores(&[1.0, 5.0, 3.0, 0.0, 0.0, 0.0, -1.0, 2.0, 4.0]);
        let mut trainer = Trainer::new(config(3, 1), world);
        trainer.start().unwrap();
        let mut best = trainer.best_fitness_ever();
        for _ in 0..12 {
            trainer.tick(1.0).unwrap();
            assert!(trainer.best_fitness_ever() >= best);
            best = trainer.best_fitness_ever();
        }
        assert!(best >= 5.0);
        assert_eq!(trainer.last_report().unwrap().best_fitness_ever, best);
    }

    #[test]
    fn test_negative_scores_are_kept() {
        let world = ScriptedWorld::with_scores(&[-3.0, -1.0, -2.0]);
        let mut trainer = Trainer::new(config(3, 1), world);
        trainer.start().unwrap();
        trainer.tick(1.0).unwrap();
        trainer.tick(1.0).unwrap();
        assert_eq!(trainer.population().scores()[..2], [-3.0, -1.0]);
        assert_eq!(trainer.best_fitness_ever(), -1.0);
    }

    #[test]
    fn test_determinism_for_fixed_seed() {
        let run = || {
            let mut trainer = Trainer::new(config(6, 2), ScriptedWorld::default());
            trainer.start().unwrap();
            for _ in 0..40 {
                trainer.tick(0.3).unwrap();
            }
            trainer
        };
        let a = run();
        let b = run();
        assert_eq!(a.population(), b.population());
        assert_eq!(a.champion(), b.champion());
        assert_eq!(a.current_best_network(), b.current_best_network());
        assert_eq!(a.current_generation(), b.current_generation());
        assert!(a.current_generation() > 1);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = Trainer::new(config(3, 1), ScriptedWorld::default());
        let mut b = Trainer::new(
            TrainingConfig {
                seed: 1,
                ..config(3, 1)
            },
            ScriptedWorld::default(),
        );
        a.start().unwrap();
        b.start().unwrap();
        assert_ne!(a.population(), b.population());
    }

    #[test]
    fn test_failed_spawn_records_failed_fitness() {
        let world = ScriptedWorld {
            refuse_spawns: [false, true].into_iter().collect(),
            scripted: [4.0, 6.0].into_iter().collect(),
            ..ScriptedWorld::default()
        };
        let mut config = config(3, 1);
        config.failed_trial_fitness = -10.0;
        let mut trainer = Trainer::new(config, world);
        trainer.start().unwrap();

        // candidate 0 finishes; candidate 1 fails to spawn and waits for the next tick
        trainer.tick(1.0).unwrap();
        assert!(trainer.phase().is_scoring());
        assert!(!trainer.has_active_trial());
        assert_eq!(trainer.candidate_index(), 1);

        trainer.tick(0.0).unwrap();
        assert_eq!(trainer.population().scores()[1], -10.0);
        assert_eq!(trainer.candidate_index(), 2);
        assert!(trainer.phase().is_evaluating());
        assert_eq!(
            trainer.world().events,
            vec![Event::Spawn(0), Event::Teardown(0), Event::Spawn(1)]
        );
    }

    #[test]
    fn test_nan_fitness_is_replaced() {
        let world = ScriptedWorld::with_scores(&[f64::NAN, 1.0]);
        let mut trainer = Trainer::new(config(2, 1), world);
        trainer.start().unwrap();
        trainer.tick(1.0).unwrap();
        assert_eq!(trainer.population().scores()[0], 0.0);
    }

    #[test]
    fn test_restart_tears_down_active_trial() {
        let mut trainer = Trainer::new(config(2, 1), ScriptedWorld::default());
        trainer.start().unwrap();
        trainer.tick(1.0).unwrap();
        trainer.start().unwrap();
        assert_eq!(trainer.current_generation(), 1);
        assert_eq!(trainer.candidate_index(), 0);
        assert_eq!(trainer.world().teardowns(), 2);
        assert_eq!(trainer.best_fitness_ever(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_checkpoint_resume_matches_uninterrupted_run() {
        let mut uninterrupted = Trainer::new(config(5, 2), ScriptedWorld::default());
        uninterrupted.start().unwrap();
        run_until_generation(&mut uninterrupted, 4);

        let mut interrupted = Trainer::new(config(5, 2), ScriptedWorld::default());
        interrupted.start().unwrap();
        for _ in 0..13 {
            interrupted.tick(0.5).unwrap();
        }
        let checkpoint = interrupted.checkpoint().unwrap();
        assert_eq!(checkpoint.elapsed, 0.5);
        let json = serde_json::to_string(&checkpoint).unwrap();
        let restored: TrainingCheckpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, checkpoint);

        let mut resumed = Trainer::resume(restored, ScriptedWorld::default()).unwrap();
        assert_eq!(resumed.current_generation(), checkpoint.generation);
        assert_eq!(resumed.candidate_index(), checkpoint.candidate_index);
        assert_eq!(resumed.elapsed(), 0.0);
        run_until_generation(&mut resumed, 4);

        assert_eq!(resumed.population(), uninterrupted.population());
        assert_eq!(resumed.champion(), uninterrupted.champion());
    }

    #[test]
    fn test_resume_rejects_inconsistent_checkpoint() {
        let mut trainer = Trainer::new(config(3, 1), ScriptedWorld::default());
        trainer.start().unwrap();
        let mut checkpoint = trainer.checkpoint().unwrap();
        checkpoint.candidate_index = 3;
        assert!(matches!(
            Trainer::resume(checkpoint.clone(), ScriptedWorld::default()),
            Err(TrainerError::Checkpoint(CheckpointError::CandidateIndex { .. }))
        ));

        checkpoint.candidate_index = 0;
        checkpoint.config.network = NetworkShape::new(3, 3, 3);
        assert!(matches!(
            Trainer::resume(checkpoint, ScriptedWorld::default()),
            Err(TrainerError::Checkpoint(CheckpointError::NetworkShape { index: 0 }))
        ));
    }

    #[test]
    fn test_errors_convert_into_trainer_error() {
        let err: TrainerError = ConfigError::EmptyPopulation.into();
        assert_eq!(err, TrainerError::Config(ConfigError::EmptyPopulation));
        let err: TrainerError = CheckpointError::Generation.into();
        assert!(matches!(err, TrainerError::Checkpoint(_)));
        assert_eq!(
            err.to_string(),
            "invalid checkpoint: checkpoint generation must be at least 1"
        );
    }
}
