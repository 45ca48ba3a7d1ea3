//! The colony world: a queen on freshly generated terrain, steered by a policy.

use antnest_network::{InputLengthError, PolicyNetwork, action};
use antnest_training::world::{EmbodimentHook, FitnessSource, TrainingRng};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    ant::{Action, Ant, AntConfig, OBSERVATION_LEN},
    terrain::{Column, Terrain, TerrainConfig, TerrainError, TerrainGenerator},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub terrain: TerrainConfig,
    /// Health and nest parameters, shared by the queen and her workers.
    pub ants: AntConfig,
    /// Simulated seconds between two decisions of the queen.
    pub action_interval: f64,
    /// Workers spawned next to the queen at the start of every trial.
    pub worker_count: usize,
    /// Probability that a worker tries to move at each action step.
    pub worker_move_chance: f64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            ants: AntConfig::default(),
            action_interval: 0.25,
            worker_count: 12,
            worker_move_chance: 0.2,
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum SandboxError {
    #[display("invalid terrain: {_0}")]
    #[from]
    Terrain(TerrainError),
    #[display("action interval must be finite and positive (got {interval})")]
    ActionInterval { interval: f64 },
    #[display("worker move chance must be in [0, 1] (got {chance})")]
    WorkerMoveChance { chance: f64 },
    #[display(
        "queen needs a network with 6 inputs and 6 outputs (got {input} inputs, {output} outputs)"
    )]
    NetworkShape { input: usize, output: usize },
    #[display("policy rejected the observation: {_0}")]
    #[from]
    Observation(InputLengthError),
}

/// One running trial: the queen, the network controlling her and her workers.
#[derive(Debug)]
pub struct ColonyTrial {
    queen: Ant,
    network: PolicyNetwork,
    workers: Vec<Ant>,
    action_timer: f64,
}

impl ColonyTrial {
    #[must_use]
    pub fn queen(&self) -> &Ant {
        &self.queen
    }

    #[must_use]
    pub fn network(&self) -> &PolicyNetwork {
        &self.network
    }

    /// Workers still alive.
    #[must_use]
    pub fn workers(&self) -> &[Ant] {
        &self.workers
    }
}

/// Sandbox implementing both trainer-facing interfaces.
///
/// The terrain is regenerated from the terrain seed on every spawn, and fitness is
/// the number of nests the current trial's queen has placed.
#[derive(Debug)]
pub struct ColonyWorld {
    config: SandboxConfig,
    generator: TerrainGenerator,
    terrain: Terrain,
    nests_placed: usize,
}

impl ColonyWorld {
    pub fn new(config: SandboxConfig) -> Result<Self, SandboxError> {
        let interval = config.action_interval;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(SandboxError::ActionInterval { interval });
        }
        let chance = config.worker_move_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(SandboxError::WorkerMoveChance { chance });
        }
        let generator = TerrainGenerator::new(config.terrain.clone())?;
        let terrain = generator.generate();
        Ok(Self {
            config,
            generator,
            terrain,
            nests_placed: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    #[must_use]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Height of the topmost solid block at `(x, z)`.
    #[must_use]
    pub fn surface_height(&self, x: usize, z: usize) -> Option<usize> {
        self.terrain.surface_height(Column::new(x, z))
    }

    #[must_use]
    pub fn nests_placed(&self) -> usize {
        self.nests_placed
    }

    fn spawn_column(&self) -> Column {
        Column::new(self.terrain.width() / 2, self.terrain.depth() / 2)
    }

    /// Workers line up two rows beside the queen, kept off the container ring.
    fn worker_columns(&self) -> impl Iterator<Item = Column> + use<> {
        let queen = self.spawn_column();
        let max_x = self.terrain.width() - 2;
        let z = (queen.z + 2).min(self.terrain.depth() - 2);
        (0..self.config.worker_count).map(move |i| Column::new((queen.x + 2 + i).min(max_x), z))
    }

    fn step(&mut self, trial: &mut ColonyTrial, rng: &mut TrainingRng) -> Result<(), SandboxError> {
        let ants = &self.config.ants;
        trial.queen.try_eat(&mut self.terrain, ants);

        let noise = observation_noise(rng);
        let observation = trial.queen.observe(&self.terrain, ants, noise);
        let scores = trial.network.forward(&observation)?;
        if let Some(action) = action::argmax(&scores).and_then(Action::from_index) {
            let outcome = trial.queen.act(action, &mut self.terrain, ants);
            trace!(?action, ?outcome, health = trial.queen.health(), "queen acted");
            if outcome.is_nest_placed() {
                self.nests_placed += 1;
            }
        }

        for worker in &mut trial.workers {
            worker.try_eat(&mut self.terrain, ants);
            if rng.random_bool(self.config.worker_move_chance) {
                worker.wander(&self.terrain, rng);
            }
        }
        Ok(())
    }
}

/// Noise input of the queen's observation, uniform in `[-1, 1]`.
fn observation_noise<R>(rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    rng.random_range(-1.0..=1.0)
}

impl EmbodimentHook for ColonyWorld {
    type Trial = ColonyTrial;
    type Error = SandboxError;

    fn spawn_trial(
        &mut self,
        network: PolicyNetwork,
        _rng: &mut TrainingRng,
    ) -> Result<Self::Trial, Self::Error> {
        if network.input_size() != OBSERVATION_LEN || network.output_size() != Action::ALL.len() {
            return Err(SandboxError::NetworkShape {
                input: network.input_size(),
                output: network.output_size(),
            });
        }

        self.terrain = self.generator.generate();
        self.nests_placed = 0;
        let ants = &self.config.ants;
        let queen = Ant::new(self.spawn_column(), ants);
        let workers = self.worker_columns().map(|c| Ant::new(c, ants)).collect();
        Ok(ColonyTrial {
            queen,
            network,
            workers,
            action_timer: 0.0,
        })
    }

    fn update_trial(
        &mut self,
        trial: &mut Self::Trial,
        delta_time: f64,
        rng: &mut TrainingRng,
    ) -> Result<(), Self::Error> {
        if !trial.queen.is_alive() {
            return Ok(());
        }
        let ants = &self.config.ants;
        trial.queen.decay(&self.terrain, ants, delta_time);
        for worker in &mut trial.workers {
            worker.decay(&self.terrain, ants, delta_time);
        }
        trial.workers.retain(Ant::is_alive);

        trial.action_timer += delta_time;
        while trial.action_timer >= self.config.action_interval && trial.queen.is_alive() {
            trial.action_timer -= self.config.action_interval;
            self.step(trial, rng)?;
        }
        Ok(())
    }

    fn teardown_trial(&mut self, trial: Self::Trial) {
        debug!(
            nests = self.nests_placed,
            health = trial.queen.health(),
            alive = trial.queen.is_alive(),
            workers_alive = trial.workers.len(),
            "colony trial finished"
        );
    }
}

impl FitnessSource for ColonyWorld {
    #[expect(clippy::cast_precision_loss)]
    fn read_fitness(&self) -> f64 {
        self.nests_placed as f64
    }
}

#[cfg(test)]
mod tests {
    use antnest_network::NetworkShape;
    use antnest_training::{config::TrainingConfig, trainer::Trainer};
    use rand::SeedableRng as _;

    use super::*;

    fn rng() -> TrainingRng {
        TrainingRng::seed_from_u64(12345)
    }

    fn network(rng: &mut TrainingRng) -> PolicyNetwork {
        PolicyNetwork::new(NetworkShape::default(), rng)
    }

    #[test]
    fn test_rejects_invalid_action_interval() {
        let err = ColonyWorld::new(SandboxConfig {
            action_interval: 0.0,
            ..SandboxConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, SandboxError::ActionInterval { .. }));
    }

    #[test]
    fn test_rejects_mismatched_network() {
        let mut rng = rng();
        let mut world = ColonyWorld::new(SandboxConfig::default()).unwrap();
        let network = PolicyNetwork::new(NetworkShape::new(4, 8, 6), &mut rng);
        let err = world.spawn_trial(network, &mut rng).unwrap_err();
        assert_eq!(err, SandboxError::NetworkShape { input: 4, output: 6 });
    }

    #[test]
    fn test_spawn_resets_world() {
        let mut rng = rng();
        let mut world = ColonyWorld::new(SandboxConfig::default()).unwrap();
        let pristine = world.terrain().clone();

        let mut trial = world.spawn_trial(network(&mut rng), &mut rng).unwrap();
        for _ in 0..200 {
            world.update_trial(&mut trial, 0.1, &mut rng).unwrap();
        }
        world.teardown_trial(trial);

        let trial = world.spawn_trial(network(&mut rng), &mut rng).unwrap();
        assert_eq!(world.terrain(), &pristine);
        assert_eq!(world.nests_placed(), 0);
        assert!(world.read_fitness().abs() < f64::EPSILON);
        assert!((trial.queen().health() - world.config().ants.max_health).abs() < f64::EPSILON);
        world.teardown_trial(trial);
    }

    #[test]
    fn test_queen_dies_and_stops_acting() {
        let mut rng = rng();
        let mut world = ColonyWorld::new(SandboxConfig::default()).unwrap();
        let mut trial = world.spawn_trial(network(&mut rng), &mut rng).unwrap();
        world.update_trial(&mut trial, 1000.0, &mut rng).unwrap();
        assert!(!trial.queen().is_alive());

        let before = rng.clone();
        world.update_trial(&mut trial, 1.0, &mut rng).unwrap();
        assert_eq!(rng, before);
    }

    #[test]
    fn test_fitness_counts_nests() {
        let mut rng = rng();
        let mut world = ColonyWorld::new(SandboxConfig::default()).unwrap();
        let mut trial = world.spawn_trial(network(&mut rng), &mut rng).unwrap();
        for _ in 0..250 {
            world.update_trial(&mut trial, 0.1, &mut rng).unwrap();
        }
        let nests = world.terrain().count(crate::block::BlockKind::Nest);
        assert_eq!(nests, world.nests_placed());
        #[expect(clippy::cast_precision_loss)]
        let expected = world.nests_placed() as f64;
        assert!((world.read_fitness() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_invalid_worker_move_chance() {
        let err = ColonyWorld::new(SandboxConfig {
            worker_move_chance: 1.5,
            ..SandboxConfig::default()
        })
        .unwrap_err();
        assert_eq!(err, SandboxError::WorkerMoveChance { chance: 1.5 });
    }

    #[test]
    fn test_terrain_errors_surface_from_new() {
        let err = ColonyWorld::new(SandboxConfig {
            terrain: TerrainConfig {
                width: 2,
                ..TerrainConfig::default()
            },
            ..SandboxConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, SandboxError::Terrain(TerrainError::TooSmall { .. })));
        let err: SandboxError = InputLengthError {
            expected: 6,
            actual: 5,
        }
        .into();
        assert!(matches!(err, SandboxError::Observation(_)));
    }

    #[test]
    fn test_observation_noise_is_signed() {
        let mut rng = rng();
        let samples = (0..1000)
            .map(|_| observation_noise(&mut rng))
            .collect::<Vec<_>>();
        assert!(samples.iter().all(|n| (-1.0..=1.0).contains(n)));
        assert!(samples.iter().any(|&n| n < -0.5));
        assert!(samples.iter().any(|&n| n > 0.5));
    }

    #[test]
    fn test_workers_spawn_beside_queen_and_wander() {
        let mut rng = rng();
        let mut world = ColonyWorld::new(SandboxConfig::default()).unwrap();
        let mut trial = world.spawn_trial(network(&mut rng), &mut rng).unwrap();
        assert_eq!(trial.workers().len(), 12);
        let start = trial
            .workers()
            .iter()
            .map(Ant::column)
            .collect::<Vec<_>>();
        assert!(
            start
                .iter()
                .all(|&c| world.terrain().is_interior(c, 1) && c != trial.queen().column())
        );

        for _ in 0..20 {
            world.update_trial(&mut trial, 0.25, &mut rng).unwrap();
        }
        let moved = trial
            .workers()
            .iter()
            .zip(&start)
            .any(|(w, &c)| w.column() != c);
        assert!(moved);
    }

    #[test]
    fn test_workers_decay_like_the_queen() {
        let mut rng = rng();
        let mut world = ColonyWorld::new(SandboxConfig::default()).unwrap();
        let mut trial = world.spawn_trial(network(&mut rng), &mut rng).unwrap();
        world.update_trial(&mut trial, 31.0, &mut rng).unwrap();
        assert!(!trial.queen().is_alive());
        assert!(trial.workers().is_empty());
    }

    #[test]
    fn test_surface_height_accessor() {
        let world = ColonyWorld::new(SandboxConfig::default()).unwrap();
        let column = Column::new(5, 7);
        assert_eq!(
            world.surface_height(5, 7),
            world.terrain().surface_height(column)
        );
        assert_eq!(world.surface_height(100, 0), None);
    }

    #[test]
    fn test_training_runs_are_reproducible() {
        let config = TrainingConfig {
            population_size: 4,
            elite_count: 2,
            evaluation_window: 5.0,
            ..TrainingConfig::default()
        };
        let run = || {
            let world = ColonyWorld::new(SandboxConfig::default()).unwrap();
            let mut trainer = Trainer::new(config.clone(), world);
            trainer.start().unwrap();
            while trainer.current_generation() < 3 {
                trainer.tick(0.5).unwrap();
            }
            (trainer.population().clone(), trainer.best_fitness_ever())
        };
        let (first, first_best) = run();
        let (second, second_best) = run();
        assert_eq!(first, second);
        assert_eq!(first_best.to_bits(), second_best.to_bits());
    }
}
