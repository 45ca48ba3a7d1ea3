//! Evolutionary training of policy networks.
//!
//! This crate evolves [`PolicyNetwork`](antnest_network::PolicyNetwork)s with a
//! generational genetic algorithm. Candidates are evaluated one at a time against a
//! live simulation, scored, ranked, and the best of them seed the next generation.
//!
//! # How Training Works
//!
//! 1. **Population** - Create `population_size` networks from the seeded random stream
//! 2. **Trial** - Hand a clone of candidate `i` to the world, which embodies it
//! 3. **Evaluation** - Let the world run for `evaluation_window` simulated seconds
//! 4. **Fitness** - Read the trial's scalar fitness back from the world
//! 5. **Selection** - Once every candidate is scored, keep the top `elite_count`
//! 6. **Mutation** - Fill the rest with mutated copies of random elites
//! 7. **Repeat** - Indefinitely, until the host stops ticking
//!
//! # Architecture
//!
//! ```text
//! Trainer (generation state machine)
//!     ↓ spawn_trial / update_trial / teardown_trial
//! EmbodimentHook (the simulated world)
//!     ↓ read_fitness
//! FitnessSource
//!     ↓ scores
//! Population
//!     ↓ ranked by
//! PopulationEvolver (elitism + mutation)
//!     ↓ produces
//! next Population
//! ```
//!
//! # Scheduling
//!
//! The trainer is single-threaded and never blocks. The host calls
//! [`Trainer::tick`](trainer::Trainer::tick) from its simulation clock; every
//! transition happens on a tick boundary. Exactly one trial is alive at a time
//! because the world is a single shared resource reset between trials.
//!
//! # Determinism
//!
//! All randomness (initialization, parent choice, mutation, and any noise the world
//! draws through [`world::TrainingRng`]) comes from one stream seeded with
//! [`TrainingConfig::seed`](config::TrainingConfig::seed). Two runs with the same seed
//! and the same tick sequence are bit-identical, and a
//! [`TrainingCheckpoint`](checkpoint::TrainingCheckpoint) resumes a run without
//! changing its outcome.
//!
//! # Example
//!
//! ```rust,ignore
//! use antnest_training::{config::TrainingConfig, trainer::Trainer};
//!
//! let mut trainer = Trainer::new(TrainingConfig::default(), world);
//! trainer.start()?;
//! while trainer.current_generation() <= 100 {
//!     trainer.tick(0.1)?;
//! }
//! let best = trainer.current_best_network();
//! ```
//!
//! # Current Limitations
//!
//! - **Sequential only**: candidates are never evaluated in parallel, since the world
//!   is a singleton
//! - **No crossover**: offspring are mutated clones of a single elite
//! - **Fixed topology**: the network shape never evolves

pub mod checkpoint;
pub mod config;
pub mod genetic;
pub mod report;
pub mod trainer;
pub mod world;
