//! A small colony world for driving the antnest trainer end to end.
//!
//! [`ColonyWorld`](colony::ColonyWorld) implements both
//! [`EmbodimentHook`](antnest_training::world::EmbodimentHook) and
//! [`FitnessSource`](antnest_training::world::FitnessSource): every trial puts one queen
//! on a freshly generated voxel terrain and lets the candidate policy steer her.
//!
//! # Rules
//!
//! - The queen starts at full health in the middle of the terrain and loses health
//!   over time, twice as fast while standing on acid
//! - Standing on mulch eats it and restores part of her health
//! - Every `action_interval` seconds the policy sees
//!   `[health, on mulch, on acid, noise, can place nest, ready to nest]` and the
//!   highest of its six outputs picks an action: move north/south/west/east, dig, or
//!   place a nest
//! - Moves fail if the step up or down is higher than [`ant::MAX_CLIMB`]; digging
//!   never removes containers or nests
//! - A nest costs a third of her maximum health and can only be placed into air, away
//!   from the terrain border
//! - A dead queen stops acting
//! - Worker ants spawned next to her wander randomly and eat mulch too, so food is
//!   contested
//!
//! Fitness is the number of nests placed during the current trial.

pub mod ant;
pub mod block;
pub mod colony;
pub mod terrain;
