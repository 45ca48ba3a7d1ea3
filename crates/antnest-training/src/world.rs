//! Interfaces between the trainer and the simulated world it evaluates candidates in.
//!
//! The trainer never reaches into the world directly. It owns one value implementing
//! both [`EmbodimentHook`] and [`FitnessSource`] and calls it at well-defined points
//! of the generation state machine:
//!
//! ```text
//! spawn_trial(candidate clone) → update_trial × N ticks → read_fitness → teardown_trial
//! ```
//!
//! At most one trial is alive at any time.

use std::fmt;

use antnest_network::PolicyNetwork;
use rand_pcg::Pcg32;

/// The single random stream shared by initialization, mutation and the world.
///
/// Worlds that inject noise into a candidate's observations draw it from this stream
/// so that a whole training run replays identically for a given seed.
pub type TrainingRng = Pcg32;

/// Instantiates and releases the embodiment of a candidate policy.
pub trait EmbodimentHook {
    /// World-side handle of one running trial.
    type Trial: fmt::Debug;
    /// Failure to run a trial. Fatal to that trial only.
    type Error: std::error::Error;

    /// Instantiates whatever the trial needs, controlled by `network`.
    ///
    /// The network is an owned clone; the trial may keep it for its whole lifetime.
    /// Implementations must reset any world state left behind by earlier trials.
    fn spawn_trial(
        &mut self,
        network: PolicyNetwork,
        rng: &mut TrainingRng,
    ) -> Result<Self::Trial, Self::Error>;

    /// Advances the trial by `delta_time` simulated seconds.
    ///
    /// Worlds that simulate themselves outside the trainer keep the default no-op.
    fn update_trial(
        &mut self,
        trial: &mut Self::Trial,
        delta_time: f64,
        rng: &mut TrainingRng,
    ) -> Result<(), Self::Error> {
        let _ = (trial, delta_time, rng);
        Ok(())
    }

    /// Releases every simulated resource held by the trial.
    fn teardown_trial(&mut self, trial: Self::Trial);
}

/// Reports how well the most recent trial did.
pub trait FitnessSource {
    /// Returns the scalar fitness of the current trial.
    ///
    /// Must reflect only the current trial. Zero and negative values are valid scores.
    fn read_fitness(&self) -> f64;
}
