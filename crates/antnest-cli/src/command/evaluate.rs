use std::path::PathBuf;

use antnest_sandbox::colony::{ColonyWorld, SandboxConfig};
use antnest_training::{
    config::TrainingConfig,
    world::{EmbodimentHook as _, FitnessSource as _, TrainingRng},
};
use rand::SeedableRng as _;
use serde::Serialize;

use crate::{
    model::PolicyModel,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Policy model JSON file
    model: PathBuf,
    /// Seed of the observation noise stream
    #[arg(long, default_value_t = TrainingConfig::default().seed)]
    seed: u64,
    /// Override the terrain seed of the sandbox
    #[arg(long)]
    terrain_seed: Option<u64>,
    /// Simulated seconds the trial runs for
    #[arg(long, default_value_t = TrainingConfig::default().evaluation_window)]
    window: f64,
    /// Simulated seconds per update
    #[arg(long, default_value_t = 0.1)]
    tick: f64,
    /// Sandbox configuration JSON file
    #[arg(long)]
    sandbox: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct Evaluation {
    model: String,
    seed: u64,
    terrain_seed: u64,
    window: f64,
    fitness: f64,
    queen_alive: bool,
    queen_health: f64,
    workers_alive: usize,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    anyhow::ensure!(
        arg.tick.is_finite() && arg.tick > 0.0,
        "tick must be finite and positive (got {})",
        arg.tick
    );

    let model = PolicyModel::open(&arg.model)?;
    let mut sandbox: SandboxConfig =
        util::read_optional_json_file("sandbox config", arg.sandbox.as_ref())?;
    if let Some(terrain_seed) = arg.terrain_seed {
        sandbox.terrain.seed = terrain_seed;
    }
    let terrain_seed = sandbox.terrain.seed;

    let mut world = ColonyWorld::new(sandbox)?;
    let mut rng = TrainingRng::seed_from_u64(arg.seed);
    let mut trial = world.spawn_trial(model.network, &mut rng)?;

    let mut elapsed = 0.0;
    while elapsed < arg.window {
        world.update_trial(&mut trial, arg.tick, &mut rng)?;
        elapsed += arg.tick;
    }

    let evaluation = Evaluation {
        model: model.name,
        seed: arg.seed,
        terrain_seed,
        window: arg.window,
        fitness: world.read_fitness(),
        queen_alive: trial.queen().is_alive(),
        queen_health: trial.queen().health(),
        workers_alive: trial.workers().len(),
    };
    world.teardown_trial(trial);

    Output::save_json(&evaluation, arg.output.as_deref())?;
    Ok(())
}
