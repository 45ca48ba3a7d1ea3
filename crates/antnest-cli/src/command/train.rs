use std::path::PathBuf;

use anyhow::Context as _;
use antnest_sandbox::colony::{ColonyWorld, SandboxConfig};
use antnest_training::{checkpoint::TrainingCheckpoint, config::TrainingConfig, trainer::Trainer};
use chrono::Utc;
use tracing::info;

use crate::{
    model::PolicyModel,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training configuration JSON file (defaults are used for missing fields)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Sandbox configuration JSON file
    #[arg(long)]
    sandbox: Option<PathBuf>,
    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Override the population size
    #[arg(long)]
    population_size: Option<usize>,
    /// Override the number of elites kept per generation
    #[arg(long)]
    elite_count: Option<usize>,
    /// Stop once this many generations have completed
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    generations: u32,
    /// Simulated seconds per trainer tick
    #[arg(long, default_value_t = 0.1)]
    tick: f64,
    /// Write a checkpoint to this file after every generation
    #[arg(long)]
    checkpoint: Option<PathBuf>,
    /// Continue the run stored in this checkpoint file
    #[arg(long, conflicts_with_all = ["config", "seed", "population_size", "elite_count"])]
    resume: Option<PathBuf>,
    /// Name stored in the saved model
    #[arg(long, default_value = "queen")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn training_config(arg: &TrainArg) -> anyhow::Result<TrainingConfig> {
    let mut config: TrainingConfig =
        util::read_optional_json_file("training config", arg.config.as_ref())?;
    if let Some(seed) = arg.seed {
        config.seed = seed;
    }
    if let Some(population_size) = arg.population_size {
        config.population_size = population_size;
    }
    if let Some(elite_count) = arg.elite_count {
        config.elite_count = elite_count;
    }
    config.validate()?;
    Ok(config)
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    anyhow::ensure!(
        arg.tick.is_finite() && arg.tick > 0.0,
        "tick must be finite and positive (got {})",
        arg.tick
    );

    let sandbox: SandboxConfig =
        util::read_optional_json_file("sandbox config", arg.sandbox.as_ref())?;
    let world = ColonyWorld::new(sandbox)?;

    let mut trainer = match &arg.resume {
        Some(path) => {
            let checkpoint: TrainingCheckpoint = util::read_json_file("checkpoint", path)?;
            let trainer = Trainer::resume(checkpoint, world)?;
            info!(
                path = %path.display(),
                generation = trainer.current_generation(),
                candidate = trainer.candidate_index() + 1,
                "resumed training"
            );
            trainer
        }
        None => {
            let mut trainer = Trainer::new(training_config(arg)?, world);
            trainer.start()?;
            trainer
        }
    };

    let mut generation = trainer.current_generation();
    while trainer.current_generation() <= arg.generations {
        trainer.tick(arg.tick)?;
        if trainer.current_generation() != generation {
            generation = trainer.current_generation();
            if let Some(path) = &arg.checkpoint {
                Output::save_json(&trainer.checkpoint()?, Some(path.as_path()))?;
            }
        }
    }

    let champion = trainer
        .champion()
        .context("training finished without scoring any candidate")?;
    let model = PolicyModel {
        name: arg.name.clone(),
        trained_at: Utc::now(),
        generation: champion.generation,
        final_fitness: champion.fitness,
        network: champion.network.clone(),
    };
    Output::save_json(&model, arg.output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Generation: {}", model.generation);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    if let Some(report) = trainer.last_report() {
        eprintln!(
            "  Last generation: #{} (top {:.3}, mean {:.3})",
            report.generation, report.top_score, report.fitness_stats.mean
        );
    }

    Ok(())
}
