use clap::{Parser, Subcommand};

use self::{evaluate::EvaluateArg, inspect::InspectArg, train::TrainArg};

mod evaluate;
mod inspect;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a queen policy in the colony sandbox
    Train(#[clap(flatten)] TrainArg),
    /// Run one sandbox trial of a saved model
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Print the shape, metadata and parameter statistics of a saved model
    Inspect(#[clap(flatten)] InspectArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
    }
    Ok(())
}
