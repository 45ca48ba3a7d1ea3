use std::path::PathBuf;

use antnest_stats::descriptive::DescriptiveStats;

use crate::model::PolicyModel;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Policy model JSON file
    model: PathBuf,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let model = PolicyModel::open(&arg.model)?;
    let shape = model.network.shape();

    println!("Model: {}", model.name);
    println!("  Trained at:    {}", model.trained_at);
    println!("  Generation:    {}", model.generation);
    println!("  Final fitness: {:.3}", model.final_fitness);
    println!(
        "  Shape:         {} -> {} -> {}",
        shape.input, shape.hidden, shape.output
    );
    println!("  Parameters:    {}", shape.parameter_count());

    if let Some(stats) = DescriptiveStats::new(model.network.parameters().map(f64::from)) {
        println!("  Parameter stats:");
        println!("    Min:    {:.4}", stats.min);
        println!("    Max:    {:.4}", stats.max);
        println!("    Mean:   {:.4}", stats.mean);
        println!("    Median: {:.4}", stats.median);
        println!("    StdDev: {:.4}", stats.std_dev);
    }

    Ok(())
}
