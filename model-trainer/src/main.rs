use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use model_service::DEFAULT_MODEL_PATH;
use model_trainer::{run_training, TrainingOptions};
use serving_core::LogFormat;

/// Train the Iris classifier and write the model bundle.
#[derive(Parser, Debug)]
#[command(name = "model-trainer", version, about)]
struct Args {
    /// Where to write the model bundle
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    output: PathBuf,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    n_estimators: usize,

    /// Seed for the split and the forest
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of each class held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    /// Deployment environment; anything but `development` logs JSON
    #[arg(long, env = "ENV", default_value = "development")]
    env: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    serving_core::init_with_format("model-trainer", LogFormat::for_mode(args.env == "development"));

    let report = run_training(&TrainingOptions {
        output: args.output,
        n_estimators: args.n_estimators,
        seed: args.seed,
        test_size: args.test_size,
    })?;

    info!(
        accuracy = report.accuracy,
        train_size = report.train_size,
        test_size = report.test_size,
        path = %report.output.display(),
        "Training complete"
    );
    Ok(())
}
