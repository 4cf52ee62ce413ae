use crate::infra::{apply_overrides, heuristic_scorer, parse_decay_km};
use clap::Args;
use food_rescue::allocation::scoring::FEATURE_NAMES;
use food_rescue::allocation::training::{bootstrap, DEFAULT_SAMPLE_COUNT, DEFAULT_SEED};
use food_rescue::allocation::ModelArtifact;
use food_rescue::config::AllocationConfig;
use food_rescue::error::AppError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct TrainArgs {
    /// Number of synthetic samples labelled by the heuristic scorer
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub(crate) samples: usize,
    /// Seed for the synthetic sampler
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,
    /// Where to write the model artifact
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// Distance decay used by the labelling heuristic
    #[arg(long, value_parser = parse_decay_km)]
    pub(crate) decay_km: Option<f64>,
}

pub(crate) fn run_train(args: TrainArgs, config: AllocationConfig) -> Result<(), AppError> {
    let TrainArgs {
        samples,
        seed,
        output,
        decay_km,
    } = args;

    let config = apply_overrides(config, None, None, decay_km);
    let labeller = heuristic_scorer(&config)?;
    let weights = *labeller.weights();
    let decay_km = labeller.decay().decay_km();
    let (model, report) = bootstrap(samples, seed, labeller)?;

    let artifact = ModelArtifact::new(model, report.samples, seed);
    let mut writer = BufWriter::new(File::create(&output)?);
    artifact.to_writer(&mut writer)?;
    writer.flush()?;
    info!(
        path = %output.display(),
        samples = report.samples,
        r_squared = report.r_squared,
        "wrote model artifact"
    );

    println!("=== Learned Scorer Training ===");
    println!("Samples: {} (seed {})", report.samples, seed);
    println!(
        "Labelling weights: urgency {:.2}, distance {:.2}, capacity {:.2}, reliability {:.2}, fairness {:.2}; decay {:.1} km",
        weights.urgency,
        weights.distance,
        weights.capacity,
        weights.reliability,
        weights.fairness,
        decay_km
    );
    println!("R^2: {:.4}", report.r_squared);
    println!("Mean absolute error: {:.4}", report.mean_absolute_error);
    println!("Coefficients (standardized features):");
    for (name, coefficient) in FEATURE_NAMES.iter().zip(artifact.model.coefficients.iter()) {
        println!("  {:<18} {:+.5}", name, coefficient);
    }
    println!("  {:<18} {:+.5}", "intercept", artifact.model.intercept);
    println!("Artifact: {}", output.display());

    Ok(())
}
