//! Trainer entry point
//!
//! Reads `DATA_PATH` (default `data.csv`), writes the four artifacts to
//! `ARTIFACT_DIR` (default `.`) and prints the held-out accuracy.

use anyhow::Context;
use model_service::{trainer, TrainConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    dotenvy::dotenv().ok();
    let config = TrainConfig::from_env();

    log::info!("Training bug assignment model from {}", config.data_path.display());

    let report = trainer::run(&config)
        .with_context(|| format!("training from {} failed", config.data_path.display()))?;

    match report.accuracy {
        Some(accuracy) => println!("Model Accuracy: {:.4}", accuracy),
        None => println!("Model Accuracy: n/a (no rows held out)"),
    }
    println!(
        "Trained on {} of {} rows: {} developers, {} categories, {} features",
        report.train_rows, report.rows, report.developers, report.categories, report.features
    );
    println!("Artifacts saved to {}", config.artifact_dir.display());

    Ok(())
}
