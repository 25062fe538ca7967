//! Training configuration

use std::env;
use std::path::PathBuf;

use crate::forest::ForestConfig;

/// Trainer configuration
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Labelled ticket CSV
    pub data_path: PathBuf,

    /// Directory receiving the four artifacts
    pub artifact_dir: PathBuf,

    /// Share of rows held out for evaluation
    pub test_ratio: f64,

    /// Seed for the split and the forest
    pub seed: u64,

    pub forest: ForestConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.csv"),
            artifact_dir: PathBuf::from("."),
            test_ratio: 0.2,
            seed: 42,
            forest: ForestConfig::default(),
        }
    }
}

impl TrainConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let seed = env::var("RANDOM_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.seed);

        Self {
            data_path: env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),

            artifact_dir: env::var("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),

            test_ratio: env::var("TEST_RATIO")
                .ok()
                .and_then(|r| r.parse().ok())
                .filter(|r: &f64| (0.0..1.0).contains(r))
                .unwrap_or(defaults.test_ratio),

            seed,

            forest: ForestConfig {
                n_estimators: env::var("N_ESTIMATORS")
                    .ok()
                    .and_then(|n| n.parse().ok())
                    .filter(|n: &usize| *n > 0)
                    .unwrap_or(defaults.forest.n_estimators),
                seed,
                ..defaults.forest
            },
        }
    }
}
