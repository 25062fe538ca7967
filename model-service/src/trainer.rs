//! Trainer - Fit the assignment model from historical tickets
//!
//! Pipeline: vectorize title and details independently, encode category and
//! assignee, assemble rows, hold out a test split, fit the forest, evaluate,
//! then hand back all four artifacts.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::artifacts::{ArtifactPaths, ArtifactSet, ModelArtifact};
use crate::config::TrainConfig;
use crate::dataset::{self, TicketRecord, UNKNOWN_CATEGORY};
use crate::encoder::LabelEncoder;
use crate::error::{ModelError, ModelResult};
use crate::features::{FeatureLayout, FeatureSpace, TextVectorizers};
use crate::forest::RandomForest;
use crate::text::TfidfVectorizer;

/// Summary of one training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Held-out accuracy; `None` when nothing could be held out
    pub accuracy: Option<f64>,
    pub developers: usize,
    pub categories: usize,
    pub features: usize,
}

/// Shuffle row indices and cut off `ceil(n * test_ratio)` for evaluation.
/// At least one row always stays in the training split.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_size = ((n as f64 * test_ratio).ceil() as usize).min(n.saturating_sub(1));
    let train = indices.split_off(test_size);
    (train, indices)
}

/// Fit every artifact from in-memory records
pub fn train(records: &[TicketRecord], config: &TrainConfig) -> ModelResult<(ArtifactSet, TrainReport)> {
    if records.is_empty() {
        return Err(ModelError::EmptyDataset);
    }

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    let details: Vec<&str> = records.iter().map(|r| r.details.as_str()).collect();
    let vectorizers = TextVectorizers {
        title: TfidfVectorizer::fit(&titles)?,
        details: TfidfVectorizer::fit(&details)?,
    };

    let category_encoder = LabelEncoder::fit(
        records
            .iter()
            .map(|r| r.category.as_str())
            .chain(std::iter::once(UNKNOWN_CATEGORY)),
    );
    let developer_encoder = LabelEncoder::fit(records.iter().map(|r| r.assigned_employee.as_str()));

    let space = FeatureSpace::new(&vectorizers, &category_encoder);
    let rows = space.rows(records)?;
    let labels = records
        .iter()
        .map(|r| developer_encoder.transform(&r.assigned_employee))
        .collect::<ModelResult<Vec<usize>>>()?;

    let (train_idx, test_idx) = train_test_split(records.len(), config.test_ratio, config.seed);
    let pick = |idx: &[usize]| -> (Vec<Vec<f32>>, Vec<usize>) {
        idx.iter().map(|&i| (rows[i].clone(), labels[i])).unzip()
    };
    let (train_rows, train_labels) = pick(&train_idx);
    let (test_rows, test_labels) = pick(&test_idx);

    log::info!(
        "Training on {} rows, evaluating on {} ({} developers, {} features)",
        train_rows.len(),
        test_rows.len(),
        developer_encoder.len(),
        space.width()
    );

    let forest = RandomForest::fit(&train_rows, &train_labels, developer_encoder.len(), &config.forest)?;
    let accuracy = forest.accuracy(&test_rows, &test_labels)?;

    match accuracy {
        Some(acc) => log::info!("Held-out accuracy: {:.4}", acc),
        None => log::warn!("Dataset too small for a held-out split"),
    }

    let report = TrainReport {
        rows: records.len(),
        train_rows: train_rows.len(),
        test_rows: test_rows.len(),
        accuracy,
        developers: developer_encoder.len(),
        categories: category_encoder.len(),
        features: space.width(),
    };

    let artifacts = ArtifactSet {
        model: ModelArtifact {
            layout: FeatureLayout::describe(&vectorizers, &category_encoder),
            forest,
            trained_at: Utc::now(),
        },
        vectorizers,
        category_encoder,
        developer_encoder,
    };

    Ok((artifacts, report))
}

/// Load the CSV, train, and persist the artifacts
pub fn run(config: &TrainConfig) -> ModelResult<TrainReport> {
    let records = dataset::load_csv(&config.data_path)?;
    let (artifacts, report) = train(&records, config)?;
    artifacts.save(&ArtifactPaths::new(&config.artifact_dir))?;
    Ok(report)
}

// ============================================================================
// TESTS
// ============================================================================
