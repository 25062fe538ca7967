//! Artifact Storage
//!
//! The four trained objects live side by side in one directory under fixed
//! file names. A training run overwrites all of them.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::encoder::LabelEncoder;
use crate::error::{ModelError, ModelResult};
use crate::features::{FeatureLayout, TextVectorizers};
use crate::forest::RandomForest;

pub const MODEL_FILE: &str = "bug_assignment_model.json";
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CATEGORY_ENCODER_FILE: &str = "category_encoder.json";
pub const DEVELOPER_ENCODER_FILE: &str = "developer_encoder.json";

// ============================================================================
// ARTIFACT TYPES
// ============================================================================

/// Classifier plus the layout it was fit on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub layout: FeatureLayout,
    pub forest: RandomForest,
    pub trained_at: DateTime<Utc>,
}

/// Everything one training run produces
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub model: ModelArtifact,
    pub vectorizers: TextVectorizers,
    pub category_encoder: LabelEncoder,
    pub developer_encoder: LabelEncoder,
}

// ============================================================================
// PATHS
// ============================================================================

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn vectorizer(&self) -> PathBuf {
        self.dir.join(VECTORIZER_FILE)
    }

    pub fn category_encoder(&self) -> PathBuf {
        self.dir.join(CATEGORY_ENCODER_FILE)
    }

    pub fn developer_encoder(&self) -> PathBuf {
        self.dir.join(DEVELOPER_ENCODER_FILE)
    }
}

// ============================================================================
// SAVE / LOAD
// ============================================================================

fn save_json<T: Serialize>(value: &T, path: &Path) -> ModelResult<()> {
    let write = || -> ModelResult<()> {
        let json = serde_json::to_vec(value)?;
        fs::write(path, json)?;
        Ok(())
    };
    write().map_err(|e| ModelError::artifact(path.display().to_string(), e))
}

fn load_json<T: DeserializeOwned>(path: &Path) -> ModelResult<T> {
    let read = || -> ModelResult<T> {
        let data = fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    };
    read().map_err(|e| ModelError::artifact(path.display().to_string(), e))
}

impl ArtifactSet {
    /// Write all four artifacts, creating the directory if needed
    pub fn save(&self, paths: &ArtifactPaths) -> ModelResult<()> {
        fs::create_dir_all(paths.dir())?;

        save_json(&self.model, &paths.model())?;
        save_json(&self.vectorizers, &paths.vectorizer())?;
        save_json(&self.category_encoder, &paths.category_encoder())?;
        save_json(&self.developer_encoder, &paths.developer_encoder())?;

        log::info!("Artifacts written to {}", paths.dir().display());
        Ok(())
    }

    /// Read all four artifacts and check they belong together
    pub fn load(paths: &ArtifactPaths) -> ModelResult<Self> {
        log::info!("Loading artifacts from {}", paths.dir().display());

        let set = Self {
            model: load_json(&paths.model())?,
            vectorizers: load_json(&paths.vectorizer())?,
            category_encoder: load_json(&paths.category_encoder())?,
            developer_encoder: load_json(&paths.developer_encoder())?,
        };
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> ModelResult<()> {
        self.model.layout.validate(&self.vectorizers, &self.category_encoder)?;

        if self.model.forest.n_features() != self.model.layout.width() {
            return Err(ModelError::LayoutMismatch {
                expected: self.model.layout.hash,
                expected_width: self.model.layout.width(),
                actual: self.model.layout.hash,
                actual_width: self.model.forest.n_features(),
            });
        }

        if self.model.forest.n_classes() != self.developer_encoder.len() {
            return Err(ModelError::InvalidInput(format!(
                "model has {} classes but developer encoder has {}",
                self.model.forest.n_classes(),
                self.developer_encoder.len()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
