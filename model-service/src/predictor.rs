//! Predictor - Immutable serving context
//!
//! Built once from the persisted artifacts and shared read-only by every
//! request. A served request is treated as a ticket with only a description
//! and a category: no title, not completed, an empty todo list.

use serde::Serialize;

use crate::artifacts::{ArtifactPaths, ArtifactSet};
use crate::dataset::{TicketRecord, UNKNOWN_CATEGORY};
use crate::error::ModelResult;
use crate::features::FeatureSpace;

/// Model summary for status endpoints
#[derive(Debug, Clone, Serialize)]
pub struct PredictorInfo {
    pub developers: usize,
    pub features: usize,
    pub trees: usize,
    pub categories: Vec<String>,
    pub trained_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: ArtifactSet,
}

impl Predictor {
    /// Load and validate the four artifacts from a directory
    pub fn load(paths: &ArtifactPaths) -> ModelResult<Self> {
        let artifacts = ArtifactSet::load(paths)?;
        let predictor = Self::from_artifacts(artifacts)?;
        let info = predictor.info();
        log::info!(
            "Model ready: {} developers, {} features, {} trees",
            info.developers, info.features, info.trees
        );
        Ok(predictor)
    }

    pub fn from_artifacts(artifacts: ArtifactSet) -> ModelResult<Self> {
        artifacts.validate()?;
        Ok(Self { artifacts })
    }

    /// Categories outside the training vocabulary map to `"Unknown"`
    pub fn resolve_category<'a>(&self, category: &'a str) -> &'a str {
        if self.artifacts.category_encoder.contains(category) {
            category
        } else {
            UNKNOWN_CATEGORY
        }
    }

    /// Predict the developer name for a bug description and category
    pub fn predict(&self, description: &str, category: &str) -> ModelResult<String> {
        let record = TicketRecord {
            title: String::new(),
            details: description.to_string(),
            completed: false,
            todos: String::new(),
            category: self.resolve_category(category).to_string(),
            assigned_employee: String::new(),
        };

        let space = FeatureSpace::new(&self.artifacts.vectorizers, &self.artifacts.category_encoder);
        let row = space.row(&record)?;
        let class_id = self.artifacts.model.forest.predict(&row)?;
        let developer = self.artifacts.developer_encoder.inverse_transform(class_id)?;

        log::debug!("Predicted {} for category {:?}", developer, record.category);
        Ok(developer.to_string())
    }

    /// Developer names the model can return
    pub fn developers(&self) -> &[String] {
        self.artifacts.developer_encoder.classes()
    }

    pub fn info(&self) -> PredictorInfo {
        PredictorInfo {
            developers: self.artifacts.developer_encoder.len(),
            features: self.artifacts.model.layout.width(),
            trees: self.artifacts.model.forest.n_trees(),
            categories: self.artifacts.category_encoder.classes().to_vec(),
            trained_at: self.artifacts.model.trained_at,
        }
    }
}
