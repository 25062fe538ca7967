//! Bug Assignee Model Core
//!
//! Training pipeline and serving context for predicting which developer a
//! bug ticket should be assigned to.
//!
//! ```text
//! data.csv ──► dataset ──► features (tfidf title | tfidf details | completed | todos | category)
//!                                │
//!                                ▼
//!                           forest (random forest)
//!                                │
//!                                ▼
//!                 artifacts/ (model, vectorizer, category + developer encoders)
//!                                │
//!                                ▼
//!                    predictor (loaded once, read-only)
//! ```

pub mod artifacts;
pub mod config;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod features;
pub mod forest;
pub mod predictor;
pub mod text;
pub mod trainer;

#[cfg(test)]
mod tests;

pub use artifacts::{ArtifactPaths, ArtifactSet};
pub use config::TrainConfig;
pub use dataset::{TicketRecord, UNKNOWN_CATEGORY};
pub use error::{ModelError, ModelResult};
pub use predictor::{Predictor, PredictorInfo};
pub use trainer::{train, TrainReport};
