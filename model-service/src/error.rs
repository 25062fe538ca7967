//! Error types for the model core

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in row {row}, column {column}: {value:?}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Dataset contains no rows")]
    EmptyDataset,

    #[error("Unknown label: {0:?}")]
    UnknownLabel(String),

    #[error("Unknown class id: {0}")]
    UnknownClassId(usize),

    #[error("Empty vocabulary: no tokens of two or more characters")]
    EmptyVocabulary,

    #[error("Feature layout mismatch: expected {expected:x} ({expected_width} columns), got {actual:x} ({actual_width} columns)")]
    LayoutMismatch {
        expected: u32,
        expected_width: usize,
        actual: u32,
        actual_width: usize,
    },

    #[error("Invalid training input: {0}")]
    InvalidInput(String),

    #[error("Artifact {file}: {source}")]
    Artifact {
        file: String,
        #[source]
        source: Box<ModelError>,
    },
}

impl ModelError {
    /// Attach the artifact file name to an error
    pub fn artifact(file: impl Into<String>, source: ModelError) -> Self {
        ModelError::Artifact {
            file: file.into(),
            source: Box::new(source),
        }
    }
}
