//! Label Encoder
//!
//! Bijective mapping between string labels and integer ids.
//! Classes are sorted so the same label set always yields the same ids.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit over every distinct label
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = labels
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect();

        Self {
            classes: unique.into_iter().collect(),
        }
    }

    /// Sorted class list; the index of a class is its id
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.id_of(label).is_some()
    }

    fn id_of(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    /// Label -> id
    pub fn transform(&self, label: &str) -> ModelResult<usize> {
        self.id_of(label)
            .ok_or_else(|| ModelError::UnknownLabel(label.to_string()))
    }

    /// id -> label
    pub fn inverse_transform(&self, id: usize) -> ModelResult<&str> {
        self.classes
            .get(id)
            .map(String::as_str)
            .ok_or(ModelError::UnknownClassId(id))
    }
}
