//! Feature Layout - Column order shared by training and serving
//!
//! Row layout (in order):
//! 1. TF-IDF block over `taskTitle`
//! 2. TF-IDF block over `taskDetails`
//! 3. `taskCompleted` as 0/1
//! 4. todo item count
//! 5. category id
//!
//! Both the trainer and the predictor build rows through [`FeatureSpace::row`],
//! so the column order cannot drift between them. The layout hash covers the
//! vocabularies and category classes, so artifacts from different training
//! runs are rejected at load time instead of feeding misaligned columns.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::dataset::TicketRecord;
use crate::encoder::LabelEncoder;
use crate::error::{ModelError, ModelResult};
use crate::text::TfidfVectorizer;

/// Bump when the block order or the numeric columns change
pub const FEATURE_VERSION: u8 = 1;

/// Names of the trailing numeric columns
pub const NUMERIC_FEATURES: &[&str] = &["task_completed", "todo_count", "category_id"];

// ============================================================================
// TEXT VECTORIZERS
// ============================================================================

/// One vectorizer per text column, each with its own vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextVectorizers {
    pub title: TfidfVectorizer,
    pub details: TfidfVectorizer,
}

// ============================================================================
// LAYOUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    pub version: u8,
    pub title_width: usize,
    pub details_width: usize,
    pub hash: u32,
}

impl FeatureLayout {
    pub fn describe(vectorizers: &TextVectorizers, categories: &LabelEncoder) -> Self {
        Self {
            version: FEATURE_VERSION,
            title_width: vectorizers.title.width(),
            details_width: vectorizers.details.width(),
            hash: layout_hash(vectorizers, categories),
        }
    }

    /// Total number of columns
    pub fn width(&self) -> usize {
        self.title_width + self.details_width + NUMERIC_FEATURES.len()
    }

    /// Column index of the first numeric feature
    pub fn numeric_offset(&self) -> usize {
        self.title_width + self.details_width
    }

    /// Check that loaded transformers produce the layout the model was fit on
    pub fn validate(&self, vectorizers: &TextVectorizers, categories: &LabelEncoder) -> ModelResult<()> {
        let actual = Self::describe(vectorizers, categories);
        if actual != *self {
            return Err(ModelError::LayoutMismatch {
                expected: self.hash,
                expected_width: self.width(),
                actual: actual.hash,
                actual_width: actual.width(),
            });
        }
        Ok(())
    }
}

/// CRC32 over version, vocabularies and category classes
pub fn layout_hash(vectorizers: &TextVectorizers, categories: &LabelEncoder) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    let blocks: [(&str, &[String]); 3] = [
        ("title", vectorizers.title.vocabulary()),
        ("details", vectorizers.details.vocabulary()),
        ("category", categories.classes()),
    ];

    for (block, terms) in blocks {
        hasher.update(block.as_bytes());
        hasher.update(&[1]);
        for term in terms {
            hasher.update(term.as_bytes());
            hasher.update(&[0]);
        }
    }

    for name in NUMERIC_FEATURES {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// ROW ASSEMBLY
// ============================================================================

/// Fitted transformers needed to turn a record into a feature row
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpace<'a> {
    pub vectorizers: &'a TextVectorizers,
    pub categories: &'a LabelEncoder,
}

impl<'a> FeatureSpace<'a> {
    pub fn new(vectorizers: &'a TextVectorizers, categories: &'a LabelEncoder) -> Self {
        Self { vectorizers, categories }
    }

    pub fn width(&self) -> usize {
        self.vectorizers.title.width() + self.vectorizers.details.width() + NUMERIC_FEATURES.len()
    }

    /// Build one feature row. The category must be in the encoder's classes.
    pub fn row(&self, record: &TicketRecord) -> ModelResult<Vec<f32>> {
        let category_id = self.categories.transform(&record.category)?;

        let mut row = Vec::with_capacity(self.width());
        row.extend(self.vectorizers.title.transform(&record.title));
        row.extend(self.vectorizers.details.transform(&record.details));
        row.push(if record.completed { 1.0 } else { 0.0 });
        row.push(record.todo_count() as f32);
        row.push(category_id as f32);

        Ok(row)
    }

    pub fn rows(&self, records: &[TicketRecord]) -> ModelResult<Vec<Vec<f32>>> {
        records.iter().map(|r| self.row(r)).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::UNKNOWN_CATEGORY;

    fn fixture() -> (TextVectorizers, LabelEncoder) {
        let vectorizers = TextVectorizers {
            title: TfidfVectorizer::fit(&["login bug", "color issue"]).unwrap(),
            details: TfidfVectorizer::fit(&["auth returns 500", "button is red"]).unwrap(),
        };
        let categories = LabelEncoder::fit(["Backend", "Frontend", UNKNOWN_CATEGORY]);
        (vectorizers, categories)
    }

    fn record(category: &str) -> TicketRecord {
        TicketRecord {
            title: "login bug".to_string(),
            details: "auth returns 500".to_string(),
            completed: true,
            todos: "a,b".to_string(),
            category: category.to_string(),
            assigned_employee: "alice".to_string(),
        }
    }

    #[test]
    fn test_row_layout() {
        let (vectorizers, categories) = fixture();
        let space = FeatureSpace::new(&vectorizers, &categories);
        let layout = FeatureLayout::describe(&vectorizers, &categories);

        let row = space.row(&record("Frontend")).unwrap();
        assert_eq!(row.len(), layout.width());
        assert_eq!(row.len(), space.width());

        let offset = layout.numeric_offset();
        assert_eq!(row[offset], 1.0);
        assert_eq!(row[offset + 1], 2.0);
        assert_eq!(row[offset + 2], 1.0); // Backend=0, Frontend=1, Unknown=2
    }

    #[test]
    fn test_title_and_details_blocks_independent() {
        let (vectorizers, categories) = fixture();
        let space = FeatureSpace::new(&vectorizers, &categories);

        let mut only_details = record(UNKNOWN_CATEGORY);
        only_details.title.clear();
        let row = space.row(&only_details).unwrap();

        let title_width = vectorizers.title.width();
        assert!(row[..title_width].iter().all(|v| *v == 0.0));
        assert!(row[title_width..title_width + vectorizers.details.width()].iter().any(|v| *v > 0.0));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let (vectorizers, categories) = fixture();
        let space = FeatureSpace::new(&vectorizers, &categories);
        assert!(space.row(&record("Mobile")).is_err());
    }

    #[test]
    fn test_layout_hash_consistency() {
        let (vectorizers, categories) = fixture();
        assert_eq!(layout_hash(&vectorizers, &categories), layout_hash(&vectorizers, &categories));
    }

    #[test]
    fn test_validate_layout_mismatch() {
        let (vectorizers, categories) = fixture();
        let layout = FeatureLayout::describe(&vectorizers, &categories);
        assert!(layout.validate(&vectorizers, &categories).is_ok());

        let other = LabelEncoder::fit(["Backend", UNKNOWN_CATEGORY]);
        assert!(matches!(
            layout.validate(&vectorizers, &other),
            Err(ModelError::LayoutMismatch { .. })
        ));
    }
}
