//! Random Forest Classifier
//!
//! Bagged CART trees with Gini impurity and `sqrt(n_features)` candidate
//! features per split. Each tree gets its own seeded RNG, so a fixed seed
//! always produces the same forest.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_estimators: usize,
    /// Nodes with fewer samples become leaves
    pub min_samples_split: usize,
    pub max_depth: Option<usize>,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            min_samples_split: 2,
            max_depth: None,
            seed: 42,
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        /// Class probabilities
        distribution: Vec<f32>,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn leaf_distribution(&self, row: &[f32]) -> &[f32] {
        let mut current = 0;
        loop {
            match &self.nodes[current] {
                Node::Leaf { distribution } => return distribution,
                Node::Split { feature, threshold, left, right } => {
                    current = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Training-time view shared by every node of one tree
struct TreeBuilder<'a> {
    rows: &'a [Vec<f32>],
    labels: &'a [usize],
    n_classes: usize,
    max_features: usize,
    config: &'a ForestConfig,
    rng: StdRng,
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f32,
    impurity: f64,
}

impl<'a> TreeBuilder<'a> {
    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &s in samples {
            counts[self.labels[s]] += 1;
        }
        counts
    }

    fn build(mut self, samples: Vec<usize>) -> DecisionTree {
        self.grow(samples, 0);
        DecisionTree { nodes: self.nodes }
    }

    /// Grow the subtree for `samples` and return its node index
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&samples);
        let is_pure = counts.iter().filter(|c| **c > 0).count() <= 1;
        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);

        let split = if is_pure || depth_reached || samples.len() < self.config.min_samples_split {
            None
        } else {
            self.best_split(&samples)
        };

        let Some(split) = split else {
            let total = samples.len() as f32;
            let distribution = counts.iter().map(|c| *c as f32 / total).collect();
            self.nodes.push(Node::Leaf { distribution });
            return self.nodes.len() - 1;
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&s| self.rows[s][split.feature] <= split.threshold);

        let id = self.nodes.len();
        self.nodes.push(Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: 0,
            right: 0,
        });

        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);

        if let Node::Split { left: l, right: r, .. } = &mut self.nodes[id] {
            *l = left;
            *r = right;
        }
        id
    }

    /// Visit features in random order until `max_features` non-constant
    /// ones have been scored
    fn best_split(&mut self, samples: &[usize]) -> Option<BestSplit> {
        let n_features = self.rows[0].len();
        let order = index::sample(&mut self.rng, n_features, n_features);

        let mut best: Option<BestSplit> = None;
        let mut scored = 0;
        for feature in order.iter() {
            if scored >= self.max_features {
                break;
            }
            let Some(split) = self.best_split_on(samples, feature) else {
                continue;
            };
            scored += 1;
            if best.as_ref().map_or(true, |b| split.impurity < b.impurity) {
                best = Some(split);
            }
        }
        best
    }

    /// Sweep sorted values of one feature, scoring each boundary by weighted Gini
    fn best_split_on(&self, samples: &[usize], feature: usize) -> Option<BestSplit> {
        // Sparse text columns are mostly constant within a node
        let first = self.rows[*samples.first()?][feature];
        if samples.iter().all(|&s| self.rows[s][feature] == first) {
            return None;
        }

        let mut values: Vec<(f32, usize)> = samples
            .iter()
            .map(|&s| (self.rows[s][feature], self.labels[s]))
            .collect();
        values.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total = values.len();
        let mut right_counts = vec![0usize; self.n_classes];
        for (_, label) in &values {
            right_counts[*label] += 1;
        }
        let mut left_counts = vec![0usize; self.n_classes];

        let mut best: Option<BestSplit> = None;
        for i in 0..total - 1 {
            let (value, label) = values[i];
            left_counts[label] += 1;
            right_counts[label] -= 1;

            let next = values[i + 1].0;
            if value == next {
                continue;
            }

            let n_left = i + 1;
            let n_right = total - n_left;
            let impurity = (n_left as f64 * gini(&left_counts, n_left)
                + n_right as f64 * gini(&right_counts, n_right))
                / total as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mid = value + (next - value) / 2.0;
                let threshold = if mid < next { mid } else { value };
                best = Some(BestSplit { feature, threshold, impurity });
            }
        }
        best
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|c| {
            let p = *c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    n_classes: usize,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on dense rows; `labels[i]` is the class id of `rows[i]`
    pub fn fit(
        rows: &[Vec<f32>],
        labels: &[usize],
        n_classes: usize,
        config: &ForestConfig,
    ) -> ModelResult<Self> {
        if rows.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if rows.len() != labels.len() {
            return Err(ModelError::InvalidInput(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        let n_features = rows[0].len();
        if n_features == 0 || rows.iter().any(|r| r.len() != n_features) {
            return Err(ModelError::InvalidInput("rows must share a non-zero width".to_string()));
        }
        if let Some(bad) = labels.iter().find(|l| **l >= n_classes) {
            return Err(ModelError::UnknownClassId(*bad));
        }
        if config.n_estimators == 0 {
            return Err(ModelError::InvalidInput("n_estimators must be at least 1".to_string()));
        }

        let max_features = ((n_features as f64).sqrt() as usize).max(1);
        let n = rows.len();

        log::debug!(
            "Fitting {} trees on {} rows x {} features ({} candidates per split)",
            config.n_estimators, n, n_features, max_features
        );

        let trees = (0..config.n_estimators)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

                TreeBuilder {
                    rows,
                    labels,
                    n_classes,
                    max_features,
                    config,
                    rng,
                    nodes: Vec::new(),
                }
                .build(bootstrap)
            })
            .collect();

        Ok(Self { n_classes, n_features, trees })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn check_width(&self, row: &[f32]) -> ModelResult<()> {
        if row.len() != self.n_features {
            return Err(ModelError::InvalidInput(format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        Ok(())
    }

    /// Mean of the leaf class distributions across all trees
    pub fn predict_proba(&self, row: &[f32]) -> ModelResult<Vec<f32>> {
        self.check_width(row)?;

        let mut proba = vec![0.0f32; self.n_classes];
        for tree in &self.trees {
            for (p, d) in proba.iter_mut().zip(tree.leaf_distribution(row)) {
                *p += d;
            }
        }
        let n_trees = self.trees.len() as f32;
        for p in proba.iter_mut() {
            *p /= n_trees;
        }
        Ok(proba)
    }

    /// Most probable class id; ties go to the lowest id
    pub fn predict(&self, row: &[f32]) -> ModelResult<usize> {
        let proba = self.predict_proba(row)?;
        let mut best = 0;
        for (class, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = class;
            }
        }
        Ok(best)
    }

    /// Fraction of rows predicted correctly
    pub fn accuracy(&self, rows: &[Vec<f32>], labels: &[usize]) -> ModelResult<Option<f64>> {
        if rows.is_empty() {
            return Ok(None);
        }
        let mut correct = 0usize;
        for (row, label) in rows.iter().zip(labels) {
            if self.predict(row)? == *label {
                correct += 1;
            }
        }
        Ok(Some(correct as f64 / rows.len() as f64))
    }
}

// ============================================================================
// TESTS
// ============================================================================
