//! Random forest of Gini decision trees over sparse features.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::classifier::{self, Classifier, ConstantModel, Model};
use crate::document::Label;
use crate::errors::{PolarityError, Result};
use crate::vectorizer::{FeatureMatrix, SparseVector};

/// Random forest settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree (None = unlimited)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
    /// Features examined per split (None = square root of the feature count)
    pub max_features: Option<usize>,
    /// Draws a bootstrap sample for each tree
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        positive: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A binary classification tree. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Gets the fraction of positive training samples in the leaf reached by `row`.
    pub fn predict_proba(&self, row: &SparseVector) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { positive } => return positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row.get(feature) <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(n_pos: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = n_pos as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

struct TreeBuilder<'a> {
    rows: &'a [SparseVector],
    labels: &'a [Label],
    config: &'a ForestConfig,
    max_features: usize,
    rng: ChaCha8Rng,
    nodes: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn leaf(samples: &[usize], labels: &[Label]) -> Node {
        let n_pos = samples
            .iter()
            .filter(|&&i| labels[i] == Label::Positive)
            .count();
        Node::Leaf {
            positive: n_pos as f64 / samples.len().max(1) as f64,
        }
    }

    fn find_split(&mut self, samples: &[usize]) -> Option<BestSplit> {
        // Features absent from every sample of the node are constant zero.
        let mut candidates: Vec<usize> = samples
            .iter()
            .flat_map(|&i| self.rows[i].iter().map(|(f, _)| f))
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        candidates.shuffle(&mut self.rng);

        let min_leaf = self.config.min_samples_leaf.max(1);
        let n = samples.len();
        let mut best: Option<BestSplit> = None;
        let mut n_visited = 0;
        let mut values: Vec<(f64, bool)> = Vec::with_capacity(n);
        for feature in candidates {
            if n_visited >= self.max_features {
                break;
            }
            values.clear();
            values.extend(
                samples
                    .iter()
                    .map(|&i| (self.rows[i].get(feature), self.labels[i] == Label::Positive)),
            );
            values.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
            if values[0].0 == values[n - 1].0 {
                continue;
            }
            n_visited += 1;

            let n_pos_total = values.iter().filter(|v| v.1).count();
            let mut n_pos_left = 0;
            for k in 1..n {
                if values[k - 1].1 {
                    n_pos_left += 1;
                }
                if values[k - 1].0 == values[k].0 || k < min_leaf || n - k < min_leaf {
                    continue;
                }
                let impurity = (k as f64 * gini(n_pos_left, k)
                    + (n - k) as f64 * gini(n_pos_total - n_pos_left, n - k))
                    / n as f64;
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (values[k - 1].0 + values[k].0) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }

    fn build(mut self, samples: Vec<usize>) -> DecisionTree {
        self.nodes.push(Node::Leaf { positive: 0.0 });
        let mut stack = vec![(0, samples, 0)];
        while let Some((idx, samples, depth)) = stack.pop() {
            let n_pos = samples
                .iter()
                .filter(|&&i| self.labels[i] == Label::Positive)
                .count();
            let is_pure = n_pos == 0 || n_pos == samples.len();
            let too_deep = self.config.max_depth.map_or(false, |d| depth >= d);
            let split = if is_pure || too_deep || samples.len() < self.config.min_samples_split {
                None
            } else {
                self.find_split(&samples)
            };
            let split = match split {
                Some(split) => split,
                None => {
                    self.nodes[idx] = Self::leaf(&samples, self.labels);
                    continue;
                }
            };

            let rows = self.rows;
            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
                .into_iter()
                .partition(|&i| rows[i].get(split.feature) <= split.threshold);
            let left = self.nodes.len();
            let right = left + 1;
            self.nodes.push(Node::Leaf { positive: 0.0 });
            self.nodes.push(Node::Leaf { positive: 0.0 });
            self.nodes[idx] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            stack.push((right, right_samples, depth + 1));
            stack.push((left, left_samples, depth + 1));
        }
        DecisionTree { nodes: self.nodes }
    }
}

/// A trained forest. The predicted label is positive if the mean leaf probability exceeds 0.5.
#[derive(Debug, Clone)]
pub struct ForestModel {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl ForestModel {
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Gets the mean positive probability over the trees.
    pub fn predict_proba(&self, row: &SparseVector) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees
            .iter()
            .map(|tree| tree.predict_proba(row))
            .sum::<f64>()
            / self.trees.len() as f64
    }
}

impl Model for ForestModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &SparseVector) -> Label {
        if self.predict_proba(row) > 0.5 {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

/// Random forest classifier.
///
/// Each tree is grown on a bootstrap sample drawn with its own seed, `seed + tree index`, so the
/// forest is reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomForest {
    config: ForestConfig,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Trains a forest.
    ///
    /// # Errors
    ///
    /// See [`Classifier::fit()`]. [`PolarityError::InvalidArgument`] is returned if
    /// `n_trees` or `max_features` is zero.
    pub fn fit_forest(&self, features: &FeatureMatrix, labels: &[Label]) -> Result<ForestModel> {
        if self.config.n_trees == 0 {
            return Err(PolarityError::invalid_argument(
                "n_trees",
                "must be at least 1",
            ));
        }
        if self.config.max_features == Some(0) {
            return Err(PolarityError::invalid_argument(
                "max_features",
                "must be at least 1",
            ));
        }
        classifier::check_training_set(features, labels)?;

        let n = labels.len();
        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| ((features.n_features() as f64).sqrt() as usize).max(1));
        let trees: Vec<DecisionTree> = (0..self.config.n_trees)
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(i as u64));
                let samples: Vec<usize> = if self.config.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                TreeBuilder {
                    rows: features.rows(),
                    labels,
                    config: &self.config,
                    max_features,
                    rng,
                    nodes: vec![],
                }
                .build(samples)
            })
            .collect();
        debug!(
            n_trees = trees.len(),
            n_samples = n,
            max_features,
            "trained random forest"
        );
        Ok(ForestModel {
            trees,
            n_features: features.n_features(),
        })
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn fit(&self, features: &FeatureMatrix, labels: &[Label]) -> Result<Box<dyn Model>> {
        if let Some(label) = classifier::check_training_set(features, labels)? {
            return Ok(Box::new(ConstantModel::new(label, features.n_features())));
        }
        Ok(Box::new(self.fit_forest(features, labels)?))
    }
}
