//! Random-forest classifier evaluated from flat node arrays.
//!
//! The artifact stores each tree the way a fitted tree classifier exposes it:
//! parallel arrays indexed by node id. A node is a leaf when
//! `children_left == -1`; internal nodes send a row left when
//! `row[feature] <= threshold`. Leaf `value`s are per-class sample counts (or
//! weights), normalized into probabilities at load time.
//!
//! The forest prediction is the class with the highest mean probability across
//! trees; ties resolve to the first class.

use serde::{Deserialize, Serialize};

use crate::domain::{ChurnLabel, FEATURE_COUNT, FEATURE_NAMES};
use crate::error::PredictError;
use crate::models::ChurnModel;

/// Format tag expected in the artifact's `format` field.
pub const FOREST_FORMAT: &str = "churn-forest/v1";

const LEAF: i64 = -1;

/// On-disk layout of the whole forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub format: String,
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    pub trees: Vec<TreeArrays>,
}

/// On-disk layout of one tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        proba: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn from_arrays(arrays: &TreeArrays, n_classes: usize) -> Result<Self, String> {
        let n = arrays.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if arrays.children_right.len() != n
            || arrays.feature.len() != n
            || arrays.threshold.len() != n
            || arrays.value.len() != n
        {
            return Err(format!(
                "node arrays differ in length (left={}, right={}, feature={}, threshold={}, value={})",
                n,
                arrays.children_right.len(),
                arrays.feature.len(),
                arrays.threshold.len(),
                arrays.value.len()
            ));
        }

        let mut nodes = Vec::with_capacity(n);
        let mut has_parent = vec![false; n];
        for id in 0..n {
            let left = arrays.children_left[id];
            let right = arrays.children_right[id];

            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {id}: leaf has a right child"));
                }
                nodes.push(Node::Leaf {
                    proba: normalize(&arrays.value[id], n_classes)
                        .map_err(|reason| format!("node {id}: {reason}"))?,
                });
                continue;
            }

            // Children must point forward so traversal always terminates.
            let child = |c: i64| -> Result<usize, String> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > id && c < n)
                    .ok_or_else(|| format!("node {id}: child index {c} out of range"))
            };
            let left = child(left)?;
            let right = child(right)?;

            // Every node below the root hangs off exactly one parent.
            for c in [left, right] {
                if std::mem::replace(&mut has_parent[c], true) {
                    return Err(format!("node {id}: child {c} already has a parent"));
                }
            }

            let feature = usize::try_from(arrays.feature[id])
                .ok()
                .filter(|&f| f < FEATURE_COUNT)
                .ok_or_else(|| {
                    format!("node {id}: feature index {} out of range", arrays.feature[id])
                })?;

            let threshold = arrays.threshold[id];
            if !threshold.is_finite() {
                return Err(format!("node {id}: threshold is not finite"));
            }

            nodes.push(Node::Split {
                feature,
                threshold,
                left,
                right,
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_proba(&self, row: &[f64; FEATURE_COUNT]) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { proba } => return proba,
            }
        }
    }

    fn depth(&self) -> usize {
        // Children always follow their parent, so one forward pass sees each
        // parent before its children.
        let mut depth: Vec<Option<usize>> = vec![None; self.nodes.len()];
        depth[0] = Some(0);
        let mut max = 0;
        for (id, node) in self.nodes.iter().enumerate() {
            let Some(d) = depth[id] else {
                continue;
            };
            max = max.max(d);
            if let Node::Split { left, right, .. } = node {
                depth[*left] = Some(d + 1);
                depth[*right] = Some(d + 1);
            }
        }
        max
    }
}

fn normalize(counts: &[f64], n_classes: usize) -> Result<Vec<f64>, String> {
    if counts.len() != n_classes {
        return Err(format!(
            "leaf has {} class values, expected {n_classes}",
            counts.len()
        ));
    }
    if counts.iter().any(|c| !c.is_finite() || *c < 0.0) {
        return Err("leaf values must be finite and non-negative".to_string());
    }
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return Err("leaf values sum to zero".to_string());
    }
    Ok(counts.iter().map(|c| c / total).collect())
}

/// Validated, immutable forest.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Validate an artifact and build the forest. The error is a human-readable reason.
    pub fn from_artifact(artifact: &ForestArtifact) -> Result<Self, String> {
        if artifact.format != FOREST_FORMAT {
            return Err(format!(
                "unsupported format '{}' (expected '{FOREST_FORMAT}')",
                artifact.format
            ));
        }

        if artifact.feature_names.len() != FEATURE_COUNT
            || artifact
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .any(|(got, want)| got != want)
        {
            return Err(format!(
                "feature names {:?} do not match the expected order {:?}",
                artifact.feature_names, FEATURE_NAMES
            ));
        }

        if artifact.classes != [0, 1] {
            return Err(format!(
                "classes {:?} are not the binary labels [0, 1]",
                artifact.classes
            ));
        }

        if artifact.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }

        let trees = artifact
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| {
                DecisionTree::from_arrays(t, artifact.classes.len())
                    .map_err(|reason| format!("tree {i}: {reason}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            classes: artifact.classes.clone(),
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_nodes(&self) -> usize {
        self.trees.iter().map(|t| t.nodes.len()).sum()
    }

    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
    }

    /// Mean class probabilities across trees, in `classes` order.
    pub fn predict_proba(&self, row: &[f64; FEATURE_COUNT]) -> Result<Vec<f64>, PredictError> {
        if let Some(i) = row.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::PredictionUnavailable(format!(
                "feature '{}' is not finite",
                FEATURE_NAMES[i]
            )));
        }

        let mut mean = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in mean.iter_mut().zip(tree.leaf_proba(row)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        for p in &mut mean {
            *p /= n;
        }

        if mean.iter().any(|p| !p.is_finite()) {
            return Err(PredictError::PredictionUnavailable(
                "forest produced a non-finite probability".to_string(),
            ));
        }
        Ok(mean)
    }
}

impl ChurnModel for RandomForest {
    fn predict(&self, row: &[f64; FEATURE_COUNT]) -> Result<ChurnLabel, PredictError> {
        let proba = self.predict_proba(row)?;

        // First maximum wins, so an even split resolves to class 0.
        let mut best = 0;
        for (i, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = i;
            }
        }

        let class = self.classes[best];
        ChurnLabel::from_class(class).ok_or_else(|| {
            PredictError::PredictionUnavailable(format!("model returned unknown class {class}"))
        })
    }
}
