//! Decision tree and random forest classifiers
//!
//! Trees are exported as flat parallel arrays (the layout scikit-learn uses
//! for `tree_`): node `i` is a leaf when `children_left[i] == -1`, otherwise
//! samples with `x[feature[i]] <= threshold[i]` go left. `value[i]` holds the
//! per-class training counts that reached the node.

use serde::Deserialize;

use super::{argmax, check_features, validate_importances, Capabilities, Classifier};
use crate::error::AnalysisError;
use crate::models::NUM_CLASSES;

const LEAF: i64 = -1;

/// Flat-array tree export
#[derive(Debug, Clone, Deserialize)]
pub struct TreeSpec {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

/// Random forest export: independent trees averaged at prediction time
#[derive(Debug, Clone, Deserialize)]
pub struct ForestSpec {
    pub trees: Vec<TreeSpec>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

#[derive(Debug, Clone)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: [f64; NUM_CLASSES],
    },
}

/// Validated tree structure shared by both estimators
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    fn from_spec(spec: &TreeSpec, n_features: usize) -> Result<Self, AnalysisError> {
        let n_nodes = spec.children_left.len();
        if n_nodes == 0 {
            return Err(AnalysisError::ModelLoad("Tree has no nodes".to_string()));
        }
        if spec.children_right.len() != n_nodes
            || spec.feature.len() != n_nodes
            || spec.threshold.len() != n_nodes
            || spec.value.len() != n_nodes
        {
            return Err(AnalysisError::ModelLoad(
                "Tree arrays have mismatched lengths".to_string(),
            ));
        }

        let mut nodes = Vec::with_capacity(n_nodes);
        for i in 0..n_nodes {
            let (left, right) = (spec.children_left[i], spec.children_right[i]);

            if left == LEAF {
                nodes.push(TreeNode::Leaf {
                    distribution: leaf_distribution(&spec.value[i], i)?,
                });
                continue;
            }

            // Children must come after their parent, which also rules out cycles
            let child_ok = |c: i64| c > i as i64 && (c as usize) < n_nodes;
            if !child_ok(left) || !child_ok(right) {
                return Err(AnalysisError::ModelLoad(format!(
                    "Node {} has invalid children ({}, {})",
                    i, left, right
                )));
            }

            let feature = spec.feature[i];
            if feature < 0 || feature as usize >= n_features {
                return Err(AnalysisError::ModelLoad(format!(
                    "Node {} splits on feature {} (model has {})",
                    i, feature, n_features
                )));
            }

            nodes.push(TreeNode::Split {
                feature: feature as usize,
                threshold: spec.threshold[i],
                left: left as usize,
                right: right as usize,
            });
        }

        Ok(Self { nodes })
    }

    fn distribution(&self, features: &[f64]) -> &[f64; NUM_CLASSES] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { distribution } => return distribution,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

fn leaf_distribution(counts: &[f64], node: usize) -> Result<[f64; NUM_CLASSES], AnalysisError> {
    if counts.len() != NUM_CLASSES {
        return Err(AnalysisError::ModelLoad(format!(
            "Leaf {} has {} class counts, expected {}",
            node,
            counts.len(),
            NUM_CLASSES
        )));
    }
    if counts.iter().any(|c| !c.is_finite() || *c < 0.0) {
        return Err(AnalysisError::ModelLoad(format!(
            "Leaf {} has invalid class counts",
            node
        )));
    }
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return Err(AnalysisError::ModelLoad(format!("Leaf {} is empty", node)));
    }

    let mut distribution = [0.0; NUM_CLASSES];
    for (slot, count) in distribution.iter_mut().zip(counts) {
        *slot = count / total;
    }
    Ok(distribution)
}

/// Single CART tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    tree: Tree,
    n_features: usize,
    importances: Option<Vec<f64>>,
    model_type: String,
}

impl DecisionTree {
    pub fn from_spec(
        spec: TreeSpec,
        n_features: usize,
        model_type: Option<String>,
    ) -> Result<Self, AnalysisError> {
        let tree = Tree::from_spec(&spec, n_features)?;
        Ok(Self {
            tree,
            n_features,
            importances: validate_importances(spec.feature_importances, n_features)?,
            model_type: model_type.unwrap_or_else(|| "DecisionTreeClassifier".to_string()),
        })
    }
}

impl Classifier for DecisionTree {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            probabilities: true,
            importances: self.importances.is_some(),
        }
    }

    fn predict(&self, features: &[f64]) -> Result<usize, AnalysisError> {
        check_features(features, self.n_features)?;
        Ok(argmax(self.tree.distribution(features)))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        check_features(features, self.n_features)?;
        Ok(self.tree.distribution(features).to_vec())
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.importances.as_deref()
    }
}

/// Ensemble of trees; probabilities are the mean of the tree distributions
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<Tree>,
    n_features: usize,
    importances: Option<Vec<f64>>,
    model_type: String,
}

impl RandomForest {
    pub fn from_spec(
        spec: ForestSpec,
        n_features: usize,
        model_type: Option<String>,
    ) -> Result<Self, AnalysisError> {
        if spec.trees.is_empty() {
            return Err(AnalysisError::ModelLoad("Forest has no trees".to_string()));
        }
        let trees = spec
            .trees
            .iter()
            .map(|t| Tree::from_spec(t, n_features))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trees,
            n_features,
            importances: validate_importances(spec.feature_importances, n_features)?,
            model_type: model_type.unwrap_or_else(|| "RandomForestClassifier".to_string()),
        })
    }

    fn mean_distribution(&self, features: &[f64]) -> Vec<f64> {
        let mut sum = vec![0.0; NUM_CLASSES];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.distribution(features)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        sum.iter_mut().for_each(|p| *p /= n);
        sum
    }
}

impl Classifier for RandomForest {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            probabilities: true,
            importances: self.importances.is_some(),
        }
    }

    fn predict(&self, features: &[f64]) -> Result<usize, AnalysisError> {
        check_features(features, self.n_features)?;
        Ok(argmax(&self.mean_distribution(features)))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        check_features(features, self.n_features)?;
        Ok(self.mean_distribution(features))
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.importances.as_deref()
    }
}
